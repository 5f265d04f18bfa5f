//! Contact analysis between a docked ligand pose and its receptor.
//!
//! This module classifies ligand-receptor atom pairs within a distance cutoff
//! and summarizes them per category and per receptor residue.
/// Contact category rules
pub mod classify;
/// Summary value types and cutoff presets
pub mod structs;
/// Pairwise contact scan
pub mod summary;

// Re-exports
pub use classify::classify;
pub use structs::*;
pub use summary::{compute_interaction_summary, TOP_RESIDUES};

use crate::atoms::parse_atoms;
use polars::prelude::*;
use rayon::prelude::*;
use tracing::debug;

/// Parse a receptor and a pose and summarize their contacts.
///
/// # Arguments
///
/// * `receptor_text` - Receptor structure as PDB or PDBQT text
/// * `pose_text` - One ligand pose as PDB or PDBQT text
/// * `cutoff` - Contact distance cutoff in Ångströms (typically 4.0)
///
/// # Returns
///
/// The [`ContactSummary`], or `None` if either text holds no usable atom records.
///
/// # Example
///
/// ```no_run
/// use dockscout::get_contact_summary;
///
/// let receptor = std::fs::read_to_string("receptor.pdbqt").unwrap();
/// let pose = std::fs::read_to_string("pose.pdbqt").unwrap();
/// match get_contact_summary(&receptor, &pose, 4.0) {
///     Some(summary) => println!("{summary}"),
///     None => println!("No pose data yet"),
/// }
/// ```
pub fn get_contact_summary(
    receptor_text: &str,
    pose_text: &str,
    cutoff: f64,
) -> Option<ContactSummary> {
    let receptor = parse_atoms(receptor_text);
    let ligand = parse_atoms(pose_text);
    debug!(
        "Comparing {} ligand atoms against {} receptor atoms at {cutoff} Å",
        ligand.len(),
        receptor.len()
    );
    compute_interaction_summary(&ligand, &receptor, cutoff)
}

/// Summarize every pose of a docking result against the same receptor.
///
/// The receptor is parsed once and poses are analyzed in parallel. The output
/// keeps the order of `poses`.
pub fn get_pose_summaries(
    receptor_text: &str,
    poses: &[String],
    cutoff: f64,
) -> Vec<Option<ContactSummary>> {
    let receptor = parse_atoms(receptor_text);
    poses
        .par_iter()
        .map(|pose| compute_interaction_summary(&parse_atoms(pose), &receptor, cutoff))
        .collect()
}

/// Convert the category counts of a summary into a Polars `DataFrame`.
///
/// Columns: `category`, `count`, `share`. Categories are always listed in
/// reporting order, including those without contacts.
pub fn summary_to_df(summary: &ContactSummary) -> PolarsResult<DataFrame> {
    df!(
        "category" => ContactCategory::ALL.iter().map(|c| c.to_string()).collect::<Vec<String>>(),
        "count" => summary.category_counts.iter().map(|(_, n)| n as u32).collect::<Vec<u32>>(),
        "share" => ContactCategory::ALL.iter().map(|&c| summary.share(c)).collect::<Vec<f64>>(),
    )
}

/// Convert the top contacting residues of a summary into a Polars `DataFrame`.
pub fn residues_to_df(summary: &ContactSummary) -> PolarsResult<DataFrame> {
    df!(
        "rank" => (1..=summary.top_residues.len() as u32).collect::<Vec<u32>>(),
        "residue" => summary.top_residues.iter().map(|r| r.label.clone()).collect::<Vec<String>>(),
        "count" => summary.top_residues.iter().map(|r| r.count as u32).collect::<Vec<u32>>(),
    )
}

/// Convert per-pose summaries into a Polars `DataFrame`, one row per pose.
///
/// Poses without a summary keep their row with null counts so that pose
/// indices stay aligned with the input. `scores` holds the docking score of
/// each pose in the same order; poses past its end get a null score.
pub fn poses_to_df(
    summaries: &[Option<ContactSummary>],
    scores: &[Option<f64>],
) -> PolarsResult<DataFrame> {
    let count_column = |category: ContactCategory| {
        summaries
            .iter()
            .map(|s| s.as_ref().map(|s| s.category_counts.get(category) as u32))
            .collect::<Vec<Option<u32>>>()
    };
    df!(
        "pose" => (1..=summaries.len() as u32).collect::<Vec<u32>>(),
        "score" => (0..summaries.len()).map(|i| scores.get(i).copied().flatten()).collect::<Vec<Option<f64>>>(),
        "contacts" => summaries.iter().map(|s| s.as_ref().map(|s| s.contact_pair_count as u32)).collect::<Vec<Option<u32>>>(),
        "closest_distance" => summaries.iter().map(|s| s.as_ref().and_then(|s| s.closest_distance)).collect::<Vec<Option<f64>>>(),
        "polar" => count_column(ContactCategory::Polar),
        "hydrophobic" => count_column(ContactCategory::Hydrophobic),
        "halogen" => count_column(ContactCategory::Halogen),
        "metal" => count_column(ContactCategory::Metal),
        "other" => count_column(ContactCategory::Other),
        "top_residue" => summaries.iter().map(|s| s.as_ref().and_then(|s| s.top_residues.first()).map(|r| r.label.clone())).collect::<Vec<Option<String>>>(),
    )
}
