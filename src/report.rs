//! Human-readable interaction and run reports.

use crate::client::RunResults;
use crate::contacts::{ContactSummary, ContactCutoff};
use crate::formats::PoseFormat;
use serde::Serialize;
use std::fmt::Write;

const AWAITING_POSES: &str = "Interaction map will appear after poses are loaded.";
const NO_RESIDUES: &str = "No residue contacts detected.";
const NO_RESULTS: &str = "No results.";

/// Number of ranked targets listed in a run summary.
pub const TOP_RANKED: usize = 3;

/// Output style of a rendered report.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain text
    #[default]
    Text,
    /// Markdown with tables
    Markdown,
    /// Pretty-printed JSON, `summary` is null while pose data is missing
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Render the interaction panel for one pose.
///
/// A missing summary is reported as pending pose data, which is not the same
/// as a summary with zero contacts.
pub fn render_summary(
    summary: Option<&ContactSummary>,
    cutoff: ContactCutoff,
    pose_format: PoseFormat,
    format: ReportFormat,
) -> String {
    match format {
        ReportFormat::Text => render_text(summary, cutoff, pose_format),
        ReportFormat::Markdown => render_markdown(summary, cutoff, pose_format),
        ReportFormat::Json => render_json(summary, cutoff, pose_format),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    cutoff: f64,
    pose_format: PoseFormat,
    summary: Option<&'a ContactSummary>,
}

fn render_json(
    summary: Option<&ContactSummary>,
    cutoff: ContactCutoff,
    pose_format: PoseFormat,
) -> String {
    let report = JsonReport {
        cutoff: cutoff.angstroms(),
        pose_format,
        summary,
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Render the overview of a docking run: target count and best ranked targets.
///
/// # Example
///
/// ```
/// use dockscout::client::RunResults;
/// use dockscout::{render_run_summary, ReportFormat};
///
/// let results: RunResults = serde_json::from_str(r#"{"ranking": [], "per_protein": []}"#).unwrap();
/// let report = render_run_summary("r1", &results, ReportFormat::Text);
/// assert!(report.contains("Targets: 0"));
/// ```
pub fn render_run_summary(run_id: &str, results: &RunResults, format: ReportFormat) -> String {
    let top = results.top_ranked(TOP_RANKED);
    let target_count = results.per_protein.len();
    let ranked_line = |i: usize, name: &str, score: Option<f64>| {
        let score = match score {
            Some(score) => format!("{score:.2}"),
            None => "-".to_string(),
        };
        format!("{}. {name}: {score} kcal/mol", i + 1)
    };

    let mut out = String::new();
    match format {
        ReportFormat::Text => {
            let _ = writeln!(out, "Run {run_id}");
            let _ = writeln!(out, "Targets: {target_count}");
            let _ = writeln!(out, "Top results");
            if top.is_empty() {
                let _ = writeln!(out, "  {NO_RESULTS}");
            }
            for (i, entry) in top.iter().enumerate() {
                let _ = writeln!(out, "  {}", ranked_line(i, &entry.protein_name, entry.best_score));
            }
        }
        ReportFormat::Markdown => {
            let _ = writeln!(out, "## Run summary\n");
            let _ = writeln!(out, "- Run ID: {run_id}");
            let _ = writeln!(out, "- Targets: {target_count}");
            let _ = writeln!(out, "\n### Top results\n");
            if top.is_empty() {
                let _ = writeln!(out, "{NO_RESULTS}");
            }
            for (i, entry) in top.iter().enumerate() {
                let _ = writeln!(out, "{}", ranked_line(i, &entry.protein_name, entry.best_score));
            }
        }
        ReportFormat::Json => {
            let report = serde_json::json!({
                "run_id": run_id,
                "target_count": target_count,
                "top": top.iter().map(|entry| serde_json::json!({
                    "protein_id": entry.protein_id,
                    "protein_name": entry.protein_name,
                    "best_score": entry.best_score,
                })).collect::<Vec<_>>(),
            });
            out = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
        }
    }
    out
}

fn closest_label(summary: &ContactSummary) -> String {
    match summary.closest_distance {
        Some(d) => format!("{d:.2} Å"),
        None => "-".to_string(),
    }
}

fn render_text(
    summary: Option<&ContactSummary>,
    cutoff: ContactCutoff,
    pose_format: PoseFormat,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Contacts cutoff {cutoff} Å ({pose_format} pose)");

    let Some(summary) = summary else {
        let _ = writeln!(out, "{AWAITING_POSES}");
        return out;
    };

    for (category, count) in summary.category_counts.iter() {
        let share = summary.share(category) * 100.0;
        let _ = writeln!(out, "  {category:<12} {count:>5}  {share:>5.1}%");
    }
    let _ = writeln!(out, "Closest contact: {}", closest_label(summary));
    let _ = writeln!(out, "Total contacts: {}", summary.contact_pair_count);

    let _ = writeln!(out, "Top contacting residues");
    if summary.top_residues.is_empty() {
        let _ = writeln!(out, "  {NO_RESIDUES}");
    }
    for residue in &summary.top_residues {
        let _ = writeln!(out, "  {:<12} {:>5}", residue.label, residue.count);
    }
    out
}

fn render_markdown(
    summary: Option<&ContactSummary>,
    cutoff: ContactCutoff,
    pose_format: PoseFormat,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Interactions\n");
    let _ = writeln!(out, "- Cutoff: {cutoff} Å");
    let _ = writeln!(out, "- Pose format: {pose_format}");

    let Some(summary) = summary else {
        let _ = writeln!(out, "\n{AWAITING_POSES}");
        return out;
    };

    let _ = writeln!(out, "- Closest contact: {}", closest_label(summary));
    let _ = writeln!(out, "- Total contacts: {}\n", summary.contact_pair_count);

    let _ = writeln!(out, "| Category | Contacts | Share |");
    let _ = writeln!(out, "| --- | ---: | ---: |");
    for (category, count) in summary.category_counts.iter() {
        let share = summary.share(category) * 100.0;
        let _ = writeln!(out, "| {category} | {count} | {share:.1}% |");
    }

    let _ = writeln!(out, "\n### Top contacting residues\n");
    if summary.top_residues.is_empty() {
        let _ = writeln!(out, "{NO_RESIDUES}");
    } else {
        let _ = writeln!(out, "| Residue | Contacts |");
        let _ = writeln!(out, "| --- | ---: |");
        for residue in &summary.top_residues {
            let _ = writeln!(out, "| {} | {} |", residue.label, residue.count);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::Atom;
    use crate::contacts::compute_interaction_summary;

    fn sample() -> ContactSummary {
        let ligand = [
            Atom::new(0.0, 0.0, 0.0, "C", "UNL", "1"),
            Atom::new(1.0, 0.0, 0.0, "O", "UNL", "1"),
        ];
        let receptor = [
            Atom::new(2.0, 0.0, 0.0, "N", "LYS", "33"),
            Atom::new(0.0, 3.0, 0.0, "C", "LEU", "83"),
        ];
        compute_interaction_summary(&ligand, &receptor, 4.0).unwrap()
    }

    #[test]
    fn text_report() {
        let summary = sample();
        let report = render_summary(
            Some(&summary),
            ContactCutoff::Standard,
            PoseFormat::Pdbqt,
            ReportFormat::Text,
        );
        assert!(report.starts_with("Contacts cutoff 4.0 Å (pdbqt pose)"));
        assert!(report.contains("Closest contact: 1.00 Å"));
        assert!(report.contains("Total contacts: 4"));
        assert!(report.contains("polar"));
        assert!(report.contains("LYS 33"));
    }

    #[test]
    fn markdown_report() {
        let summary = sample();
        let report = render_summary(
            Some(&summary),
            ContactCutoff::Loose,
            PoseFormat::Pdb,
            ReportFormat::Markdown,
        );
        assert!(report.contains("- Cutoff: 5.0 Å"));
        assert!(report.contains("| polar | 3 | 75.0% |"));
        assert!(report.contains("| hydrophobic | 1 | 25.0% |"));
        assert!(report.contains("| LYS 33 | 2 |"));
    }

    fn run_results() -> RunResults {
        serde_json::from_str(
            r#"{
                "ranking": [
                    {"protein_id": "P1", "protein_name": "EGFR", "best_score": -8.234,
                     "percentile": 92.0, "status": "SUCCEEDED", "error": null,
                     "receptor_pdbqt_path": null, "metrics": null},
                    {"protein_id": "P2", "protein_name": "CDK2", "best_score": -7.5,
                     "percentile": null, "status": "SUCCEEDED", "error": null,
                     "receptor_pdbqt_path": null, "metrics": null},
                    {"protein_id": "P3", "protein_name": "KRAS", "best_score": -6.0,
                     "percentile": null, "status": "SUCCEEDED", "error": null,
                     "receptor_pdbqt_path": null, "metrics": null},
                    {"protein_id": "P4", "protein_name": "BRAF", "best_score": null,
                     "percentile": null, "status": "FAILED", "error": "no pocket",
                     "receptor_pdbqt_path": null, "metrics": null}
                ],
                "per_protein": []
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn run_summary_lists_top_three() {
        let results = run_results();
        let report = render_run_summary("r42", &results, ReportFormat::Text);
        assert!(report.starts_with("Run r42\nTargets: 0\n"));
        assert!(report.contains("  1. EGFR: -8.23 kcal/mol"));
        assert!(report.contains("  2. CDK2: -7.50 kcal/mol"));
        assert!(report.contains("  3. KRAS: -6.00 kcal/mol"));
        assert!(!report.contains("BRAF"));

        let markdown = render_run_summary("r42", &results, ReportFormat::Markdown);
        assert!(markdown.contains("- Run ID: r42"));
        assert!(markdown.contains("\n1. EGFR: -8.23 kcal/mol\n"));

        let json: serde_json::Value =
            serde_json::from_str(&render_run_summary("r42", &results, ReportFormat::Json)).unwrap();
        assert_eq!(json["top"].as_array().unwrap().len(), 3);
        assert_eq!(json["top"][1]["protein_id"], "P2");
    }

    #[test]
    fn run_summary_without_results() {
        let empty = RunResults {
            ranking: Vec::new(),
            per_protein: Vec::new(),
        };
        let report = render_run_summary("r1", &empty, ReportFormat::Text);
        assert!(report.contains(NO_RESULTS));
    }

    #[test]
    fn json_report() {
        let summary = sample();
        let report = render_summary(
            Some(&summary),
            ContactCutoff::Standard,
            PoseFormat::Pdbqt,
            ReportFormat::Json,
        );
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["cutoff"], 4.0);
        assert_eq!(value["pose_format"], "pdbqt");
        assert_eq!(value["summary"]["contact_pair_count"], 4);
        assert_eq!(value["summary"]["category_counts"]["polar"], 3);
        assert_eq!(value["summary"]["top_residues"][0]["label"], "LYS 33");

        let pending = render_summary(None, ContactCutoff::Tight, PoseFormat::Pdb, ReportFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&pending).unwrap();
        assert!(value["summary"].is_null());
    }

    #[test]
    fn missing_summary_is_pending() {
        for format in [ReportFormat::Text, ReportFormat::Markdown] {
            let report = render_summary(None, ContactCutoff::Standard, PoseFormat::Pdb, format);
            assert!(report.contains(AWAITING_POSES));
            assert!(!report.contains("Total contacts"));
        }
    }

    #[test]
    fn summary_without_residue_contacts() {
        let summary = compute_interaction_summary(
            &[Atom::new(0.0, 0.0, 0.0, "C", "", "")],
            &[Atom::new(9.0, 0.0, 0.0, "C", "ALA", "1")],
            3.5,
        )
        .unwrap();
        let report = render_summary(
            Some(&summary),
            ContactCutoff::Tight,
            PoseFormat::Pdb,
            ReportFormat::Text,
        );
        assert!(report.contains("Total contacts: 0"));
        assert!(report.contains(NO_RESIDUES));
        assert!(report.contains("Closest contact: 9.00 Å"));
    }
}
