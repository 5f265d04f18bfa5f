use super::classify::classify;
use super::structs::{CategoryCounts, ContactSummary, ResidueContact};
use crate::atoms::Atom;
use rayon::prelude::*;
use std::collections::HashMap;

/// Number of residues reported in [`ContactSummary::top_residues`].
pub const TOP_RESIDUES: usize = 5;

/// Contact counts per residue label, kept in first-seen order.
#[derive(Debug, Default)]
struct ResidueTally<'a> {
    order: Vec<(&'a str, usize)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> ResidueTally<'a> {
    fn add(&mut self, label: &'a str, n: usize) {
        match self.index.get(label) {
            Some(&i) => self.order[i].1 += n,
            None => {
                self.index.insert(label, self.order.len());
                self.order.push((label, n));
            }
        }
    }

    /// Residues sorted by contact count. Ties keep first-seen order.
    fn top(mut self, n: usize) -> Vec<ResidueContact> {
        self.order.sort_by(|a, b| b.1.cmp(&a.1));
        self.order
            .into_iter()
            .take(n)
            .map(|(label, count)| ResidueContact {
                label: label.to_string(),
                count,
            })
            .collect()
    }
}

/// Contacts of a single ligand atom against the whole receptor.
struct AtomScan<'a> {
    min_distance_squared: f64,
    counts: CategoryCounts,
    pairs: usize,
    residues: ResidueTally<'a>,
}

fn scan_ligand_atom<'a>(
    ligand_atom: &Atom,
    receptor: &[Atom],
    receptor_labels: &'a [Option<String>],
    cutoff_squared: f64,
) -> AtomScan<'a> {
    let mut scan = AtomScan {
        min_distance_squared: f64::INFINITY,
        counts: CategoryCounts::default(),
        pairs: 0,
        residues: ResidueTally::default(),
    };

    for (receptor_atom, label) in receptor.iter().zip(receptor_labels) {
        let dist_squared = ligand_atom.distance_squared(receptor_atom);
        // The closest contact is tracked regardless of the cutoff
        if dist_squared < scan.min_distance_squared {
            scan.min_distance_squared = dist_squared;
        }
        if dist_squared <= cutoff_squared {
            scan.pairs += 1;
            scan.counts
                .add(classify(&ligand_atom.element, &receptor_atom.element), 1);
            if let Some(label) = label {
                scan.residues.add(label, 1);
            }
        }
    }
    scan
}

/// Summarize the contacts between a ligand pose and its receptor.
///
/// Every ligand atom is compared with every receptor atom. Pairs closer than
/// or exactly at `cutoff` (in Ångströms) are counted, classified with
/// [`classify`], and attributed to the receptor atom's residue. The closest
/// distance is taken over all pairs, including those beyond the cutoff.
///
/// Returns `None` if either atom list is empty, which callers should treat as
/// "no pose data yet" rather than "no contacts".
///
/// Ligand atoms are scanned in parallel and merged in input order, so the
/// result is identical to a sequential scan.
///
/// # Example
///
/// ```
/// use dockscout::{compute_interaction_summary, Atom};
///
/// let ligand = vec![Atom::new(0.0, 0.0, 0.0, "C", "", "")];
/// let receptor = vec![Atom::new(1.0, 0.0, 0.0, "C", "LEU", "83")];
/// let summary = compute_interaction_summary(&ligand, &receptor, 3.5).unwrap();
/// assert_eq!(summary.contact_pair_count, 1);
/// assert_eq!(summary.category_counts.hydrophobic, 1);
/// assert_eq!(summary.closest_distance, Some(1.0));
/// assert_eq!(summary.top_residues[0].label, "LEU 83");
/// ```
pub fn compute_interaction_summary(
    ligand: &[Atom],
    receptor: &[Atom],
    cutoff: f64,
) -> Option<ContactSummary> {
    if ligand.is_empty() || receptor.is_empty() {
        return None;
    }
    let cutoff_squared = cutoff * cutoff;
    let receptor_labels: Vec<Option<String>> =
        receptor.iter().map(Atom::residue_label).collect();

    let scans: Vec<AtomScan> = ligand
        .par_iter()
        .map(|atom| scan_ligand_atom(atom, receptor, &receptor_labels, cutoff_squared))
        .collect();

    let mut min_distance_squared = f64::INFINITY;
    let mut category_counts = CategoryCounts::default();
    let mut contact_pair_count = 0;
    let mut residues = ResidueTally::default();
    for scan in scans {
        if scan.min_distance_squared < min_distance_squared {
            min_distance_squared = scan.min_distance_squared;
        }
        for (category, n) in scan.counts.iter() {
            category_counts.add(category, n);
        }
        contact_pair_count += scan.pairs;
        for (label, n) in scan.residues.order {
            residues.add(label, n);
        }
    }

    let closest_distance =
        (min_distance_squared != f64::INFINITY).then(|| min_distance_squared.sqrt());

    Some(ContactSummary {
        category_counts,
        contact_pair_count,
        closest_distance,
        top_residues: residues.top(TOP_RESIDUES),
    })
}
