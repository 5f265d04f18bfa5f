#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

//! # Dockscout Library
//!
//! This library summarizes the contacts between a docked ligand pose and its
//! receptor. Structures are read leniently from PDB or PDBQT text, atom pairs
//! within a distance cutoff are classified as polar, hydrophobic, halogen,
//! metal or other, and the most contacted receptor residues are ranked.
//!
//! Summaries can be rendered as text or Markdown reports, or converted to
//! Polars DataFrames for export. The [`client`] module fetches structures and
//! run status from the docking backend and polls long-running jobs.

pub mod atoms;
pub mod client;
pub mod contacts;
pub mod elements;
/// Pose format detection
pub mod formats;
pub mod report;
mod utils;

// Re-export key public types
pub use atoms::{parse_atoms, Atom};
pub use client::{ApiClient, ApiError, ClientConfig};
pub use contacts::{
    classify, compute_interaction_summary, get_contact_summary, get_pose_summaries,
    poses_to_df, residues_to_df, summary_to_df, CategoryCounts, ContactCategory, ContactCutoff,
    ContactSummary, ResidueContact,
};
pub use elements::normalize_element;
pub use formats::{detect_pose_format, PoseFormat};
pub use report::{render_run_summary, render_summary, ReportFormat};
pub use utils::{run_with_threads, write_df_to_file, DataFrameFileType};
