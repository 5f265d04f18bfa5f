use serde::Serialize;

/// Structure formats a docking pose may be delivered in.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoseFormat {
    /// Protein Data Bank format
    #[default]
    Pdb,
    /// AutoDock PDBQT with partial charges and torsion tree
    Pdbqt,
}

impl std::fmt::Display for PoseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PoseFormat::Pdb => write!(f, "pdb"),
            PoseFormat::Pdbqt => write!(f, "pdbqt"),
        }
    }
}

/// Guess the format of a pose from its text.
///
/// Text containing the PDBQT torsion-tree keywords `ROOT` or `TORSDOF` is
/// treated as PDBQT, anything else (including empty text) as PDB. This is only
/// a hint for viewers: contact analysis reads both formats the same way.
pub fn detect_pose_format(pose_text: &str) -> PoseFormat {
    if pose_text.contains("ROOT") || pose_text.contains("TORSDOF") {
        PoseFormat::Pdbqt
    } else {
        PoseFormat::Pdb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_pdb() {
        assert_eq!(detect_pose_format(""), PoseFormat::Pdb);
    }

    #[test]
    fn torsion_tree_marks_pdbqt() {
        assert_eq!(detect_pose_format("ROOT\nATOM\nENDROOT"), PoseFormat::Pdbqt);
        assert_eq!(detect_pose_format("REMARK\nTORSDOF 3\n"), PoseFormat::Pdbqt);
    }

    #[test]
    fn markers_are_case_sensitive() {
        assert_eq!(detect_pose_format("root torsdof"), PoseFormat::Pdb);
        assert_eq!(
            detect_pose_format("HETATM    1  C1  LIG A   1       0.000   0.000   0.000"),
            PoseFormat::Pdb
        );
    }

    #[test]
    fn fixture_formats() {
        let root = env!("CARGO_MANIFEST_DIR");
        let pose = std::fs::read_to_string(format!("{root}/test-data/pose.pdbqt")).unwrap();
        let receptor = std::fs::read_to_string(format!("{root}/test-data/receptor.pdb")).unwrap();
        assert_eq!(detect_pose_format(&pose), PoseFormat::Pdbqt);
        assert_eq!(detect_pose_format(&receptor), PoseFormat::Pdb);
        assert_eq!(PoseFormat::Pdbqt.to_string(), "pdbqt");
    }
}
