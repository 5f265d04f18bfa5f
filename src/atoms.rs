//! Lenient reader for the `ATOM`/`HETATM` records of PDB and PDBQT text.
//!
//! Docking outputs are full of `REMARK`, `ROOT`, `BRANCH` and `TORSDOF` lines,
//! truncated records and other noise. Rather than failing, the reader keeps
//! every line it can place in 3D and skips the rest.

use crate::elements::normalize_element;
use nalgebra as na;
use tracing::{debug, trace};

/// Shortest line that still holds the z coordinate field.
pub const MIN_RECORD_LENGTH: usize = 54;

/// A single atom record with the fields needed for contact analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Cartesian coordinates in Ångströms
    pub position: na::Point3<f64>,
    /// Normalized element symbol, see [`normalize_element`]
    pub element: String,
    /// Residue name, e.g. `ASP`. May be empty.
    pub residue_name: String,
    /// Residue sequence number as written, may include an insertion code. May be empty.
    pub residue_id: String,
}

impl Atom {
    /// Create an atom from coordinates and an already normalized element.
    pub fn new(
        x: f64,
        y: f64,
        z: f64,
        element: &str,
        residue_name: &str,
        residue_id: &str,
    ) -> Self {
        Self {
            position: na::Point3::new(x, y, z),
            element: element.to_string(),
            residue_name: residue_name.to_string(),
            residue_id: residue_id.to_string(),
        }
    }

    /// Label used to attribute contacts to a residue, e.g. `ASP 86`.
    ///
    /// Returns `None` for atoms without a residue name.
    pub fn residue_label(&self) -> Option<String> {
        match (self.residue_name.is_empty(), self.residue_id.is_empty()) {
            (true, _) => None,
            (false, true) => Some(self.residue_name.clone()),
            (false, false) => Some(format!("{} {}", self.residue_name, self.residue_id)),
        }
    }

    /// Squared distance to another atom.
    pub fn distance_squared(&self, other: &Atom) -> f64 {
        na::distance_squared(&self.position, &other.position)
    }
}

/// Parse all coordinate records from PDB or PDBQT text.
///
/// A line is kept when it is at least [`MIN_RECORD_LENGTH`] characters long,
/// its record name is `ATOM` or `HETATM`, and all three coordinate fields
/// (columns 31-38, 39-46 and 47-54) parse as finite numbers. The element is
/// read from columns 77-78, falling back to the last whitespace-separated
/// token on the line (where PDBQT keeps its atom type).
///
/// Lines that do not qualify are skipped, so malformed input yields fewer
/// atoms instead of an error.
///
/// # Example
///
/// ```
/// use dockscout::parse_atoms;
///
/// let text = "\
/// REMARK  docked pose
/// ATOM      1  C1  LIG A   1       1.000   2.000   3.000  1.00  0.00     0.020 A
/// TORSDOF 0";
/// let atoms = parse_atoms(text);
/// assert_eq!(atoms.len(), 1);
/// assert_eq!(atoms[0].element, "C");
/// ```
pub fn parse_atoms(text: &str) -> Vec<Atom> {
    let atoms: Vec<Atom> = text.lines().filter_map(parse_atom_line).collect();
    debug!("Parsed {} atom records", atoms.len());
    atoms
}

/// Parse one line into an [`Atom`], or `None` if it is not a usable record.
pub fn parse_atom_line(line: &str) -> Option<Atom> {
    if line.chars().count() < MIN_RECORD_LENGTH {
        return None;
    }
    let record = column(line, 0, 6).trim();
    if record != "ATOM" && record != "HETATM" {
        return None;
    }

    let (Some(x), Some(y), Some(z)) = (
        parse_coordinate(column(line, 30, 38)),
        parse_coordinate(column(line, 38, 46)),
        parse_coordinate(column(line, 46, 54)),
    ) else {
        trace!("Skipping record with unreadable coordinates: {line}");
        return None;
    };

    let raw_element = match column(line, 76, 78).trim() {
        "" => line.split_whitespace().last().unwrap_or(""),
        element => element,
    };

    Some(Atom {
        position: na::Point3::new(x, y, z),
        element: normalize_element(raw_element),
        residue_name: column(line, 17, 20).trim().to_string(),
        residue_id: column(line, 22, 26).trim().to_string(),
    })
}

fn parse_coordinate(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Character range `[start, end)` of a line, clamped to its length.
fn column(line: &str, start: usize, end: usize) -> &str {
    let byte_offset = |n: usize| {
        line.char_indices()
            .nth(n)
            .map_or(line.len(), |(offset, _)| offset)
    };
    let start = byte_offset(start);
    let end = byte_offset(end).max(start);
    &line[start..end]
}
