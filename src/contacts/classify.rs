use super::structs::ContactCategory;
use crate::elements::{is_halogen, is_metal, is_polar};

/// Classify a contact from the normalized elements of its two atoms.
///
/// Categories are checked in priority order, so a Zn-O pair is a metal
/// contact and an F-N pair is a halogen contact:
///
/// 1. [`ContactCategory::Metal`] if either atom is a metal
/// 2. [`ContactCategory::Halogen`] if either atom is a halogen
/// 3. [`ContactCategory::Polar`] if either atom is N, O, S or P
/// 4. [`ContactCategory::Hydrophobic`] if both atoms are carbon
/// 5. [`ContactCategory::Other`] otherwise
pub fn classify(ligand_element: &str, receptor_element: &str) -> ContactCategory {
    let either = |pred: fn(&str) -> bool| pred(ligand_element) || pred(receptor_element);

    if either(is_metal) {
        ContactCategory::Metal
    } else if either(is_halogen) {
        ContactCategory::Halogen
    } else if either(is_polar) {
        ContactCategory::Polar
    } else if ligand_element == "C" && receptor_element == "C" {
        ContactCategory::Hydrophobic
    } else {
        ContactCategory::Other
    }
}
