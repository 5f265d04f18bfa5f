//! Element symbol normalization for fixed-width structure records.
//!
//! PDBQT files written by AutoDock tools carry atom *types* (`A`, `OA`, `HD`, ...)
//! in the element columns rather than element symbols. Everything downstream
//! works on the normalized symbol returned by [`normalize_element`].

/// Symbol used when no element can be recovered from the raw text.
pub const UNKNOWN_ELEMENT: &str = "X";

/// Map a raw element or AutoDock atom-type token to an element symbol.
///
/// Non-alphabetic characters are dropped and the rest is uppercased. The
/// AutoDock pseudo-elements `A`, `NA`, `OA`, `SA` and `HD` are mapped to
/// carbon, nitrogen, oxygen, sulfur and hydrogen. Note that `NA` is always
/// read as the acceptor nitrogen type and never as sodium.
///
/// Two-letter symbols are kept only for metals and halogens; every other token
/// collapses to its first letter. Empty input yields [`UNKNOWN_ELEMENT`].
///
/// # Example
///
/// ```
/// use dockscout::normalize_element;
///
/// assert_eq!(normalize_element("OA"), "O");
/// assert_eq!(normalize_element("Zn2+"), "ZN");
/// assert_eq!(normalize_element("CA"), "CA");
/// assert_eq!(normalize_element("NA"), "N");
/// ```
pub fn normalize_element(raw: &str) -> String {
    let upper: String = raw
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if upper.is_empty() {
        return UNKNOWN_ELEMENT.to_string();
    }

    // AutoDock atom types
    let remapped = match upper.as_str() {
        "A" => Some("C"),
        "NA" => Some("N"),
        "OA" => Some("O"),
        "SA" => Some("S"),
        "HD" => Some("H"),
        _ => None,
    };
    if let Some(element) = remapped {
        return element.to_string();
    }

    // Only ASCII letters are left, so byte slicing is safe
    let two_letter = &upper[..upper.len().min(2)];
    if is_metal(two_letter) || is_halogen(two_letter) {
        two_letter.to_string()
    } else {
        upper[..1].to_string()
    }
}

/// Check if a normalized symbol is one of the metals recognized in contacts.
pub fn is_metal(element: &str) -> bool {
    matches!(
        element,
        "FE" | "ZN" | "MG" | "MN" | "CA" | "NA" | "K" | "CU" | "CO" | "NI"
    )
}

/// Check if a normalized symbol is a halogen.
pub fn is_halogen(element: &str) -> bool {
    matches!(element, "F" | "CL" | "BR" | "I")
}

/// Check if a normalized symbol is a polar heteroatom.
pub fn is_polar(element: &str) -> bool {
    matches!(element, "N" | "O" | "S" | "P")
}
