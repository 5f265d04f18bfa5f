use core::fmt;
use serde::Serialize;

/// Broad chemical category of a ligand-receptor atom contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactCategory {
    /// Either atom is N, O, S or P
    Polar,
    /// Both atoms are carbon
    Hydrophobic,
    /// Either atom is F, Cl, Br or I
    Halogen,
    /// Either atom is a metal ion
    Metal,
    /// Any other pair
    Other,
}

impl ContactCategory {
    /// All categories in reporting order.
    pub const ALL: [ContactCategory; 5] = [
        ContactCategory::Polar,
        ContactCategory::Hydrophobic,
        ContactCategory::Halogen,
        ContactCategory::Metal,
        ContactCategory::Other,
    ];
}

impl fmt::Display for ContactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactCategory::Polar => write!(f, "polar"),
            ContactCategory::Hydrophobic => write!(f, "hydrophobic"),
            ContactCategory::Halogen => write!(f, "halogen"),
            ContactCategory::Metal => write!(f, "metal"),
            ContactCategory::Other => write!(f, "other"),
        }
    }
}

/// Number of contacts found per [`ContactCategory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    /// Polar contacts
    pub polar: usize,
    /// Carbon-carbon contacts
    pub hydrophobic: usize,
    /// Contacts involving a halogen
    pub halogen: usize,
    /// Contacts involving a metal
    pub metal: usize,
    /// Remaining contacts
    pub other: usize,
}

impl CategoryCounts {
    /// Count for one category.
    pub fn get(&self, category: ContactCategory) -> usize {
        match category {
            ContactCategory::Polar => self.polar,
            ContactCategory::Hydrophobic => self.hydrophobic,
            ContactCategory::Halogen => self.halogen,
            ContactCategory::Metal => self.metal,
            ContactCategory::Other => self.other,
        }
    }

    pub(crate) fn add(&mut self, category: ContactCategory, n: usize) {
        let count = match category {
            ContactCategory::Polar => &mut self.polar,
            ContactCategory::Hydrophobic => &mut self.hydrophobic,
            ContactCategory::Halogen => &mut self.halogen,
            ContactCategory::Metal => &mut self.metal,
            ContactCategory::Other => &mut self.other,
        };
        *count += n;
    }

    /// Iterate over `(category, count)` in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (ContactCategory, usize)> + '_ {
        ContactCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Sum over all categories.
    pub fn total(&self) -> usize {
        self.iter().map(|(_, n)| n).sum()
    }
}

/// A receptor residue and the number of contacts attributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidueContact {
    /// Residue label, e.g. `ASP 86`
    pub label: String,
    /// Number of contacts with this residue
    pub count: usize,
}

/// Summary of all contacts between one pose and its receptor at one cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSummary {
    /// Contacts within the cutoff, by category
    pub category_counts: CategoryCounts,
    /// Number of atom pairs within the cutoff
    pub contact_pair_count: usize,
    /// Shortest ligand-receptor atom distance, regardless of the cutoff
    pub closest_distance: Option<f64>,
    /// Up to five receptor residues with the most contacts
    pub top_residues: Vec<ResidueContact>,
}

impl ContactSummary {
    /// Fraction of all contacts that fall in `category`, or 0 without contacts.
    pub fn share(&self, category: ContactCategory) -> f64 {
        match self.contact_pair_count {
            0 => 0.0,
            total => self.category_counts.get(category) as f64 / total as f64,
        }
    }
}

impl fmt::Display for ContactSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let closest = match self.closest_distance {
            Some(d) => format!("{d:.2}"),
            None => "-".to_string(),
        };
        write!(
            f,
            "{n} contacts (closest {closest} Å):",
            n = self.contact_pair_count
        )?;
        for (category, count) in self.category_counts.iter() {
            write!(f, " {category}={count}")?;
        }
        Ok(())
    }
}

/// Distance cutoffs offered for contact analysis.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContactCutoff {
    /// 3.5 Å, direct contacts only
    #[value(name = "3.5")]
    Tight,
    /// 4.0 Å
    #[default]
    #[value(name = "4.0")]
    Standard,
    /// 5.0 Å, includes second-shell neighbors
    #[value(name = "5.0")]
    Loose,
}

impl ContactCutoff {
    /// All presets from tightest to loosest.
    pub const ALL: [ContactCutoff; 3] = [
        ContactCutoff::Tight,
        ContactCutoff::Standard,
        ContactCutoff::Loose,
    ];

    /// Cutoff distance in Ångströms.
    pub fn angstroms(&self) -> f64 {
        match self {
            ContactCutoff::Tight => 3.5,
            ContactCutoff::Standard => 4.0,
            ContactCutoff::Loose => 5.0,
        }
    }
}

impl fmt::Display for ContactCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.angstroms())
    }
}
