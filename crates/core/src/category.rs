//! Waste material categories and per-category item counts.
//!
//! The category set is closed: exactly six materials are tracked, and
//! [`CategoryCounts`] always carries a value for each of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A waste material category recognised by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cardboard,
    Glass,
    Metal,
    Paper,
    Plastic,
    Trash,
}

impl Category {
    /// All categories in declaration order. Tie-breaks follow this order.
    pub const ALL: [Category; 6] = [
        Category::Cardboard,
        Category::Glass,
        Category::Metal,
        Category::Paper,
        Category::Plastic,
        Category::Trash,
    ];

    /// Lowercase key used in JSON payloads and vision-service responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cardboard => "cardboard",
            Self::Glass => "glass",
            Self::Metal => "metal",
            Self::Paper => "paper",
            Self::Plastic => "plastic",
            Self::Trash => "trash",
        }
    }

    /// Capitalised label for user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cardboard => "Cardboard",
            Self::Glass => "Glass",
            Self::Metal => "Metal",
            Self::Paper => "Paper",
            Self::Plastic => "Plastic",
            Self::Trash => "Trash",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Case-insensitive parse of a category key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::Validation(format!("Unknown waste category '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// CategoryCounts
// ---------------------------------------------------------------------------

/// Item count for every tracked category. All six keys are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub cardboard: u32,
    pub glass: u32,
    pub metal: u32,
    pub paper: u32,
    pub plastic: u32,
    pub trash: u32,
}

impl CategoryCounts {
    /// All-zero counts.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Cardboard => self.cardboard,
            Category::Glass => self.glass,
            Category::Metal => self.metal,
            Category::Paper => self.paper,
            Category::Plastic => self.plastic,
            Category::Trash => self.trash,
        }
    }

    pub fn set(&mut self, category: Category, count: u32) {
        let slot = match category {
            Category::Cardboard => &mut self.cardboard,
            Category::Glass => &mut self.glass,
            Category::Metal => &mut self.metal,
            Category::Paper => &mut self.paper,
            Category::Plastic => &mut self.plastic,
            Category::Trash => &mut self.trash,
        };
        *slot = count;
    }

    /// `(category, count)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Sum of all counts. Widened so large parsed values cannot overflow.
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, n)| u64::from(n)).sum()
    }

    /// The category with the maximum count, or `None` when every count is zero.
    ///
    /// Ties resolve to the first category in [`Category::ALL`] order.
    pub fn dominant(&self) -> Option<Category> {
        let mut best: Option<(Category, u32)> = None;
        for (category, count) in self.iter() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, max)) if count <= max => {}
                _ => best = Some((category, count)),
            }
        }
        best.map(|(c, _)| c)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("GLASS".parse::<Category>().unwrap(), Category::Glass);
        assert_eq!(" Plastic ".parse::<Category>().unwrap(), Category::Plastic);
    }

    #[test]
    fn parse_rejects_unknown_category() {
        assert!("organic".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_all_six_keys() {
        let json = serde_json::to_value(CategoryCounts::zero()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        for category in Category::ALL {
            assert_eq!(obj[category.as_str()], 0);
        }
    }

    #[test]
    fn dominant_is_none_when_all_zero() {
        assert_eq!(CategoryCounts::zero().dominant(), None);
    }

    #[test]
    fn dominant_picks_strict_maximum() {
        let mut counts = CategoryCounts::zero();
        counts.set(Category::Metal, 1);
        counts.set(Category::Plastic, 4);
        assert_eq!(counts.dominant(), Some(Category::Plastic));
    }

    #[test]
    fn dominant_tie_resolves_to_declaration_order() {
        let mut counts = CategoryCounts::zero();
        counts.set(Category::Glass, 2);
        counts.set(Category::Cardboard, 2);
        counts.set(Category::Trash, 2);
        for _ in 0..10 {
            assert_eq!(counts.dominant(), Some(Category::Cardboard));
        }
    }

    #[test]
    fn total_sums_without_overflow() {
        let mut counts = CategoryCounts::zero();
        counts.set(Category::Paper, u32::MAX);
        counts.set(Category::Glass, 1);
        assert_eq!(counts.total(), u64::from(u32::MAX) + 1);
    }
}
