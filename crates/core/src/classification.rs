//! Parsing of vision-service output into category counts, and the
//! aggregate classification decision.
//!
//! Parsing never fails: text without recognisable `category: number` pairs
//! yields all-zero counts, so the classification endpoint always returns a
//! well-formed numeric result.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::category::{Category, CategoryCounts};

/// Matches `<category>: <digits>` anywhere in the text, case-insensitively.
pub const COUNT_LINE_PATTERN: &str = r"(?i)(cardboard|glass|metal|paper|plastic|trash):\s*(\d+)";

static COUNT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COUNT_LINE_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse free-form vision output into [`CategoryCounts`].
///
/// Every category starts at zero. Each match overwrites its category, so the
/// last occurrence wins. Values that do not fit in a `u32` are skipped.
pub fn parse_counts(text: &str) -> CategoryCounts {
    let mut counts = CategoryCounts::zero();

    for caps in COUNT_LINE_RE.captures_iter(text) {
        let Ok(category) = caps[1].parse::<Category>() else {
            continue;
        };
        if let Ok(value) = caps[2].parse::<u32>() {
            counts.set(category, value);
        }
    }

    counts
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of classifying one photograph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub detected: bool,
    pub counts: CategoryCounts,
    /// Present iff `detected`.
    pub dominant_category: Option<Category>,
    pub total_items: u64,
    /// The photo was already seen; counts are forced to zero.
    pub duplicate: bool,
}

impl ClassificationResult {
    /// Derive the aggregate decision from parsed counts.
    pub fn from_counts(counts: CategoryCounts) -> Self {
        let total_items = counts.total();
        let detected = total_items > 0;
        Self {
            detected,
            counts,
            dominant_category: if detected { counts.dominant() } else { None },
            total_items,
            duplicate: false,
        }
    }

    /// Result for a photograph whose fingerprint was already recorded.
    pub fn duplicate() -> Self {
        Self {
            duplicate: true,
            ..Self::from_counts(CategoryCounts::zero())
        }
    }

    /// Short human-readable summary.
    pub fn message(&self) -> String {
        match self.dominant_category {
            _ if self.duplicate => "Duplicate image, no new waste recorded".to_string(),
            Some(category) => format!("{} waste detected", category.label()),
            None => "No waste detected".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
