use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Labels used when no category metadata is available on disk.
pub const DEFAULT_PRIMARY_CATEGORIES: [&str; 4] = ["Sink", "Shower", "Toilet", "Washing Machine"];

/// Code assigned to absent or unrecognized labels.
pub const FALLBACK_CODE: u32 = 0;

/// Result of encoding a primary appliance label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedCategory {
    pub code: u32,
    /// False when the label was absent or not in the table and `code` is the fallback
    pub recognized: bool,
}

impl EncodedCategory {
    fn fallback() -> Self {
        Self {
            code: FALLBACK_CODE,
            recognized: false,
        }
    }
}

/// Ordered list of primary appliance labels; a label's index is its code.
///
/// Table labels are keyed by their lowercased form. When two labels collide
/// the later one owns the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    labels: Vec<String>,
    codes: HashMap<String, u32>,
}

impl CategoryTable {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let codes = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (label.to_lowercase(), index as u32))
            .collect();
        Self { labels, codes }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Encode a label, trimming and ignoring case. Never fails: absent, blank
    /// and unknown labels all map to [`FALLBACK_CODE`] with `recognized == false`.
    pub fn encode(&self, label: Option<&str>) -> EncodedCategory {
        let Some(label) = label else {
            return EncodedCategory::fallback();
        };

        let key = label.trim().to_lowercase();
        if key.is_empty() {
            return EncodedCategory::fallback();
        }

        match self.codes.get(&key) {
            Some(&code) => EncodedCategory {
                code,
                recognized: true,
            },
            None => {
                tracing::debug!(label = %label, "unrecognized primary appliance, using fallback code");
                EncodedCategory::fallback()
            }
        }
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_CATEGORIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_codes() {
        let table = CategoryTable::default();
        assert_eq!(table.len(), 4);
        assert_eq!(table.encode(Some("Sink")).code, 0);
        assert_eq!(table.encode(Some("Shower")).code, 1);
        assert_eq!(table.encode(Some("Toilet")).code, 2);
        assert_eq!(table.encode(Some("Washing Machine")).code, 3);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let table = CategoryTable::default();
        let a = table.encode(Some(" SiNk "));
        let b = table.encode(Some("sink"));
        let c = table.encode(Some("Sink"));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(a.recognized);

        let wm = table.encode(Some("  washing MACHINE\t"));
        assert_eq!(wm.code, 3);
        assert!(wm.recognized);
    }

    #[test]
    fn test_unknown_label_falls_back() {
        let table = CategoryTable::default();
        let encoded = table.encode(Some("Dishwasher"));
        assert_eq!(encoded.code, FALLBACK_CODE);
        assert!(!encoded.recognized);
    }

    #[test]
    fn test_absent_and_blank_fall_back() {
        let table = CategoryTable::default();
        assert_eq!(table.encode(None), EncodedCategory::fallback());
        assert_eq!(table.encode(Some("")), EncodedCategory::fallback());
        assert_eq!(table.encode(Some("   ")), EncodedCategory::fallback());
    }

    #[test]
    fn test_encode_is_idempotent() {
        let table = CategoryTable::default();
        let first = table.encode(Some("Toilet"));
        let second = table.encode(Some("Toilet"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_table() {
        let table = CategoryTable::new(["Garden Hose", "Sink"]);
        assert_eq!(table.encode(Some("sink")).code, 1);
        assert_eq!(table.encode(Some("GARDEN HOSE")).code, 0);
        assert!(table.encode(Some("GARDEN HOSE")).recognized);
        assert_eq!(table.labels()[0], "Garden Hose");
    }

    #[test]
    fn test_duplicate_labels_last_wins() {
        let table = CategoryTable::new(["Sink", "sink"]);
        let encoded = table.encode(Some("SINK"));
        assert_eq!(encoded.code, 1);
        assert!(encoded.recognized);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_table_labels_are_not_trimmed() {
        let table = CategoryTable::new([" Sink", "Shower"]);
        assert!(!table.encode(Some("Sink")).recognized);
        assert_eq!(table.encode(Some("shower")).code, 1);
    }
}
