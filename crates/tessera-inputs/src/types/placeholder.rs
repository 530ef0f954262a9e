use serde::{Deserialize, Serialize};

/// Location of one multimodal item inside the prompt token ids.
///
/// The item occupies `length` tokens starting at `offset`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceholderRange {
    /// Index of the first placeholder token.
    pub offset: usize,
    /// Number of placeholder tokens.
    pub length: usize,
}

impl PlaceholderRange {
    /// Creates a new placeholder range.
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Returns the index one past the last placeholder token.
    ///
    /// Saturates at `usize::MAX` for ranges that run past the addressable end.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Returns true if the token at `index` falls inside this range.
    pub fn contains(&self, index: usize) -> bool {
        (self.offset..self.end()).contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_range_bounds() {
        let range = PlaceholderRange::new(3, 4);
        assert_eq!(range.end(), 7);
        assert!(range.contains(3));
        assert!(range.contains(6));
        assert!(!range.contains(7));
        assert!(!PlaceholderRange::new(5, 0).contains(5));
    }

    #[test]
    fn test_placeholder_range_end_saturates() {
        let range: PlaceholderRange =
            serde_json::from_str(&format!(r#"{{"offset": {}, "length": 8}}"#, usize::MAX - 2))
                .unwrap();

        assert_eq!(range.end(), usize::MAX);
        assert!(range.contains(usize::MAX - 1));
        assert!(!range.contains(0));
    }
}
