//! Deduplicating merge of delimited SQL fragments.
//!
//! Field lists and ORDER BY items are comma-delimited, WHERE fragments are
//! ` AND `-delimited. Merging splits both sides on the delimiter, trims each
//! piece, drops empty pieces and keeps the first occurrence of every piece.

/// Delimiter used to split and rejoin a fragment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `,` for fields and ORDER BY items.
    Comma,
    /// ` AND ` for WHERE fragments.
    And,
}

impl Delimiter {
    pub fn as_str(self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::And => " AND ",
        }
    }
}

/// An ordered set of fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    items: Vec<String>,
}

impl Fragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `incoming` on `delimiter` and append every piece not already present.
    pub fn merge(&mut self, incoming: &str, delimiter: Delimiter) {
        for piece in incoming.split(delimiter.as_str()) {
            let piece = piece.trim();
            if piece.is_empty() || self.items.iter().any(|p| p == piece) {
                continue;
            }
            self.items.push(piece.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn join(&self, delimiter: Delimiter) -> String {
        self.items.join(delimiter.as_str())
    }
}

/// Merge two delimited fragment strings without duplicating any piece.
///
/// ```ignore
/// assert_eq!(merge_str("1,2,5,", "3,4,2", Delimiter::Comma), "1,2,5,3,4");
/// ```
pub fn merge_str(existing: &str, incoming: &str, delimiter: Delimiter) -> String {
    let mut fragments = Fragments::new();
    fragments.merge(existing, delimiter);
    fragments.merge(incoming, delimiter);
    fragments.join(delimiter)
}
