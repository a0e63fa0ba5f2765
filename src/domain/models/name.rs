//! Decomposition of a free-text employee name.

/// A name split into the parts the strategy table draws letters from.
///
/// Decomposition never fails: missing parts are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub first: String,
    pub middle: String,
    pub last: String,
}

impl NameParts {
    /// Split `name` on whitespace, discarding empty tokens.
    ///
    /// - first: the first token, if any
    /// - last: the final token, only when there are at least two tokens
    /// - middle: the second token, only when there are at least three tokens
    pub fn parse(name: &str) -> Self {
        let parts: Vec<&str> = name.split_whitespace().collect();

        let first = parts.first().copied().unwrap_or_default();
        let last = if parts.len() >= 2 {
            parts.last().copied().unwrap_or_default()
        } else {
            ""
        };
        let middle = if parts.len() >= 3 { parts[1] } else { "" };

        Self {
            first: first.to_string(),
            middle: middle.to_string(),
            last: last.to_string(),
        }
    }

    pub fn has_middle(&self) -> bool {
        !self.middle.is_empty()
    }
}
