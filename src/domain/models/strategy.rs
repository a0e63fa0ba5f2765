//! Candidate generation for initials codes.
//!
//! The strategies are a static, index-ordered table. The index doubles as the
//! attempt order: the orchestrator walks it from 0 upwards and the first
//! committed candidate wins.

use crate::domain::errors::StrategyError;
use crate::domain::models::name::NameParts;

/// How many letters each name part contributes to a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub first: usize,
    /// `Some` when the strategy needs a middle name.
    pub middle: Option<usize>,
    pub last: usize,
}

impl Strategy {
    const fn new(first: usize, last: usize) -> Self {
        Self {
            first,
            middle: None,
            last,
        }
    }

    const fn with_middle(first: usize, middle: usize, last: usize) -> Self {
        Self {
            first,
            middle: Some(middle),
            last,
        }
    }

    pub const fn requires_middle(&self) -> bool {
        self.middle.is_some()
    }

    /// Upper bound on the length (in chars) of a code this strategy produces.
    pub const fn max_len(&self) -> usize {
        let middle = match self.middle {
            Some(n) => n,
            None => 0,
        };
        self.first + middle + self.last
    }

    /// Build the code for `parts`, or `None` when a required middle name is missing.
    pub fn apply(&self, parts: &NameParts) -> Option<String> {
        let middle = match self.middle {
            Some(_) if !parts.has_middle() => return None,
            Some(n) => prefix(&parts.middle, n),
            None => "",
        };

        let mut code = String::with_capacity(self.max_len());
        for part in [prefix(&parts.first, self.first), middle, prefix(&parts.last, self.last)] {
            code.extend(part.chars().map(upper_char));
        }
        Some(code)
    }
}

pub const STRATEGY_COUNT: usize = 9;

/// 2+3, 3+2, 4+1, 1+4, 5+0, 0+5, then the middle-name variants.
pub const STRATEGIES: [Strategy; STRATEGY_COUNT] = [
    Strategy::new(2, 3),
    Strategy::new(3, 2),
    Strategy::new(4, 1),
    Strategy::new(1, 4),
    Strategy::new(5, 0),
    Strategy::new(0, 5),
    Strategy::with_middle(2, 1, 2),
    Strategy::with_middle(1, 1, 3),
    Strategy::with_middle(2, 2, 1),
];

/// Result of asking one strategy for a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Code(String),
    /// The strategy needs a middle name and the name has none.
    NotApplicable,
}

impl Candidate {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Code(code) => Some(code),
            Self::NotApplicable => None,
        }
    }
}

/// Look up the strategy at `index` and apply it to `parts`.
pub fn generate(parts: &NameParts, index: usize) -> Result<Candidate, StrategyError> {
    let strategy = STRATEGIES
        .get(index)
        .ok_or(StrategyError::InvalidIndex(index))?;

    Ok(strategy
        .apply(parts)
        .map_or(Candidate::NotApplicable, Candidate::Code))
}

/// Every strategy's candidate for `parts`, in attempt order.
pub fn candidates(parts: &NameParts) -> Vec<(usize, Candidate)> {
    STRATEGIES
        .iter()
        .enumerate()
        .map(|(index, strategy)| {
            let candidate = strategy
                .apply(parts)
                .map_or(Candidate::NotApplicable, Candidate::Code);
            (index, candidate)
        })
        .collect()
}

/// The first `count` chars of `part`, or all of it when shorter.
fn prefix(part: &str, count: usize) -> &str {
    match part.char_indices().nth(count) {
        Some((end, _)) => &part[..end],
        None => part,
    }
}

// Keeps chars whose uppercase form expands (e.g. 'ß' -> "SS") so codes never
// outgrow the strategy's letter count.
fn upper_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
