//! Implementation of the `initials preview` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, table_with_header, CommandOutput};
use crate::domain::models::{candidates, NameParts, Strategy, STRATEGIES};

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Full name to preview
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CandidateRow {
    pub strategy: usize,
    pub rule: String,
    /// `None` when the strategy needs a middle name.
    pub initials: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewOutput {
    pub employee_name: String,
    pub first: String,
    pub middle: String,
    pub last: String,
    pub candidates: Vec<CandidateRow>,
}

impl CommandOutput for PreviewOutput {
    fn to_human(&self) -> String {
        let mut table = table_with_header(&["#", "Rule", "Initials"]);
        for row in &self.candidates {
            table.add_row(vec![
                row.strategy.to_string(),
                row.rule.clone(),
                row.initials.clone().unwrap_or_else(|| "n/a".to_string()),
            ]);
        }
        format!("{}\n{table}", self.employee_name)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Letters taken from each part, e.g. `2+3` or `2+1+2`.
fn describe(strategy: &Strategy) -> String {
    match strategy.middle {
        Some(middle) => format!("{}+{}+{}", strategy.first, middle, strategy.last),
        None => format!("{}+{}", strategy.first, strategy.last),
    }
}

pub fn build_preview(name: &str) -> PreviewOutput {
    let parts = NameParts::parse(name);
    let rows = candidates(&parts)
        .into_iter()
        .map(|(index, candidate)| CandidateRow {
            strategy: index,
            rule: describe(&STRATEGIES[index]),
            initials: candidate.code().map(str::to_string),
        })
        .collect();

    PreviewOutput {
        employee_name: name.to_string(),
        first: parts.first,
        middle: parts.middle,
        last: parts.last,
        candidates: rows,
    }
}

pub fn execute(args: &PreviewArgs, json_mode: bool) -> Result<()> {
    output(&build_preview(args.name.trim()), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_rows() {
        let preview = build_preview("Eva Berg");
        assert_eq!(preview.candidates.len(), 9);
        assert_eq!(preview.candidates[0].rule, "2+3");
        assert_eq!(preview.candidates[0].initials.as_deref(), Some("EVBER"));
        assert_eq!(preview.candidates[6].rule, "2+1+2");
        assert_eq!(preview.candidates[6].initials, None);
        assert!(preview.to_human().contains("n/a"));
    }
}
