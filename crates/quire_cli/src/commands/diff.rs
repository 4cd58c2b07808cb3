//! Diff command implementation.

use quire_core::{log_consistency_check, ConsistencyOutcome};
use serde::Serialize;
use std::path::Path;

/// Comparison result.
#[derive(Debug, Serialize)]
pub struct DiffResult {
    /// First document.
    pub a: String,
    /// Second document.
    pub b: String,
    /// `MATCH`, `MISMATCH` or `IGNORED`.
    pub outcome: String,
    /// Whether the documents differ substantially.
    pub substantial: bool,
}

/// Compares two documents.
pub fn compare(a: &Path, b: &Path) -> Result<DiffResult, Box<dyn std::error::Error>> {
    let left = std::fs::read_to_string(a)?;
    let right = std::fs::read_to_string(b)?;

    let outcome = ConsistencyOutcome::classify(&left, &right);
    log_consistency_check(&a.display().to_string(), outcome, Some(&b.display().to_string()));

    Ok(DiffResult {
        a: a.display().to_string(),
        b: b.display().to_string(),
        outcome: outcome.to_string(),
        substantial: outcome == ConsistencyOutcome::Mismatch,
    })
}

/// Runs the diff command. Returns true if the documents differ substantially.
pub fn run(a: &Path, b: &Path, format: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let result = compare(a, b)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => println!("{}: {} vs {}", result.outcome, result.a, result.b),
    }

    Ok(result.substantial)
}
