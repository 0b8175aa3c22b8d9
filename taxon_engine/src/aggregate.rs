//! Result assembly: label columns attached to the original records, frequency tables, and
//! label-match validation.

use crate::categories::CategorySet;
use crate::classifier::Outcome;
use crate::table::RecordTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// How a successful label relates to its taxonomy's category set. Classification output is never
/// trusted to be in-set; unmatched labels get their own bucket instead of being folded into a
/// valid category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelMatch {
    /// Verbatim equality with a category name.
    Exact,
    /// Equal after case folding and whitespace collapsing.
    Normalized,
    /// No category name matches.
    Unmatched,
    /// The call itself failed; the cell holds the error marker.
    CallFailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub exact: usize,
    pub normalized: usize,
    pub unmatched: usize,
    pub failed: usize,
}

impl MatchSummary {
    fn count(&mut self, m: LabelMatch) {
        match m {
            LabelMatch::Exact => self.exact += 1,
            LabelMatch::Normalized => self.normalized += 1,
            LabelMatch::Unmatched => self.unmatched += 1,
            LabelMatch::CallFailed => self.failed += 1,
        }
    }
}

/// The original table plus both label columns, with per-taxonomy frequency tables and match
/// summaries. A pure read of the record sequence: building it twice yields identical tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub problem_frequencies: BTreeMap<String, usize>,
    pub solution_frequencies: BTreeMap<String, usize>,
    pub problem_matches: MatchSummary,
    pub solution_matches: MatchSummary,
}

impl ResultTable {
    pub fn build(
        table: &RecordTable,
        problem_set: &CategorySet,
        solution_set: &CategorySet,
    ) -> Self {
        let mut headers = table.headers.clone();
        headers.push(problem_set.taxonomy.column_name().to_string());
        headers.push(solution_set.taxonomy.column_name().to_string());

        let mut rows = Vec::with_capacity(table.records.len());
        let mut problem_frequencies = BTreeMap::new();
        let mut solution_frequencies = BTreeMap::new();
        let mut problem_matches = MatchSummary::default();
        let mut solution_matches = MatchSummary::default();

        for record in &table.records {
            let mut row = record.fields.clone();
            row.push(label_cell(&record.problem_label));
            row.push(label_cell(&record.solution_label));
            rows.push(row);

            if let Some(outcome) = &record.problem_label {
                *problem_frequencies.entry(outcome.as_cell()).or_insert(0) += 1;
                problem_matches.count(bucket_label(outcome, problem_set));
            }
            if let Some(outcome) = &record.solution_label {
                *solution_frequencies.entry(outcome.as_cell()).or_insert(0) += 1;
                solution_matches.count(bucket_label(outcome, solution_set));
            }
        }

        Self {
            headers,
            rows,
            problem_frequencies,
            solution_frequencies,
            problem_matches,
            solution_matches,
        }
    }
}

fn label_cell(outcome: &Option<Outcome>) -> String {
    match outcome {
        Some(outcome) => outcome.as_cell(),
        None => String::new(),
    }
}

/// Bucket one outcome against its taxonomy's category set.
pub fn bucket_label(outcome: &Outcome, set: &CategorySet) -> LabelMatch {
    let label = match outcome {
        Outcome::Label(label) => label,
        Outcome::CallFailed { .. } => return LabelMatch::CallFailed,
    };
    if set.contains(label) {
        return LabelMatch::Exact;
    }
    let wanted = normalize_for_match(label);
    if set
        .iter()
        .any(|category| normalize_for_match(&category.name) == wanted)
    {
        LabelMatch::Normalized
    } else {
        LabelMatch::Unmatched
    }
}

fn normalize_for_match(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}
