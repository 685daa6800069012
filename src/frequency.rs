//! Frequency tables for categorical variables

use std::collections::HashMap;

/// One level of a categorical variable with its share of the rows
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEntry {
    pub level: String,
    pub count: u64,
    pub percent: f64,
}

/// Frequency table of a categorical column
///
/// Entries are sorted by count descending, ties broken alphabetically, the
/// order the terminal table prints in.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    pub column: String,
    pub entries: Vec<FrequencyEntry>,
    pub total: u64,
}

impl FrequencyTable {
    /// Tally a text column
    pub fn from_values(column: &str, values: &[String]) -> Self {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for value in values {
            *counts.entry(value.as_str()).or_default() += 1;
        }

        let total = values.len() as u64;
        let mut entries: Vec<FrequencyEntry> = counts
            .into_iter()
            .map(|(level, count)| FrequencyEntry {
                level: level.to_string(),
                count,
                percent: if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.level.cmp(&b.level)));

        Self {
            column: column.to_string(),
            entries,
            total,
        }
    }

    /// Number of distinct levels
    pub fn n_levels(&self) -> usize {
        self.entries.len()
    }
}
