//! Categorical predictor encodings
//!
//! Two encodings of a text column into numeric regressors:
//!
//! - [`LabelEncoding`]: each level becomes a 1-based integer code. This is
//!   the arbitrary-weighting scheme; it pretends the categories sit on a
//!   quantitative scale and exists so the report can demonstrate how it
//!   distorts the fit.
//! - [`DummyEncoding`]: drop-first one-hot expansion. The first level in
//!   sorted order is the reference; every other level gets a 0/1 indicator
//!   column, so each coefficient reads as a shift against the reference.

use std::collections::{BTreeMap, BTreeSet};

/// Map from sorted distinct levels to 1-based integer codes
#[derive(Debug, Clone)]
pub struct LabelEncoding {
    pub column: String,
    levels: Vec<String>,
    codes: Vec<f64>,
}

impl LabelEncoding {
    /// Encode a text column; codes follow sorted level order starting at 1
    pub fn fit(column: &str, values: &[String]) -> Self {
        let distinct: BTreeSet<&str> = values.iter().map(|v| v.as_str()).collect();
        let levels: Vec<String> = distinct.iter().map(|l| l.to_string()).collect();
        let position: BTreeMap<&str, usize> = levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        let codes = values
            .iter()
            .map(|v| (position[v.as_str()] + 1) as f64)
            .collect();

        Self {
            column: column.to_string(),
            levels,
            codes,
        }
    }

    /// Name of the generated numeric column
    pub fn code_column(&self) -> String {
        format!("{}_code", self.column)
    }

    /// 1-based code per row
    pub fn codes(&self) -> &[f64] {
        &self.codes
    }

    /// Distinct levels in code order (code = index + 1)
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Level name for a 1-based code
    pub fn level_for_code(&self, code: usize) -> Option<&str> {
        self.levels.get(code.checked_sub(1)?).map(|s| s.as_str())
    }
}

/// Drop-first one-hot expansion of a text column
#[derive(Debug, Clone)]
pub struct DummyEncoding {
    pub column: String,
    pub reference_level: String,
    /// (column name, indicator values) per non-reference level
    columns: Vec<(String, Vec<f64>)>,
}

fn sanitize_level(level: &str) -> String {
    level
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

impl DummyEncoding {
    /// Expand a text column into k-1 indicator columns
    ///
    /// The reference level is the first in sorted order and gets no column;
    /// generated names are `<column>_<level>` with non-alphanumeric level
    /// characters replaced by `_`.
    pub fn fit(column: &str, values: &[String]) -> Self {
        let labels = LabelEncoding::fit(column, values);
        let levels = labels.levels().to_vec();
        let reference_level = levels.first().cloned().unwrap_or_default();

        let columns = levels
            .iter()
            .skip(1)
            .map(|level| {
                let name = format!("{}_{}", column, sanitize_level(level));
                let indicator = values
                    .iter()
                    .map(|v| if v == level { 1.0 } else { 0.0 })
                    .collect();
                (name, indicator)
            })
            .collect();

        Self {
            column: column.to_string(),
            reference_level,
            columns,
        }
    }

    /// Generated (name, values) pairs, one per non-reference level
    pub fn columns(&self) -> &[(String, Vec<f64>)] {
        &self.columns
    }

    /// Number of indicator columns (k - 1)
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_label_codes_sorted_one_based() {
        let enc = LabelEncoding::fit("regiao", &values(&["b", "a", "c", "a"]));

        assert_eq!(enc.levels(), &["a", "b", "c"]);
        assert_eq!(enc.codes(), &[2.0, 1.0, 3.0, 1.0]);
        assert_eq!(enc.code_column(), "regiao_code");
        assert_eq!(enc.level_for_code(3), Some("c"));
        assert_eq!(enc.level_for_code(0), None);
        assert_eq!(enc.level_for_code(4), None);
    }

    #[test]
    fn test_dummy_drops_first_level() {
        let enc = DummyEncoding::fit(
            "regiao",
            &values(&["Asia", "America_do_Sul", "Europa", "Asia"]),
        );

        assert_eq!(enc.reference_level, "America_do_Sul");
        assert_eq!(enc.n_columns(), 2);
        assert_eq!(enc.columns()[0].0, "regiao_Asia");
        assert_eq!(enc.columns()[1].0, "regiao_Europa");
        assert_eq!(enc.columns()[0].1, vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(enc.columns()[1].1, vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_dummy_sanitizes_level_names() {
        let enc = DummyEncoding::fit("regiao", &values(&["A", "EUA e Canada", "A"]));

        assert_eq!(enc.columns()[0].0, "regiao_EUA_e_Canada");
    }

    #[test]
    fn test_dummy_row_sums_at_most_one() {
        let enc = DummyEncoding::fit("r", &values(&["x", "y", "z", "x", "w", "z"]));

        for row in 0..6 {
            let sum: f64 = enc.columns().iter().map(|(_, v)| v[row]).sum();
            assert!(sum <= 1.0);
        }
    }

    #[test]
    fn test_dummy_single_level_has_no_columns() {
        let enc = DummyEncoding::fit("r", &values(&["only", "only"]));
        assert_eq!(enc.n_columns(), 0);
        assert_eq!(enc.reference_level, "only");
    }
}
