//! Univariate descriptive statistics
//!
//! Summaries are SIMD-accelerated via trueno for the basic reductions;
//! percentiles are linearly interpolated on sorted copies (R-7 method,
//! matching aprender's quantile convention).

use trueno::Vector;

/// Five-number summary plus count/mean/std for one numeric variable
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveSummary {
    pub name: String,
    pub count: usize,
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub p25: f32,
    pub median: f32,
    pub p75: f32,
    pub max: f32,
}

/// Upper-tail percentiles for the extended statistics flag
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedSummary {
    pub p90: f32,
    pub p95: f32,
    pub p99: f32,
}

/// Calculate percentile from sorted data (linear interpolation)
pub(crate) fn calculate_percentile(sorted_data: &[f32], percentile: f32) -> f32 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    if sorted_data.len() == 1 {
        return sorted_data[0];
    }

    let index = (percentile / 100.0) * (sorted_data.len() - 1) as f32;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let weight = index - lower as f32;
        sorted_data[lower] * (1.0 - weight) + sorted_data[upper] * weight
    }
}

fn sorted_f32(values: &[f64]) -> Vec<f32> {
    let mut sorted: Vec<f32> = values.iter().map(|&v| v as f32).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

impl DescriptiveSummary {
    /// Summarize one numeric column
    pub fn from_values(name: &str, values: &[f64]) -> Self {
        let data: Vec<f32> = values.iter().map(|&v| v as f32).collect();
        let v = Vector::from_slice(&data);

        let mean = v.mean().unwrap_or(0.0);
        let min = v.min().unwrap_or(0.0);
        let max = v.max().unwrap_or(0.0);

        // trueno's stddev is the population estimate; describe reports the
        // sample estimate (n-1 denominator)
        let std_dev = if data.len() > 1 {
            let ss: f32 = data.iter().map(|x| (x - mean) * (x - mean)).sum();
            (ss / (data.len() - 1) as f32).sqrt()
        } else {
            0.0
        };

        let sorted = sorted_f32(values);

        Self {
            name: name.to_string(),
            count: values.len(),
            mean,
            std_dev,
            min,
            p25: calculate_percentile(&sorted, 25.0),
            median: calculate_percentile(&sorted, 50.0),
            p75: calculate_percentile(&sorted, 75.0),
            max,
        }
    }

    /// Upper-tail percentiles (--stats-extended)
    pub fn extended(&self, values: &[f64]) -> ExtendedSummary {
        let sorted = sorted_f32(values);
        ExtendedSummary {
            p90: calculate_percentile(&sorted, 90.0),
            p95: calculate_percentile(&sorted, 95.0),
            p99: calculate_percentile(&sorted, 99.0),
        }
    }
}
