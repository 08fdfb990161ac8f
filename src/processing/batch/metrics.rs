use serde::Serialize;
use crate::core::ConversionResult;

/// Bytes saved across all converted items. Failed items are left out.
pub fn total_savings(results: &[ConversionResult]) -> i64 {
    results.iter().filter_map(ConversionResult::saved_bytes).sum()
}

/// Mean reduction percentage over converted items; 0 when there are none.
pub fn average_reduction(results: &[ConversionResult]) -> f64 {
    let reductions: Vec<f64> = results
        .iter()
        .filter_map(ConversionResult::reduction_percent)
        .collect();

    if reductions.is_empty() {
        return 0.0;
    }
    reductions.iter().sum::<f64>() / reductions.len() as f64
}

/// Batch-wide statistics, derived on demand from the current results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
    pub total_original_bytes: u64,
    pub total_converted_bytes: u64,
    pub total_savings: i64,
    pub average_reduction: f64,
}

impl BatchSummary {
    pub fn from_results(results: &[ConversionResult]) -> Self {
        let converted = results.iter().filter(|r| r.is_converted()).count();
        Self {
            converted,
            failed: results.len() - converted,
            total_original_bytes: results.iter().map(ConversionResult::original_size).sum(),
            total_converted_bytes: results.iter().map(ConversionResult::converted_size).sum(),
            total_savings: total_savings(results),
            average_reduction: average_reduction(results),
        }
    }
}
