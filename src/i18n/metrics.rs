//! Translation metrics for one batch run.
//!
//! Counters are owned by the translator that records them instead of living
//! in a process-wide singleton, so concurrent runs (and tests) never share
//! state.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for calls made to the translation service.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Number of API calls made to the translation service
    api_calls: AtomicUsize,

    /// Number of API calls that failed and fell back to the source text
    api_failures: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an API call to the translation service.
    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an API call failure.
    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn api_failures(&self) -> usize {
        self.api_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let calls = self.api_calls();
        let failures = self.api_failures();
        let api_success_rate = if calls > 0 {
            (calls.saturating_sub(failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            api_calls: calls,
            api_failures: failures,
            api_success_rate,
        }
    }
}

/// Metrics report containing current translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of API calls made
    pub api_calls: usize,

    /// Number of API failures
    pub api_failures: usize,

    /// API success rate as a percentage (0-100)
    pub api_success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = TranslationMetrics::new();
        assert_eq!(metrics.api_calls(), 0);
        assert_eq!(metrics.api_failures(), 0);
    }

    #[test]
    fn test_record_api_call_and_failure() {
        let metrics = TranslationMetrics::new();
        metrics.record_api_call();
        metrics.record_api_call();
        metrics.record_api_failure();

        assert_eq!(metrics.api_calls(), 2);
        assert_eq!(metrics.api_failures(), 1);
    }

    #[test]
    fn test_report_success_rate() {
        let metrics = TranslationMetrics::new();
        for _ in 0..4 {
            metrics.record_api_call();
        }
        metrics.record_api_failure();

        let report = metrics.report();
        assert_eq!(report.api_calls, 4);
        assert_eq!(report.api_failures, 1);
        assert!((report.api_success_rate - 75.0).abs() < 0.01);
    }

    #[test]
    fn test_report_with_no_calls() {
        let report = TranslationMetrics::new().report();
        assert_eq!(report.api_success_rate, 0.0);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = TranslationMetrics::new();
        metrics.record_api_call();

        let json = serde_json::to_string(&metrics.report()).expect("Should serialize");
        assert!(json.contains("\"api_calls\":1"));
        assert!(json.contains("api_success_rate"));
    }
}
