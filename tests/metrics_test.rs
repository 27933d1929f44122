//! Tests for pipeline metrics.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use disaster_triage::telemetry;
use disaster_triage::{
    ClassificationPipeline, CompletionOptions, CompletionProvider, Message, Mode, Result,
    TriageError,
};

// ============================================================================
// Mock providers
// ============================================================================

struct InformativeProvider;

#[async_trait]
impl CompletionProvider for InformativeProvider {
    fn name(&self) -> &str {
        "informative"
    }

    async fn complete(&self, _messages: &[Message], _options: &CompletionOptions) -> Result<String> {
        Ok("Informative".to_string())
    }
}

struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _messages: &[Message], _options: &CompletionOptions) -> Result<String> {
        Err(TriageError::AuthenticationFailed)
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a metric name and every given label.
fn counter_total(snapshot: &SnapshotVec, name: &str, labels: &[(&str, &str)]) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| {
            labels.iter().all(|(k, v)| {
                key.key()
                    .labels()
                    .any(|label| label.key() == *k && label.value() == *v)
            })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

/// Run one pipeline call under a local recorder and return the snapshot.
///
/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the inner async work.
fn run_recorded(
    provider: Arc<dyn CompletionProvider>,
    mode: Mode,
    text: Option<&str>,
    image: Option<&[u8]>,
) -> SnapshotVec {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let _result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                ClassificationPipeline::new(provider, CompletionOptions::default())
                    .run(mode, text, image)
                    .await
            })
        })
    });

    snapshotter.snapshot().into_vec()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn successful_run_records_metrics() {
    let snapshot = run_recorded(
        Arc::new(InformativeProvider),
        Mode::Both,
        Some("Wildfire forces evacuation of three towns"),
        Some(&[0xFF, 0xD8, 0xFF]),
    );

    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, &[("status", "ok")]),
        1
    );
    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::MODALITY_CALLS_TOTAL, &[]),
        2,
        "one call per modality"
    );
    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::LABELS_TOTAL,
            &[("modality", "final"), ("label", "Informative")]
        ),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_run_records_error_metrics() {
    let snapshot = run_recorded(
        Arc::new(FailingProvider),
        Mode::Text,
        Some("Bridge collapsed on the highway"),
        None,
    );

    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, &[("status", "error")]),
        1
    );
    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::MODALITY_CALLS_TOTAL,
            &[("modality", "text"), ("status", "error")]
        ),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::LABELS_TOTAL, &[]), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn empty_run_records_request_without_calls() {
    let snapshot = run_recorded(Arc::new(InformativeProvider), Mode::Both, None, None);

    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, &[("mode", "both")]),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::MODALITY_CALLS_TOTAL, &[]),
        0
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let pipeline =
        ClassificationPipeline::new(Arc::new(InformativeProvider), CompletionOptions::default());
    let result = pipeline.run(Mode::Text, Some("Flooding"), None).await;
    assert!(result.is_ok());
}
