//! Telemetry metric name constants.
//!
//! Centralised metric names for classification requests. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `triage_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `mode`: "text", "image" or "both"
//! - `modality`: "text" or "image" ("final" for the fused verdict)
//! - `status`: "ok" or "error"
//! - `label`: "Informative" or "Not Informative"

/// Total pipeline runs.
///
/// Labels: `mode`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "triage_requests_total";

/// Pipeline run duration in seconds.
///
/// Labels: `mode`.
pub const REQUEST_DURATION_SECONDS: &str = "triage_request_duration_seconds";

/// Total per-modality classifier calls.
///
/// Labels: `modality`, `status` ("ok" | "error").
pub const MODALITY_CALLS_TOTAL: &str = "triage_modality_calls_total";

/// Total labels produced.
///
/// Labels: `modality` ("text" | "image" | "final"), `label`.
pub const LABELS_TOTAL: &str = "triage_labels_total";
