/*!
 * Structured Tracing
 * Subscriber setup and run-scoped spans using the tracing crate
 *
 * Features:
 * - Run id generation for correlating every log line of one execution cycle
 * - JSON-formatted logs for structured parsing
 * - Completion and duration fields recorded on the run span
 */

use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - KERNEL_TRACE_JSON: Enable JSON output (default: false)
///
/// Library code never calls this; binaries and benches install it once.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("KERNEL_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_line_number(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Generate a unique id for correlating one run's log lines
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one claim/execute/release cycle of an admission controller
pub struct RunSpan {
    span: tracing::Span,
    start: Instant,
    run_id: String,
}

impl RunSpan {
    pub fn new(entries: usize) -> Self {
        let run_id = generate_trace_id();

        let span = span!(
            Level::INFO,
            "admission_run",
            run_id = %run_id,
            entries = entries,
            completed = tracing::field::Empty,
            halted = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        let _entered = span.enter();
        debug!(entries, "run started");
        drop(_entered);

        Self {
            span,
            start: Instant::now(),
            run_id,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn record_completed(&self, count: usize) {
        self.span.record("completed", count);
    }

    pub fn record_halted(&self, halted: bool) {
        self.span.record("halted", halted);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for RunSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let duration_us = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        let _entered = self.span.enter();
        self.span.record("duration_us", duration_us);

        if duration.as_millis() > 100 {
            warn!(run_id = %self.run_id, duration_us, slow = true, "slow run detected");
        } else {
            debug!(run_id = %self.run_id, duration_us, "run completed");
        }
    }
}

/// Open a run span for a controller holding `entries` ledger entries
pub fn span_run(entries: usize) -> RunSpan {
    RunSpan::new(entries)
}
