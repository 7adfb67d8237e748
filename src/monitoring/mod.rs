/*!
 * Monitoring
 * Structured logging and run tracing
 */

mod tracer;

pub use tracer::{generate_trace_id, init_tracing, span_run, RunSpan};
