//! Report sink adapters: HTTP callback delivery and an in-memory sink
//! for tests and local development.

mod http_sink;
mod in_memory;

pub use http_sink::{HttpReportSink, HttpReportSinkConfig};
pub use in_memory::InMemoryReportSink;
