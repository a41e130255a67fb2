#![forbid(unsafe_code)]

mod reporting;

pub use reporting::{init_tracing, print_report, shared_catalog};
