//! Fault boundary, batch runner, report generator, and data sinks.

pub mod batch;
pub mod boundary;
pub mod reporter;
pub mod sink;

pub use batch::{run_batch, run_batch_with};
pub use boundary::execute;
pub use reporter::Report;
