//! Library side of the `cardio` command: logging set-up and pipeline
//! orchestration, shared by the binary and its integration tests.

pub mod logging;
pub mod pipeline;
pub mod types;
