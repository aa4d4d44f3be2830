//! Gateway implementations

mod builder;
mod orchestrator;

pub use builder::{Vetgate, VetgateBuilder};
pub use orchestrator::DiagnosticGateway;
