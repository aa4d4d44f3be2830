//! Public types for the Vetgate API.

mod diagnosis;
mod product;
mod request;

pub use diagnosis::{Diagnosis, DiagnosisResponse};
pub use product::Product;
pub use request::InferenceRequest;
