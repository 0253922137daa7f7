//! The Placeholder protocol: constraint-system data model, preprocessors,
//! argument helpers, and the prover/verifier pair.

pub mod constraint_system;
pub mod helpers;
pub mod indexer;
pub mod prover;
pub mod transcript;
pub mod verifier;
