//! Polynomial commitment layer: the scheme trait, the dense polynomial
//! type, and the two conforming backends (Merkle/FRI list commitment and
//! KZG).

pub mod field_polynomial;
pub mod fri;
pub mod kzg;
pub mod lpc;
pub mod merkle;
pub mod pcs;
pub mod transcript;
