#![deny(warnings)]
#![allow(clippy::needless_borrow)]
#![allow(clippy::upper_case_acronyms)]
//! Placeholder: a PLONK-family proof system over a custom-gate,
//! lookup-enabled constraint system, parameterized by a pluggable
//! polynomial commitment scheme (Merkle/FRI list commitment or KZG).

#[macro_use]
extern crate serde_derive;

pub mod errors;
pub mod plonk;
pub mod poly_commit;
pub mod ser;
pub mod utils;
