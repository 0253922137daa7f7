//! Canonical wire format of the exchanged structures.
//!
//! Big-endian integers, `u32` length prefixes, fixed-width big-endian
//! scalars and compressed curve points; required for cross-implementation
//! (including on-chain) verification, so `decode(encode(x)) == x` holds
//! byte-exactly and every malformed buffer fails with a typed error.

mod cursor;
mod error;
mod primitives;
mod wire;

pub use cursor::ByteReader;
pub use error::{SerError, SerKind, SerResult};
pub use primitives::{
    read_digest, read_felt, read_i32, read_point, read_u32, read_u64, read_u8, read_usize,
    read_vec, write_digest, write_felt, write_i32, write_point, write_u32, write_u64, write_u8,
    write_usize, write_vec,
};
pub use wire::Wire;
