//! Small byte and iteration helpers shared across the crate.

use ark_ff::{BigInteger, PrimeField};

/// Big-endian byte representation of a field element, fixed width for the
/// field's modulus size. Used by the transcript and the wire format.
pub fn scalar_to_bytes<F: PrimeField>(f: &F) -> Vec<u8> {
    f.into_bigint().to_bytes_be()
}

/// Reduce big-endian bytes into a field element.
pub fn scalar_from_bytes<F: PrimeField>(bytes: &[u8]) -> F {
    F::from_be_bytes_mod_order(bytes)
}

/// Number of bytes in the canonical encoding of `F`.
pub fn scalar_byte_len<F: PrimeField>() -> usize {
    (F::MODULUS_BIT_SIZE as usize + 7) / 8
}

/// Map a closure over the items, in parallel when the `parallel` feature is
/// enabled. The output order matches the input order either way, so callers
/// can hash or absorb the results deterministically.
#[cfg(feature = "parallel")]
pub fn map_collect<T, U, G>(items: Vec<T>, f: G) -> Vec<U>
where
    T: Send,
    U: Send,
    G: Fn(T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    items.into_par_iter().map(f).collect()
}

/// Map a closure over the items, in parallel when the `parallel` feature is
/// enabled. The output order matches the input order either way, so callers
/// can hash or absorb the results deterministically.
#[cfg(not(feature = "parallel"))]
pub fn map_collect<T, U, G>(items: Vec<T>, f: G) -> Vec<U>
where
    G: Fn(T) -> U,
{
    items.into_iter().map(f).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::One;

    #[test]
    fn scalar_bytes_round_trip() {
        let one = Fr::one();
        let bytes = scalar_to_bytes(&one);
        assert_eq!(bytes.len(), scalar_byte_len::<Fr>());
        assert_eq!(scalar_from_bytes::<Fr>(&bytes), one);
    }
}
