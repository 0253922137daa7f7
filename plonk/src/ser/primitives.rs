//! Big-endian, length-prefixed primitive encoders and decoders. Every
//! multi-byte integer is big-endian; collections carry a `u32` length
//! prefix; scalars use the field's fixed-width big-endian form and must be
//! canonical.

use super::cursor::ByteReader;
use super::error::{SerError, SerKind, SerResult};
use crate::utils::{scalar_byte_len, scalar_from_bytes, scalar_to_bytes};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// Append a `u8`.
pub fn write_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

/// Read a `u8`.
pub fn read_u8(reader: &mut ByteReader<'_>, kind: SerKind, field: &'static str) -> SerResult<u8> {
    Ok(reader.read_array::<1>(kind, field)?[0])
}

/// Append a big-endian `u32`.
pub fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Read a big-endian `u32`.
pub fn read_u32(
    reader: &mut ByteReader<'_>,
    kind: SerKind,
    field: &'static str,
) -> SerResult<u32> {
    Ok(u32::from_be_bytes(reader.read_array::<4>(kind, field)?))
}

/// Append a big-endian `u64`.
pub fn write_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Read a big-endian `u64`.
pub fn read_u64(
    reader: &mut ByteReader<'_>,
    kind: SerKind,
    field: &'static str,
) -> SerResult<u64> {
    Ok(u64::from_be_bytes(reader.read_array::<8>(kind, field)?))
}

/// Append a big-endian `i32` in two's complement.
pub fn write_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Read a big-endian `i32`.
pub fn read_i32(
    reader: &mut ByteReader<'_>,
    kind: SerKind,
    field: &'static str,
) -> SerResult<i32> {
    Ok(i32::from_be_bytes(reader.read_array::<4>(kind, field)?))
}

/// Append a `usize` as a big-endian `u32`; lengths beyond `u32` are not
/// representable in the wire format.
pub fn write_usize(out: &mut Vec<u8>, value: usize) {
    write_u32(out, value as u32);
}

/// Read a `usize` encoded as a big-endian `u32`.
pub fn read_usize(
    reader: &mut ByteReader<'_>,
    kind: SerKind,
    field: &'static str,
) -> SerResult<usize> {
    Ok(read_u32(reader, kind, field)? as usize)
}

/// Append a 32-byte digest.
pub fn write_digest(out: &mut Vec<u8>, digest: &[u8; 32]) {
    out.extend_from_slice(digest);
}

/// Read a 32-byte digest.
pub fn read_digest(
    reader: &mut ByteReader<'_>,
    kind: SerKind,
    field: &'static str,
) -> SerResult<[u8; 32]> {
    reader.read_array::<32>(kind, field)
}

/// Append a field element in fixed-width big-endian form.
pub fn write_felt<F: PrimeField>(out: &mut Vec<u8>, value: &F) {
    out.extend_from_slice(&scalar_to_bytes(value));
}

/// Read a field element, rejecting non-canonical (≥ modulus) encodings.
pub fn read_felt<F: PrimeField>(
    reader: &mut ByteReader<'_>,
    kind: SerKind,
    field: &'static str,
) -> SerResult<F> {
    let len = scalar_byte_len::<F>();
    let bytes = reader.read_exact(len, kind, field)?;
    let value: F = scalar_from_bytes(bytes);
    if scalar_to_bytes(&value) != bytes {
        return Err(SerError::NonCanonical { kind, field });
    }
    Ok(value)
}

/// Append a curve point in its compressed form behind a length prefix.
pub fn write_point<P: CanonicalSerialize>(out: &mut Vec<u8>, point: &P) {
    let mut bytes = Vec::new();
    point
        .serialize_compressed(&mut bytes)
        .expect("compressed point serialization");
    write_u32(out, bytes.len() as u32);
    out.extend_from_slice(&bytes);
}

/// Read a compressed curve point.
pub fn read_point<P: CanonicalDeserialize>(
    reader: &mut ByteReader<'_>,
    kind: SerKind,
    field: &'static str,
) -> SerResult<P> {
    let len = read_usize(reader, kind, field)?;
    let bytes = reader.read_exact(len, kind, field)?;
    P::deserialize_compressed(bytes).map_err(|_| SerError::NonCanonical { kind, field })
}

/// Append a collection behind a `u32` length prefix.
pub fn write_vec<T>(
    out: &mut Vec<u8>,
    items: &[T],
    mut write_item: impl FnMut(&mut Vec<u8>, &T),
) {
    write_u32(out, items.len() as u32);
    for item in items.iter() {
        write_item(out, item);
    }
}

/// Read a length-prefixed collection. The declared length is bounded by the
/// remaining input, so a corrupt prefix cannot trigger a huge allocation.
pub fn read_vec<'a, T>(
    reader: &mut ByteReader<'a>,
    kind: SerKind,
    field: &'static str,
    mut read_item: impl FnMut(&mut ByteReader<'a>) -> SerResult<T>,
) -> SerResult<Vec<T>> {
    let len = read_usize(reader, kind, field)?;
    if len > reader.remaining() {
        return Err(SerError::LengthOverflow { kind, field });
    }
    let mut items = Vec::with_capacity(len);
    for _ in 0..len {
        items.push(read_item(reader)?);
    }
    Ok(items)
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::One;

    #[test]
    fn integers_round_trip_big_endian() {
        let mut out = Vec::new();
        write_u32(&mut out, 0x01020304);
        write_i32(&mut out, -2);
        write_u64(&mut out, 7);
        assert_eq!(&out[..4], &[1, 2, 3, 4]);
        let mut reader = ByteReader::new(&out);
        assert_eq!(
            read_u32(&mut reader, SerKind::Integer, "a").unwrap(),
            0x01020304
        );
        assert_eq!(read_i32(&mut reader, SerKind::Integer, "b").unwrap(), -2);
        assert_eq!(read_u64(&mut reader, SerKind::Integer, "c").unwrap(), 7);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn non_canonical_scalar_is_rejected() {
        let mut out = Vec::new();
        write_felt(&mut out, &Fr::one());
        let mut reader = ByteReader::new(&out);
        assert_eq!(
            read_felt::<Fr>(&mut reader, SerKind::Field, "x").unwrap(),
            Fr::one()
        );

        let oversized = vec![0xffu8; 32];
        let mut reader = ByteReader::new(&oversized);
        assert!(matches!(
            read_felt::<Fr>(&mut reader, SerKind::Field, "x"),
            Err(SerError::NonCanonical { .. })
        ));
    }

    #[test]
    fn truncated_input_fails_fast() {
        let out = vec![0u8; 3];
        let mut reader = ByteReader::new(&out);
        assert!(matches!(
            read_u32(&mut reader, SerKind::Integer, "len"),
            Err(SerError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn corrupt_length_prefix_is_bounded() {
        let mut out = Vec::new();
        write_u32(&mut out, u32::MAX);
        let mut reader = ByteReader::new(&out);
        assert!(matches!(
            read_vec(&mut reader, SerKind::Proof, "items", |r| read_u8(
                r,
                SerKind::Proof,
                "item"
            )),
            Err(SerError::LengthOverflow { .. })
        ));
    }
}
