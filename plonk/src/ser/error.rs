use ark_std::{error, fmt};

/// Result alias of the wire format.
pub type SerResult<T> = core::result::Result<T, SerError>;

/// Which structure was being decoded when the error surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SerKind {
    Integer,
    Field,
    Digest,
    CurvePoint,
    Expression,
    Gate,
    Lookup,
    ConstraintSystem,
    Commitment,
    CommonData,
    Proof,
}

/// Structural decode errors. Decoding fails fast: a truncated buffer, a
/// non-canonical scalar, an unknown tag or trailing bytes are never
/// silently accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SerError {
    /// The buffer ended before the field could be read.
    UnexpectedEnd {
        /// Structure being decoded.
        kind: SerKind,
        /// Field being read.
        field: &'static str,
    },
    /// A scalar or curve point was not in canonical form.
    NonCanonical {
        /// Structure being decoded.
        kind: SerKind,
        /// Field being read.
        field: &'static str,
    },
    /// An enum tag byte had no defined meaning.
    InvalidTag {
        /// Structure being decoded.
        kind: SerKind,
        /// Field being read.
        field: &'static str,
    },
    /// A declared collection length exceeds the remaining buffer.
    LengthOverflow {
        /// Structure being decoded.
        kind: SerKind,
        /// Field being read.
        field: &'static str,
    },
    /// Bytes remained after the top-level structure was decoded.
    TrailingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },
    /// The decoded structure violates its own declared bounds.
    Invalid {
        /// Structure being decoded.
        kind: SerKind,
        /// Field being read.
        field: &'static str,
    },
}

impl SerError {
    pub(crate) fn unexpected_end(kind: SerKind, field: &'static str) -> Self {
        SerError::UnexpectedEnd { kind, field }
    }
}

impl fmt::Display for SerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerError::UnexpectedEnd { kind, field } => {
                write!(f, "unexpected end of input in {:?}::{}", kind, field)
            }
            SerError::NonCanonical { kind, field } => {
                write!(f, "non-canonical encoding in {:?}::{}", kind, field)
            }
            SerError::InvalidTag { kind, field } => {
                write!(f, "invalid tag in {:?}::{}", kind, field)
            }
            SerError::LengthOverflow { kind, field } => {
                write!(f, "declared length overflows input in {:?}::{}", kind, field)
            }
            SerError::TrailingBytes { remaining } => {
                write!(f, "{} trailing bytes after decode", remaining)
            }
            SerError::Invalid { kind, field } => {
                write!(f, "invalid structure in {:?}::{}", kind, field)
            }
        }
    }
}

impl error::Error for SerError {}
