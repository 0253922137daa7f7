use ark_std::{error, fmt, string::String};

pub(crate) type Result<T> = core::result::Result<T, PlonkError>;

/// Errors raised by the proving pipeline.
///
/// Verification *rejection* is not an error: the verifier returns
/// `Ok(false)` for an invalid proof. The variants below cover broken
/// callers (shape mismatches, undeclared tables) and internal failures
/// (domain not found, commitment degree overflow).
#[derive(Debug, Clone, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum PlonkError {
    /// Error with message
    Message(String),
    /// No multiplicative subgroup of the requested size.
    GroupNotFound(usize),
    /// A column or selector index is out of the declared bounds.
    IndexOutOfBounds,
    /// Assignment column/row counts disagree with the table description.
    ShapeMismatch(&'static str),
    /// A lookup gate references a table id that was never declared.
    LookupTableNotFound(u32),
    /// Error occurred when prove.
    ProofError,
    /// Polynomial commitment error.
    CommitmentError,
    /// Error occurred when setup.
    SetupError,
    /// Error occurred when verify.
    VerificationError,
    /// Division by zero.
    DivisionByZero,
    /// A transcript challenge hit a forbidden value.
    ChallengeError,
    /// Function params error.
    FuncParamsError,
    /// The degree of the polynomial is higher than the maximum degree supported.
    DegreeError,
}

impl fmt::Display for PlonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PlonkError::*;
        match self {
            Message(e) => write!(f, "{}", e),
            GroupNotFound(n) => write!(f, "no multiplicative subgroup of size {}", n),
            IndexOutOfBounds => f.write_str("column or selector index out of bounds"),
            ShapeMismatch(what) => write!(f, "assignment shape mismatch: {}", what),
            LookupTableNotFound(id) => write!(f, "lookup table {} is not declared", id),
            ProofError => f.write_str("proof error"),
            CommitmentError => f.write_str("commitment error"),
            SetupError => f.write_str("setup error"),
            VerificationError => f.write_str("verification error"),
            DivisionByZero => f.write_str("division by zero"),
            ChallengeError => f.write_str("challenge error"),
            FuncParamsError => f.write_str("function params error"),
            DegreeError => f.write_str(
                "the degree of the polynomial is higher than the maximum degree supported",
            ),
        }
    }
}

impl error::Error for PlonkError {}
