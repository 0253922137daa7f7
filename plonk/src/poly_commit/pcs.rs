use crate::errors::Result;
use crate::poly_commit::field_polynomial::FpPolynomial;
use ark_ff::PrimeField;
use merlin::Transcript;
use std::fmt::Debug;

/// The trait for help serialize to bytes, implemented by commitments and
/// opening proofs so they can be absorbed into the transcript.
pub trait ToBytes {
    /// Convert to bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// One committed batch on the prover side: the member polynomials together
/// with the evaluation points each of them must be opened at. `points[i]`
/// lists the points declared for `polys[i]`; point sets may overlap freely
/// across polynomials.
pub struct BatchOpeningRef<'a, F: PrimeField> {
    /// The polynomials bound by the batch commitment, in commitment order.
    pub polys: &'a [FpPolynomial<F>],
    /// Per-polynomial evaluation points.
    pub points: &'a [Vec<F>],
}

/// One committed batch on the verifier side: the commitment, the declared
/// evaluation points, and the claimed values at those points.
pub struct BatchEvalsRef<'a, C, F: PrimeField> {
    /// The batch commitment.
    pub commitment: &'a C,
    /// Per-polynomial evaluation points, mirroring the prover's declaration.
    pub points: &'a [Vec<F>],
    /// Per-polynomial claimed evaluations, `values[i][j]` at `points[i][j]`.
    pub values: &'a [Vec<F>],
}

/// Trait for polynomial commitment schemes.
///
/// A scheme binds batches of polynomials to short commitments and later
/// produces a single batched opening proof covering every declared
/// (polynomial, point) pair, folding them together with transcript
/// challenges. Conforming backends: the Merkle/FRI list commitment
/// ([`LpcScheme`](crate::poly_commit::lpc::LpcScheme)) and KZG
/// ([`KzgScheme`](crate::poly_commit::kzg::KzgScheme)).
pub trait PolyComScheme: Sized {
    /// Type of prime field.
    type Field: PrimeField;

    /// Type of the batch commitment.
    type Commitment: ToBytes + Debug + PartialEq + Eq + Clone;

    /// Type of the batched opening proof.
    type EvalProof: Debug + PartialEq + Eq + Clone;

    /// The maximal polynomial degree the scheme parameters support.
    fn max_degree(&self) -> usize;

    /// Commit to a batch of polynomials. The commitment is binding for the
    /// whole batch; polynomials keep their index order.
    fn commit(&self, polys: &[FpPolynomial<Self::Field>]) -> Result<Self::Commitment>;

    /// Evaluate a polynomial at a point.
    fn eval(&self, poly: &FpPolynomial<Self::Field>, point: &Self::Field) -> Self::Field {
        poly.eval(point)
    }

    /// Produce one batched opening proof for all committed batches and all
    /// their declared evaluation points, consuming transcript challenges for
    /// the folding. The caller must already have absorbed the commitments
    /// and the claimed evaluations into the transcript.
    fn proof_eval(
        &self,
        transcript: &mut Transcript,
        batches: &[BatchOpeningRef<'_, Self::Field>],
    ) -> Result<Self::EvalProof>;

    /// Check a batched opening proof against the commitments and claimed
    /// evaluations, re-deriving the folding challenges from an identically
    /// absorbed transcript. Rejects any claim inconsistent with the
    /// committed polynomials.
    fn verify_eval(
        &self,
        transcript: &mut Transcript,
        batches: &[BatchEvalsRef<'_, Self::Commitment, Self::Field>],
        proof: &Self::EvalProof,
    ) -> Result<()>;
}
