//! List polynomial commitment: Merkle trees over coset evaluations, opened
//! through the folding low-degree test.
//!
//! A batch commitment is the root of a tree whose leaf `p` packs every
//! member polynomial's evaluation at the `p`-th point of the extended coset
//! domain. Opening combines, per polynomial, the quotient against the
//! interpolant of its declared evaluation points; the θ-weighted sum of
//! those quotients is the oracle handed to the low-degree test.

use crate::errors::{PlonkError, Result};
use crate::poly_commit::field_polynomial::FpPolynomial;
use crate::poly_commit::fri::{self, FriProof, MerkleOpening};
use crate::poly_commit::merkle::{verify_path, Hash, MerkleTree};
use crate::poly_commit::pcs::{BatchEvalsRef, BatchOpeningRef, PolyComScheme, ToBytes};
use crate::poly_commit::transcript::PolyComTranscript;
use ark_ff::{batch_inversion, PrimeField};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use merlin::Transcript;

/// Configuration knobs of the list commitment: degree bound, domain
/// blowup, per-round folding schedule, query count and grinding
/// difficulty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpcParams {
    /// Maximal committed polynomial degree.
    pub max_degree: usize,
    /// log2 of the Reed-Solomon blowup factor.
    pub expand_factor: usize,
    /// Folds per committed round; round `j` folds `2^step_list[j]` to one.
    pub step_list: Vec<usize>,
    /// Number of query repetitions (the security parameter λ).
    pub lambda: usize,
    /// Required leading zero bits of the grinding digest.
    pub proof_of_work_bits: u32,
}

impl LpcParams {
    /// Total number of binary folds over all rounds.
    pub fn total_folds(&self) -> usize {
        self.step_list.iter().sum()
    }
}

/// Merkle root binding one batch of polynomials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpcCommitment(pub Hash);

impl ToBytes for LpcCommitment {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

/// Per-query openings of the batch trees: `batches[b][t]` opens batch `b`
/// at the `t`-th position of the round-0 leaf coset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LpcQueryOpening<F> {
    /// Outer index: batch; inner index: position within the query coset.
    pub batches: Vec<Vec<MerkleOpening<F>>>,
}

/// Batched opening proof of the list commitment scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LpcProof<F> {
    /// The low-degree test transcript.
    pub fri: FriProof<F>,
    /// Batch-tree openings backing each query.
    pub query_openings: Vec<LpcQueryOpening<F>>,
}

/// The list polynomial commitment scheme over a prime field.
#[derive(Clone, Debug)]
pub struct LpcScheme<F: PrimeField> {
    params: LpcParams,
    domain: Radix2EvaluationDomain<F>,
    offset: F,
}

impl<F: PrimeField> LpcScheme<F> {
    /// Instantiate the scheme from its parameters. Fails when the field has
    /// no subgroup of the extended size or the folding schedule exceeds the
    /// degree budget.
    pub fn new(params: LpcParams) -> Result<Self> {
        if params.lambda == 0
            || params.step_list.is_empty()
            || params.step_list.iter().any(|s| *s == 0)
        {
            return Err(PlonkError::SetupError);
        }
        let codeword_len = (params.max_degree + 1).next_power_of_two();
        if params.total_folds() >= codeword_len.trailing_zeros() as usize + params.expand_factor {
            return Err(PlonkError::SetupError);
        }
        let domain_size = codeword_len << params.expand_factor;
        let domain = Radix2EvaluationDomain::new(domain_size)
            .ok_or(PlonkError::GroupNotFound(domain_size))?;
        Ok(Self {
            params,
            domain,
            offset: F::GENERATOR,
        })
    }

    /// Size of the extended evaluation domain.
    pub fn domain_size(&self) -> usize {
        self.domain.size()
    }

    /// The scheme parameters.
    pub fn params(&self) -> &LpcParams {
        &self.params
    }

    fn final_degree_bound(&self) -> usize {
        let codeword_len = (self.params.max_degree + 1).next_power_of_two();
        core::cmp::max(codeword_len >> self.params.total_folds(), 1)
    }

    /// Coset evaluations of each polynomial in the batch, degree-checked.
    fn evaluate_batch(&self, polys: &[FpPolynomial<F>]) -> Result<Vec<Vec<F>>> {
        if polys.is_empty() {
            return Err(PlonkError::FuncParamsError);
        }
        let mut matrix = Vec::with_capacity(polys.len());
        for poly in polys.iter() {
            if poly.degree() > self.params.max_degree {
                return Err(PlonkError::DegreeError);
            }
            matrix.push(poly.coset_fft_with_domain(&self.domain, &self.offset));
        }
        Ok(matrix)
    }

    /// Tree over the batch: leaf `p` hashes every polynomial's value at `p`.
    fn batch_tree(&self, matrix: &[Vec<F>]) -> Result<MerkleTree> {
        let n = self.domain.size();
        let leaves = crate::utils::map_collect((0..n).collect::<Vec<_>>(), |p| {
            let column: Vec<F> = matrix.iter().map(|row| row[p]).collect();
            fri::leaf_digest(&column)
        });
        MerkleTree::new(leaves)
    }

    /// Interpolant and vanishing polynomial of one polynomial's point set.
    fn point_set_polys(points: &[F], values: &[F]) -> Result<(FpPolynomial<F>, FpPolynomial<F>)> {
        let interp = FpPolynomial::interpolate(points, values)?;
        let vanish = FpPolynomial::from_zeroes(points);
        Ok((interp, vanish))
    }

    /// θ-combined quotient oracle evaluated over the extended domain.
    fn combined_quotient(
        &self,
        theta: &F,
        batches: &[BatchOpeningRef<'_, F>],
        matrices: &[Vec<Vec<F>>],
    ) -> Result<Vec<F>> {
        let n = self.domain.size();
        let mut q = vec![F::zero(); n];
        let mut coeff = F::one();
        for (batch, matrix) in batches.iter().zip(matrices.iter()) {
            if batch.points.len() != batch.polys.len() {
                return Err(PlonkError::FuncParamsError);
            }
            for (i, points) in batch.points.iter().enumerate() {
                if points.is_empty() {
                    continue;
                }
                let values: Vec<F> = points.iter().map(|p| batch.polys[i].eval(p)).collect();
                let (interp, vanish) = Self::point_set_polys(points, &values)?;
                let interp_evals = interp.coset_fft_with_domain(&self.domain, &self.offset);
                let mut vanish_evals = vanish.coset_fft_with_domain(&self.domain, &self.offset);
                if vanish_evals.iter().any(|v| v.is_zero()) {
                    return Err(PlonkError::DivisionByZero);
                }
                batch_inversion(&mut vanish_evals);
                for p in 0..n {
                    q[p] += coeff * (matrix[i][p] - interp_evals[p]) * vanish_evals[p];
                }
                coeff *= theta;
            }
        }
        Ok(q)
    }

    fn sample_positions(&self, transcript: &mut Transcript, leaf_count: usize) -> Vec<usize> {
        (0..self.params.lambda)
            .map(|_| transcript.get_challenge_index(b"fri query", leaf_count))
            .collect()
    }
}

impl<F: PrimeField> PolyComScheme for LpcScheme<F> {
    type Field = F;
    type Commitment = LpcCommitment;
    type EvalProof = LpcProof<F>;

    fn max_degree(&self) -> usize {
        self.params.max_degree
    }

    fn commit(&self, polys: &[FpPolynomial<F>]) -> Result<LpcCommitment> {
        let matrix = self.evaluate_batch(polys)?;
        Ok(LpcCommitment(self.batch_tree(&matrix)?.root()))
    }

    fn proof_eval(
        &self,
        transcript: &mut Transcript,
        batches: &[BatchOpeningRef<'_, F>],
    ) -> Result<LpcProof<F>> {
        let theta: F = transcript.get_challenge_field_elem(b"lpc combine");

        let mut matrices = Vec::with_capacity(batches.len());
        let mut trees = Vec::with_capacity(batches.len());
        for batch in batches.iter() {
            let matrix = self.evaluate_batch(batch.polys)?;
            trees.push(self.batch_tree(&matrix)?);
            matrices.push(matrix);
        }

        let q = self.combined_quotient(&theta, batches, &matrices)?;
        let (rounds, _challenges, final_poly) = fri::commit_phase(
            transcript,
            q,
            &self.params.step_list,
            self.offset,
            self.domain.group_gen,
            self.final_degree_bound(),
        )?;

        let pow_nonce = fri::grind(transcript, self.params.proof_of_work_bits);

        let leaf_count = self.domain.size() >> self.params.step_list[0];
        let positions = self.sample_positions(transcript, leaf_count);

        let mut queries = Vec::with_capacity(positions.len());
        let mut query_openings = Vec::with_capacity(positions.len());
        for position in positions.iter() {
            queries.push(fri::open_query(&rounds, &self.params.step_list, *position)?);
            let mut per_batch = Vec::with_capacity(trees.len());
            for (tree, matrix) in trees.iter().zip(matrices.iter()) {
                let mut openings = Vec::with_capacity(1usize << self.params.step_list[0]);
                for t in 0..(1usize << self.params.step_list[0]) {
                    let p = position + t * leaf_count;
                    let values: Vec<F> = matrix.iter().map(|row| row[p]).collect();
                    openings.push(MerkleOpening {
                        values,
                        path: tree.open(p)?,
                    });
                }
                per_batch.push(openings);
            }
            query_openings.push(LpcQueryOpening { batches: per_batch });
        }

        Ok(LpcProof {
            fri: FriProof {
                round_roots: rounds.iter().map(|r| r.tree.root()).collect(),
                final_poly: final_poly.coefs,
                pow_nonce,
                queries,
            },
            query_openings,
        })
    }

    fn verify_eval(
        &self,
        transcript: &mut Transcript,
        batches: &[BatchEvalsRef<'_, LpcCommitment, F>],
        proof: &LpcProof<F>,
    ) -> Result<()> {
        let theta: F = transcript.get_challenge_field_elem(b"lpc combine");

        if proof.fri.final_poly.len() > self.final_degree_bound() {
            return Err(PlonkError::VerificationError);
        }
        let metas = fri::replay_commit_phase(
            transcript,
            &proof.fri,
            &self.params.step_list,
            self.domain.size(),
            self.offset,
            self.domain.group_gen,
        )?;
        fri::check_grinding(transcript, self.params.proof_of_work_bits, proof.fri.pow_nonce)?;

        let step0 = self.params.step_list[0];
        let leaf_count = self.domain.size() >> step0;
        let positions = self.sample_positions(transcript, leaf_count);
        if proof.fri.queries.len() != positions.len()
            || proof.query_openings.len() != positions.len()
        {
            return Err(PlonkError::VerificationError);
        }

        // interpolants and vanishing polynomials from the claimed values
        let mut interpolants = Vec::new();
        for batch in batches.iter() {
            if batch.points.len() != batch.values.len() {
                return Err(PlonkError::VerificationError);
            }
            let mut per_poly = Vec::with_capacity(batch.points.len());
            for (points, values) in batch.points.iter().zip(batch.values.iter()) {
                if points.len() != values.len() {
                    return Err(PlonkError::VerificationError);
                }
                if points.is_empty() {
                    per_poly.push(None);
                } else {
                    per_poly.push(Some(Self::point_set_polys(points, values)?));
                }
            }
            interpolants.push(per_poly);
        }

        let final_poly = FpPolynomial::from_coefs(proof.fri.final_poly.clone());
        for ((position, query), opening) in positions
            .iter()
            .zip(proof.fri.queries.iter())
            .zip(proof.query_openings.iter())
        {
            if opening.batches.len() != batches.len() {
                return Err(PlonkError::VerificationError);
            }
            let mut derived = vec![F::zero(); 1usize << step0];
            for (t, derived_value) in derived.iter_mut().enumerate() {
                let p = position + t * leaf_count;
                let x = self.offset * self.domain.group_gen.pow([p as u64]);
                let mut coeff = F::one();
                let mut acc = F::zero();
                for ((batch, batch_openings), per_poly) in batches
                    .iter()
                    .zip(opening.batches.iter())
                    .zip(interpolants.iter())
                {
                    if batch_openings.len() != 1usize << step0 {
                        return Err(PlonkError::VerificationError);
                    }
                    let leaf = &batch_openings[t];
                    if leaf.values.len() != batch.points.len() {
                        return Err(PlonkError::VerificationError);
                    }
                    if !verify_path(
                        &batch.commitment.0,
                        p,
                        &fri::leaf_digest(&leaf.values),
                        &leaf.path,
                    ) {
                        return Err(PlonkError::VerificationError);
                    }
                    for (value, interp) in leaf.values.iter().zip(per_poly.iter()) {
                        if let Some((interp, vanish)) = interp {
                            let denom = vanish
                                .eval(&x)
                                .inverse()
                                .ok_or(PlonkError::DivisionByZero)?;
                            acc += coeff * (*value - interp.eval(&x)) * denom;
                            coeff *= theta;
                        }
                    }
                }
                *derived_value = acc;
            }
            if !fri::verify_query(query, &metas, *position, &derived, &final_poly)? {
                return Err(PlonkError::VerificationError);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_std::rand::SeedableRng;
    use ark_std::UniformRand;
    use rand_chacha::ChaChaRng;

    fn test_params() -> LpcParams {
        LpcParams {
            max_degree: 31,
            expand_factor: 2,
            step_list: vec![2, 1],
            lambda: 10,
            proof_of_work_bits: 4,
        }
    }

    fn open_and_verify(
        polys: &[Vec<FpPolynomial<Fr>>],
        points: &[Vec<Vec<Fr>>],
        tamper_value: bool,
    ) -> Result<()> {
        let pcs = LpcScheme::<Fr>::new(test_params()).unwrap();
        let commitments: Vec<LpcCommitment> = polys
            .iter()
            .map(|batch| pcs.commit(batch).unwrap())
            .collect();

        let mut transcript = Transcript::new(b"lpc test");
        let openings: Vec<BatchOpeningRef<'_, Fr>> = polys
            .iter()
            .zip(points.iter())
            .map(|(batch, pts)| BatchOpeningRef {
                polys: batch,
                points: pts,
            })
            .collect();
        let proof = pcs.proof_eval(&mut transcript, &openings).unwrap();

        let mut values: Vec<Vec<Vec<Fr>>> = polys
            .iter()
            .zip(points.iter())
            .map(|(batch, pts)| {
                batch
                    .iter()
                    .zip(pts.iter())
                    .map(|(poly, pts)| pts.iter().map(|p| poly.eval(p)).collect())
                    .collect()
            })
            .collect();
        if tamper_value {
            values[0][0][0] += Fr::from(1u64);
        }

        let mut transcript = Transcript::new(b"lpc test");
        let evals: Vec<BatchEvalsRef<'_, LpcCommitment, Fr>> = commitments
            .iter()
            .zip(points.iter())
            .zip(values.iter())
            .map(|((commitment, pts), vals)| BatchEvalsRef {
                commitment,
                points: pts,
                values: vals,
            })
            .collect();
        pcs.verify_eval(&mut transcript, &evals, &proof)
    }

    #[test]
    fn commit_open_verify() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let batch1: Vec<FpPolynomial<Fr>> = (0..3)
            .map(|_| FpPolynomial::random(&mut prng, 31))
            .collect();
        let batch2: Vec<FpPolynomial<Fr>> = (0..2)
            .map(|_| FpPolynomial::random(&mut prng, 17))
            .collect();
        let zeta = Fr::rand(&mut prng);
        let zeta_omega = Fr::rand(&mut prng);
        let points1 = vec![
            vec![zeta],
            vec![zeta, zeta_omega],
            vec![zeta],
        ];
        let points2 = vec![vec![zeta_omega], vec![zeta]];

        assert!(open_and_verify(
            &[batch1.clone(), batch2.clone()],
            &[points1.clone(), points2.clone()],
            false
        )
        .is_ok());

        // a single tampered claimed value must be rejected
        assert!(open_and_verify(&[batch1, batch2], &[points1, points2], true).is_err());
    }

    #[test]
    fn degree_overflow_is_rejected_at_commit() {
        let mut prng = ChaChaRng::from_seed([9u8; 32]);
        let pcs = LpcScheme::<Fr>::new(test_params()).unwrap();
        let poly = FpPolynomial::<Fr>::random(&mut prng, 32);
        assert_eq!(pcs.commit(&[poly]), Err(PlonkError::DegreeError));
    }

    #[test]
    fn oversized_codeword_fails_verification() {
        // prover params admit degree 63; the verifier expects at most 31 and
        // must reject the transcript of the larger codeword
        let mut prng = ChaChaRng::from_seed([4u8; 32]);
        let mut hi = test_params();
        hi.max_degree = 63;
        let pcs_hi = LpcScheme::<Fr>::new(hi).unwrap();
        let pcs_lo = LpcScheme::<Fr>::new(test_params()).unwrap();

        let poly = FpPolynomial::<Fr>::random(&mut prng, 63);
        let commitment = pcs_hi.commit(std::slice::from_ref(&poly)).unwrap();
        let zeta = Fr::rand(&mut prng);
        let points = vec![vec![zeta]];
        let values = vec![vec![poly.eval(&zeta)]];

        let mut transcript = Transcript::new(b"lpc degree");
        let proof = pcs_hi
            .proof_eval(
                &mut transcript,
                &[BatchOpeningRef {
                    polys: std::slice::from_ref(&poly),
                    points: &points,
                }],
            )
            .unwrap();

        let mut transcript = Transcript::new(b"lpc degree");
        assert!(pcs_lo
            .verify_eval(
                &mut transcript,
                &[BatchEvalsRef {
                    commitment: &commitment,
                    points: &points,
                    values: &values,
                }],
                &proof
            )
            .is_err());
    }
}
