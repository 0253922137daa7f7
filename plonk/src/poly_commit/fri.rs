//! Folding-based low-degree test.
//!
//! The committed oracle is repeatedly folded by transcript challenges until
//! only a short coefficient vector remains. Each committed round packs the
//! `2^step` evaluations that fold into one next-round position into a single
//! Merkle leaf, so a query opens exactly one leaf per round. Rounds may fold
//! more than once between commitments (the `step_list` schedule); every
//! binary fold consumes its own challenge.

use crate::errors::{PlonkError, Result};
use crate::poly_commit::field_polynomial::FpPolynomial;
use crate::poly_commit::merkle::{hash_leaf, verify_path, Hash, MerklePath, MerkleTree};
use crate::poly_commit::transcript::PolyComTranscript;
use crate::utils::{map_collect, scalar_to_bytes};
use ark_ff::{batch_inversion, PrimeField};
use merlin::Transcript;
use sha3::{Digest, Keccak256};

/// Opened Merkle leaf: the packed evaluations and the authentication path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleOpening<F> {
    /// The evaluations packed into the leaf.
    pub values: Vec<F>,
    /// The authentication path of the leaf.
    pub path: MerklePath,
}

/// One query of the low-degree test: one opened leaf per committed round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FriQueryProof<F> {
    /// Per-round openings, round 0 first.
    pub rounds: Vec<MerkleOpening<F>>,
}

/// The non-interactive low-degree test proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FriProof<F> {
    /// Merkle roots of the committed rounds.
    pub round_roots: Vec<Hash>,
    /// Coefficients of the fully folded polynomial.
    pub final_poly: Vec<F>,
    /// Grinding nonce bound to the transcript state before query sampling.
    pub pow_nonce: u64,
    /// The λ query openings.
    pub queries: Vec<FriQueryProof<F>>,
}

/// Prover-side state of one committed round.
pub(crate) struct FriRoundState<F: PrimeField> {
    pub evals: Vec<F>,
    pub leaf_count: usize,
    pub tree: MerkleTree,
}

/// Verifier-side view of one committed round.
pub(crate) struct FriRoundMeta<F: PrimeField> {
    pub root: Hash,
    pub step: usize,
    pub leaf_count: usize,
    pub challenges: Vec<F>,
    pub offset: F,
    pub gen: F,
}

/// Hash the evaluations packed into one leaf.
pub(crate) fn leaf_digest<F: PrimeField>(values: &[F]) -> Hash {
    let mut payload = Vec::with_capacity(values.len() * 32);
    for v in values.iter() {
        payload.extend_from_slice(&scalar_to_bytes(v));
    }
    hash_leaf(&payload)
}

fn build_round_tree<F: PrimeField>(evals: &[F], step: usize) -> Result<FriRoundState<F>> {
    let leaf_count = evals.len() >> step;
    let leaves = map_collect((0..leaf_count).collect::<Vec<_>>(), |k| {
        let values: Vec<F> = (0..(1usize << step))
            .map(|t| evals[k + t * leaf_count])
            .collect();
        leaf_digest(&values)
    });
    Ok(FriRoundState {
        evals: evals.to_vec(),
        leaf_count,
        tree: MerkleTree::new(leaves)?,
    })
}

/// Fold the whole evaluation table once: `f'(x^2)` from `f(x)`, `f(-x)`.
fn fold_evals<F: PrimeField>(evals: &[F], offset: &F, gen: &F, challenge: &F) -> Result<Vec<F>> {
    let n = evals.len();
    let half = n / 2;
    let mut xs = Vec::with_capacity(half);
    let mut x = *offset;
    for _ in 0..half {
        xs.push(x);
        x *= gen;
    }
    batch_inversion(&mut xs);
    let two_inv = F::from(2u64).inverse().ok_or(PlonkError::DivisionByZero)?;
    let mut out = Vec::with_capacity(half);
    for k in 0..half {
        let even = evals[k] + evals[k + half];
        let odd = (evals[k] - evals[k + half]) * xs[k] * challenge;
        out.push((even + odd) * two_inv);
    }
    Ok(out)
}

/// Fold one opened leaf down to the single next-round value. `x_base` is the
/// domain point of the leaf's first position and `x_step` the ratio between
/// consecutive packed positions.
pub(crate) fn fold_leaf<F: PrimeField>(
    values: &[F],
    x_base: &F,
    x_step: &F,
    challenges: &[F],
) -> Result<F> {
    let mut values = values.to_vec();
    let mut xs = Vec::with_capacity(values.len());
    let mut x = *x_base;
    for _ in 0..values.len() {
        xs.push(x);
        x *= x_step;
    }
    let two_inv = F::from(2u64).inverse().ok_or(PlonkError::DivisionByZero)?;
    for challenge in challenges.iter() {
        let half = values.len() / 2;
        let mut inv_xs = xs[..half].to_vec();
        batch_inversion(&mut inv_xs);
        let mut next = Vec::with_capacity(half);
        for t in 0..half {
            let even = values[t] + values[t + half];
            let odd = (values[t] - values[t + half]) * inv_xs[t] * challenge;
            next.push((even + odd) * two_inv);
        }
        values = next;
        for x in xs.iter_mut().take(half) {
            *x = x.square();
        }
        xs.truncate(half);
    }
    Ok(values[0])
}

/// Run the commit phase: per round, commit the current evaluations, absorb
/// the root and draw the round's fold challenges. Returns the round states,
/// the per-round challenges, and the final folded polynomial, whose
/// coefficients are absorbed last.
pub(crate) fn commit_phase<F: PrimeField>(
    transcript: &mut Transcript,
    evals: Vec<F>,
    step_list: &[usize],
    mut offset: F,
    mut gen: F,
    final_degree_bound: usize,
) -> Result<(Vec<FriRoundState<F>>, Vec<Vec<F>>, FpPolynomial<F>)> {
    let mut rounds = Vec::with_capacity(step_list.len());
    let mut all_challenges = Vec::with_capacity(step_list.len());
    let mut current = evals;

    for step in step_list.iter() {
        if current.len() >> step == 0 {
            return Err(PlonkError::SetupError);
        }
        let round = build_round_tree(&current, *step)?;
        transcript.append_digest(&round.tree.root());
        let mut challenges = Vec::with_capacity(*step);
        for _ in 0..*step {
            let challenge: F = transcript.get_challenge_field_elem(b"fri fold");
            current = fold_evals(&current, &offset, &gen, &challenge)?;
            offset = offset.square();
            gen = gen.square();
            challenges.push(challenge);
        }
        rounds.push(round);
        all_challenges.push(challenges);
    }

    let final_size = current.len();
    let final_domain = FpPolynomial::<F>::evaluation_domain(final_size)
        .ok_or(PlonkError::GroupNotFound(final_size))?;
    let final_poly = FpPolynomial::coset_ifft_with_domain(&final_domain, &offset, &current);
    if !final_poly.is_zero() && final_poly.degree() + 1 > final_degree_bound {
        return Err(PlonkError::DegreeError);
    }
    for coef in final_poly.coefs.iter() {
        transcript.append_field_elem(coef);
    }

    Ok((rounds, all_challenges, final_poly))
}

/// Mirror of [`commit_phase`] for the verifier: absorb the prover-supplied
/// roots and final polynomial, drawing the same challenges.
pub(crate) fn replay_commit_phase<F: PrimeField>(
    transcript: &mut Transcript,
    proof: &FriProof<F>,
    step_list: &[usize],
    domain_size: usize,
    offset: F,
    gen: F,
) -> Result<Vec<FriRoundMeta<F>>> {
    if proof.round_roots.len() != step_list.len() {
        return Err(PlonkError::VerificationError);
    }
    let mut metas = Vec::with_capacity(step_list.len());
    let mut size = domain_size;
    let mut offset = offset;
    let mut gen = gen;
    for (root, step) in proof.round_roots.iter().zip(step_list.iter()) {
        transcript.append_digest(root);
        let mut challenges = Vec::with_capacity(*step);
        let meta_offset = offset;
        let meta_gen = gen;
        for _ in 0..*step {
            challenges.push(transcript.get_challenge_field_elem(b"fri fold"));
            offset = offset.square();
            gen = gen.square();
        }
        metas.push(FriRoundMeta {
            root: *root,
            step: *step,
            leaf_count: size >> step,
            challenges,
            offset: meta_offset,
            gen: meta_gen,
        });
        size >>= step;
    }
    for coef in proof.final_poly.iter() {
        transcript.append_field_elem(coef);
    }
    Ok(metas)
}

/// Number of leading zero bits of a digest.
fn leading_zero_bits(digest: &Hash) -> u32 {
    let mut bits = 0;
    for byte in digest.iter() {
        if *byte == 0 {
            bits += 8;
        } else {
            bits += byte.leading_zeros();
            break;
        }
    }
    bits
}

fn pow_digest(seed: &[u8; 32], nonce: u64) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(seed);
    hasher.update(nonce.to_be_bytes());
    hasher.finalize().into()
}

/// Grind a proof-of-work nonce over the current transcript state and absorb
/// it. Raises the cost of regenerating queries after the fact.
pub(crate) fn grind(transcript: &mut Transcript, pow_bits: u32) -> u64 {
    let seed = transcript.get_challenge_bytes(b"proof of work");
    let mut nonce = 0u64;
    while leading_zero_bits(&pow_digest(&seed, nonce)) < pow_bits {
        nonce += 1;
    }
    transcript.append_message(b"pow nonce", &nonce.to_be_bytes());
    nonce
}

/// Check a grinding nonce against the transcript state and absorb it.
pub(crate) fn check_grinding(
    transcript: &mut Transcript,
    pow_bits: u32,
    nonce: u64,
) -> Result<()> {
    let seed = transcript.get_challenge_bytes(b"proof of work");
    if leading_zero_bits(&pow_digest(&seed, nonce)) < pow_bits {
        return Err(PlonkError::VerificationError);
    }
    transcript.append_message(b"pow nonce", &nonce.to_be_bytes());
    Ok(())
}

/// Open every committed round at the leaf covering `leaf_index`'s fold path.
pub(crate) fn open_query<F: PrimeField>(
    rounds: &[FriRoundState<F>],
    steps: &[usize],
    leaf_index: usize,
) -> Result<FriQueryProof<F>> {
    let mut openings = Vec::with_capacity(rounds.len());
    let mut position = leaf_index;
    for (round, step) in rounds.iter().zip(steps.iter()) {
        let leaf = position % round.leaf_count;
        let values: Vec<F> = (0..(1usize << step))
            .map(|t| round.evals[leaf + t * round.leaf_count])
            .collect();
        openings.push(MerkleOpening {
            values,
            path: round.tree.open(leaf)?,
        });
        position = leaf;
    }
    Ok(FriQueryProof { rounds: openings })
}

/// Check the fold chain of one query. `derived_first` holds the values the
/// round-0 leaf must contain, recomputed by the caller from the batch
/// openings. Returns `false` on any mismatch.
pub(crate) fn verify_query<F: PrimeField>(
    query: &FriQueryProof<F>,
    metas: &[FriRoundMeta<F>],
    leaf_index: usize,
    derived_first: &[F],
    final_poly: &FpPolynomial<F>,
) -> Result<bool> {
    if query.rounds.len() != metas.len() {
        return Ok(false);
    }
    let mut position = leaf_index;
    let mut carried: Option<F> = None;
    for (opening, meta) in query.rounds.iter().zip(metas.iter()) {
        let leaf = position % meta.leaf_count;
        let slot = position / meta.leaf_count;
        if opening.values.len() != 1usize << meta.step {
            return Ok(false);
        }
        if !verify_path(
            &meta.root,
            leaf,
            &leaf_digest(&opening.values),
            &opening.path,
        ) {
            return Ok(false);
        }
        match carried {
            None => {
                if opening.values != derived_first {
                    return Ok(false);
                }
            }
            Some(value) => {
                if opening.values[slot] != value {
                    return Ok(false);
                }
            }
        }
        let x_base = meta.offset * meta.gen.pow([leaf as u64]);
        let x_step = meta.gen.pow([meta.leaf_count as u64]);
        carried = Some(fold_leaf(
            &opening.values,
            &x_base,
            &x_step,
            &meta.challenges,
        )?);
        position = leaf;
    }

    let last = metas.last().ok_or(PlonkError::VerificationError)?;
    let final_offset = last.offset.pow([1u64 << last.step]);
    let final_gen = last.gen.pow([1u64 << last.step]);
    let x = final_offset * final_gen.pow([position as u64]);
    Ok(carried == Some(final_poly.eval(&x)))
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::{FftField, Field};
    use ark_std::rand::SeedableRng;
    use ark_std::UniformRand;
    use rand_chacha::ChaChaRng;

    #[test]
    fn fold_preserves_low_degree() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let poly = FpPolynomial::<Fr>::random(&mut prng, 7);
        let domain = FpPolynomial::<Fr>::evaluation_domain(32).unwrap();
        let offset = Fr::GENERATOR;
        let evals = poly.coset_fft_with_domain(&domain, &offset);
        let challenge = Fr::rand(&mut prng);
        let folded = fold_evals(&evals, &offset, &domain.group_gen, &challenge).unwrap();

        // the folded table must be the evaluations of a degree-3 polynomial
        // on the squared coset
        let half_domain = FpPolynomial::<Fr>::evaluation_domain(16).unwrap();
        let folded_poly =
            FpPolynomial::coset_ifft_with_domain(&half_domain, &offset.square(), &folded);
        assert!(folded_poly.degree() <= 3);
    }

    #[test]
    fn fold_leaf_matches_table_fold() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let poly = FpPolynomial::<Fr>::random(&mut prng, 7);
        let domain = FpPolynomial::<Fr>::evaluation_domain(32).unwrap();
        let offset = Fr::GENERATOR;
        let gen = domain.group_gen;
        let evals = poly.coset_fft_with_domain(&domain, &offset);

        let c0 = Fr::rand(&mut prng);
        let c1 = Fr::rand(&mut prng);
        let once = fold_evals(&evals, &offset, &gen, &c0).unwrap();
        let twice = fold_evals(&once, &offset.square(), &gen.square(), &c1).unwrap();

        // leaf for position k with step 2 packs {k, k+8, k+16, k+24}
        let leaf_count = 8usize;
        for k in 0..leaf_count {
            let values: Vec<Fr> = (0..4).map(|t| evals[k + t * leaf_count]).collect();
            let x_base = offset * gen.pow([k as u64]);
            let x_step = gen.pow([leaf_count as u64]);
            let folded = fold_leaf(&values, &x_base, &x_step, &[c0, c1]).unwrap();
            assert_eq!(folded, twice[k]);
        }
    }

    #[test]
    fn grinding_round_trip() {
        let mut t1 = Transcript::new(b"pow");
        let nonce = grind(&mut t1, 8);
        let mut t2 = Transcript::new(b"pow");
        check_grinding(&mut t2, 8, nonce).unwrap();

        // some small nonce fails the difficulty test
        let mut seed_transcript = Transcript::new(b"pow");
        let seed = seed_transcript.get_challenge_bytes(b"proof of work");
        let bad = (0..64u64)
            .find(|n| leading_zero_bits(&pow_digest(&seed, *n)) < 8)
            .unwrap();
        let mut t3 = Transcript::new(b"pow");
        assert!(check_grinding(&mut t3, 8, bad).is_err());
    }
}
