use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::{AssignmentTable, ConstraintSystem};
use crate::plonk::helpers::{
    absorb_evaluations, combine_constraints, hide_polynomial, lookup_helper_columns,
    lookup_multiplicities, opening_schedule, rotate_point, split_t, z_poly_evals, ColumnValues,
    IdentityInputs, PlonkChallenges,
};
use crate::plonk::indexer::{
    pad_columns, preprocess_witness, PlonkEvaluations, PlonkPK, PlonkPf, PlonkProof,
};
use crate::plonk::transcript::{
    transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_beta,
    transcript_get_plonk_challenge_delta, transcript_get_plonk_challenge_gamma,
    transcript_get_plonk_challenge_theta, transcript_get_plonk_challenge_zeta,
    transcript_init_plonk,
};
use crate::poly_commit::field_polynomial::FpPolynomial;
use crate::poly_commit::pcs::{BatchOpeningRef, PolyComScheme};
use crate::poly_commit::transcript::PolyComTranscript;
use ark_ff::{UniformRand, Zero};
use ark_std::rand::{CryptoRng, RngCore};
use merlin::Transcript;

/// Produce a proof that the private assignment satisfies the constraint
/// system, against parameters derived by the public preprocessor.
///
/// The rounds are strictly sequential: every challenge depends on all prior
/// commitments, and the verifier re-derives the same sequence from the
/// proof. Shape mismatches between the assignment and the table description
/// are fatal typed errors; an unsatisfying but well-shaped assignment still
/// yields a proof, which a conforming verifier then rejects.
pub fn prover<R: CryptoRng + RngCore, PCS: PolyComScheme>(
    prng: &mut R,
    transcript: &mut Transcript,
    pcs: &PCS,
    cs: &ConstraintSystem<PCS::Field>,
    params: &PlonkPK<PCS>,
    assignment: &AssignmentTable<PCS::Field>,
) -> Result<PlonkPf<PCS>> {
    let common = &params.verifier_params;
    let table = cs.table_description();
    if *table != common.table {
        return Err(PlonkError::FuncParamsError);
    }
    assignment.check_shape(table)?;

    let n = common.cs_size;
    let factor = common.quot_factor;
    let m = n * factor;
    let domain =
        FpPolynomial::<PCS::Field>::evaluation_domain(n).ok_or(PlonkError::GroupNotFound(n))?;
    let domain_m =
        FpPolynomial::<PCS::Field>::evaluation_domain(m).ok_or(PlonkError::GroupNotFound(m))?;
    let root = common.root;
    let k1 = common.k[1];

    transcript_init_plonk(
        transcript,
        n as u64,
        &common.cm_fixed,
        &common.k,
        &root,
        &assignment.public.public_inputs,
    );
    let mut challenges = PlonkChallenges::new();

    // round 1: witness columns and lookup multiplicities
    let witness_values = preprocess_witness(prng, table, &assignment.private)?;
    let pi_values = pad_columns(&assignment.public.public_inputs, n);
    let constant_values = pad_columns(&assignment.public.constants, n);
    let selector_values = pad_columns(&assignment.public.selectors, n);
    let cols = ColumnValues {
        witness: &witness_values,
        public_input: &pi_values,
        constant: &constant_values,
        selector: &selector_values,
        stride: 1,
        height: n,
    };

    let multiplicity_values = if cs.has_lookups() {
        let mut counts = lookup_multiplicities(cs, &cols)?;
        // blinding: multiplicity padding rows carry no constrained data
        for column in counts.iter_mut() {
            for value in column.iter_mut().skip(table.usable_rows_amount) {
                *value = PCS::Field::rand(prng);
            }
        }
        counts
    } else {
        Vec::new()
    };

    let mut witness_batch: Vec<FpPolynomial<PCS::Field>> = witness_values
        .iter()
        .map(|vals| FpPolynomial::ifft_with_domain(&domain, vals))
        .collect();
    let n_witness_polys = witness_batch.len();
    witness_batch.extend(
        multiplicity_values
            .iter()
            .map(|vals| FpPolynomial::ifft_with_domain(&domain, vals)),
    );
    let cm_witness = pcs
        .commit(&witness_batch)
        .map_err(|_| PlonkError::CommitmentError)?;
    transcript.append_commitment(&cm_witness);

    // round 2: compression and permutation/lookup challenges
    let theta = transcript_get_plonk_challenge_theta(transcript, n);
    let beta = transcript_get_plonk_challenge_beta(transcript, n);
    let gamma = transcript_get_plonk_challenge_gamma(transcript, n);
    let delta = transcript_get_plonk_challenge_delta(transcript, n);
    challenges.insert_theta(theta)?;
    challenges.insert_beta_gamma(beta, gamma)?;
    challenges.insert_delta(delta)?;

    // round 3: accumulator and helper columns
    let mut permuted_values: Vec<Vec<PCS::Field>> = witness_values.clone();
    permuted_values.extend(pi_values.iter().cloned());
    let z_perm_evals = z_poly_evals(
        &permuted_values,
        &params.sigma_values,
        &params.group,
        &common.k,
        &beta,
        &gamma,
    )?;
    let mut z_perm_poly = FpPolynomial::ifft_with_domain(&domain, &z_perm_evals);
    hide_polynomial(prng, &mut z_perm_poly, 2, n);

    let mut aux_batch = vec![z_perm_poly];
    let (n_lookup_h, n_lookup_g) = if cs.has_lookups() {
        let helpers = lookup_helper_columns(cs, &cols, &multiplicity_values, &theta, &delta)?;
        let mut z_lookup_poly = FpPolynomial::ifft_with_domain(&domain, &helpers.z_values);
        hide_polynomial(prng, &mut z_lookup_poly, 2, n);
        aux_batch.push(z_lookup_poly);
        let counts = (helpers.h_values.len(), helpers.g_values.len());
        for values in helpers.h_values.iter().chain(helpers.g_values.iter()) {
            let mut poly = FpPolynomial::ifft_with_domain(&domain, values);
            hide_polynomial(prng, &mut poly, 1, n);
            aux_batch.push(poly);
        }
        counts
    } else {
        (0, 0)
    };
    let cm_aux = pcs
        .commit(&aux_batch)
        .map_err(|_| PlonkError::CommitmentError)?;
    transcript.append_commitment(&cm_aux);

    // round 4: the combination challenge
    let alpha = transcript_get_plonk_challenge_alpha(transcript, n);
    challenges.insert_alpha(alpha)?;

    // round 5: the quotient polynomial
    let coset = |poly: &FpPolynomial<PCS::Field>| poly.coset_fft_with_domain(&domain_m, &k1);
    let witness_coset: Vec<Vec<PCS::Field>> = witness_batch[..n_witness_polys]
        .iter()
        .map(coset)
        .collect();
    let multiplicity_coset: Vec<Vec<PCS::Field>> =
        witness_batch[n_witness_polys..].iter().map(coset).collect();
    let pi_polys: Vec<FpPolynomial<PCS::Field>> = pi_values
        .iter()
        .map(|vals| FpPolynomial::ifft_with_domain(&domain, vals))
        .collect();
    let pi_coset: Vec<Vec<PCS::Field>> = pi_polys.iter().map(coset).collect();
    let aux_coset: Vec<Vec<PCS::Field>> = aux_batch.iter().map(coset).collect();

    let cols_coset = ColumnValues {
        witness: &witness_coset,
        public_input: &pi_coset,
        constant: &params.c_coset_evals,
        selector: &params.q_coset_evals,
        stride: factor,
        height: m,
    };

    let n_perm = common.permuted_columns;
    let mut t_evals = Vec::with_capacity(m);
    for p in 0..m {
        let next = (p + factor) % m;
        let mut permuted = Vec::with_capacity(n_perm);
        for coset_evals in witness_coset.iter() {
            permuted.push(coset_evals[p]);
        }
        for coset_evals in pi_coset.iter() {
            permuted.push(coset_evals[p]);
        }
        debug_assert_eq!(permuted.len(), n_perm);
        let sigmas: Vec<PCS::Field> =
            params.s_coset_evals.iter().map(|evals| evals[p]).collect();
        let lookup_h: Vec<PCS::Field> = (0..n_lookup_h)
            .map(|i| aux_coset[2 + i][p])
            .collect();
        let lookup_g: Vec<PCS::Field> = (0..n_lookup_g)
            .map(|i| aux_coset[2 + n_lookup_h + i][p])
            .collect();
        let lookup_m: Vec<PCS::Field> =
            multiplicity_coset.iter().map(|evals| evals[p]).collect();
        let inputs = IdentityInputs {
            x: params.coset_points[p],
            l1: params.l1_coset_evals[p],
            z_perm: aux_coset[0][p],
            z_perm_next: aux_coset[0][next],
            permuted: &permuted,
            sigmas: &sigmas,
            z_lookup: if cs.has_lookups() {
                aux_coset[1][p]
            } else {
                PCS::Field::zero()
            },
            z_lookup_next: if cs.has_lookups() {
                aux_coset[1][next]
            } else {
                PCS::Field::zero()
            },
            lookup_h: &lookup_h,
            lookup_g: &lookup_g,
            lookup_m: &lookup_m,
        };
        let combined = combine_constraints(
            cs,
            &common.k,
            &challenges,
            &inputs,
            &|var| cols_coset.cell(var, p),
        )?;
        t_evals.push(combined * params.z_h_inv_coset_evals[p]);
    }
    let t_poly = FpPolynomial::coset_ifft_with_domain(&domain_m, &k1, &t_evals);
    let t_chunks = split_t(prng, &t_poly, common.quotient_chunks, n + 2)?;
    let cm_quotient = pcs
        .commit(&t_chunks)
        .map_err(|_| PlonkError::CommitmentError)?;
    transcript.append_commitment(&cm_quotient);

    // round 6: the evaluation point
    challenges.insert_zeta(transcript_get_plonk_challenge_zeta(transcript, n))?;
    let zeta = *challenges.get_zeta()?;

    // round 7: evaluations and the batched opening
    let rotations = cs.column_rotations();
    let eval_at = |poly: &FpPolynomial<PCS::Field>, rotation: i32| {
        poly.eval(&rotate_point(&zeta, &root, rotation, n))
    };
    let eval_set = |poly: &FpPolynomial<PCS::Field>, set: &[i32]| -> Vec<PCS::Field> {
        set.iter().map(|r| eval_at(poly, *r)).collect()
    };

    let evals = PlonkEvaluations {
        witness: witness_batch[..n_witness_polys]
            .iter()
            .zip(rotations.witness.iter())
            .map(|(poly, set)| eval_set(poly, set))
            .collect(),
        multiplicities: witness_batch[n_witness_polys..]
            .iter()
            .map(|poly| eval_at(poly, 0))
            .collect(),
        selectors: params
            .q_polys
            .iter()
            .zip(rotations.selector.iter())
            .map(|(poly, set)| eval_set(poly, set))
            .collect(),
        constants: params
            .c_polys
            .iter()
            .zip(rotations.constant.iter())
            .map(|(poly, set)| eval_set(poly, set))
            .collect(),
        sigmas: params.s_polys.iter().map(|poly| eval_at(poly, 0)).collect(),
        z_perm: eval_at(&aux_batch[0], 0),
        z_perm_omega: eval_at(&aux_batch[0], 1),
        z_lookup: if cs.has_lookups() {
            vec![eval_at(&aux_batch[1], 0), eval_at(&aux_batch[1], 1)]
        } else {
            Vec::new()
        },
        lookup_h: (0..n_lookup_h)
            .map(|i| eval_at(&aux_batch[2 + i], 0))
            .collect(),
        lookup_g: (0..n_lookup_g)
            .map(|i| eval_at(&aux_batch[2 + n_lookup_h + i], 0))
            .collect(),
        quotient: t_chunks.iter().map(|poly| eval_at(poly, 0)).collect(),
    };
    absorb_evaluations(transcript, &evals);

    let schedule = opening_schedule(
        cs,
        &rotations,
        &zeta,
        &root,
        n,
        common.permuted_columns,
        common.quotient_chunks,
    );
    let mut fixed_polys = Vec::with_capacity(
        params.q_polys.len() + params.c_polys.len() + params.s_polys.len(),
    );
    fixed_polys.extend(params.q_polys.iter().cloned());
    fixed_polys.extend(params.c_polys.iter().cloned());
    fixed_polys.extend(params.s_polys.iter().cloned());

    let eval_proof = pcs
        .proof_eval(
            transcript,
            &[
                BatchOpeningRef {
                    polys: &fixed_polys,
                    points: &schedule.fixed,
                },
                BatchOpeningRef {
                    polys: &witness_batch,
                    points: &schedule.witness,
                },
                BatchOpeningRef {
                    polys: &aux_batch,
                    points: &schedule.aux,
                },
                BatchOpeningRef {
                    polys: &t_chunks,
                    points: &schedule.quotient,
                },
            ],
        )
        .map_err(|_| PlonkError::ProofError)?;

    Ok(PlonkProof {
        cm_witness,
        cm_aux,
        cm_quotient,
        evals,
        eval_proof,
    })
}
