use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::{
    ColumnKind, ColumnRotations, ConstraintSystem, Variable,
};
use crate::plonk::helpers::{
    absorb_evaluations, combine_constraints, eval_public_input_poly, opening_schedule,
    rotate_point, schedule_values, z_h_and_l1_eval, IdentityInputs, PlonkChallenges,
};
use crate::plonk::indexer::{PlonkEvaluations, PlonkPf, PlonkVK};
use crate::plonk::transcript::{
    transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_beta,
    transcript_get_plonk_challenge_delta, transcript_get_plonk_challenge_gamma,
    transcript_get_plonk_challenge_theta, transcript_get_plonk_challenge_zeta,
    transcript_init_plonk,
};
use crate::poly_commit::pcs::{BatchEvalsRef, PolyComScheme};
use crate::poly_commit::transcript::PolyComTranscript;
use ark_ff::{Field, One, PrimeField, Zero};
use merlin::Transcript;

/// Verify a proof against the constraint system, the verification key and
/// the public inputs.
///
/// Returns `Ok(false)` for every failed protocol check: an invalid proof is
/// an expected outcome, not an error. `Err` indicates a broken caller
/// (public inputs not matching the table shape).
pub fn verifier<PCS: PolyComScheme>(
    transcript: &mut Transcript,
    pcs: &PCS,
    cs: &ConstraintSystem<PCS::Field>,
    verifier_params: &PlonkVK<PCS>,
    public_inputs: &[Vec<PCS::Field>],
    proof: &PlonkPf<PCS>,
) -> Result<bool> {
    let table = cs.table_description();
    if *table != verifier_params.table {
        return Err(PlonkError::FuncParamsError);
    }
    if public_inputs.len() != table.public_input_columns
        || public_inputs
            .iter()
            .any(|col| col.len() != table.usable_rows_amount)
    {
        return Err(PlonkError::ShapeMismatch("public input columns"));
    }

    let n = verifier_params.cs_size;
    let root = verifier_params.root;
    let rotations = cs.column_rotations();
    if !eval_shape_matches(cs, &rotations, verifier_params, &proof.evals) {
        return Ok(false);
    }

    // re-derive every challenge from the proof's commitments
    transcript_init_plonk(
        transcript,
        n as u64,
        &verifier_params.cm_fixed,
        &verifier_params.k,
        &root,
        public_inputs,
    );
    let mut challenges = PlonkChallenges::new();
    transcript.append_commitment(&proof.cm_witness);
    challenges.insert_theta(transcript_get_plonk_challenge_theta(transcript, n))?;
    let beta = transcript_get_plonk_challenge_beta(transcript, n);
    let gamma = transcript_get_plonk_challenge_gamma(transcript, n);
    challenges.insert_beta_gamma(beta, gamma)?;
    challenges.insert_delta(transcript_get_plonk_challenge_delta(transcript, n))?;
    transcript.append_commitment(&proof.cm_aux);
    challenges.insert_alpha(transcript_get_plonk_challenge_alpha(transcript, n))?;
    transcript.append_commitment(&proof.cm_quotient);
    let zeta = transcript_get_plonk_challenge_zeta(transcript, n);
    challenges.insert_zeta(zeta)?;
    absorb_evaluations(transcript, &proof.evals);

    // public-input column evaluations at every point the circuit touches
    let mut pi_evals: Vec<Vec<PCS::Field>> = Vec::with_capacity(public_inputs.len());
    for (column, set) in public_inputs.iter().zip(rotations.public_input.iter()) {
        let mut per_rotation = Vec::with_capacity(set.len());
        for rotation in set.iter() {
            let point = rotate_point(&zeta, &root, *rotation, n);
            per_rotation.push(eval_public_input_poly(column, &root, n, &point)?);
        }
        pi_evals.push(per_rotation);
    }

    let evals = &proof.evals;
    let resolve = |var: &Variable| -> Result<PCS::Field> {
        let position = rotations.position(var.kind, var.index, var.rotation)?;
        let value = match var.kind {
            ColumnKind::Witness => evals.witness[var.index][position],
            ColumnKind::PublicInput => pi_evals[var.index][position],
            ColumnKind::Constant => evals.constants[var.index][position],
            ColumnKind::Selector => evals.selectors[var.index][position],
        };
        Ok(value)
    };

    // the algebraic identity at zeta
    let (z_h_eval, l1_eval) = z_h_and_l1_eval(n, &zeta)?;
    let mut permuted = Vec::with_capacity(verifier_params.permuted_columns);
    for (index, set) in rotations.witness.iter().enumerate() {
        let position = set
            .iter()
            .position(|r| *r == 0)
            .ok_or(PlonkError::VerificationError)?;
        permuted.push(evals.witness[index][position]);
    }
    for (index, set) in rotations.public_input.iter().enumerate() {
        let position = set
            .iter()
            .position(|r| *r == 0)
            .ok_or(PlonkError::VerificationError)?;
        permuted.push(pi_evals[index][position]);
    }

    let has_lookups = cs.has_lookups();
    let inputs = IdentityInputs {
        x: zeta,
        l1: l1_eval,
        z_perm: evals.z_perm,
        z_perm_next: evals.z_perm_omega,
        permuted: &permuted,
        sigmas: &evals.sigmas,
        z_lookup: if has_lookups {
            evals.z_lookup[0]
        } else {
            PCS::Field::zero()
        },
        z_lookup_next: if has_lookups {
            evals.z_lookup[1]
        } else {
            PCS::Field::zero()
        },
        lookup_h: &evals.lookup_h,
        lookup_g: &evals.lookup_g,
        lookup_m: &evals.multiplicities,
    };
    let combined = combine_constraints(cs, &verifier_params.k, &challenges, &inputs, &resolve)?;

    let chunk_step = zeta.pow([(n + 2) as u64]);
    let mut t_eval = PCS::Field::zero();
    let mut chunk_factor = PCS::Field::one();
    for chunk in evals.quotient.iter() {
        t_eval += chunk_factor * chunk;
        chunk_factor *= chunk_step;
    }
    if combined != z_h_eval * t_eval {
        return Ok(false);
    }

    // the disclosed evaluations must be consistent with the commitments
    let schedule = opening_schedule(
        cs,
        &rotations,
        &zeta,
        &root,
        n,
        verifier_params.permuted_columns,
        verifier_params.quotient_chunks,
    );
    let (fixed_values, witness_values, aux_values, quotient_values) = schedule_values(evals);
    let verify = pcs.verify_eval(
        transcript,
        &[
            BatchEvalsRef {
                commitment: &verifier_params.cm_fixed,
                points: &schedule.fixed,
                values: &fixed_values,
            },
            BatchEvalsRef {
                commitment: &proof.cm_witness,
                points: &schedule.witness,
                values: &witness_values,
            },
            BatchEvalsRef {
                commitment: &proof.cm_aux,
                points: &schedule.aux,
                values: &aux_values,
            },
            BatchEvalsRef {
                commitment: &proof.cm_quotient,
                points: &schedule.quotient,
                values: &quotient_values,
            },
        ],
        &proof.eval_proof,
    );
    Ok(verify.is_ok())
}

/// Structural agreement between the disclosed evaluation set and the
/// circuit-derived shape; a mismatch means an invalid proof, not an error.
fn eval_shape_matches<C, F: PrimeField>(
    cs: &ConstraintSystem<F>,
    rotations: &ColumnRotations,
    verifier_params: &crate::plonk::indexer::CommonData<C, F>,
    evals: &PlonkEvaluations<F>,
) -> bool {
    let set_lens = |sets: &[Vec<i32>], got: &[Vec<F>]| -> bool {
        sets.len() == got.len()
            && sets
                .iter()
                .zip(got.iter())
                .all(|(set, values)| set.len() == values.len())
    };
    let total_options: usize = cs.lookup_tables().iter().map(|t| t.options.len()).sum();
    let total_constraints: usize = cs.lookup_gates().iter().map(|g| g.constraints.len()).sum();
    let (expected_m, expected_h, expected_g, expected_z) = if cs.has_lookups() {
        (total_options, total_constraints, total_options, 2)
    } else {
        (0, 0, 0, 0)
    };
    set_lens(&rotations.witness, &evals.witness)
        && set_lens(&rotations.selector, &evals.selectors)
        && set_lens(&rotations.constant, &evals.constants)
        && evals.sigmas.len() == verifier_params.permuted_columns
        && evals.multiplicities.len() == expected_m
        && evals.lookup_h.len() == expected_h
        && evals.lookup_g.len() == expected_g
        && evals.z_lookup.len() == expected_z
        && evals.quotient.len() == verifier_params.quotient_chunks
}

#[cfg(test)]
mod test {
    use super::verifier;
    use crate::plonk::constraint_system::{
        AssignmentTable, ConstraintSystem, CopyConstraint, Expression, Gate, LookupConstraint,
        LookupGate, LookupTable, PrivateAssignment, PublicAssignment, TableDescription, Variable,
    };
    use crate::plonk::indexer::{indexer, CommitmentParams};
    use crate::plonk::prover::prover;
    use crate::poly_commit::kzg::KzgScheme;
    use crate::poly_commit::lpc::{LpcParams, LpcScheme};
    use crate::poly_commit::pcs::PolyComScheme;
    use ark_bls12_381::Fr;
    use ark_std::rand::SeedableRng;
    use merlin::Transcript;
    use rand_chacha::ChaChaRng;

    /// Scenario A/B circuit: three witness columns over 13 usable rows with
    /// an ADD gate (`w0 + w1 = w2`) and a MUL gate (`w0 * w1 = w2`), each
    /// behind its own selector, plus one copy constraint.
    fn add_mul_circuit() -> (ConstraintSystem<Fr>, AssignmentTable<Fr>) {
        let usable = 13;
        let table = TableDescription::new(3, 1, 0, 2, usable);

        let w = |i: usize| Expression::from_variable(Variable::witness(i));
        let add_gate = Gate {
            selector: 0,
            constraints: vec![w(0).add(&w(1)).sub(&w(2))],
        };
        let mul_gate = Gate {
            selector: 1,
            constraints: vec![w(0).mul(&w(1)).sub(&w(2))],
        };

        let mut w0 = Vec::new();
        let mut w1 = Vec::new();
        let mut w2 = Vec::new();
        let mut sel_add = Vec::new();
        let mut sel_mul = Vec::new();
        for row in 0..usable {
            let a = Fr::from(row as u64 + 1);
            let b = Fr::from(2u64 * row as u64 + 1);
            w0.push(a);
            w1.push(b);
            if row % 2 == 0 {
                w2.push(a + b);
                sel_add.push(Fr::from(1u64));
                sel_mul.push(Fr::from(0u64));
            } else {
                w2.push(a * b);
                sel_add.push(Fr::from(0u64));
                sel_mul.push(Fr::from(1u64));
            }
        }

        // rows 0 and 2 both hold w0 = 1 + public input row 0
        let public_column: Vec<Fr> = (0..usable).map(|row| Fr::from(row as u64 + 1)).collect();
        let copy = CopyConstraint {
            left: Variable::new(crate::plonk::constraint_system::ColumnKind::Witness, 0, 3),
            right: Variable::new(
                crate::plonk::constraint_system::ColumnKind::PublicInput,
                0,
                3,
            ),
        };

        let cs = ConstraintSystem::new(
            table,
            vec![add_gate, mul_gate],
            vec![copy],
            vec![],
            vec![],
        )
        .unwrap();
        let assignment = AssignmentTable {
            public: PublicAssignment {
                public_inputs: vec![public_column],
                constants: vec![],
                selectors: vec![sel_add, sel_mul],
            },
            private: PrivateAssignment {
                witness: vec![w0, w1, w2],
            },
        };
        (cs, assignment)
    }

    /// Scenario C circuit: witness column 0 looked up in a table populated
    /// from three single-column options over the selected rows; the table's
    /// value set is {0, 1, 3}.
    fn lookup_circuit(bad_row: Option<usize>) -> (ConstraintSystem<Fr>, AssignmentTable<Fr>) {
        let usable = 4;
        let table = TableDescription::new(1, 0, 3, 2, usable);

        let lookup_gate = LookupGate {
            selector: 0,
            constraints: vec![LookupConstraint {
                table_id: 1,
                exprs: vec![Expression::from_variable(Variable::witness(0))],
            }],
        };
        let lookup_table = LookupTable {
            id: 1,
            selector: 1,
            options: vec![vec![0], vec![1], vec![2]],
        };

        let mut witness: Vec<Fr> = [1u64, 3, 0, 0].iter().map(|v| Fr::from(*v)).collect();
        if let Some(row) = bad_row {
            witness[row] = Fr::from(7u64);
        }
        let constants = vec![
            vec![Fr::from(0u64), Fr::from(1u64), Fr::from(0u64), Fr::from(0u64)],
            vec![Fr::from(0u64), Fr::from(0u64), Fr::from(1u64), Fr::from(0u64)],
            vec![Fr::from(0u64), Fr::from(1u64), Fr::from(3u64), Fr::from(0u64)],
        ];
        let selectors = vec![
            vec![Fr::from(1u64); 4],
            vec![
                Fr::from(0u64),
                Fr::from(1u64),
                Fr::from(1u64),
                Fr::from(1u64),
            ],
        ];

        let cs = ConstraintSystem::new(
            table,
            vec![],
            vec![],
            vec![lookup_gate],
            vec![lookup_table],
        )
        .unwrap();
        let assignment = AssignmentTable {
            public: PublicAssignment {
                public_inputs: vec![],
                constants,
                selectors,
            },
            private: PrivateAssignment {
                witness: vec![witness],
            },
        };
        (cs, assignment)
    }

    fn lpc_for(cs: &ConstraintSystem<Fr>) -> (LpcScheme<Fr>, CommitmentParams) {
        let n = cs.table_description().rows_amount;
        let params = LpcParams {
            max_degree: n + 2,
            expand_factor: 3,
            step_list: vec![2, 1],
            lambda: 20,
            proof_of_work_bits: 4,
        };
        let record = CommitmentParams::from_lpc(&params);
        (LpcScheme::new(params).unwrap(), record)
    }

    fn prove_and_verify<PCS: PolyComScheme<Field = Fr>>(
        pcs: &PCS,
        pcs_params: CommitmentParams,
        cs: &ConstraintSystem<Fr>,
        assignment: &AssignmentTable<Fr>,
        seed: [u8; 32],
    ) -> bool {
        let params = indexer(cs, &assignment.public, pcs, pcs_params).unwrap();
        let mut prng = ChaChaRng::from_seed(seed);
        let proof = {
            let mut transcript = Transcript::new(b"placeholder test");
            prover(&mut prng, &mut transcript, pcs, cs, &params, assignment).unwrap()
        };
        let mut transcript = Transcript::new(b"placeholder test");
        verifier(
            &mut transcript,
            pcs,
            cs,
            params.get_verifier_params_ref(),
            &assignment.public.public_inputs,
            &proof,
        )
        .unwrap()
    }

    #[test]
    fn scenario_a_add_mul_accepts() {
        let (cs, assignment) = add_mul_circuit();
        assert!(cs.satisfies(&assignment).unwrap());
        let (pcs, record) = lpc_for(&cs);
        assert!(prove_and_verify(&pcs, record, &cs, &assignment, [0u8; 32]));
    }

    #[test]
    fn scenario_b_mutated_cell_rejects() {
        let (cs, mut assignment) = add_mul_circuit();
        assignment.private.witness[2][5] += Fr::from(1u64);
        assert!(!cs.satisfies(&assignment).unwrap());
        let (pcs, record) = lpc_for(&cs);
        assert!(!prove_and_verify(&pcs, record, &cs, &assignment, [0u8; 32]));
    }

    #[test]
    fn scenario_a_kzg_backend() {
        let (cs, assignment) = add_mul_circuit();
        let n = cs.table_description().rows_amount;
        let mut prng = ChaChaRng::from_seed([42u8; 32]);
        let pcs = KzgScheme::new(n + 2, &mut prng);
        let record = CommitmentParams::for_kzg(n + 2);
        assert!(prove_and_verify(&pcs, record, &cs, &assignment, [0u8; 32]));
    }

    #[test]
    fn scenario_b_kzg_backend_rejects() {
        let (cs, mut assignment) = add_mul_circuit();
        assignment.private.witness[2][5] += Fr::from(1u64);
        let n = cs.table_description().rows_amount;
        let mut prng = ChaChaRng::from_seed([42u8; 32]);
        let pcs = KzgScheme::new(n + 2, &mut prng);
        let record = CommitmentParams::for_kzg(n + 2);
        assert!(!prove_and_verify(&pcs, record, &cs, &assignment, [0u8; 32]));
    }

    #[test]
    fn scenario_c_lookup_accepts_and_rejects() {
        let (cs, assignment) = lookup_circuit(None);
        assert!(cs.satisfies(&assignment).unwrap());
        let (pcs, record) = lpc_for(&cs);
        assert!(prove_and_verify(&pcs, record.clone(), &cs, &assignment, [0u8; 32]));

        let (cs, bad_assignment) = lookup_circuit(Some(1));
        assert!(!cs.satisfies(&bad_assignment).unwrap());
        assert!(!prove_and_verify(&pcs, record, &cs, &bad_assignment, [0u8; 32]));
    }

    #[test]
    fn blinding_changes_commitments_but_not_the_verdict() {
        let (cs, assignment) = add_mul_circuit();
        let (pcs, record) = lpc_for(&cs);
        let params = indexer(&cs, &assignment.public, &pcs, record).unwrap();

        let prove = |seed: [u8; 32]| {
            let mut prng = ChaChaRng::from_seed(seed);
            let mut transcript = Transcript::new(b"placeholder test");
            prover(&mut prng, &mut transcript, &pcs, &cs, &params, &assignment).unwrap()
        };
        let proof_a = prove([1u8; 32]);
        let proof_b = prove([2u8; 32]);
        // different blinding randomness, different commitments
        assert_ne!(proof_a.cm_witness, proof_b.cm_witness);
        for proof in [&proof_a, &proof_b] {
            let mut transcript = Transcript::new(b"placeholder test");
            assert!(verifier(
                &mut transcript,
                &pcs,
                &cs,
                params.get_verifier_params_ref(),
                &assignment.public.public_inputs,
                proof,
            )
            .unwrap());
        }
    }

    #[test]
    fn identically_seeded_runs_are_deterministic() {
        let (cs, assignment) = add_mul_circuit();
        let (pcs, record) = lpc_for(&cs);
        let params = indexer(&cs, &assignment.public, &pcs, record).unwrap();
        let prove = || {
            let mut prng = ChaChaRng::from_seed([9u8; 32]);
            let mut transcript = Transcript::new(b"placeholder test");
            prover(&mut prng, &mut transcript, &pcs, &cs, &params, &assignment).unwrap()
        };
        assert_eq!(prove(), prove());
    }

    #[test]
    fn wrong_public_inputs_reject() {
        let (cs, assignment) = add_mul_circuit();
        let (pcs, record) = lpc_for(&cs);
        let params = indexer(&cs, &assignment.public, &pcs, record).unwrap();
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let proof = {
            let mut transcript = Transcript::new(b"placeholder test");
            prover(&mut prng, &mut transcript, &pcs, &cs, &params, &assignment).unwrap()
        };
        let mut wrong = assignment.public.public_inputs.clone();
        wrong[0][0] += Fr::from(1u64);
        let mut transcript = Transcript::new(b"placeholder test");
        assert!(!verifier(
            &mut transcript,
            &pcs,
            &cs,
            params.get_verifier_params_ref(),
            &wrong,
            &proof,
        )
        .unwrap());
    }
}
