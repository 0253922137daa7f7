use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::{
    ColumnKind, ConstraintSystem, PrivateAssignment, PublicAssignment, TableDescription,
};
use crate::poly_commit::field_polynomial::FpPolynomial;
use crate::poly_commit::lpc::LpcParams;
use crate::poly_commit::pcs::PolyComScheme;
use ark_ff::{batch_inversion, One, PrimeField, Zero};
use ark_poly::EvaluationDomain;
use ark_std::rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaChaRng;

/// Backend-agnostic record of the commitment-scheme knobs, carried inside
/// [`CommonData`] so the verification key pins down the full configuration
/// surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentParams {
    /// Query repetitions of the low-degree test; zero for KZG.
    pub lambda: u32,
    /// log2 of the Reed-Solomon blowup; zero for KZG.
    pub expand_factor: u32,
    /// Per-round folding schedule; empty for KZG.
    pub step_list: Vec<u32>,
    /// Maximal committed degree.
    pub max_degree: u64,
    /// Grinding difficulty in bits; zero for KZG.
    pub proof_of_work_bits: u32,
}

impl CommitmentParams {
    /// Record the knobs of a list-commitment instance.
    pub fn from_lpc(params: &LpcParams) -> Self {
        Self {
            lambda: params.lambda as u32,
            expand_factor: params.expand_factor as u32,
            step_list: params.step_list.iter().map(|s| *s as u32).collect(),
            max_degree: params.max_degree as u64,
            proof_of_work_bits: params.proof_of_work_bits,
        }
    }

    /// Record the knobs of a KZG instance, where only the degree bound
    /// applies.
    pub fn for_kzg(max_degree: usize) -> Self {
        Self {
            lambda: 0,
            expand_factor: 0,
            step_list: Vec::new(),
            max_degree: max_degree as u64,
            proof_of_work_bits: 0,
        }
    }
}

/// Everything the verifier needs that is independent of a specific proof:
/// the table shape, the commitment of the fixed batch (selector, constant
/// and permutation-sigma polynomials), the domain generator, the coset
/// representatives of the permutation argument, and the commitment-scheme
/// parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommonData<C, F> {
    /// The table shape.
    pub table: TableDescription,
    /// Commitment binding selectors, constants and sigmas, in that order.
    pub cm_fixed: C,
    /// Coset representatives; `k[0] = 1`, the rest are non-residues.
    pub k: Vec<F>,
    /// Generator of the evaluation domain.
    pub root: F,
    /// Domain size (`rows_amount`).
    pub cs_size: usize,
    /// Ratio between the quotient-evaluation coset and the domain.
    pub quot_factor: usize,
    /// Number of chunks the quotient polynomial is split into.
    pub quotient_chunks: usize,
    /// Columns participating in the copy-constraint permutation.
    pub permuted_columns: usize,
    /// The commitment-scheme configuration record.
    pub pcs_params: CommitmentParams,
}

/// Define the verifier parameters by given `PolyComScheme`.
pub type PlonkVK<PCS> =
    CommonData<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

/// Prover parameters: the verifier's [`CommonData`] plus the fixed
/// polynomials and every precomputed evaluation table the quotient
/// computation consumes.
#[derive(Clone, Debug)]
pub struct PlonkProverParams<C, F: PrimeField> {
    /// The verifier parameters.
    pub verifier_params: CommonData<C, F>,
    /// Selector column polynomials.
    pub q_polys: Vec<FpPolynomial<F>>,
    /// Constant column polynomials.
    pub c_polys: Vec<FpPolynomial<F>>,
    /// Sigma polynomials of the permutation argument.
    pub s_polys: Vec<FpPolynomial<F>>,
    /// Encoded sigma values over the domain, per permuted column.
    pub sigma_values: Vec<Vec<F>>,
    /// The domain elements.
    pub group: Vec<F>,
    /// The quotient-coset points `k[1] * root_m^p`.
    pub coset_points: Vec<F>,
    /// Selector coset evaluations.
    pub q_coset_evals: Vec<Vec<F>>,
    /// Constant coset evaluations.
    pub c_coset_evals: Vec<Vec<F>>,
    /// Sigma coset evaluations.
    pub s_coset_evals: Vec<Vec<F>>,
    /// First Lagrange basis polynomial, `(X^n - 1)/(X - 1)`.
    pub l1_coefs: FpPolynomial<F>,
    /// Its coset evaluations.
    pub l1_coset_evals: Vec<F>,
    /// Inverted coset evaluations of the vanishing polynomial.
    pub z_h_inv_coset_evals: Vec<F>,
}

/// Prover parameters over a particular polynomial commitment scheme.
pub type PlonkPK<PCS> =
    PlonkProverParams<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

impl<C, F: PrimeField> PlonkProverParams<C, F> {
    /// Return the verifier parameters.
    pub fn get_verifier_params(self) -> CommonData<C, F> {
        self.verifier_params
    }

    /// Return a reference of verifier parameters.
    pub fn get_verifier_params_ref(&self) -> &CommonData<C, F> {
        &self.verifier_params
    }
}

/// The structured evaluation set disclosed by a proof. Per-column vectors
/// follow the circuit's canonical order; multi-point vectors follow the
/// column's sorted rotation set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlonkEvaluations<F> {
    /// Witness column openings, `[column][rotation]`.
    pub witness: Vec<Vec<F>>,
    /// Lookup multiplicity openings at ζ.
    pub multiplicities: Vec<F>,
    /// Selector column openings, `[column][rotation]`.
    pub selectors: Vec<Vec<F>>,
    /// Constant column openings, `[column][rotation]`.
    pub constants: Vec<Vec<F>>,
    /// Sigma openings at ζ.
    pub sigmas: Vec<F>,
    /// Permutation accumulator at ζ.
    pub z_perm: F,
    /// Permutation accumulator at ζω.
    pub z_perm_omega: F,
    /// Lookup accumulator at ζ and ζω; empty when the circuit has no
    /// lookups.
    pub z_lookup: Vec<F>,
    /// Lookup helper column openings at ζ, one per lookup constraint.
    pub lookup_h: Vec<F>,
    /// Table helper column openings at ζ, one per table option.
    pub lookup_g: Vec<F>,
    /// Quotient chunk openings at ζ.
    pub quotient: Vec<F>,
}

/// The data structure of a Placeholder proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlonkProof<C, F, E> {
    /// Commitment of the witness batch (witness columns, then lookup
    /// multiplicities).
    pub cm_witness: C,
    /// Commitment of the auxiliary batch (permutation and lookup
    /// accumulators and helper columns).
    pub cm_aux: C,
    /// Commitment of the split quotient polynomial.
    pub cm_quotient: C,
    /// The disclosed evaluations.
    pub evals: PlonkEvaluations<F>,
    /// The batched opening proof of the commitment scheme.
    pub eval_proof: E,
}

/// The type of the proof with a specific polynomial commitment scheme.
pub type PlonkPf<PCS> = PlonkProof<
    <PCS as PolyComScheme>::Commitment,
    <PCS as PolyComScheme>::Field,
    <PCS as PolyComScheme>::EvalProof,
>;

/// Check the public column shapes against the table description.
pub(crate) fn check_public_shape<F: PrimeField>(
    table: &TableDescription,
    public: &PublicAssignment<F>,
) -> Result<()> {
    let check = |cols: &[Vec<F>], expected: usize, what: &'static str| -> Result<()> {
        if cols.len() != expected {
            return Err(PlonkError::ShapeMismatch(what));
        }
        for col in cols.iter() {
            if col.len() != table.usable_rows_amount {
                return Err(PlonkError::ShapeMismatch(what));
            }
        }
        Ok(())
    };
    check(
        &public.public_inputs,
        table.public_input_columns,
        "public input columns",
    )?;
    check(&public.constants, table.constant_columns, "constant columns")?;
    check(&public.selectors, table.selector_columns, "selector columns")?;
    Ok(())
}

/// Zero-pad the columns to the full domain height.
pub(crate) fn pad_columns<F: PrimeField>(columns: &[Vec<F>], rows: usize) -> Vec<Vec<F>> {
    columns
        .iter()
        .map(|col| {
            let mut padded = col.clone();
            padded.resize(rows, F::zero());
            padded
        })
        .collect()
}

/// Find `count - 1` different quadratic non-residues in F_q - {0}; the
/// first representative is one. A fixed seed keeps the choice deterministic
/// across prover and verifier setups.
pub fn choose_ks<R: CryptoRng + RngCore, F: PrimeField>(prng: &mut R, count: usize) -> Vec<F> {
    let mut k = vec![F::one()];
    let exp = <F as PrimeField>::MODULUS_MINUS_ONE_DIV_TWO;

    for _ in 1..count {
        loop {
            let ki = F::rand(prng);
            if ki.is_zero() {
                continue;
            }
            if k.iter().all(|x| x != &ki) && ki.pow(exp) != F::one() {
                k.push(ki);
                break;
            }
        }
    }
    k
}

/// Encode a flat cell index into the permutation-argument alphabet
/// `k_j * omega^i`.
fn encode_cell<F: PrimeField>(group: &[F], k: &[F], flat: usize) -> F {
    let n = group.len();
    k[flat / n] * group[flat % n]
}

/// Build the permutation implied by the copy constraints, in cycle form
/// over the flat cell indices `column * n + row`. Cells outside every copy
/// cycle stay fixed.
pub(crate) fn compute_permutation<F: PrimeField>(
    cs: &ConstraintSystem<F>,
) -> Vec<usize> {
    let table = cs.table_description();
    let n = table.rows_amount;
    let cells = table.permuted_columns() * n;
    let mut perm: Vec<usize> = (0..cells).collect();

    // union-find guards the cycle splice: swapping two cells of the same
    // cycle would split it instead of merging
    let mut parent: Vec<usize> = (0..cells).collect();
    fn find(parent: &mut Vec<usize>, mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    let flat = |var: &crate::plonk::constraint_system::Variable| -> usize {
        let column = match var.kind {
            ColumnKind::Witness => var.index,
            ColumnKind::PublicInput => table.witness_columns + var.index,
            _ => unreachable!("copy constraints are bounds-checked at construction"),
        };
        column * n + var.rotation as usize
    };

    for copy in cs.copy_constraints().iter() {
        let a = flat(&copy.left);
        let b = flat(&copy.right);
        let ra = find(&mut parent, a);
        let rb = find(&mut parent, b);
        if ra != rb {
            parent[ra] = rb;
            perm.swap(a, b);
        }
    }
    perm
}

/// Run the public preprocessor.
///
/// Derives the evaluation domain, interpolates and commits the fixed
/// columns and the permutation structure, and precomputes the coset
/// evaluation tables the quotient computation needs. A pure function of the
/// circuit shape and public column values; the result can be cached and
/// reused across proofs of the same shape.
pub fn indexer<PCS: PolyComScheme>(
    cs: &ConstraintSystem<PCS::Field>,
    public: &PublicAssignment<PCS::Field>,
    pcs: &PCS,
    pcs_params: CommitmentParams,
) -> Result<PlonkPK<PCS>> {
    let table = *cs.table_description();
    check_public_shape(&table, public)?;

    let n = table.rows_amount;
    let domain = FpPolynomial::<PCS::Field>::evaluation_domain(n)
        .ok_or(PlonkError::GroupNotFound(n))?;
    let group: Vec<PCS::Field> = domain.elements().collect();

    // quotient-evaluation coset: sized to the largest constraint degree
    let max_units = [
        cs.max_expression_degree() + 1,
        table.permuted_columns() + 1,
        3,
    ]
    .into_iter()
    .max()
    .expect("nonempty");
    let quot_factor = (max_units + 1).next_power_of_two();
    let m = n * quot_factor;
    let domain_m =
        FpPolynomial::<PCS::Field>::evaluation_domain(m).ok_or(PlonkError::GroupNotFound(m))?;

    // It's okay to choose a fixed seed to generate quadratic non-residues.
    let mut prng = ChaChaRng::from_seed([0u8; 32]);
    let n_perm = table.permuted_columns();
    let k = choose_ks::<_, PCS::Field>(&mut prng, core::cmp::max(n_perm, 2));
    let coset_points: Vec<PCS::Field> = domain_m.elements().map(|x| k[1] * x).collect();

    // Step 1: permutation polynomials.
    let perm = compute_permutation(cs);
    let mut sigma_values = Vec::with_capacity(n_perm);
    let mut s_polys = Vec::with_capacity(n_perm);
    let mut s_coset_evals = Vec::with_capacity(n_perm);
    for j in 0..n_perm {
        let encoded: Vec<PCS::Field> = (0..n)
            .map(|i| encode_cell(&group, &k, perm[j * n + i]))
            .collect();
        let s_coefs = FpPolynomial::ifft_with_domain(&domain, &encoded);
        s_coset_evals.push(s_coefs.coset_fft_with_domain(&domain_m, &k[1]));
        s_polys.push(s_coefs);
        sigma_values.push(encoded);
    }

    // Step 2: selector and constant polynomials.
    let selector_values = pad_columns(&public.selectors, n);
    let constant_values = pad_columns(&public.constants, n);
    let q_polys: Vec<FpPolynomial<PCS::Field>> = selector_values
        .iter()
        .map(|vals| FpPolynomial::ifft_with_domain(&domain, vals))
        .collect();
    let c_polys: Vec<FpPolynomial<PCS::Field>> = constant_values
        .iter()
        .map(|vals| FpPolynomial::ifft_with_domain(&domain, vals))
        .collect();
    let q_coset_evals: Vec<Vec<PCS::Field>> = q_polys
        .iter()
        .map(|p| p.coset_fft_with_domain(&domain_m, &k[1]))
        .collect();
    let c_coset_evals: Vec<Vec<PCS::Field>> = c_polys
        .iter()
        .map(|p| p.coset_fft_with_domain(&domain_m, &k[1]))
        .collect();

    // Step 3: the helper polynomials L_1 and Z_H.
    // X^n - 1 = (X - 1)(X^{n-1} + X^{n-2} + ... + 1)
    let mut l1_evals = vec![PCS::Field::zero(); n];
    l1_evals[0] = PCS::Field::from(n as u64);
    let l1_coefs = FpPolynomial::ifft_with_domain(&domain, &l1_evals);
    let l1_coset_evals = l1_coefs.coset_fft_with_domain(&domain_m, &k[1]);

    let z_h_coefs = {
        let mut v = vec![PCS::Field::zero(); n + 1];
        v[0] = -PCS::Field::one();
        v[n] = PCS::Field::one();
        FpPolynomial::from_coefs(v)
    };
    let mut z_h_inv_coset_evals = z_h_coefs.coset_fft_with_domain(&domain_m, &k[1]);
    if z_h_inv_coset_evals.iter().any(|v| v.is_zero()) {
        return Err(PlonkError::SetupError);
    }
    batch_inversion(&mut z_h_inv_coset_evals);

    // Step 4: commit the fixed batch: selectors, constants, sigmas.
    let mut fixed_batch = Vec::with_capacity(q_polys.len() + c_polys.len() + s_polys.len());
    fixed_batch.extend(q_polys.iter().cloned());
    fixed_batch.extend(c_polys.iter().cloned());
    fixed_batch.extend(s_polys.iter().cloned());
    let cm_fixed = pcs
        .commit(&fixed_batch)
        .map_err(|_| PlonkError::SetupError)?;

    let verifier_params = CommonData {
        table,
        cm_fixed,
        k,
        root: domain.group_gen,
        cs_size: n,
        quot_factor,
        quotient_chunks: quot_factor,
        permuted_columns: n_perm,
        pcs_params,
    };

    Ok(PlonkProverParams {
        verifier_params,
        q_polys,
        c_polys,
        s_polys,
        sigma_values,
        group,
        coset_points,
        q_coset_evals,
        c_coset_evals,
        s_coset_evals,
        l1_coefs,
        l1_coset_evals,
        z_h_inv_coset_evals,
    })
}

/// Run the private preprocessor: pad every witness column beyond the usable
/// rows with independently drawn random field elements (the zero-knowledge
/// blinding) and leave the usable region untouched.
pub fn preprocess_witness<R: CryptoRng + RngCore, F: PrimeField>(
    prng: &mut R,
    table: &TableDescription,
    private: &PrivateAssignment<F>,
) -> Result<Vec<Vec<F>>> {
    if private.witness.len() != table.witness_columns {
        return Err(PlonkError::ShapeMismatch("witness columns"));
    }
    let mut padded = Vec::with_capacity(private.witness.len());
    for column in private.witness.iter() {
        if column.len() != table.usable_rows_amount {
            return Err(PlonkError::ShapeMismatch("witness rows"));
        }
        let mut col = column.clone();
        col.extend((col.len()..table.rows_amount).map(|_| F::rand(prng)));
        padded.push(col);
    }
    Ok(padded)
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::Field;

    #[test]
    fn test_choose_ks() {
        let mut prng = ChaChaRng::from_seed([7u8; 32]);
        let m = 8;
        let k = choose_ks::<_, Fr>(&mut prng, m);
        let exp = <Fr as PrimeField>::MODULUS_MINUS_ONE_DIV_TWO;
        assert_eq!(k[0], Fr::one());
        assert!(k.iter().skip(1).all(|x| !x.is_zero()));
        assert!(k.iter().skip(1).all(|x| x.pow(exp) != Fr::one()));
        for i in 1..m {
            for j in 0..i {
                assert_ne!(k[i], k[j]);
            }
        }
    }

    #[test]
    fn padding_never_touches_usable_rows() {
        let table = TableDescription::new(2, 0, 0, 0, 5);
        let private = PrivateAssignment {
            witness: vec![vec![Fr::from(1u64); 5], vec![Fr::from(2u64); 5]],
        };
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let padded = preprocess_witness(&mut prng, &table, &private).unwrap();
        assert_eq!(padded.len(), 2);
        for (col, original) in padded.iter().zip(private.witness.iter()) {
            assert_eq!(col.len(), table.rows_amount);
            assert_eq!(&col[..5], &original[..]);
        }
        // two preprocessings with different seeds blind differently
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let other = preprocess_witness(&mut prng, &table, &private).unwrap();
        assert_ne!(padded, other);
    }

    #[test]
    fn commitment_params_serde_round_trip() {
        let params = CommitmentParams {
            lambda: 40,
            expand_factor: 2,
            step_list: vec![2, 1, 1],
            max_degree: 1 << 12,
            proof_of_work_bits: 16,
        };
        let json = serde_json::to_string(&params).unwrap();
        let decoded: CommitmentParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, decoded);
    }

    #[test]
    fn permutation_merges_copy_cycles() {
        use crate::plonk::constraint_system::{CopyConstraint, Variable};
        let table = TableDescription::new(2, 0, 0, 0, 4);
        let n = table.rows_amount;
        let copy = CopyConstraint {
            left: Variable::new(ColumnKind::Witness, 0, 1),
            right: Variable::new(ColumnKind::Witness, 1, 2),
        };
        let cs = ConstraintSystem::<Fr>::new(table, vec![], vec![copy], vec![], vec![])
            .unwrap();
        let perm = compute_permutation(&cs);
        // the two cells swap; every other cell stays fixed
        assert_eq!(perm[1], n + 2);
        assert_eq!(perm[n + 2], 1);
        for (i, p) in perm.iter().enumerate() {
            if i != 1 && i != n + 2 {
                assert_eq!(*p, i);
            }
        }
    }
}
