use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::{
    ColumnKind, ColumnRotations, ConstraintSystem, Variable,
};
use crate::plonk::indexer::PlonkEvaluations;
use crate::poly_commit::field_polynomial::FpPolynomial;
use crate::poly_commit::transcript::PolyComTranscript;
use ark_ff::{batch_inversion, PrimeField};
use ark_std::rand::{CryptoRng, RngCore};
use merlin::Transcript;

/// The data structure for challenges in the protocol, filled strictly in
/// transcript order: θ, (β, γ), δ, α, ζ.
#[derive(Default)]
pub(crate) struct PlonkChallenges<F> {
    challenges: Vec<F>,
}

impl<F: PrimeField> PlonkChallenges<F> {
    pub(crate) fn new() -> PlonkChallenges<F> {
        PlonkChallenges {
            challenges: Vec::with_capacity(6),
        }
    }

    pub(crate) fn insert_theta(&mut self, theta: F) -> Result<()> {
        if self.challenges.is_empty() {
            self.challenges.push(theta);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    pub(crate) fn insert_beta_gamma(&mut self, beta: F, gamma: F) -> Result<()> {
        if self.challenges.len() == 1 {
            self.challenges.push(beta);
            self.challenges.push(gamma);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    pub(crate) fn insert_delta(&mut self, delta: F) -> Result<()> {
        if self.challenges.len() == 3 {
            self.challenges.push(delta);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    pub(crate) fn insert_alpha(&mut self, alpha: F) -> Result<()> {
        if self.challenges.len() == 4 {
            self.challenges.push(alpha);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    pub(crate) fn insert_zeta(&mut self, zeta: F) -> Result<()> {
        if self.challenges.len() == 5 {
            self.challenges.push(zeta);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    pub(crate) fn get_theta(&self) -> Result<&F> {
        self.challenges.first().ok_or(PlonkError::ChallengeError)
    }

    pub(crate) fn get_beta_gamma(&self) -> Result<(&F, &F)> {
        if self.challenges.len() > 2 {
            Ok((&self.challenges[1], &self.challenges[2]))
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    pub(crate) fn get_delta(&self) -> Result<&F> {
        self.challenges.get(3).ok_or(PlonkError::ChallengeError)
    }

    pub(crate) fn get_alpha(&self) -> Result<&F> {
        self.challenges.get(4).ok_or(PlonkError::ChallengeError)
    }

    pub(crate) fn get_zeta(&self) -> Result<&F> {
        self.challenges.get(5).ok_or(PlonkError::ChallengeError)
    }
}

/// `zeta * root^rotation`, with the rotation reduced into the domain.
pub(crate) fn rotate_point<F: PrimeField>(zeta: &F, root: &F, rotation: i32, n: usize) -> F {
    let exponent = (rotation as i64).rem_euclid(n as i64) as u64;
    *zeta * root.pow([exponent])
}

/// All column values padded to the domain height, with cyclic rotation
/// lookups. The prover uses one instance over the domain values and one
/// over the quotient-coset evaluations.
pub(crate) struct ColumnValues<'a, F> {
    pub witness: &'a [Vec<F>],
    pub public_input: &'a [Vec<F>],
    pub constant: &'a [Vec<F>],
    pub selector: &'a [Vec<F>],
    /// Row stride of one domain rotation: 1 over the domain itself,
    /// `quot_factor` over the quotient coset.
    pub stride: usize,
    pub height: usize,
}

impl<'a, F: PrimeField> ColumnValues<'a, F> {
    pub(crate) fn cell(&self, var: &Variable, row: usize) -> Result<F> {
        let columns = match var.kind {
            ColumnKind::Witness => self.witness,
            ColumnKind::PublicInput => self.public_input,
            ColumnKind::Constant => self.constant,
            ColumnKind::Selector => self.selector,
        };
        let column = columns.get(var.index).ok_or(PlonkError::IndexOutOfBounds)?;
        let offset = (var.rotation as i64 * self.stride as i64)
            .rem_euclid(self.height as i64) as usize;
        Ok(column[(row + offset) % self.height])
    }
}

/// Build the permutation accumulator values over the domain:
/// `z(1) = 1` and
/// `z(ω^{i+1}) = z(ω^i) · ∏_j (v_j(ω^i) + β k_j ω^i + γ) / (v_j(ω^i) + β σ_j(ω^i) + γ)`.
pub(crate) fn z_poly_evals<F: PrimeField>(
    permuted_values: &[Vec<F>],
    sigma_values: &[Vec<F>],
    group: &[F],
    k: &[F],
    beta: &F,
    gamma: &F,
) -> Result<Vec<F>> {
    let n = group.len();
    let mut numer = vec![F::one(); n];
    let mut denom = vec![F::one(); n];
    for (j, values) in permuted_values.iter().enumerate() {
        for i in 0..n {
            numer[i] *= values[i] + *beta * k[j] * group[i] + gamma;
            denom[i] *= values[i] + *beta * sigma_values[j][i] + gamma;
        }
    }
    if denom.iter().any(|d| d.is_zero()) {
        return Err(PlonkError::ChallengeError);
    }
    batch_inversion(&mut denom);

    let mut z_evals = Vec::with_capacity(n);
    let mut prev = F::one();
    z_evals.push(prev);
    for i in 0..n - 1 {
        prev *= numer[i] * denom[i];
        z_evals.push(prev);
    }
    Ok(z_evals)
}

/// Count, per table option, how many times each selected table row serves a
/// lookup constraint. Tuples without a match are simply not counted; the
/// resulting imbalance makes the verifier reject, which is the designed
/// outcome for an unsatisfiable assignment.
pub(crate) fn lookup_multiplicities<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    cols: &ColumnValues<'_, F>,
) -> Result<Vec<Vec<F>>> {
    let n = cols.height;
    let total_options: usize = cs.lookup_tables().iter().map(|t| t.options.len()).sum();
    let mut multiplicities = vec![vec![F::zero(); n]; total_options];

    let option_base = |table_id: u32| -> Result<usize> {
        let mut base = 0;
        for table in cs.lookup_tables() {
            if table.id == table_id {
                return Ok(base);
            }
            base += table.options.len();
        }
        Err(PlonkError::LookupTableNotFound(table_id))
    };

    for gate in cs.lookup_gates().iter() {
        for row in 0..n {
            let selector = cols.cell(&Variable::selector(gate.selector), row)?;
            if selector.is_zero() {
                continue;
            }
            for constraint in gate.constraints.iter() {
                let tuple: Vec<F> = constraint
                    .exprs
                    .iter()
                    .map(|e| e.eval(&|var| cols.cell(var, row)))
                    .collect::<Result<_>>()?;
                let table = cs.lookup_table(constraint.table_id)?;
                let base = option_base(constraint.table_id)?;
                'search: for table_row in 0..n {
                    let table_selector =
                        cols.cell(&Variable::selector(table.selector), table_row)?;
                    if table_selector.is_zero() {
                        continue;
                    }
                    for (option_index, option) in table.options.iter().enumerate() {
                        let matches = option.iter().zip(tuple.iter()).all(|(col, expected)| {
                            cols.cell(&Variable::constant(*col), table_row)
                                .map_or(false, |v| v == *expected)
                        });
                        if matches {
                            multiplicities[base + option_index][table_row] += F::one();
                            break 'search;
                        }
                    }
                }
            }
        }
    }
    Ok(multiplicities)
}

/// The committed columns of the log-derivative lookup argument.
pub(crate) struct LookupHelpers<F> {
    /// One helper column per lookup constraint: `h·(a+δ) = s`.
    pub h_values: Vec<Vec<F>>,
    /// One helper column per table option: `g·(t+δ) = s_t·m`.
    pub g_values: Vec<Vec<F>>,
    /// The running sum tying `Σh = Σg`.
    pub z_values: Vec<F>,
}

/// Build the lookup helper columns and the running-sum accumulator.
pub(crate) fn lookup_helper_columns<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    cols: &ColumnValues<'_, F>,
    multiplicities: &[Vec<F>],
    theta: &F,
    delta: &F,
) -> Result<LookupHelpers<F>> {
    let n = cols.height;
    let mut h_values = Vec::new();
    for gate in cs.lookup_gates().iter() {
        for constraint in gate.constraints.iter() {
            let mut denoms = Vec::with_capacity(n);
            for row in 0..n {
                let mut compressed = F::zero();
                let mut theta_pow = F::one();
                for expr in constraint.exprs.iter() {
                    compressed += theta_pow * expr.eval(&|var| cols.cell(var, row))?;
                    theta_pow *= theta;
                }
                denoms.push(compressed + delta);
            }
            if denoms.iter().any(|d| d.is_zero()) {
                return Err(PlonkError::ChallengeError);
            }
            batch_inversion(&mut denoms);
            let mut column = Vec::with_capacity(n);
            for (row, denom_inv) in denoms.iter().enumerate() {
                let selector = cols.cell(&Variable::selector(gate.selector), row)?;
                column.push(selector * denom_inv);
            }
            h_values.push(column);
        }
    }

    let mut g_values = Vec::new();
    let mut option_index = 0;
    for table in cs.lookup_tables().iter() {
        for option in table.options.iter() {
            let mut denoms = Vec::with_capacity(n);
            for row in 0..n {
                let mut compressed = F::zero();
                let mut theta_pow = F::one();
                for col in option.iter() {
                    compressed += theta_pow * cols.cell(&Variable::constant(*col), row)?;
                    theta_pow *= theta;
                }
                denoms.push(compressed + delta);
            }
            if denoms.iter().any(|d| d.is_zero()) {
                return Err(PlonkError::ChallengeError);
            }
            batch_inversion(&mut denoms);
            let mut column = Vec::with_capacity(n);
            for (row, denom_inv) in denoms.iter().enumerate() {
                let selector = cols.cell(&Variable::selector(table.selector), row)?;
                column.push(selector * multiplicities[option_index][row] * denom_inv);
            }
            g_values.push(column);
            option_index += 1;
        }
    }

    let mut z_values = Vec::with_capacity(n);
    let mut acc = F::zero();
    z_values.push(acc);
    for row in 0..n - 1 {
        for h in h_values.iter() {
            acc += h[row];
        }
        for g in g_values.iter() {
            acc -= g[row];
        }
        z_values.push(acc);
    }

    Ok(LookupHelpers {
        h_values,
        g_values,
        z_values,
    })
}

/// Add a random multiple of `X^zeroing_degree - 1` of degree
/// `num_hide_points`, randomizing the polynomial while keeping its values
/// on the order-`zeroing_degree` subgroup.
pub(crate) fn hide_polynomial<R: CryptoRng + RngCore, F: PrimeField>(
    prng: &mut R,
    polynomial: &mut FpPolynomial<F>,
    num_hide_points: usize,
    zeroing_degree: usize,
) {
    for i in 0..num_hide_points + 1 {
        let blind = F::rand(prng);
        polynomial.add_coef_assign(&blind, i);
        polynomial.add_coef_assign(&-blind, zeroing_degree + i);
    }
}

/// Split the quotient into `chunks` polynomials of degree ≤ `chunk_size`,
/// with chaining randomizers that cancel in the recombination
/// `t(X) = Σ X^{chunk_size·i} t_i(X)`.
pub(crate) fn split_t<R: CryptoRng + RngCore, F: PrimeField>(
    prng: &mut R,
    t: &FpPolynomial<F>,
    chunks: usize,
    chunk_size: usize,
) -> Result<Vec<FpPolynomial<F>>> {
    if t.coefs.len() > chunks * chunk_size {
        return Err(PlonkError::ProofError);
    }
    let zero = F::zero();
    let mut result = Vec::with_capacity(chunks);
    let mut prev_blind = zero;
    for i in 0..chunks {
        let start = i * chunk_size;
        let end = core::cmp::min(t.coefs.len(), (i + 1) * chunk_size);
        let mut coefs = if start < t.coefs.len() {
            t.coefs[start..end].to_vec()
        } else {
            vec![]
        };
        coefs.resize(chunk_size + 1, zero);
        coefs[0] -= prev_blind;
        if i + 1 < chunks {
            let blind = F::rand(prng);
            coefs[chunk_size] += blind;
            prev_blind = blind;
        }
        result.push(FpPolynomial::from_coefs(coefs));
    }
    Ok(result)
}

/// Evaluate a public-input column polynomial (zero above the usable rows)
/// at an arbitrary point, barycentrically:
/// `PI(y) = (y^n - 1)/n · Σ_i v_i ω^i / (y - ω^i)`.
pub(crate) fn eval_public_input_poly<F: PrimeField>(
    values: &[F],
    root: &F,
    n: usize,
    point: &F,
) -> Result<F> {
    let z_h = point.pow([n as u64]) - F::one();
    let mut denoms = Vec::with_capacity(values.len());
    let mut omega_pow = F::one();
    let mut omegas = Vec::with_capacity(values.len());
    for _ in 0..values.len() {
        denoms.push(*point - omega_pow);
        omegas.push(omega_pow);
        omega_pow *= root;
    }
    if denoms.iter().any(|d| d.is_zero()) {
        return Err(PlonkError::ChallengeError);
    }
    batch_inversion(&mut denoms);
    let mut sum = F::zero();
    for ((value, omega), denom_inv) in values.iter().zip(omegas.iter()).zip(denoms.iter()) {
        sum += *value * omega * denom_inv;
    }
    let n_inv = F::from(n as u64)
        .inverse()
        .ok_or(PlonkError::DivisionByZero)?;
    Ok(z_h * n_inv * sum)
}

/// `Z_H(ζ)` and the (unnormalized) first Lagrange basis
/// `L_1(ζ) = (ζ^n - 1)/(ζ - 1)`.
pub(crate) fn z_h_and_l1_eval<F: PrimeField>(n: usize, zeta: &F) -> Result<(F, F)> {
    let z_h = zeta.pow([n as u64]) - F::one();
    let denom = (*zeta - F::one())
        .inverse()
        .ok_or(PlonkError::ChallengeError)?;
    Ok((z_h, z_h * denom))
}

/// Everything the constraint combiner needs at one evaluation point besides
/// the cell resolver.
pub(crate) struct IdentityInputs<'a, F: PrimeField> {
    /// The evaluation point itself.
    pub x: F,
    /// `L_1` at the point.
    pub l1: F,
    /// Permutation accumulator at the point and one rotation ahead.
    pub z_perm: F,
    pub z_perm_next: F,
    /// Values of the permuted columns at the point.
    pub permuted: &'a [F],
    /// Sigma polynomial values at the point.
    pub sigmas: &'a [F],
    /// Lookup accumulator at the point and one rotation ahead (zero when
    /// the circuit has no lookups).
    pub z_lookup: F,
    pub z_lookup_next: F,
    /// Lookup helper values at the point.
    pub lookup_h: &'a [F],
    pub lookup_g: &'a [F],
    pub lookup_m: &'a [F],
}

/// Combine every gate, permutation and lookup identity at one point with
/// powers of α, in the protocol's canonical enumeration order. The prover
/// runs this over the whole quotient coset, the verifier once at ζ; the two
/// must agree bit for bit, which is why there is exactly one implementation.
pub(crate) fn combine_constraints<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    k: &[F],
    challenges: &PlonkChallenges<F>,
    inputs: &IdentityInputs<'_, F>,
    cell: &impl Fn(&Variable) -> Result<F>,
) -> Result<F> {
    let theta = challenges.get_theta()?;
    let (beta, gamma) = challenges.get_beta_gamma()?;
    let delta = challenges.get_delta()?;
    let alpha = challenges.get_alpha()?;

    let mut acc = F::zero();
    let mut weight = F::one();
    let push = |acc: &mut F, weight: &mut F, value: F| {
        *acc += *weight * value;
        *weight *= alpha;
    };

    // gate argument
    for gate in cs.gates().iter() {
        let selector = cell(&Variable::selector(gate.selector))?;
        for constraint in gate.constraints.iter() {
            let value = constraint.eval(cell)?;
            push(&mut acc, &mut weight, selector * value);
        }
    }

    // permutation argument
    push(
        &mut acc,
        &mut weight,
        inputs.l1 * (inputs.z_perm - F::one()),
    );
    let mut lhs = inputs.z_perm;
    let mut rhs = inputs.z_perm_next;
    for (j, value) in inputs.permuted.iter().enumerate() {
        lhs *= *value + *beta * k[j] * inputs.x + gamma;
        rhs *= *value + *beta * inputs.sigmas[j] + gamma;
    }
    push(&mut acc, &mut weight, lhs - rhs);

    // lookup argument
    if cs.has_lookups() {
        let mut h_index = 0;
        for gate in cs.lookup_gates().iter() {
            let selector = cell(&Variable::selector(gate.selector))?;
            for constraint in gate.constraints.iter() {
                let mut compressed = F::zero();
                let mut theta_pow = F::one();
                for expr in constraint.exprs.iter() {
                    compressed += theta_pow * expr.eval(cell)?;
                    theta_pow *= theta;
                }
                push(
                    &mut acc,
                    &mut weight,
                    inputs.lookup_h[h_index] * (compressed + delta) - selector,
                );
                h_index += 1;
            }
        }

        let mut g_index = 0;
        for table in cs.lookup_tables().iter() {
            let selector = cell(&Variable::selector(table.selector))?;
            for option in table.options.iter() {
                let mut compressed = F::zero();
                let mut theta_pow = F::one();
                for col in option.iter() {
                    compressed += theta_pow * cell(&Variable::constant(*col))?;
                    theta_pow *= theta;
                }
                push(
                    &mut acc,
                    &mut weight,
                    inputs.lookup_g[g_index] * (compressed + delta)
                        - selector * inputs.lookup_m[g_index],
                );
                g_index += 1;
            }
        }

        let mut flow = F::zero();
        for h in inputs.lookup_h.iter() {
            flow += h;
        }
        for g in inputs.lookup_g.iter() {
            flow -= g;
        }
        push(
            &mut acc,
            &mut weight,
            inputs.z_lookup_next - inputs.z_lookup - flow,
        );
        push(&mut acc, &mut weight, inputs.l1 * inputs.z_lookup);
    }

    Ok(acc)
}

/// Per-batch evaluation point lists, in the canonical commitment order.
pub(crate) struct OpeningSchedule<F> {
    pub fixed: Vec<Vec<F>>,
    pub witness: Vec<Vec<F>>,
    pub aux: Vec<Vec<F>>,
    pub quotient: Vec<Vec<F>>,
}

/// Derive the opening schedule both sides use: every column is opened at
/// `ζ·ω^r` for each of its used rotations, accumulators additionally at
/// `ζω`, quotient chunks at ζ.
#[allow(clippy::too_many_arguments)]
pub(crate) fn opening_schedule<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    rotations: &ColumnRotations,
    zeta: &F,
    root: &F,
    n: usize,
    permuted_columns: usize,
    quotient_chunks: usize,
) -> OpeningSchedule<F> {
    let point = |rotation: i32| rotate_point(zeta, root, rotation, n);
    let rotation_points =
        |sets: &[Vec<i32>]| -> Vec<Vec<F>> {
            sets.iter()
                .map(|set| set.iter().map(|r| point(*r)).collect())
                .collect()
        };

    let mut fixed = rotation_points(&rotations.selector);
    fixed.extend(rotation_points(&rotations.constant));
    fixed.extend((0..permuted_columns).map(|_| vec![*zeta]));

    let total_options: usize = cs.lookup_tables().iter().map(|t| t.options.len()).sum();
    let mut witness = rotation_points(&rotations.witness);
    if cs.has_lookups() {
        witness.extend((0..total_options).map(|_| vec![*zeta]));
    }

    let zeta_omega = point(1);
    let mut aux = vec![vec![*zeta, zeta_omega]];
    if cs.has_lookups() {
        let total_constraints: usize =
            cs.lookup_gates().iter().map(|g| g.constraints.len()).sum();
        aux.push(vec![*zeta, zeta_omega]);
        aux.extend((0..total_constraints).map(|_| vec![*zeta]));
        aux.extend((0..total_options).map(|_| vec![*zeta]));
    }

    let quotient = (0..quotient_chunks).map(|_| vec![*zeta]).collect();

    OpeningSchedule {
        fixed,
        witness,
        aux,
        quotient,
    }
}

/// Claimed values grouped per batch, mirroring [`opening_schedule`].
pub(crate) fn schedule_values<F: PrimeField>(
    evals: &PlonkEvaluations<F>,
) -> (Vec<Vec<F>>, Vec<Vec<F>>, Vec<Vec<F>>, Vec<Vec<F>>) {
    let singles = |v: &[F]| -> Vec<Vec<F>> { v.iter().map(|x| vec![*x]).collect() };

    let mut fixed = evals.selectors.clone();
    fixed.extend(evals.constants.iter().cloned());
    fixed.extend(singles(&evals.sigmas));

    let mut witness = evals.witness.clone();
    witness.extend(singles(&evals.multiplicities));

    let mut aux = vec![vec![evals.z_perm, evals.z_perm_omega]];
    if !evals.z_lookup.is_empty() {
        aux.push(evals.z_lookup.clone());
        aux.extend(singles(&evals.lookup_h));
        aux.extend(singles(&evals.lookup_g));
    }

    let quotient = singles(&evals.quotient);
    (fixed, witness, aux, quotient)
}

/// Absorb the disclosed evaluations in the canonical order.
pub(crate) fn absorb_evaluations<F: PrimeField>(
    transcript: &mut Transcript,
    evals: &PlonkEvaluations<F>,
) {
    for column in evals.witness.iter() {
        for value in column.iter() {
            transcript.append_field_elem(value);
        }
    }
    for value in evals.multiplicities.iter() {
        transcript.append_field_elem(value);
    }
    for column in evals.selectors.iter().chain(evals.constants.iter()) {
        for value in column.iter() {
            transcript.append_field_elem(value);
        }
    }
    for value in evals.sigmas.iter() {
        transcript.append_field_elem(value);
    }
    transcript.append_field_elem(&evals.z_perm);
    transcript.append_field_elem(&evals.z_perm_omega);
    for value in evals
        .z_lookup
        .iter()
        .chain(evals.lookup_h.iter())
        .chain(evals.lookup_g.iter())
        .chain(evals.quotient.iter())
    {
        transcript.append_field_elem(value);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::{Field, One, Zero};
    use ark_std::rand::SeedableRng;
    use ark_std::UniformRand;
    use rand_chacha::ChaChaRng;

    #[test]
    fn split_t_recombines() {
        let mut prng = ChaChaRng::from_seed([5u8; 32]);
        let t = FpPolynomial::<Fr>::random(&mut prng, 40);
        let chunk_size = 11;
        let chunks = 4;
        let parts = split_t(&mut prng, &t, chunks, chunk_size).unwrap();
        assert_eq!(parts.len(), chunks);

        let zeta = Fr::rand(&mut prng);
        let mut combined = Fr::zero();
        let mut factor = Fr::one();
        let step = zeta.pow([chunk_size as u64]);
        for part in parts.iter() {
            combined += factor * part.eval(&zeta);
            factor *= step;
        }
        assert_eq!(combined, t.eval(&zeta));
    }

    #[test]
    fn hide_polynomial_keeps_subgroup_values() {
        let mut prng = ChaChaRng::from_seed([6u8; 32]);
        let domain = FpPolynomial::<Fr>::evaluation_domain(16).unwrap();
        let mut poly = FpPolynomial::<Fr>::random(&mut prng, 15);
        let before = poly.fft_with_domain(&domain);
        hide_polynomial(&mut prng, &mut poly, 2, 16);
        let after = poly.fft_with_domain(&domain);
        assert_eq!(before, after);
        assert!(poly.degree() > 15);
    }

    #[test]
    fn barycentric_matches_interpolation() {
        let mut prng = ChaChaRng::from_seed([8u8; 32]);
        let n = 16;
        let domain = FpPolynomial::<Fr>::evaluation_domain(n).unwrap();
        let values: Vec<Fr> = (0..5).map(|_| Fr::rand(&mut prng)).collect();
        let mut padded = values.clone();
        padded.resize(n, Fr::zero());
        let poly = FpPolynomial::ifft_with_domain(&domain, &padded);

        let point = Fr::rand(&mut prng);
        let direct = poly.eval(&point);
        let bary = eval_public_input_poly(&values, &domain.group_gen, n, &point).unwrap();
        assert_eq!(direct, bary);
    }

    #[test]
    fn rotate_point_wraps() {
        let n = 8;
        let domain = FpPolynomial::<Fr>::evaluation_domain(n).unwrap();
        let zeta = Fr::from(12345u64);
        let forward = rotate_point(&zeta, &domain.group_gen, 1, n);
        let backward = rotate_point(&zeta, &domain.group_gen, -7, n);
        assert_eq!(forward, backward);
        assert_eq!(rotate_point(&zeta, &domain.group_gen, 0, n), zeta);
    }
}
