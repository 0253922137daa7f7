//! KZG polynomial commitment over BLS12-381.
//!
//! A batch commitment is the vector of per-polynomial MSM commitments
//! against the structured reference string. The batched multi-point opening
//! aggregates per-polynomial quotients with a transcript challenge α against
//! the joint vanishing polynomial, commits the aggregate, and closes with a
//! single evaluation witness at a second challenge ρ
//! (the optimization of <https://eprint.iacr.org/2020/081.pdf>, Sec 4.1).

use crate::errors::{PlonkError, Result};
use crate::poly_commit::field_polynomial::FpPolynomial;
use crate::poly_commit::pcs::{BatchEvalsRef, BatchOpeningRef, PolyComScheme, ToBytes};
use crate::poly_commit::transcript::PolyComTranscript;
use ark_bls12_381::{Bls12_381, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, Group, VariableBaseMSM};
use ark_ff::{Field, One, UniformRand, Zero};
use ark_serialize::CanonicalSerialize;
use ark_std::rand::{CryptoRng, RngCore};
use merlin::Transcript;

/// Commitment to a batch: one curve point per polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KzgCommitment(pub Vec<G1Affine>);

impl ToBytes for KzgCommitment {
    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.0.len() * 48);
        for point in self.0.iter() {
            point
                .serialize_compressed(&mut bytes)
                .expect("compressed point serialization");
        }
        bytes
    }
}

/// Batched opening proof: the aggregate quotient commitment and the single
/// evaluation witness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KzgProof {
    /// Commitment to the α-aggregated quotient polynomial.
    pub cm_q: G1Affine,
    /// KZG witness for the derived zero claim at ρ.
    pub opening: G1Affine,
}

/// KZG commitment scheme with a reference string over BLS12-381.
#[derive(Clone, Debug)]
pub struct KzgScheme {
    /// Powers of the trapdoor in G1.
    pub powers_of_g1: Vec<G1Affine>,
    /// The G2 generator.
    pub g2: G2Affine,
    /// The trapdoor times the G2 generator.
    pub s_g2: G2Affine,
}

impl KzgScheme {
    /// Sample a fresh reference string supporting `max_degree`. The trapdoor
    /// is dropped on return; production deployments would load a ceremony
    /// transcript instead.
    pub fn new<R: CryptoRng + RngCore>(max_degree: usize, prng: &mut R) -> KzgScheme {
        let s = Fr::rand(prng);
        let g1 = G1Projective::generator();
        let mut powers = Vec::with_capacity(max_degree + 1);
        let mut current = g1;
        for _ in 0..=max_degree {
            powers.push(current.into_affine());
            current *= s;
        }
        let g2 = G2Projective::generator();
        KzgScheme {
            powers_of_g1: powers,
            g2: g2.into_affine(),
            s_g2: (g2 * s).into_affine(),
        }
    }

    fn commit_single(&self, poly: &FpPolynomial<Fr>) -> Result<G1Affine> {
        if poly.degree() + 1 > self.powers_of_g1.len() {
            return Err(PlonkError::DegreeError);
        }
        let commitment = G1Projective::msm_unchecked(
            &self.powers_of_g1[..poly.coefs.len()],
            &poly.coefs,
        );
        Ok(commitment.into_affine())
    }

    /// All distinct evaluation points, in first-occurrence order.
    fn distinct_points(point_sets: &[&Vec<Fr>]) -> Vec<Fr> {
        let mut distinct: Vec<Fr> = Vec::new();
        for points in point_sets.iter() {
            for point in points.iter() {
                if !distinct.contains(point) {
                    distinct.push(*point);
                }
            }
        }
        distinct
    }
}

impl PolyComScheme for KzgScheme {
    type Field = Fr;
    type Commitment = KzgCommitment;
    type EvalProof = KzgProof;

    fn max_degree(&self) -> usize {
        self.powers_of_g1.len() - 1
    }

    fn commit(&self, polys: &[FpPolynomial<Fr>]) -> Result<KzgCommitment> {
        let points = polys
            .iter()
            .map(|poly| self.commit_single(poly))
            .collect::<Result<Vec<_>>>()?;
        Ok(KzgCommitment(points))
    }

    fn proof_eval(
        &self,
        transcript: &mut Transcript,
        batches: &[BatchOpeningRef<'_, Fr>],
    ) -> Result<KzgProof> {
        let alpha: Fr = transcript.get_challenge_field_elem(b"alpha");

        // flatten the declared (polynomial, point set) pairs
        let mut flat: Vec<(&FpPolynomial<Fr>, &Vec<Fr>)> = Vec::new();
        for batch in batches.iter() {
            if batch.points.len() != batch.polys.len() {
                return Err(PlonkError::FuncParamsError);
            }
            for (poly, points) in batch.polys.iter().zip(batch.points.iter()) {
                if !points.is_empty() {
                    flat.push((poly, points));
                }
            }
        }
        let z = FpPolynomial::from_zeroes(&Self::distinct_points(
            &flat.iter().map(|(_, p)| *p).collect::<Vec<_>>(),
        ));

        // h(X) = sum_i alpha^i * z_i_bar(X) * (f_i(X) - r_i(X))
        let mut h = FpPolynomial::<Fr>::zero();
        let mut coeff = Fr::one();
        let mut interpolants = Vec::with_capacity(flat.len());
        let mut z_bars = Vec::with_capacity(flat.len());
        for (poly, points) in flat.iter() {
            let values: Vec<Fr> = points.iter().map(|p| poly.eval(p)).collect();
            let r_i = FpPolynomial::interpolate(points, &values)?;
            let vanish_i = FpPolynomial::from_zeroes(points);
            let (z_i_bar, rem) = z.div_rem(&vanish_i)?;
            if !rem.is_zero() {
                return Err(PlonkError::ProofError);
            }
            let mut term = (*poly).sub(&r_i);
            term = term.mul(&z_i_bar);
            term.mul_scalar_assign(&coeff);
            h.add_assign(&term);
            interpolants.push(r_i);
            z_bars.push(z_i_bar);
            coeff *= alpha;
        }

        let (q, rem) = h.div_rem(&z)?;
        if !rem.is_zero() {
            return Err(PlonkError::ProofError);
        }
        let cm_q = self.commit_single(&q)?;
        transcript.append_commitment(&KzgCommitment(vec![cm_q]));

        let rho: Fr = transcript.get_challenge_field_elem(b"rho");

        // g(X) = sum_i alpha^i * z_i_bar(rho) * (f_i(X) - r_i(rho)) - z(rho) * q(X)
        let mut g = q.mul_scalar(&z.eval(&rho)).neg();
        let mut coeff = Fr::one();
        for (((poly, _), r_i), z_i_bar) in
            flat.iter().zip(interpolants.iter()).zip(z_bars.iter())
        {
            let scalar = z_i_bar.eval(&rho) * coeff;
            let mut term = (*poly).clone();
            term.add_coef_assign(&(-r_i.eval(&rho)), 0);
            term.mul_scalar_assign(&scalar);
            g.add_assign(&term);
            coeff *= alpha;
        }
        if !g.eval(&rho).is_zero() {
            return Err(PlonkError::ProofError);
        }

        let divisor = FpPolynomial::from_coefs(vec![-rho, Fr::one()]);
        let (witness, rem) = g.div_rem(&divisor)?;
        if !rem.is_zero() {
            return Err(PlonkError::ProofError);
        }
        let opening = self.commit_single(&witness)?;

        Ok(KzgProof { cm_q, opening })
    }

    fn verify_eval(
        &self,
        transcript: &mut Transcript,
        batches: &[BatchEvalsRef<'_, KzgCommitment, Fr>],
        proof: &KzgProof,
    ) -> Result<()> {
        let alpha: Fr = transcript.get_challenge_field_elem(b"alpha");
        transcript.append_commitment(&KzgCommitment(vec![proof.cm_q]));
        let rho: Fr = transcript.get_challenge_field_elem(b"rho");

        let mut flat: Vec<(G1Affine, &Vec<Fr>, &Vec<Fr>)> = Vec::new();
        for batch in batches.iter() {
            if batch.commitment.0.len() != batch.points.len()
                || batch.points.len() != batch.values.len()
            {
                return Err(PlonkError::VerificationError);
            }
            for ((cm, points), values) in batch
                .commitment
                .0
                .iter()
                .zip(batch.points.iter())
                .zip(batch.values.iter())
            {
                if points.len() != values.len() {
                    return Err(PlonkError::VerificationError);
                }
                if !points.is_empty() {
                    flat.push((*cm, points, values));
                }
            }
        }

        let distinct =
            Self::distinct_points(&flat.iter().map(|(_, p, _)| *p).collect::<Vec<_>>());
        let mut z_eval_rho = Fr::one();
        for point in distinct.iter() {
            z_eval_rho *= rho - point;
        }

        // C_g = sum_i alpha^i z_i_bar(rho) (C_i - [r_i(rho)]G) - z(rho) C_q
        let mut coeff = Fr::one();
        let mut com_lc = G1Projective::zero();
        let mut val_lc = Fr::zero();
        for (cm, points, values) in flat.iter() {
            let mut z_i_bar_eval_rho = z_eval_rho;
            for point in points.iter() {
                let denom = (rho - point).inverse().ok_or(PlonkError::DivisionByZero)?;
                z_i_bar_eval_rho *= denom;
            }
            let r_i = FpPolynomial::interpolate(points, values)?;
            let scalar = z_i_bar_eval_rho * coeff;
            com_lc += cm.into_group() * scalar;
            val_lc += scalar * r_i.eval(&rho);
            coeff *= alpha;
        }
        com_lc -= self.powers_of_g1[0].into_group() * val_lc;
        com_lc -= proof.cm_q.into_group() * z_eval_rho;

        // e(C_g, H) == e(W, [s]H - [rho]H)
        let lhs = Bls12_381::pairing(com_lc.into_affine(), self.g2);
        let shifted = self.s_g2.into_group() - self.g2.into_group() * rho;
        let rhs = Bls12_381::pairing(proof.opening, shifted.into_affine());
        if lhs != rhs {
            return Err(PlonkError::VerificationError);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_std::rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn batch_open_and_verify() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let pcs = KzgScheme::new(20, &mut prng);

        let batch1: Vec<FpPolynomial<Fr>> = (0..3)
            .map(|_| FpPolynomial::random(&mut prng, 16))
            .collect();
        let batch2: Vec<FpPolynomial<Fr>> =
            (0..2).map(|_| FpPolynomial::random(&mut prng, 9)).collect();

        let cm1 = pcs.commit(&batch1).unwrap();
        let cm2 = pcs.commit(&batch2).unwrap();

        let zeta = Fr::rand(&mut prng);
        let zeta_omega = Fr::rand(&mut prng);
        let points1 = vec![vec![zeta], vec![zeta, zeta_omega], vec![zeta]];
        let points2 = vec![vec![zeta_omega], vec![zeta]];

        let mut transcript = Transcript::new(b"kzg test");
        let proof = pcs
            .proof_eval(
                &mut transcript,
                &[
                    BatchOpeningRef {
                        polys: &batch1,
                        points: &points1,
                    },
                    BatchOpeningRef {
                        polys: &batch2,
                        points: &points2,
                    },
                ],
            )
            .unwrap();

        let values1: Vec<Vec<Fr>> = batch1
            .iter()
            .zip(points1.iter())
            .map(|(poly, pts)| pts.iter().map(|p| poly.eval(p)).collect())
            .collect();
        let mut values2: Vec<Vec<Fr>> = batch2
            .iter()
            .zip(points2.iter())
            .map(|(poly, pts)| pts.iter().map(|p| poly.eval(p)).collect())
            .collect();

        let mut transcript = Transcript::new(b"kzg test");
        assert!(pcs
            .verify_eval(
                &mut transcript,
                &[
                    BatchEvalsRef {
                        commitment: &cm1,
                        points: &points1,
                        values: &values1,
                    },
                    BatchEvalsRef {
                        commitment: &cm2,
                        points: &points2,
                        values: &values2,
                    },
                ],
                &proof
            )
            .is_ok());

        // tampered claimed value
        values2[1][0] += Fr::one();
        let mut transcript = Transcript::new(b"kzg test");
        assert!(pcs
            .verify_eval(
                &mut transcript,
                &[
                    BatchEvalsRef {
                        commitment: &cm1,
                        points: &points1,
                        values: &values1,
                    },
                    BatchEvalsRef {
                        commitment: &cm2,
                        points: &points2,
                        values: &values2,
                    },
                ],
                &proof
            )
            .is_err());
    }

    #[test]
    fn reference_string_from_system_randomness() {
        let mut rng = rand::thread_rng();
        let pcs = KzgScheme::new(4, &mut rng);
        assert_eq!(pcs.max_degree(), 4);
        assert_eq!(pcs.powers_of_g1.len(), 5);
    }

    #[test]
    fn degree_overflow_is_rejected() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let pcs = KzgScheme::new(8, &mut prng);
        let poly = FpPolynomial::<Fr>::random(&mut prng, 9);
        assert_eq!(pcs.commit(&[poly]), Err(PlonkError::DegreeError));
    }
}
