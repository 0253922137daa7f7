use crate::errors::{PlonkError, Result};
use ark_ff::{batch_inversion, PrimeField};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use ark_std::rand::{CryptoRng, RngCore};

/// Dense univariate polynomial over a prime field, low-order coefficient
/// first. All FFT work goes through radix-2 evaluation domains, so domain
/// sizes are powers of two throughout the crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FpPolynomial<F> {
    /// Coefficients of the polynomial.
    pub coefs: Vec<F>,
}

impl<F: PrimeField> FpPolynomial<F> {
    /// Return the polynomial coefs reference.
    pub fn get_coefs_ref(&self) -> &[F] {
        self.coefs.as_slice()
    }

    /// Return the constant zero polynomial.
    pub fn zero() -> Self {
        Self::from_coefs(vec![F::zero()])
    }

    /// Return the constant one polynomial.
    pub fn one() -> Self {
        Self::from_coefs(vec![F::one()])
    }

    /// Build a polynomial from the coefficient vector, low-order coefficient
    /// first. High-order zero coefficients are trimmed.
    pub fn from_coefs(coefs: Vec<F>) -> Self {
        let mut p = FpPolynomial { coefs };
        p.trim_coefs();
        p
    }

    /// Build a polynomial from its zeroes/roots.
    pub fn from_zeroes(zeroes: &[F]) -> Self {
        let mut r = Self::one();
        for root in zeroes.iter() {
            let mut p = r.clone();
            r.coefs.insert(0, F::zero()); // multiply by X
            p.mul_scalar_assign(root);
            r.sub_assign(&p); // r = r * (X - x_0)
        }
        r.trim_coefs();
        r
    }

    /// Return a polynomial with `degree` + 1 uniformly random coefficients.
    pub fn random<R: CryptoRng + RngCore>(prng: &mut R, degree: usize) -> FpPolynomial<F> {
        let coefs = (0..degree + 1).map(|_| F::rand(prng)).collect();
        Self::from_coefs(coefs)
    }

    /// Remove high degree zero-coefficients.
    fn trim_coefs(&mut self) {
        while self.coefs.len() > 1 && self.coefs.last().map_or(false, |c| c.is_zero()) {
            self.coefs.pop();
        }
        if self.coefs.is_empty() {
            self.coefs.push(F::zero());
        }
    }

    /// Return degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.coefs.len().saturating_sub(1)
    }

    /// Test if polynomial is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && self.coefs[0].is_zero()
    }

    /// Evaluate the polynomial on a point, Horner style.
    pub fn eval(&self, point: &F) -> F {
        let mut result = F::zero();
        for coef in self.coefs.iter().rev() {
            result = result * point + coef;
        }
        result
    }

    /// Add another polynomial to self.
    pub fn add_assign(&mut self, other: &Self) {
        if self.coefs.len() < other.coefs.len() {
            self.coefs.resize(other.coefs.len(), F::zero());
        }
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            *self_coef += other_coef;
        }
        self.trim_coefs();
    }

    /// Add with another polynomial, producing a new polynomial.
    pub fn add(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.add_assign(other);
        new
    }

    /// Subtract another polynomial from self.
    pub fn sub_assign(&mut self, other: &Self) {
        if self.coefs.len() < other.coefs.len() {
            self.coefs.resize(other.coefs.len(), F::zero());
        }
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            *self_coef -= other_coef;
        }
        self.trim_coefs();
    }

    /// Subtract another polynomial from self, producing a new polynomial.
    pub fn sub(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.sub_assign(other);
        new
    }

    /// Negate the coefficients.
    pub fn neg(&self) -> Self {
        let mut new = self.clone();
        for coef in new.coefs.iter_mut() {
            *coef = -*coef;
        }
        new
    }

    /// Add `coef` to the coefficient of order `order`.
    pub fn add_coef_assign(&mut self, coef: &F, order: usize) {
        if self.coefs.len() <= order {
            self.coefs.resize(order + 1, F::zero());
        }
        self.coefs[order] += coef;
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar.
    pub fn mul_scalar_assign(&mut self, scalar: &F) {
        for coef in self.coefs.iter_mut() {
            *coef *= scalar;
        }
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar into a new polynomial.
    pub fn mul_scalar(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(scalar);
        new
    }

    /// Schoolbook product with another polynomial. Only used on the small
    /// interpolants and vanishing polynomials of the opening protocol, where
    /// the factors have a handful of coefficients.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut coefs = vec![F::zero(); self.coefs.len() + other.coefs.len() - 1];
        for (i, a) in self.coefs.iter().enumerate() {
            for (j, b) in other.coefs.iter().enumerate() {
                coefs[i + j] += *a * b;
            }
        }
        Self::from_coefs(coefs)
    }

    /// Divide polynomial to produce the quotient and remainder polynomials.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        let k = self.coefs.len();
        let l = divisor.coefs.len();
        if divisor.is_zero() {
            return Err(PlonkError::DivisionByZero);
        }
        if l > k {
            return Ok((Self::zero(), self.clone()));
        }
        let bl_inv = divisor
            .coefs
            .last()
            .and_then(|c| c.inverse())
            .ok_or(PlonkError::DivisionByZero)?;
        let mut rem = self.coefs.clone();
        let mut quo = vec![F::zero(); k - l + 1];
        for i in (0..(k - l + 1)).rev() {
            let qi = bl_inv * rem[i + l - 1];
            for (j, d) in divisor.coefs.iter().enumerate() {
                rem[i + j] -= qi * d;
            }
            quo[i] = qi;
        }
        rem.truncate(l - 1);
        Ok((Self::from_coefs(quo), Self::from_coefs(rem)))
    }

    /// Return the radix-2 evaluation domain of the given size, if the field
    /// supports it.
    pub fn evaluation_domain(num_points: usize) -> Option<Radix2EvaluationDomain<F>> {
        Radix2EvaluationDomain::new(num_points)
    }

    /// Evaluate the polynomial over the whole domain.
    pub fn fft_with_domain(&self, domain: &Radix2EvaluationDomain<F>) -> Vec<F> {
        domain.fft(&self.coefs)
    }

    /// Interpolate the polynomial from its evaluations over the domain.
    pub fn ifft_with_domain(domain: &Radix2EvaluationDomain<F>, evals: &[F]) -> Self {
        Self::from_coefs(domain.ifft(evals))
    }

    /// Evaluate the polynomial over the coset `offset * domain`.
    pub fn coset_fft_with_domain(
        &self,
        domain: &Radix2EvaluationDomain<F>,
        offset: &F,
    ) -> Vec<F> {
        let coset = domain
            .get_coset(*offset)
            .expect("nonzero coset offset");
        coset.fft(&self.coefs)
    }

    /// Interpolate the polynomial from its evaluations over the coset
    /// `offset * domain`.
    pub fn coset_ifft_with_domain(
        domain: &Radix2EvaluationDomain<F>,
        offset: &F,
        evals: &[F],
    ) -> Self {
        let coset = domain
            .get_coset(*offset)
            .expect("nonzero coset offset");
        Self::from_coefs(coset.ifft(evals))
    }

    /// Lagrange interpolation through the given (point, value) pairs. The
    /// points must be pairwise distinct; opening point sets are tiny so the
    /// quadratic construction is fine.
    pub fn interpolate(points: &[F], values: &[F]) -> Result<Self> {
        if points.len() != values.len() {
            return Err(PlonkError::FuncParamsError);
        }
        let mut result = Self::zero();
        for (i, (x_i, y_i)) in points.iter().zip(values.iter()).enumerate() {
            let mut denoms: Vec<F> = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, x_j)| *x_i - x_j)
                .collect();
            batch_inversion(&mut denoms);
            if denoms.iter().any(|d| d.is_zero()) {
                return Err(PlonkError::DivisionByZero);
            }
            let mut basis = Self::from_coefs(vec![*y_i]);
            for ((_, x_j), d_inv) in points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .zip(denoms.iter())
            {
                let factor = Self::from_coefs(vec![-*x_j * d_inv, *d_inv]);
                basis = basis.mul(&factor);
            }
            result.add_assign(&basis);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::FpPolynomial;
    use ark_bls12_381::Fr;
    use ark_ff::{One, UniformRand, Zero};
    use ark_poly::EvaluationDomain;
    use ark_std::rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn from_zeroes() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let zeroes: Vec<Fr> = (0..10).map(|_| Fr::rand(&mut prng)).collect();
        let poly = FpPolynomial::from_zeroes(&zeroes);
        assert_eq!(poly.degree(), 10);
        for root in zeroes.iter() {
            assert_eq!(Fr::zero(), poly.eval(root));
        }
    }

    #[test]
    fn div_rem() {
        let one = Fr::one();
        let zero = Fr::zero();
        let poly = FpPolynomial::from_coefs(vec![one, one, one]);
        let divisor = FpPolynomial::from_coefs(vec![one, one]);
        let (q, r) = poly.div_rem(&divisor).unwrap();
        assert_eq!(q, FpPolynomial::from_coefs(vec![zero, one]));
        assert_eq!(r, FpPolynomial::from_coefs(vec![one]));
    }

    #[test]
    fn fft_round_trip() {
        let mut prng = ChaChaRng::from_seed([7u8; 32]);
        let coefs: Vec<Fr> = (0..16).map(|_| Fr::rand(&mut prng)).collect();
        let poly = FpPolynomial::from_coefs(coefs);
        let domain = FpPolynomial::<Fr>::evaluation_domain(16).unwrap();
        let evals = poly.fft_with_domain(&domain);
        for (i, eval) in evals.iter().enumerate() {
            assert_eq!(*eval, poly.eval(&domain.element(i)));
        }
        assert_eq!(FpPolynomial::ifft_with_domain(&domain, &evals), poly);

        let offset = Fr::from(5u64);
        let coset_evals = poly.coset_fft_with_domain(&domain, &offset);
        assert_eq!(
            FpPolynomial::coset_ifft_with_domain(&domain, &offset, &coset_evals),
            poly
        );
    }

    #[test]
    fn interpolate() {
        let mut prng = ChaChaRng::from_seed([3u8; 32]);
        let points: Vec<Fr> = (0..4).map(|_| Fr::rand(&mut prng)).collect();
        let values: Vec<Fr> = (0..4).map(|_| Fr::rand(&mut prng)).collect();
        let poly = FpPolynomial::interpolate(&points, &values).unwrap();
        assert!(poly.degree() < 4);
        for (p, v) in points.iter().zip(values.iter()) {
            assert_eq!(poly.eval(p), *v);
        }
    }
}
