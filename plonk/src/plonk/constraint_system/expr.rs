//! The expression AST of gate and lookup constraints: a sum of terms, each
//! a coefficient times a product of table cells. Structural equality is
//! order-sensitive so that wire-format round trips reproduce circuits
//! byte-exactly.

use crate::errors::Result;
use ark_ff::PrimeField;

/// Which class of table column a variable points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Private witness column.
    Witness,
    /// Public input column.
    PublicInput,
    /// Fixed constant column.
    Constant,
    /// Fixed selector column.
    Selector,
}

/// A reference to a table cell: column class, column index and a signed row
/// rotation. In gate and lookup expressions the rotation is relative to the
/// query row; in copy constraints it carries the absolute row index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    /// Column class.
    pub kind: ColumnKind,
    /// Column index within the class.
    pub index: usize,
    /// Signed row rotation.
    pub rotation: i32,
}

impl Variable {
    /// A variable with an explicit rotation.
    pub fn new(kind: ColumnKind, index: usize, rotation: i32) -> Self {
        Self {
            kind,
            index,
            rotation,
        }
    }

    /// Witness column cell at the query row.
    pub fn witness(index: usize) -> Self {
        Self::new(ColumnKind::Witness, index, 0)
    }

    /// Public-input column cell at the query row.
    pub fn public_input(index: usize) -> Self {
        Self::new(ColumnKind::PublicInput, index, 0)
    }

    /// Constant column cell at the query row.
    pub fn constant(index: usize) -> Self {
        Self::new(ColumnKind::Constant, index, 0)
    }

    /// Selector column cell at the query row.
    pub fn selector(index: usize) -> Self {
        Self::new(ColumnKind::Selector, index, 0)
    }

    /// The same column, shifted by `rotation` rows.
    pub fn with_rotation(mut self, rotation: i32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// A coefficient times a product of variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term<F> {
    /// The scalar coefficient.
    pub coeff: F,
    /// The multiplied cells; empty means a constant term.
    pub vars: Vec<Variable>,
}

impl<F: PrimeField> Term<F> {
    /// Build a term from a coefficient and its factors.
    pub fn new(coeff: F, vars: Vec<Variable>) -> Self {
        Self { coeff, vars }
    }
}

/// A sum of terms. Built through the explicit methods below, no operator
/// overloading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression<F> {
    /// The summed terms, in insertion order.
    pub terms: Vec<Term<F>>,
}

impl<F: PrimeField> Expression<F> {
    /// The empty sum.
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// A constant expression.
    pub fn constant(value: F) -> Self {
        Self {
            terms: vec![Term::new(value, Vec::new())],
        }
    }

    /// A single-cell expression with coefficient one.
    pub fn from_variable(var: Variable) -> Self {
        Self {
            terms: vec![Term::new(F::one(), vec![var])],
        }
    }

    /// Sum with another expression.
    pub fn add(&self, other: &Self) -> Self {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Self { terms }
    }

    /// Difference with another expression.
    pub fn sub(&self, other: &Self) -> Self {
        let mut terms = self.terms.clone();
        terms.extend(
            other
                .terms
                .iter()
                .map(|t| Term::new(-t.coeff, t.vars.clone())),
        );
        Self { terms }
    }

    /// Product with another expression, distributing term by term.
    pub fn mul(&self, other: &Self) -> Self {
        let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
        for a in self.terms.iter() {
            for b in other.terms.iter() {
                let mut vars = a.vars.clone();
                vars.extend(b.vars.iter().copied());
                terms.push(Term::new(a.coeff * b.coeff, vars));
            }
        }
        Self { terms }
    }

    /// Multiply every coefficient by a scalar.
    pub fn scale(&self, scalar: &F) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(t.coeff * scalar, t.vars.clone()))
                .collect(),
        }
    }

    /// Multiplicative degree: the longest product of cells in any term.
    pub fn degree(&self) -> usize {
        self.terms.iter().map(|t| t.vars.len()).max().unwrap_or(0)
    }

    /// Evaluate against a cell resolver.
    pub fn eval(&self, resolve: &impl Fn(&Variable) -> Result<F>) -> Result<F> {
        let mut sum = F::zero();
        for term in self.terms.iter() {
            let mut product = term.coeff;
            for var in term.vars.iter() {
                product *= resolve(var)?;
            }
            sum += product;
        }
        Ok(sum)
    }

    /// Iterate over every referenced variable.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.terms.iter().flat_map(|t| t.vars.iter())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::One;

    // w0 * w1 - w2
    fn mul_gate_expr() -> Expression<Fr> {
        Expression::from_variable(Variable::witness(0))
            .mul(&Expression::from_variable(Variable::witness(1)))
            .sub(&Expression::from_variable(Variable::witness(2)))
    }

    #[test]
    fn eval_resolves_cells() {
        let expr = mul_gate_expr();
        assert_eq!(expr.degree(), 2);
        let resolve = |var: &Variable| -> crate::errors::Result<Fr> {
            Ok(match var.index {
                0 => Fr::from(3u64),
                1 => Fr::from(5u64),
                _ => Fr::from(15u64),
            })
        };
        assert_eq!(expr.eval(&resolve).unwrap(), Fr::from(0u64));
    }

    #[test]
    fn structural_equality_is_order_sensitive() {
        let a: Expression<Fr> = Expression::from_variable(Variable::witness(0))
            .add(&Expression::from_variable(Variable::witness(1)));
        let b = Expression::from_variable(Variable::witness(1))
            .add(&Expression::from_variable(Variable::witness(0)));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn scale_and_constant() {
        let expr = Expression::constant(Fr::from(2u64)).scale(&Fr::from(3u64));
        let resolve = |_: &Variable| -> crate::errors::Result<Fr> { Ok(Fr::one()) };
        assert_eq!(expr.eval(&resolve).unwrap(), Fr::from(6u64));
    }
}
