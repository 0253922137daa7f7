//! The circuit data model: table shape, gates, copy constraints, lookup
//! gates and tables, and the concrete assignment tables.
//!
//! A [`ConstraintSystem`] is pure shape data: construction only checks that
//! every referenced column and selector index is within the declared
//! bounds. Whether a concrete assignment satisfies the constraints is a
//! separate question answered by [`ConstraintSystem::satisfies`], and
//! ultimately by the prover/verifier pair.

pub mod expr;
pub mod lookup;

pub use expr::{ColumnKind, Expression, Term, Variable};
pub use lookup::{LookupConstraint, LookupGate, LookupTable};

use crate::errors::{PlonkError, Result};
use ark_ff::PrimeField;

/// Rows appended past the usable region and filled with fresh randomness by
/// the private preprocessor. Four rows cover every per-column opening the
/// protocol makes (ζ and one rotation per accumulator), so partial openings
/// leak nothing about the real witness.
pub const ZK_BLINDING_ROWS: usize = 4;

/// Shape of the assignment table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescription {
    /// Number of witness columns.
    pub witness_columns: usize,
    /// Number of public-input columns.
    pub public_input_columns: usize,
    /// Number of constant columns.
    pub constant_columns: usize,
    /// Number of selector columns.
    pub selector_columns: usize,
    /// Rows carrying constrained data.
    pub usable_rows_amount: usize,
    /// Padded power-of-two height of the table.
    pub rows_amount: usize,
}

impl TableDescription {
    /// Describe a table with the given column counts and usable height; the
    /// padded height is the smallest power of two covering the usable rows
    /// plus the blinding rows.
    pub fn new(
        witness_columns: usize,
        public_input_columns: usize,
        constant_columns: usize,
        selector_columns: usize,
        usable_rows_amount: usize,
    ) -> Self {
        Self {
            witness_columns,
            public_input_columns,
            constant_columns,
            selector_columns,
            usable_rows_amount,
            rows_amount: (usable_rows_amount + ZK_BLINDING_ROWS).next_power_of_two(),
        }
    }

    /// Number of columns of the given class.
    pub fn columns(&self, kind: ColumnKind) -> usize {
        match kind {
            ColumnKind::Witness => self.witness_columns,
            ColumnKind::PublicInput => self.public_input_columns,
            ColumnKind::Constant => self.constant_columns,
            ColumnKind::Selector => self.selector_columns,
        }
    }

    /// Columns participating in the copy-constraint permutation: all
    /// witness columns followed by all public-input columns.
    pub fn permuted_columns(&self) -> usize {
        self.witness_columns + self.public_input_columns
    }

    fn validate(&self) -> Result<()> {
        if !self.rows_amount.is_power_of_two()
            || self.usable_rows_amount + ZK_BLINDING_ROWS > self.rows_amount
        {
            return Err(PlonkError::ShapeMismatch("table description rows"));
        }
        Ok(())
    }
}

/// A selector plus the list of expressions it activates: on every row where
/// the selector is set, each expression must evaluate to zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate<F> {
    /// Selector column index.
    pub selector: usize,
    /// The enforced expressions.
    pub constraints: Vec<Expression<F>>,
}

/// An unordered pair of cells required to hold equal values. Both sides
/// must name witness or public-input columns; the `rotation` field carries
/// the absolute row index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConstraint {
    /// One endpoint.
    pub left: Variable,
    /// The other endpoint.
    pub right: Variable,
}

/// Per-column rotation sets actually used by the circuit, rotation 0 always
/// included. Both prover and verifier derive these to agree on the opening
/// schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRotations {
    /// Rotations per witness column.
    pub witness: Vec<Vec<i32>>,
    /// Rotations per public-input column.
    pub public_input: Vec<Vec<i32>>,
    /// Rotations per constant column.
    pub constant: Vec<Vec<i32>>,
    /// Rotations per selector column.
    pub selector: Vec<Vec<i32>>,
}

impl ColumnRotations {
    /// The rotation set of one column.
    pub fn of(&self, kind: ColumnKind, index: usize) -> &[i32] {
        match kind {
            ColumnKind::Witness => &self.witness[index],
            ColumnKind::PublicInput => &self.public_input[index],
            ColumnKind::Constant => &self.constant[index],
            ColumnKind::Selector => &self.selector[index],
        }
    }

    /// Position of a rotation within a column's sorted set.
    pub fn position(&self, kind: ColumnKind, index: usize, rotation: i32) -> Result<usize> {
        self.of(kind, index)
            .iter()
            .position(|r| *r == rotation)
            .ok_or(PlonkError::IndexOutOfBounds)
    }
}

/// The immutable aggregate of a circuit's shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintSystem<F> {
    table: TableDescription,
    gates: Vec<Gate<F>>,
    copy_constraints: Vec<CopyConstraint>,
    lookup_gates: Vec<LookupGate<F>>,
    lookup_tables: Vec<LookupTable>,
}

impl<F: PrimeField> ConstraintSystem<F> {
    /// Assemble a constraint system, checking that every referenced column,
    /// selector and table id stays within the declared bounds. No semantic
    /// validation happens here.
    pub fn new(
        table: TableDescription,
        gates: Vec<Gate<F>>,
        copy_constraints: Vec<CopyConstraint>,
        lookup_gates: Vec<LookupGate<F>>,
        lookup_tables: Vec<LookupTable>,
    ) -> Result<Self> {
        table.validate()?;
        let check_var = |var: &Variable| -> Result<()> {
            if var.index >= table.columns(var.kind) {
                return Err(PlonkError::IndexOutOfBounds);
            }
            Ok(())
        };

        for gate in gates.iter() {
            if gate.selector >= table.selector_columns {
                return Err(PlonkError::IndexOutOfBounds);
            }
            for constraint in gate.constraints.iter() {
                for var in constraint.variables() {
                    check_var(var)?;
                }
            }
        }

        for copy in copy_constraints.iter() {
            for var in [&copy.left, &copy.right] {
                match var.kind {
                    ColumnKind::Witness | ColumnKind::PublicInput => check_var(var)?,
                    _ => return Err(PlonkError::IndexOutOfBounds),
                }
                let row = var.rotation;
                if row < 0 || row as usize >= table.usable_rows_amount {
                    return Err(PlonkError::IndexOutOfBounds);
                }
            }
        }

        for lookup_table in lookup_tables.iter() {
            if lookup_table.selector >= table.selector_columns {
                return Err(PlonkError::IndexOutOfBounds);
            }
            let width = lookup_table.options.first().map_or(0, |o| o.len());
            for option in lookup_table.options.iter() {
                if option.len() != width {
                    return Err(PlonkError::ShapeMismatch("lookup table option width"));
                }
                for column in option.iter() {
                    if *column >= table.constant_columns {
                        return Err(PlonkError::IndexOutOfBounds);
                    }
                }
            }
        }

        for gate in lookup_gates.iter() {
            if gate.selector >= table.selector_columns {
                return Err(PlonkError::IndexOutOfBounds);
            }
            for constraint in gate.constraints.iter() {
                let declared = lookup_tables
                    .iter()
                    .find(|t| t.id == constraint.table_id)
                    .ok_or(PlonkError::LookupTableNotFound(constraint.table_id))?;
                let width = declared.options.first().map_or(0, |o| o.len());
                if constraint.exprs.len() != width {
                    return Err(PlonkError::ShapeMismatch("lookup tuple width"));
                }
                for expr in constraint.exprs.iter() {
                    for var in expr.variables() {
                        check_var(var)?;
                    }
                }
            }
        }

        Ok(Self {
            table,
            gates,
            copy_constraints,
            lookup_gates,
            lookup_tables,
        })
    }

    /// The table shape.
    pub fn table_description(&self) -> &TableDescription {
        &self.table
    }

    /// The custom gates.
    pub fn gates(&self) -> &[Gate<F>] {
        &self.gates
    }

    /// The copy constraints.
    pub fn copy_constraints(&self) -> &[CopyConstraint] {
        &self.copy_constraints
    }

    /// The lookup gates.
    pub fn lookup_gates(&self) -> &[LookupGate<F>] {
        &self.lookup_gates
    }

    /// The lookup tables.
    pub fn lookup_tables(&self) -> &[LookupTable] {
        &self.lookup_tables
    }

    /// Find a declared lookup table by id.
    pub fn lookup_table(&self, id: u32) -> Result<&LookupTable> {
        self.lookup_tables
            .iter()
            .find(|t| t.id == id)
            .ok_or(PlonkError::LookupTableNotFound(id))
    }

    /// Whether the circuit uses the lookup argument at all.
    pub fn has_lookups(&self) -> bool {
        !self.lookup_gates.is_empty()
    }

    /// The largest multiplicative degree among gate and lookup expressions.
    pub fn max_expression_degree(&self) -> usize {
        let gates = self
            .gates
            .iter()
            .flat_map(|g| g.constraints.iter())
            .map(|e| e.degree());
        let lookups = self
            .lookup_gates
            .iter()
            .flat_map(|g| g.constraints.iter())
            .flat_map(|c| c.exprs.iter())
            .map(|e| e.degree());
        gates.chain(lookups).max().unwrap_or(1).max(1)
    }

    /// Rotation sets per column, sorted and deduplicated, rotation 0 always
    /// present.
    pub fn column_rotations(&self) -> ColumnRotations {
        let mut rotations = ColumnRotations {
            witness: vec![vec![0]; self.table.witness_columns],
            public_input: vec![vec![0]; self.table.public_input_columns],
            constant: vec![vec![0]; self.table.constant_columns],
            selector: vec![vec![0]; self.table.selector_columns],
        };
        let mut record = |var: &Variable| {
            let set = match var.kind {
                ColumnKind::Witness => &mut rotations.witness[var.index],
                ColumnKind::PublicInput => &mut rotations.public_input[var.index],
                ColumnKind::Constant => &mut rotations.constant[var.index],
                ColumnKind::Selector => &mut rotations.selector[var.index],
            };
            if !set.contains(&var.rotation) {
                set.push(var.rotation);
            }
        };
        for gate in self.gates.iter() {
            for constraint in gate.constraints.iter() {
                for var in constraint.variables() {
                    record(var);
                }
            }
        }
        for gate in self.lookup_gates.iter() {
            for constraint in gate.constraints.iter() {
                for expr in constraint.exprs.iter() {
                    for var in expr.variables() {
                        record(var);
                    }
                }
            }
        }
        for set in rotations
            .witness
            .iter_mut()
            .chain(rotations.public_input.iter_mut())
            .chain(rotations.constant.iter_mut())
            .chain(rotations.selector.iter_mut())
        {
            set.sort_unstable();
        }
        rotations
    }

    /// Check a concrete assignment against every gate, copy and lookup
    /// constraint. Unsatisfiability is an expected `Ok(false)` outcome.
    pub fn satisfies(&self, assignment: &AssignmentTable<F>) -> Result<bool> {
        assignment.check_shape(&self.table)?;
        let n = self.table.rows_amount;
        let cell = |var: &Variable, row: usize| -> Result<F> {
            let resolved =
                (row as i64 + var.rotation as i64).rem_euclid(n as i64) as usize;
            assignment.cell(var.kind, var.index, resolved, &self.table)
        };

        for gate in self.gates.iter() {
            for row in 0..n {
                let selector =
                    assignment.cell(ColumnKind::Selector, gate.selector, row, &self.table)?;
                if selector.is_zero() {
                    continue;
                }
                for constraint in gate.constraints.iter() {
                    let value = constraint.eval(&|var| cell(var, row))?;
                    if !(selector * value).is_zero() {
                        return Ok(false);
                    }
                }
            }
        }

        for copy in self.copy_constraints.iter() {
            let left = assignment.cell(
                copy.left.kind,
                copy.left.index,
                copy.left.rotation as usize,
                &self.table,
            )?;
            let right = assignment.cell(
                copy.right.kind,
                copy.right.index,
                copy.right.rotation as usize,
                &self.table,
            )?;
            if left != right {
                return Ok(false);
            }
        }

        for gate in self.lookup_gates.iter() {
            for row in 0..n {
                let selector =
                    assignment.cell(ColumnKind::Selector, gate.selector, row, &self.table)?;
                if selector.is_zero() {
                    continue;
                }
                for constraint in gate.constraints.iter() {
                    let tuple: Vec<F> = constraint
                        .exprs
                        .iter()
                        .map(|e| e.eval(&|var| cell(var, row)))
                        .collect::<Result<_>>()?;
                    let declared = self.lookup_table(constraint.table_id)?;
                    if !self.tuple_in_table(assignment, declared, &tuple)? {
                        return Ok(false);
                    }
                }
            }
        }

        Ok(true)
    }

    fn tuple_in_table(
        &self,
        assignment: &AssignmentTable<F>,
        declared: &LookupTable,
        tuple: &[F],
    ) -> Result<bool> {
        for row in 0..self.table.rows_amount {
            let selector =
                assignment.cell(ColumnKind::Selector, declared.selector, row, &self.table)?;
            if selector.is_zero() {
                continue;
            }
            for option in declared.options.iter() {
                let mut matches = true;
                for (column, expected) in option.iter().zip(tuple.iter()) {
                    let value =
                        assignment.cell(ColumnKind::Constant, *column, row, &self.table)?;
                    if value != *expected {
                        matches = false;
                        break;
                    }
                }
                if matches {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

/// The public part of an assignment: public-input, constant and selector
/// columns, each supplied with `usable_rows_amount` rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicAssignment<F> {
    /// Public-input column values.
    pub public_inputs: Vec<Vec<F>>,
    /// Constant column values.
    pub constants: Vec<Vec<F>>,
    /// Selector column values.
    pub selectors: Vec<Vec<F>>,
}

/// The private part of an assignment: the witness columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateAssignment<F> {
    /// Witness column values.
    pub witness: Vec<Vec<F>>,
}

/// A full assignment, split into the public and private parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentTable<F> {
    /// Columns known to both parties.
    pub public: PublicAssignment<F>,
    /// Columns known only to the prover.
    pub private: PrivateAssignment<F>,
}

impl<F: PrimeField> AssignmentTable<F> {
    /// Check that column counts and row counts match the table description.
    pub fn check_shape(&self, table: &TableDescription) -> Result<()> {
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
            &self.public.public_inputs,
            table.public_input_columns,
            "public input columns",
        )?;
        check(&self.public.constants, table.constant_columns, "constant columns")?;
        check(&self.public.selectors, table.selector_columns, "selector columns")?;
        check(&self.private.witness, table.witness_columns, "witness columns")?;
        Ok(())
    }

    /// Read a cell of the zero-padded table.
    pub fn cell(
        &self,
        kind: ColumnKind,
        index: usize,
        row: usize,
        table: &TableDescription,
    ) -> Result<F> {
        if index >= table.columns(kind) || row >= table.rows_amount {
            return Err(PlonkError::IndexOutOfBounds);
        }
        let column = match kind {
            ColumnKind::Witness => &self.private.witness[index],
            ColumnKind::PublicInput => &self.public.public_inputs[index],
            ColumnKind::Constant => &self.public.constants[index],
            ColumnKind::Selector => &self.public.selectors[index],
        };
        Ok(column.get(row).copied().unwrap_or_else(F::zero))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bls12_381::Fr;

    fn add_gate() -> Gate<Fr> {
        Gate {
            selector: 0,
            constraints: vec![Expression::from_variable(Variable::witness(0))
                .add(&Expression::from_variable(Variable::witness(1)))
                .sub(&Expression::from_variable(Variable::witness(2)))],
        }
    }

    fn tiny_assignment(w2_at_0: u64) -> AssignmentTable<Fr> {
        AssignmentTable {
            public: PublicAssignment {
                public_inputs: vec![],
                constants: vec![],
                selectors: vec![vec![Fr::from(1u64), Fr::from(0u64), Fr::from(0u64)]],
            },
            private: PrivateAssignment {
                witness: vec![
                    vec![Fr::from(2u64); 3],
                    vec![Fr::from(3u64); 3],
                    vec![Fr::from(w2_at_0), Fr::from(0u64), Fr::from(0u64)],
                ],
            },
        }
    }

    #[test]
    fn bounds_are_checked_at_construction() {
        let table = TableDescription::new(3, 0, 0, 1, 3);
        let bad_gate = Gate::<Fr> {
            selector: 1,
            constraints: vec![],
        };
        assert_eq!(
            ConstraintSystem::new(table, vec![bad_gate], vec![], vec![], vec![]),
            Err(PlonkError::IndexOutOfBounds)
        );

        let bad_copy = CopyConstraint {
            left: Variable::constant(0),
            right: Variable::witness(0),
        };
        assert_eq!(
            ConstraintSystem::<Fr>::new(table, vec![], vec![bad_copy], vec![], vec![]),
            Err(PlonkError::IndexOutOfBounds)
        );
    }

    #[test]
    fn undeclared_lookup_table_is_rejected() {
        let table = TableDescription::new(1, 0, 1, 1, 3);
        let gate = LookupGate::<Fr> {
            selector: 0,
            constraints: vec![LookupConstraint {
                table_id: 7,
                exprs: vec![Expression::from_variable(Variable::witness(0))],
            }],
        };
        assert_eq!(
            ConstraintSystem::new(table, vec![], vec![], vec![gate], vec![]),
            Err(PlonkError::LookupTableNotFound(7))
        );
    }

    #[test]
    fn satisfies_reports_gate_violations() {
        let table = TableDescription::new(3, 0, 0, 1, 3);
        let cs =
            ConstraintSystem::new(table, vec![add_gate()], vec![], vec![], vec![]).unwrap();
        assert!(cs.satisfies(&tiny_assignment(5)).unwrap());
        assert!(!cs.satisfies(&tiny_assignment(6)).unwrap());
    }

    #[test]
    fn rotation_sets_include_zero_and_dedupe() {
        let table = TableDescription::new(2, 0, 0, 1, 3);
        let gate = Gate {
            selector: 0,
            constraints: vec![Expression::<Fr>::from_variable(
                Variable::witness(1).with_rotation(1),
            )
            .sub(&Expression::from_variable(Variable::witness(1).with_rotation(1)))],
        };
        let cs = ConstraintSystem::new(table, vec![gate], vec![], vec![], vec![]).unwrap();
        let rotations = cs.column_rotations();
        assert_eq!(rotations.witness[0], vec![0]);
        assert_eq!(rotations.witness[1], vec![0, 1]);
    }
}
