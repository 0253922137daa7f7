//! Lookup gates and tables.

use super::expr::Expression;

/// A tuple of expressions that must appear as a row of the designated
/// lookup table whenever the owning gate's selector is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupConstraint<F> {
    /// Identifier of the target table.
    pub table_id: u32,
    /// The looked-up tuple, one expression per table column.
    pub exprs: Vec<Expression<F>>,
}

/// A selector plus the lookup constraints it activates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupGate<F> {
    /// Selector column index.
    pub selector: usize,
    /// Constraints enforced on rows where the selector is set.
    pub constraints: Vec<LookupConstraint<F>>,
}

/// A lookup table: its id, the selector marking the rows that populate it,
/// and one or more options (constant-column tuples) whose selected rows are
/// unioned into the table's value set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTable {
    /// Table identifier referenced by lookup constraints.
    pub id: u32,
    /// Selector column marking the populated rows.
    pub selector: usize,
    /// Column tuples; every option of a table has the same width.
    pub options: Vec<Vec<usize>>,
}
