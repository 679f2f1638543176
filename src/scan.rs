// ABOUTME: Lazy query-builder over a named warehouse table
// ABOUTME: Predicates compose without evaluating; only Warehouse calls materialize

/// Comparison operator supported by scan predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gt,
}

/// A single column-to-literal comparison.
///
/// The value is always carried as a string and handed to the engine verbatim;
/// ordering semantics (e.g. timestamp comparison) are the engine's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub op: CmpOp,
    pub value: String,
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: CmpOp::Eq,
            value: value.into(),
        }
    }

    pub fn gt(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: CmpOp::Gt,
            value: value.into(),
        }
    }
}

/// A lazily-evaluated view over a named table.
///
/// Building a scan never touches the warehouse: predicates and the
/// all-null-row marker accumulate until a [`Warehouse`](crate::Warehouse)
/// method materializes the scan. Filtering therefore composes freely, and a
/// scan can be counted or aggregated any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableScan {
    table: String,
    predicates: Vec<Predicate>,
    drop_all_null: bool,
}

impl TableScan {
    /// Scan over every row of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
            drop_all_null: false,
        }
    }

    /// Narrow the scan with an additional predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Exclude rows in which every column is null.
    ///
    /// Rows with at least one non-null column always survive.
    pub fn drop_all_null(mut self) -> Self {
        self.drop_all_null = true;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn drops_all_null(&self) -> bool {
        self.drop_all_null
    }
}
