use crate::value::Value;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

///
/// LogicalOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogicalOp {
    And,
    Or,
}

///
/// ArithOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

///
/// ExprToken
///
/// Opaque expression token handed to the expression binder: the minimal
/// shape set needed by filter/order-by/compute/aggregate sub-clauses.
/// Paths are slash-split property traversals rooted at the current range
/// variable.
///

#[derive(Clone, Debug, PartialEq)]
pub enum ExprToken {
    Path(Vec<String>),
    Literal(Value),
    Compare {
        op: CompareOp,
        left: Box<ExprToken>,
        right: Box<ExprToken>,
    },
    Logical {
        op: LogicalOp,
        left: Box<ExprToken>,
        right: Box<ExprToken>,
    },
    Not(Box<ExprToken>),
    Arith {
        op: ArithOp,
        left: Box<ExprToken>,
        right: Box<ExprToken>,
    },
}

impl ExprToken {
    /// Single-segment property path.
    #[must_use]
    pub fn property(name: impl Into<String>) -> Self {
        Self::Path(vec![name.into()])
    }

    /// Multi-segment property path.
    #[must_use]
    pub fn path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Path(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn compare(op: CompareOp, left: Self, right: Self) -> Self {
        Self::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
