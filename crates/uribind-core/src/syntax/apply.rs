use crate::syntax::{expr::ExprToken, select_expand::ExpandToken};

///
/// AggregationMethod
///
/// Closed method set plus the named-custom escape hatch. Custom methods
/// are opaque to the binder; their result type defaults during inference.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AggregationMethod {
    Sum,
    Min,
    Max,
    Average,
    CountDistinct,
    /// `$count` appearing as a virtual aggregate property.
    VirtualPropertyCount,
    Custom(String),
}

///
/// ApplyToken
///
/// Ordered `$apply` transformation list as written.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ApplyToken {
    pub transformations: Vec<TransformationToken>,
}

impl ApplyToken {
    #[must_use]
    pub const fn new(transformations: Vec<TransformationToken>) -> Self {
        Self { transformations }
    }
}

///
/// TransformationToken
///
/// `Filter` is the pipeline's default case: any token not recognized as
/// one of the other stages is carried as a filter expression.
///

#[derive(Clone, Debug, PartialEq)]
pub enum TransformationToken {
    Aggregate(AggregateToken),
    GroupBy(GroupByToken),
    Compute(ComputeToken),
    Expand(ExpandToken),
    Filter(ExprToken),
}

impl TransformationToken {
    /// Stage keyword as written in query text.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Aggregate(_) => "aggregate",
            Self::GroupBy(_) => "groupby",
            Self::Compute(_) => "compute",
            Self::Expand(_) => "expand",
            Self::Filter(_) => "filter",
        }
    }
}

///
/// AggregateToken
///

#[derive(Clone, Debug, PartialEq)]
pub struct AggregateToken {
    pub expressions: Vec<AggregateExprToken>,
}

impl AggregateToken {
    #[must_use]
    pub const fn new(expressions: Vec<AggregateExprToken>) -> Self {
        Self { expressions }
    }
}

///
/// AggregateExprToken
///
/// Property aggregates bind a value expression; entity-set aggregates
/// carry a navigation path and recurse into child aggregates.
///

#[derive(Clone, Debug, PartialEq)]
pub enum AggregateExprToken {
    Property {
        expr: ExprToken,
        method: AggregationMethod,
        alias: String,
    },
    EntitySet {
        /// Slash-split collection-navigation path.
        path: Vec<String>,
        children: Vec<AggregateExprToken>,
    },
}

impl AggregateExprToken {
    #[must_use]
    pub fn property(expr: ExprToken, method: AggregationMethod, alias: impl Into<String>) -> Self {
        Self::Property {
            expr,
            method,
            alias: alias.into(),
        }
    }

    #[must_use]
    pub fn entity_set<I, S>(path: I, children: Vec<Self>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::EntitySet {
            path: path.into_iter().map(Into::into).collect(),
            children,
        }
    }
}

///
/// GroupByToken
///
/// Property paths to group on, plus the optional nested child stage.
/// Only an aggregate child is valid; the binder rejects anything else.
///

#[derive(Clone, Debug, PartialEq)]
pub struct GroupByToken {
    pub properties: Vec<ExprToken>,
    pub child: Option<Box<TransformationToken>>,
}

impl GroupByToken {
    #[must_use]
    pub const fn new(properties: Vec<ExprToken>) -> Self {
        Self {
            properties,
            child: None,
        }
    }

    #[must_use]
    pub fn with_aggregate(mut self, aggregate: AggregateToken) -> Self {
        self.child = Some(Box::new(TransformationToken::Aggregate(aggregate)));
        self
    }
}

///
/// ComputeToken
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComputeToken {
    pub expressions: Vec<ComputeExprToken>,
}

impl ComputeToken {
    #[must_use]
    pub const fn new(expressions: Vec<ComputeExprToken>) -> Self {
        Self { expressions }
    }
}

///
/// ComputeExprToken
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComputeExprToken {
    pub expr: ExprToken,
    pub alias: String,
}

impl ComputeExprToken {
    #[must_use]
    pub fn new(expr: ExprToken, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }
}
