//! Value-expression binding behind the `ExpressionBinder` seam.
//!
//! Higher binders invoke this as an opaque "bind one token, get one typed
//! node" callback; hosts may substitute their own implementation. The
//! built-in binder resolves property paths against the metadata model and
//! is deliberately small: it is not a general-purpose expression compiler.

use crate::{
    model::{Model, PrimitiveKind, Property, TypeRef},
    semantic::{
        context::BindingContext,
        path::ResolvedPath,
    },
    syntax::{ArithOp, CompareOp, ExprToken, LogicalOp},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// ValueNode
///
/// Fully bound, typed expression node.
///

#[derive(Clone, Debug, PartialEq)]
pub enum ValueNode {
    Literal(Value),
    RangeVariableRef {
        name: String,
        type_ref: TypeRef,
    },
    PropertyAccess {
        source: Box<ValueNode>,
        property: Property,
    },
    /// Access to a dynamic property on an open type, or to an alias
    /// produced by a prior pipeline stage.
    OpenPropertyAccess {
        source: Box<ValueNode>,
        name: String,
        type_ref: TypeRef,
    },
    /// Traversal ending in a collection-valued navigation property.
    CollectionNavigation {
        source: Box<ValueNode>,
        path: ResolvedPath,
        type_ref: TypeRef,
    },
    Compare {
        op: CompareOp,
        left: Box<ValueNode>,
        right: Box<ValueNode>,
    },
    Logical {
        op: LogicalOp,
        left: Box<ValueNode>,
        right: Box<ValueNode>,
    },
    Not(Box<ValueNode>),
    Arith {
        op: ArithOp,
        left: Box<ValueNode>,
        right: Box<ValueNode>,
        type_ref: TypeRef,
    },
}

impl ValueNode {
    /// Declared type of this node.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        match self {
            Self::Literal(value) => value.type_ref(),
            Self::RangeVariableRef { type_ref, .. }
            | Self::OpenPropertyAccess { type_ref, .. }
            | Self::CollectionNavigation { type_ref, .. }
            | Self::Arith { type_ref, .. } => type_ref.clone(),
            Self::PropertyAccess { property, .. } => property.ty.clone(),
            Self::Compare { .. } | Self::Logical { .. } | Self::Not(_) => {
                TypeRef::primitive(PrimitiveKind::Boolean)
            }
        }
    }

    /// True when the node can appear in a boolean position.
    ///
    /// `TypeRef::None` is allowed: an open property of unknown type may
    /// legitimately be boolean at runtime.
    #[must_use]
    pub fn is_boolean_compatible(&self) -> bool {
        matches!(
            self.type_ref(),
            TypeRef::Primitive {
                kind: PrimitiveKind::Boolean,
                ..
            } | TypeRef::None
        )
    }
}

///
/// ExpressionError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ExpressionError {
    #[error("property '{name}' was not found on the current type")]
    UnresolvedIdentifier { name: String },

    #[error("path continues past collection-valued segment '{name}'")]
    PathBeyondCollection { name: String },

    #[error("'{name}' is not produced by the preceding transformation pipeline")]
    UnavailableAfterCollapse { name: String },

    #[error("expected a boolean operand, found '{found}'")]
    ExpectedBoolean { found: String },

    #[error("expected a numeric operand, found '{found}'")]
    ExpectedNumeric { found: String },

    #[error("expression path has no segments")]
    EmptyPath,
}

///
/// ExpressionBinder
///
/// Bind one filter/order-by/search/compute token to a typed value node
/// given the current binding context.
///

pub trait ExpressionBinder {
    fn bind(
        &self,
        token: &ExprToken,
        ctx: &mut BindingContext<'_>,
    ) -> Result<ValueNode, ExpressionError>;
}

///
/// ModelExpressionBinder
///
/// Built-in binder resolving paths against the metadata model.
///
/// Resolution order per segment:
/// 1. declared property on the current structured type (base chain);
/// 2. alias produced by a prior pipeline stage (root segment only);
/// 3. dynamic property, when the declaring type is open;
/// 4. otherwise a structured error.
///
/// Once the pipeline has collapsed the row shape, only produced aliases
/// resolve; raw entity properties are gone.
///

pub struct ModelExpressionBinder<'m> {
    model: &'m Model,
}

impl<'m> ModelExpressionBinder<'m> {
    #[must_use]
    pub const fn new(model: &'m Model) -> Self {
        Self { model }
    }

    fn bind_path(
        &self,
        segments: &[String],
        ctx: &BindingContext<'_>,
    ) -> Result<ValueNode, ExpressionError> {
        let Some((root, rest)) = segments.split_first() else {
            return Err(ExpressionError::EmptyPath);
        };

        let origin = ctx.current_variable();
        let mut node = ValueNode::RangeVariableRef {
            name: origin.name.clone(),
            type_ref: origin.type_ref.clone(),
        };

        if ctx.is_collapsed() {
            // CONTRACT: collapsed rows expose only pipeline-produced aliases.
            let Some(alias_type) = ctx.aggregated_alias(root) else {
                return Err(ExpressionError::UnavailableAfterCollapse {
                    name: root.clone(),
                });
            };
            node = ValueNode::OpenPropertyAccess {
                source: Box::new(node),
                name: root.clone(),
                type_ref: alias_type.clone(),
            };
            // Deeper segments on an alias are dynamic; their types are unknown.
            for segment in rest {
                node = ValueNode::OpenPropertyAccess {
                    source: Box::new(node),
                    name: segment.clone(),
                    type_ref: TypeRef::None,
                };
            }
            return Ok(node);
        }

        let mut current_type = self.model.structured_of(&origin.type_ref);
        for (index, segment) in segments.iter().enumerate() {
            if matches!(node, ValueNode::CollectionNavigation { .. }) {
                return Err(ExpressionError::PathBeyondCollection {
                    name: segments[index - 1].clone(),
                });
            }

            let declared = current_type
                .as_deref()
                .and_then(|ty| self.model.find_property(ty, segment))
                .cloned();

            match declared {
                Some(property) => {
                    current_type = self.model.structured_of(&property.ty);
                    if property.is_navigation() && property.ty.is_collection() {
                        let type_ref = property.ty.clone();
                        node = ValueNode::CollectionNavigation {
                            source: Box::new(node),
                            path: ResolvedPath::single(property),
                            type_ref,
                        };
                    } else {
                        node = ValueNode::PropertyAccess {
                            source: Box::new(node),
                            property,
                        };
                    }
                }
                None => {
                    let alias_type = if index == 0 {
                        ctx.aggregated_alias(segment).cloned()
                    } else {
                        None
                    };
                    let is_open = current_type.as_deref().is_some_and(|ty| ty.is_open);

                    let type_ref = match alias_type {
                        Some(ty) => ty,
                        None if is_open => TypeRef::None,
                        None => {
                            return Err(ExpressionError::UnresolvedIdentifier {
                                name: segment.clone(),
                            });
                        }
                    };

                    current_type = None;
                    node = ValueNode::OpenPropertyAccess {
                        source: Box::new(node),
                        name: segment.clone(),
                        type_ref,
                    };
                }
            }
        }

        Ok(node)
    }

    fn ensure_boolean(node: ValueNode) -> Result<ValueNode, ExpressionError> {
        if node.is_boolean_compatible() {
            Ok(node)
        } else {
            Err(ExpressionError::ExpectedBoolean {
                found: node.type_ref().to_string(),
            })
        }
    }

    fn ensure_numeric(node: &ValueNode) -> Result<(), ExpressionError> {
        let ty = node.type_ref();
        let numeric = match &ty {
            TypeRef::Primitive { kind, .. } => kind.is_numeric(),
            TypeRef::None => true,
            _ => false,
        };

        if numeric {
            Ok(())
        } else {
            Err(ExpressionError::ExpectedNumeric {
                found: ty.to_string(),
            })
        }
    }
}

impl ExpressionBinder for ModelExpressionBinder<'_> {
    fn bind(
        &self,
        token: &ExprToken,
        ctx: &mut BindingContext<'_>,
    ) -> Result<ValueNode, ExpressionError> {
        match token {
            ExprToken::Path(segments) => self.bind_path(segments, ctx),
            ExprToken::Literal(value) => Ok(ValueNode::Literal(value.clone())),
            ExprToken::Compare { op, left, right } => {
                let left = self.bind(left, ctx)?;
                let right = self.bind(right, ctx)?;
                Ok(ValueNode::Compare {
                    op: *op,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            ExprToken::Logical { op, left, right } => {
                let left = Self::ensure_boolean(self.bind(left, ctx)?)?;
                let right = Self::ensure_boolean(self.bind(right, ctx)?)?;
                Ok(ValueNode::Logical {
                    op: *op,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            ExprToken::Not(inner) => {
                let inner = Self::ensure_boolean(self.bind(inner, ctx)?)?;
                Ok(ValueNode::Not(Box::new(inner)))
            }
            ExprToken::Arith { op, left, right } => {
                let left = self.bind(left, ctx)?;
                let right = self.bind(right, ctx)?;
                Self::ensure_numeric(&left)?;
                Self::ensure_numeric(&right)?;

                // The result type follows the left operand; widening rules
                // belong to the evaluator, not the binder.
                let type_ref = match left.type_ref() {
                    TypeRef::None => right.type_ref(),
                    ty => ty,
                };
                Ok(ValueNode::Arith {
                    op: *op,
                    left: Box::new(left),
                    right: Box::new(right),
                    type_ref,
                })
            }
        }
    }
}

///
/// TESTS
///
