use crate::{
    model::TypeRef,
    semantic::{apply::ApplyError, expression::ValueNode},
};

///
/// GroupByPropertyNode
///
/// One node in the group-key forest. Leaves carry the bound access
/// expression; container nodes exist only to share a path prefix.
///

#[derive(Clone, Debug, PartialEq)]
pub struct GroupByPropertyNode {
    pub name: String,
    pub expr: Option<ValueNode>,
    pub type_ref: TypeRef,
    pub children: Vec<GroupByPropertyNode>,
}

impl GroupByPropertyNode {
    fn container(name: String, type_ref: TypeRef) -> Self {
        Self {
            name,
            expr: None,
            type_ref,
            children: Vec::new(),
        }
    }
}

/// Build the group-key forest from bound key expressions.
///
/// Each key must be a property-access chain rooted at a range variable.
/// Keys sharing a path prefix share container nodes; a key listed twice
/// collapses onto one leaf. Root order follows first appearance.
pub fn build_tree(keys: &[ValueNode]) -> Result<Vec<GroupByPropertyNode>, ApplyError> {
    let mut forest: Vec<GroupByPropertyNode> = Vec::new();

    for key in keys {
        let chain = access_chain(key)?;
        attach(&mut forest, &chain, key);
    }

    Ok(forest)
}

/// Flatten a bound key into root-to-leaf (name, type) segments.
fn access_chain(node: &ValueNode) -> Result<Vec<(String, TypeRef)>, ApplyError> {
    let mut chain: Vec<(String, TypeRef)> = Vec::new();
    let mut current = node;

    loop {
        match current {
            ValueNode::PropertyAccess { source, property } => {
                chain.push((property.name.clone(), property.ty.clone()));
                current = source;
            }
            ValueNode::OpenPropertyAccess {
                source,
                name,
                type_ref,
            } => {
                chain.push((name.clone(), type_ref.clone()));
                current = source;
            }
            ValueNode::RangeVariableRef { .. } => break,
            _ => return Err(ApplyError::UnsupportedGroupByExpression),
        }
    }

    if chain.is_empty() {
        return Err(ApplyError::UnsupportedGroupByExpression);
    }

    chain.reverse();
    Ok(chain)
}

fn attach(forest: &mut Vec<GroupByPropertyNode>, chain: &[(String, TypeRef)], key: &ValueNode) {
    let Some(((name, type_ref), rest)) = chain.split_first() else {
        return;
    };

    let index = forest
        .iter()
        .position(|node| node.name == *name)
        .unwrap_or_else(|| {
            forest.push(GroupByPropertyNode::container(
                name.clone(),
                type_ref.clone(),
            ));
            forest.len() - 1
        });

    if rest.is_empty() {
        forest[index].expr = Some(key.clone());
        forest[index].type_ref = type_ref.clone();
    } else {
        attach(&mut forest[index].children, rest, key);
    }
}

///
/// TESTS
///
