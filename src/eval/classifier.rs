use std::str::FromStr;

use tracing::trace;

use crate::ast::{Node, Predicate};

use super::evaluator::{EvalError, EvalResult};

pub const OPERATOR_SIGIL: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum Operator {
    #[strum(serialize = "$and")]
    And,
    #[strum(serialize = "$or")]
    Or,
}

impl Operator {
    /// The child result that decides the whole operator: the first `true`
    /// under `$or`, the first `false` under `$and`.
    pub fn deciding_value(self) -> bool {
        match self {
            Operator::Or => true,
            Operator::And => false,
        }
    }

    /// Result when no child decided.
    pub fn fallthrough_value(self) -> bool {
        !self.deciding_value()
    }
}

/// Who produced a result, as reported in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CallKind {
    Callback,
    Function,
}

// Grammar case of a single node
#[derive(Debug)]
pub enum NodeKind<'a> {
    Literal(bool),
    Predicate(&'a Predicate),
    Operator {
        op: Operator,
        operands: &'a [Node],
    },
    Function {
        name: &'a str,
        args: &'a Node,
    },
}

/// Classifies `node` as a grammar case. Priority is boolean, predicate, map;
/// everything else is rejected.
pub fn classify(node: &Node) -> EvalResult<NodeKind<'_>> {
    match node {
        Node::Bool(b) => Ok(NodeKind::Literal(*b)),
        Node::Predicate(predicate) => Ok(NodeKind::Predicate(predicate)),
        Node::Map(entries) => {
            let Some((key, value)) = entries.first() else {
                return Err(EvalError::unexpected_token(node));
            };
            if entries.len() > 1 {
                trace!(key = %key, ignored = entries.len() - 1, "extra map entries ignored");
            }
            classify_entry(key, value)
        }
        Node::Null | Node::Number(_) | Node::String(_) | Node::List(_) => {
            Err(EvalError::unexpected_token(node))
        }
    }
}

fn classify_entry<'a>(key: &'a str, value: &'a Node) -> EvalResult<NodeKind<'a>> {
    if let Ok(op) = Operator::from_str(key) {
        return match value {
            Node::List(operands) => Ok(NodeKind::Operator { op, operands }),
            other => Err(EvalError::unexpected_token(other)),
        };
    }
    if key.starts_with(OPERATOR_SIGIL) {
        return Err(EvalError::UnrecognizedOperator(key.to_string()));
    }
    Ok(NodeKind::Function { name: key, args: value })
}

/// Positional arguments of a function node: a list is spread, any other
/// value becomes the only argument.
pub fn function_args(args: &Node) -> EvalResult<Vec<serde_json::Value>> {
    match args {
        Node::List(items) => items.iter().map(Node::to_value).collect(),
        other => Ok(vec![other.to_value()?]),
    }
}
