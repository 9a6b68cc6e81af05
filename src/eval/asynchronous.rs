use async_recursion::async_recursion;
use tracing::trace;

use crate::{ast::Node, function_registry::FunctionRegistry};

use super::{
    classifier::{classify, function_args, CallKind, NodeKind, Operator},
    evaluator::{EvalError, EvalResult},
    invocation::invoke_async,
};

/// Walks a tree awaiting every predicate and function result. Operands are
/// awaited one after another, never concurrently.
pub struct AsyncEvaluator<'a> {
    fns: &'a FunctionRegistry,
}

impl<'a> AsyncEvaluator<'a> {
    pub fn new(fns: &'a FunctionRegistry) -> Self {
        Self { fns }
    }

    pub async fn eval(&self, root: &Node) -> EvalResult<bool> {
        self.eval_node(root).await
    }

    #[async_recursion]
    async fn eval_node(&self, node: &Node) -> EvalResult<bool> {
        match classify(node)? {
            NodeKind::Literal(b) => Ok(b),
            NodeKind::Predicate(predicate) => {
                invoke_async(CallKind::Callback, predicate.call()).await
            }
            NodeKind::Operator { op, operands } => self.eval_operator(op, operands).await,
            NodeKind::Function { name, args } => {
                let function = self
                    .fns
                    .get(name)
                    .ok_or_else(|| EvalError::UndefinedFunction(name.to_string()))?;
                let args = function_args(args)?;
                trace!(function = name, args = ?args, "calling function");
                let output = function(args.as_slice());
                invoke_async(CallKind::Function, output).await
            }
        }
    }

    async fn eval_operator(&self, op: Operator, operands: &[Node]) -> EvalResult<bool> {
        let deciding = op.deciding_value();
        for (i, operand) in operands.iter().enumerate() {
            if self.eval_node(operand).await? == deciding {
                trace!(%op, decided_at = i, "short-circuit");
                return Ok(deciding);
            }
        }
        Ok(op.fallthrough_value())
    }
}
