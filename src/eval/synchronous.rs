use core::fmt;

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::trace;

use crate::{ast::Node, function_registry::FunctionRegistry};

use super::{
    classifier::{classify, function_args, CallKind, NodeKind, Operator},
    context::SyncContext,
    evaluator::{EvalError, EvalResult},
    invocation::{expect_bool, invoke_sync},
};

/// Outcome of a synchronous evaluation.
#[derive(Debug)]
pub enum Evaluation {
    Ready(bool),
    /// Unresolved output of the root predicate or function.
    Deferred(Deferred),
}

impl Evaluation {
    pub fn ready(&self) -> Option<bool> {
        match self {
            Evaluation::Ready(b) => Some(*b),
            Evaluation::Deferred(_) => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Evaluation::Deferred(_))
    }

    /// Awaits a deferred outcome and checks that it resolved to a boolean.
    pub async fn resolve(self) -> EvalResult<bool> {
        match self {
            Evaluation::Ready(b) => Ok(b),
            Evaluation::Deferred(deferred) => deferred.resolve().await,
        }
    }
}

pub struct Deferred {
    kind: CallKind,
    future: BoxFuture<'static, Value>,
}

impl Deferred {
    pub(crate) fn new(kind: CallKind, future: BoxFuture<'static, Value>) -> Self {
        Self { kind, future }
    }

    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// The resolved value exactly as produced, without a type check.
    pub async fn into_value(self) -> Value {
        self.future.await
    }

    pub async fn resolve(self) -> EvalResult<bool> {
        let kind = self.kind;
        expect_bool(kind, self.future.await)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Deferred").field("kind", &self.kind).finish()
    }
}

pub struct SyncEvaluator<'a> {
    fns: &'a FunctionRegistry,
}

impl<'a> SyncEvaluator<'a> {
    pub fn new(fns: &'a FunctionRegistry) -> Self {
        Self { fns }
    }

    pub fn eval(&self, root: &Node) -> EvalResult<Evaluation> {
        let mut context = SyncContext::new();
        self.eval_node(root, &mut context)
    }

    fn eval_node(&self, node: &Node, context: &mut SyncContext) -> EvalResult<Evaluation> {
        context.visit();
        match classify(node)? {
            NodeKind::Literal(b) => Ok(Evaluation::Ready(b)),
            NodeKind::Predicate(predicate) => {
                invoke_sync(CallKind::Callback, predicate.call(), context)
            }
            NodeKind::Operator { op, operands } => self
                .eval_operator(op, operands, context)
                .map(Evaluation::Ready),
            NodeKind::Function { name, args } => {
                let function = self
                    .fns
                    .get(name)
                    .ok_or_else(|| EvalError::UndefinedFunction(name.to_string()))?;
                let args = function_args(args)?;
                trace!(function = name, args = ?args, "calling function");
                invoke_sync(CallKind::Function, function(args.as_slice()), context)
            }
        }
    }

    fn eval_operator(
        &self,
        op: Operator,
        operands: &[Node],
        context: &mut SyncContext,
    ) -> EvalResult<bool> {
        let deciding = op.deciding_value();
        for (i, operand) in operands.iter().enumerate() {
            if self.eval_operand(operand, context)? == deciding {
                trace!(%op, decided_at = i, "short-circuit");
                return Ok(deciding);
            }
        }
        Ok(op.fallthrough_value())
    }

    fn eval_operand(&self, operand: &Node, context: &mut SyncContext) -> EvalResult<bool> {
        match self.eval_node(operand, context)? {
            Evaluation::Ready(b) => Ok(b),
            // operands are never the root visit
            Evaluation::Deferred(deferred) => {
                Err(EvalError::UnexpectedNestedPromise(deferred.kind()))
            }
        }
    }
}
