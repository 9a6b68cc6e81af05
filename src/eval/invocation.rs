use serde_json::Value;
use tracing::trace;

use crate::ast::Output;

use super::{
    classifier::CallKind,
    context::SyncContext,
    evaluator::{EvalError, EvalResult},
    synchronous::{Deferred, Evaluation},
};

/// Checks the output of a call made by the synchronous evaluator. Deferred
/// output is handed back unresolved when it comes from the root node and is
/// rejected anywhere else.
pub fn invoke_sync(kind: CallKind, output: Output, context: &SyncContext) -> EvalResult<Evaluation> {
    match output {
        Output::Ready(value) => expect_bool(kind, value).map(Evaluation::Ready),
        Output::Deferred(future) if context.is_root_visit() => {
            trace!(%kind, "deferred root result passed through");
            Ok(Evaluation::Deferred(Deferred::new(kind, future)))
        }
        Output::Deferred(_) => Err(EvalError::UnexpectedNestedPromise(kind)),
    }
}

/// Awaits the output of a call made by the asynchronous evaluator and checks
/// the resolved value.
pub async fn invoke_async(kind: CallKind, output: Output) -> EvalResult<bool> {
    let value = match output {
        Output::Ready(value) => value,
        Output::Deferred(future) => future.await,
    };
    expect_bool(kind, value)
}

pub fn expect_bool(kind: CallKind, value: Value) -> EvalResult<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::unexpected_return_type(kind, &other)),
    }
}
