use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    ast::Node,
    config::{EvaluatorConfig, MissingRoot},
    function_registry::{EvalOptions, FunctionRegistry},
};

use super::{
    asynchronous::AsyncEvaluator,
    classifier::CallKind,
    synchronous::{Evaluation, SyncEvaluator},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Expected an expression")]
    ExpectedExpression,
    #[error("Unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("Unrecognized operator: '{0}'")]
    UnrecognizedOperator(String),
    #[error("Undefined function: '{0}'")]
    UndefinedFunction(String),
    #[error("Unexpected return type [{found}] from a {kind}")]
    UnexpectedReturnType { kind: CallKind, found: &'static str },
    #[error("Unexpected nested promise {0}")]
    UnexpectedNestedPromise(CallKind),
}

pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub fn unexpected_token(node: &Node) -> Self {
        EvalError::UnexpectedToken(node.to_string())
    }

    pub fn unexpected_return_type(kind: CallKind, value: &Value) -> Self {
        EvalError::UnexpectedReturnType {
            kind,
            found: type_name(value),
        }
    }
}

/// Name used for a value's type in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Entry point owning the configuration and the function registry.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
    options: EvalOptions,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig, options: EvalOptions) -> Self {
        Self { config, options }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Evaluates without suspending. A deferred result is only accepted from
    /// the root node and is handed back unresolved.
    #[instrument(level = "debug", skip(self, expression))]
    pub fn evaluate_sync(&self, expression: Option<&Node>) -> EvalResult<Evaluation> {
        run_sync(self.config.missing_root, expression, &self.options.fns)
    }

    #[instrument(level = "debug", skip(self, expression))]
    pub async fn evaluate_async(&self, expression: Option<&Node>) -> EvalResult<bool> {
        run_async(self.config.missing_root, expression, &self.options.fns).await
    }
}

pub(crate) fn run_sync(
    missing_root: MissingRoot,
    expression: Option<&Node>,
    fns: &FunctionRegistry,
) -> EvalResult<Evaluation> {
    let Some(root) = missing_root.root(expression)? else {
        debug!("no expression, evaluating to false");
        return Ok(Evaluation::Ready(false));
    };
    let result = SyncEvaluator::new(fns).eval(root);
    debug!(ready = ?result.as_ref().map(Evaluation::ready), "sync evaluation finished");
    result
}

pub(crate) async fn run_async(
    missing_root: MissingRoot,
    expression: Option<&Node>,
    fns: &FunctionRegistry,
) -> EvalResult<bool> {
    let Some(root) = missing_root.root(expression)? else {
        debug!("no expression, evaluating to false");
        return Ok(false);
    };
    let result = AsyncEvaluator::new(fns).eval(root).await;
    debug!(result = ?result, "async evaluation finished");
    result
}
