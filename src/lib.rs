//! # booleval: declarative boolean expressions
//!
//! Conditional logic written as data. An expression is a tree of
//!
//! - boolean literals,
//! - predicates (zero-argument callables),
//! - operator nodes `{ "$and": [...] }` / `{ "$or": [...] }`,
//! - function nodes `{ "name": args }` dispatched to a [`FunctionRegistry`],
//!
//! evaluated into a single boolean, either synchronously or asynchronously.
//!
//! ```text
//! Node → Classifier → Operator / Predicate / Function / Literal → bool
//! ```
//!
//! Trees can be built in code with the [`Node`] helpers or deserialized from
//! JSON with serde.
//!
//! ## Entry points
//!
//! [`evaluate_sync`] and [`evaluate_async`] treat an absent root as `false`.
//! [`evaluate_sync_strict`] and [`evaluate_async_strict`] reject it with
//! [`EvalError::ExpectedExpression`]. [`Evaluator`] carries an
//! [`EvaluatorConfig`] for callers that load the policy from configuration.

pub mod ast;
pub mod config;
pub mod error;
pub mod eval;
pub mod function_registry;

// Re-exports
pub use ast::{Node, Output, Predicate};
pub use config::{EvaluatorConfig, MissingRoot};
pub use error::*;
pub use eval::{
    classifier::{CallKind, Operator},
    evaluator::{EvalError, EvalResult, Evaluator},
    synchronous::{Deferred, Evaluation},
};
pub use function_registry::{EvalOptions, Function, FunctionRegistry};

use eval::evaluator::{run_async, run_sync};

/// Evaluates `expression` without suspending. An absent or null root
/// evaluates to `false`.
pub fn evaluate_sync(expression: Option<&Node>, options: &EvalOptions) -> EvalResult<Evaluation> {
    run_sync(MissingRoot::DefaultFalse, expression, &options.fns)
}

/// Evaluates `expression`, awaiting deferred results at any depth. An absent
/// or null root evaluates to `false`.
pub async fn evaluate_async(expression: Option<&Node>, options: &EvalOptions) -> EvalResult<bool> {
    run_async(MissingRoot::DefaultFalse, expression, &options.fns).await
}

/// Like [`evaluate_sync`], but an absent root is an error.
pub fn evaluate_sync_strict(
    expression: Option<&Node>,
    options: &EvalOptions,
) -> EvalResult<Evaluation> {
    run_sync(MissingRoot::Error, expression, &options.fns)
}

/// Like [`evaluate_async`], but an absent root is an error.
pub async fn evaluate_async_strict(
    expression: Option<&Node>,
    options: &EvalOptions,
) -> EvalResult<bool> {
    run_async(MissingRoot::Error, expression, &options.fns).await
}
