//! Expression Evaluation
//!
//! Turns an expression tree into a single boolean. Two evaluators share one
//! grammar:
//!
//! ## Synchronous Evaluator
//! Never suspends. A predicate or function at the root may return a deferred
//! result, which is handed back unresolved as [`synchronous::Evaluation::Deferred`];
//! the same result anywhere below the root is an error.
//!
//! ## Asynchronous Evaluator
//! Awaits every predicate and function result before checking it. Operands
//! of `$and`/`$or` are awaited one at a time, left to right.
//!
//! # Evaluation Pipeline
//!
//! 1. The [`classifier`] maps a node to its grammar case
//! 2. Operators recurse into their operands until one decides the result
//! 3. Predicates and functions go through the [`invocation`] guard
//! 4. The first error aborts the whole walk

pub mod asynchronous;
pub mod classifier;
pub mod context;
pub mod evaluator;
pub mod invocation;
pub mod synchronous;
