use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use booleval::{FunctionRegistry, Node};
use serde_json::Value;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// `any(target, values)` and `all(targets, values)` membership helpers.
#[allow(dead_code)]
pub fn membership_fns() -> FunctionRegistry {
    FunctionRegistry::new()
        .with("any", |args: &[Value]| match (args.first(), args.get(1)) {
            (Some(target), Some(Value::Array(values))) => values.contains(target),
            _ => false,
        })
        .with("all", |args: &[Value]| match (args.first(), args.get(1)) {
            (Some(Value::Array(targets)), Some(Value::Array(values))) => {
                targets.iter().all(|target| values.contains(target))
            }
            _ => false,
        })
}

/// Predicate returning `result` and counting how often it ran.
#[allow(dead_code)]
pub fn counted(result: bool, calls: &Arc<AtomicUsize>) -> Node {
    let calls = calls.clone();
    Node::predicate(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        result
    })
}
