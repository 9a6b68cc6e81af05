use std::{collections::HashMap, fmt, future::Future, sync::Arc};

use serde_json::Value;

use crate::ast::Output;

/// Registered function: receives the positional arguments of a function node.
pub type Function = Arc<dyn Fn(&[Value]) -> Output + Send + Sync>;

// name -> function, read-only while an evaluation runs
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F, R>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Output>,
    {
        let function: Function = Arc::new(move |args: &[Value]| -> Output { f(args).into() });
        self.functions.insert(name.to_string(), function);
        self
    }

    /// Registers a function whose result is produced by a future. The
    /// arguments are cloned into the future.
    pub fn register_async<F, Fut>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Into<Value>,
    {
        let function: Function =
            Arc::new(move |args: &[Value]| Output::deferred(f(args.to_vec())));
        self.functions.insert(name.to_string(), function);
        self
    }

    /// Builder form of [`FunctionRegistry::register`].
    pub fn with<F, R>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Output>,
    {
        self.register(name, f);
        self
    }

    /// Builder form of [`FunctionRegistry::register_async`].
    pub fn with_async<F, Fut>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Into<Value>,
    {
        self.register_async(name, f);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Per-call evaluation options.
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    pub fns: FunctionRegistry,
}

impl EvalOptions {
    pub fn new(fns: FunctionRegistry) -> Self {
        Self { fns }
    }
}

impl From<FunctionRegistry> for EvalOptions {
    fn from(fns: FunctionRegistry) -> Self {
        Self::new(fns)
    }
}
