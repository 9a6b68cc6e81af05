use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{
    ast::Node,
    eval::evaluator::{EvalError, EvalResult},
    InternalResult,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    #[serde(default)]
    pub missing_root: MissingRoot,
}

impl EvaluatorConfig {
    pub fn strict() -> Self {
        Self {
            missing_root: MissingRoot::Error,
        }
    }
}

/// What an absent root expression evaluates to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRoot {
    /// Absent or null root evaluates to `false`.
    #[default]
    DefaultFalse,
    /// Absent root fails with `Expected an expression`.
    Error,
}

impl MissingRoot {
    /// Picks the node to walk. `None` means the evaluation is `false` without
    /// walking anything.
    pub fn root<'a>(self, expression: Option<&'a Node>) -> EvalResult<Option<&'a Node>> {
        match (expression, self) {
            (None, MissingRoot::Error) => Err(EvalError::ExpectedExpression),
            (None, MissingRoot::DefaultFalse) => Ok(None),
            (Some(node), MissingRoot::DefaultFalse) if node.is_null() => Ok(None),
            (Some(node), _) => Ok(Some(node)),
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)?;
    Ok(config)
}
