use thiserror::Error;

use crate::eval::evaluator::EvalError;

#[derive(Error, Debug)]
pub enum Error {
    // eval error
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    // config
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    /// Returns the evaluation error if this error came out of an evaluation.
    pub fn as_eval(&self) -> Option<&EvalError> {
        match self {
            Error::Eval(e) => Some(e),
            _ => None,
        }
    }
}
