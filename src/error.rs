use thiserror::Error;

use crate::comparator::ComparatorError;
use crate::dispatcher::{DispatchError, HandlerError};
use crate::event::EventError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Event error: {0}")]
    Event(#[from] EventError),
    #[error("Comparator error: {0}")]
    Comparator(#[from] ComparatorError),
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
