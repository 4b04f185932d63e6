use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised while assembling a constraint model.
///
/// These always indicate a caller bug: factors must only ever reference
/// variables that were registered first, and a variable's domain is fixed at
/// registration. Search outcomes (including unsolvable models) are never
/// reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("variable {0} is not registered in the model")]
    UnknownVariable(String),
    #[error("variable {0} was re-registered with a different domain")]
    DomainConflict(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<ModelError>,
        backtrace: Box<Backtrace>,
    },
}

impl From<ModelError> for Error {
    fn from(inner: ModelError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
