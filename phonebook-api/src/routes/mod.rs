pub(crate) mod error;
pub(crate) mod phonebooks;

pub(crate) use error::ApiError;
