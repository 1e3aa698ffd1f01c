use thiserror::Error;

/// Misuse of [CookieOptions](crate::CookieOptions) for the requested operation.
///
/// These are programmer errors: they are returned synchronously and nothing is written.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum InvalidOptionsError {
    #[error("HTTP only cookies cannot be written from this context")]
    HttpOnly,
    #[error("signed cookies cannot be written from this context")]
    Signed,
    #[error("the `expires` and `max_age` options are mutually exclusive")]
    ExpiresAndMaxAge,
    #[error("the serialized cookie is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },
    #[error("the `{0}` option cannot be used when clearing a cookie")]
    NotAllowedOnClear(&'static str),
    #[error("the `{0}` option cannot be used when reading a cookie")]
    NotAllowedOnRead(&'static str),
    #[error("invalid cookie name")]
    InvalidName,
    #[error("raw cookie value contains characters that cannot be sent in a header")]
    InvalidValue,
}

/// The error returned by every fallible cookie operation
#[derive(Error, Debug, PartialEq)]
pub enum CookieError {
    #[error(transparent)]
    InvalidOptions(#[from] InvalidOptionsError),
    #[error("`{0}` does not exist")]
    NotFound(String),
    #[error("Failed to deserialize `{0}` to type `{1}`")]
    Deserialization(String, String),
}
