/// Core error type for toolgate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("unknown model: {0}")]
    UnknownModel(String),
}
