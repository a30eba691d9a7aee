use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZeroTrustError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("unknown {kind} token: {value}")]
    UnknownToken { kind: &'static str, value: String },
}
