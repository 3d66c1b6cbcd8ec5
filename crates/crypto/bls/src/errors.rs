use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum BLSError {
    #[error("invalid byte length, expected {expected} got {actual}")]
    InvalidByteLength { expected: usize, actual: usize },
    #[error("invalid hex string")]
    InvalidHexString,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("cannot aggregate an empty set of public keys")]
    EmptyAggregate,
    #[error("pubkey count {pubkeys} does not match message count {messages}")]
    MessageCountMismatch { pubkeys: usize, messages: usize },
    #[cfg(feature = "supranational")]
    #[error("blst error: {0}")]
    BlstError(String),
}
