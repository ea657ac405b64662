use thiserror::Error;

// Every failure in the protocol surfaces as one of these kinds. A wrong
// silent output is a correctness violation for a computation primitive, so
// nothing here is ever coerced into a default boolean.
#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed key encoding: {0}")]
  MalformedKeyEncoding(String),

  #[error("circuit invariant violation: {0}")]
  CircuitInvariantViolation(String),

  #[error("ciphertext symbol out of range: {0}")]
  OutOfRangeCiphertext(String),

  #[error("protocol misuse: {0}")]
  ProtocolMisuse(String),

  #[error("garbled cell does not decrypt under the supplied key pair")]
  CiphertextIntegrity,

  #[error("unsupported circuit shape: {0}")]
  UnsupportedCircuit(String),

  #[error("trapdoor permutation key generation failed: {0}")]
  TrapdoorKeyGen(String),
}

pub type Result<T> = std::result::Result<T, Error>;
