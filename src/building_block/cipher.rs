use crate::building_block::{
  util::xor_vecs,
  wire_key::WireKey,
};
use crate::error::{Error, Result};
use sha3::{Digest, Sha3_256};

const TAG_BYTES: usize = 16;

// Capability seam for the symmetric primitive used on garbled-table cells.
// Decryption with the matching key pair recovers the bit; decryption with any
// other pair must fail detectably instead of yielding a plausible wrong bit.
pub trait GateCipher {
  fn encrypt(&self, value: bool, key_a: &WireKey, key_b: &WireKey) -> String;

  fn decrypt(&self, ciphertext: &str, key_a: &WireKey, key_b: &WireKey) -> Result<bool>;
}

// One-time pad over a SHA3-256 mask of the two key secrets. The plaintext
// carries a zero redundancy tag so a wrong-key decryption is caught.
pub struct Sha3GateCipher;

impl Sha3GateCipher {
  fn mask(key_a: &WireKey, key_b: &WireKey) -> Vec<u8> {
    let mut hasher = Sha3_256::new();
    hasher.update(&key_a.secret);
    hasher.update(&key_b.secret);
    hasher.finalize().to_vec()
  }
}

impl GateCipher for Sha3GateCipher {
  fn encrypt(&self, value: bool, key_a: &WireKey, key_b: &WireKey) -> String {
    let mut plaintext = vec![value as u8];
    plaintext.extend_from_slice(&[0u8; TAG_BYTES]);

    let mask = Self::mask(key_a, key_b);
    hex::encode(xor_vecs(&plaintext, &mask[..plaintext.len()]))
  }

  fn decrypt(&self, ciphertext: &str, key_a: &WireKey, key_b: &WireKey) -> Result<bool> {
    let bytes = hex::decode(ciphertext).map_err(|_| Error::CiphertextIntegrity)?;
    if bytes.len() != TAG_BYTES + 1 {
      return Err(Error::CiphertextIntegrity);
    }

    let mask = Self::mask(key_a, key_b);
    let plaintext = xor_vecs(&bytes, &mask[..bytes.len()]);

    if plaintext[1..].iter().any(|b| *b != 0) {
      return Err(Error::CiphertextIntegrity);
    }
    match plaintext[0] {
      0 => Ok(false),
      1 => Ok(true),
      _ => Err(Error::CiphertextIntegrity),
    }
  }
}
