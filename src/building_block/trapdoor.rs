use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rsa::{
  traits::{PrivateKeyParts, PublicKeyParts},
  RsaPrivateKey,
};
use rug::{
  integer::Order,
  Integer,
};
use serde::{Deserialize, Serialize};

// Demo-grade modulus size. A deployment would use 2048 bits or more.
pub const TRAPDOOR_MODULUS_BITS: usize = 512;

// Public half of a trapdoor permutation: x -> x^e mod n. Easy to compute
// forward, invertible only with the private exponent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapdoorPublicKey {
  pub n: Integer,
  pub e: Integer,
}

impl TrapdoorPublicKey {
  pub fn forward(&self, x: &Integer) -> Integer {
    x.clone()
      .pow_mod(&self.e, &self.n)
      .expect("public exponent is non-negative")
  }
}

#[derive(Clone, Debug)]
pub struct TrapdoorKeyPair {
  pub public_key: TrapdoorPublicKey,
  private_exponent_d: Integer,
}

fn to_integer(bytes: &[u8]) -> Integer {
  Integer::from_digits(bytes, Order::Msf)
}

impl TrapdoorKeyPair {
  // Key material comes from the rsa crate's generator; n, e and d are then
  // lifted into rug integers for the raw modular arithmetic the oblivious
  // transfer needs.
  pub fn generate(bits: usize, rng: &mut StdRng) -> Result<Self> {
    let sk = RsaPrivateKey::new(rng, bits)
      .map_err(|e| Error::TrapdoorKeyGen(e.to_string()))?;

    let n = to_integer(&sk.n().to_bytes_be());
    let e = to_integer(&sk.e().to_bytes_be());
    let d = to_integer(&sk.d().to_bytes_be());

    Ok(TrapdoorKeyPair {
      public_key: TrapdoorPublicKey { n, e },
      private_exponent_d: d,
    })
  }

  pub fn invert(&self, y: &Integer) -> Integer {
    y.clone()
      .pow_mod(&self.private_exponent_d, &self.public_key.n)
      .expect("private exponent is non-negative")
  }
}
