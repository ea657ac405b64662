use crate::error::{Error, Result};
use rand::{
  rngs::StdRng,
  RngCore,
};

pub const KEY_BYTES: usize = 16;

// A wire key is bound to one (wire, bit value) slot of the garbler's key
// table at creation. The pointer indexes garbled-table cells directly and is
// decoupled from the bound bit value by the permutation coins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireKey {
  pub secret: Vec<u8>,
  pub pointer: u8,
}

impl WireKey {
  // The secret is drawn from the owning party's CSPRNG, never derived from
  // the bit value it stands for.
  pub fn generate(pointer: u8, rng: &mut StdRng) -> Self {
    let mut secret = vec![0u8; KEY_BYTES];
    rng.fill_bytes(&mut secret);
    WireKey { secret, pointer }
  }

  // Reversible text encoding: hex of the secret, then the pointer digit.
  pub fn serialize(&self) -> String {
    format!("{},{}", hex::encode(&self.secret), self.pointer)
  }

  pub fn deserialize(s: &str) -> Result<Self> {
    let (secret_hex, pointer_str) = s.rsplit_once(',').ok_or_else(|| {
      Error::MalformedKeyEncoding("missing pointer separator".into())
    })?;
    if secret_hex.is_empty() {
      return Err(Error::MalformedKeyEncoding("empty secret".into()));
    }
    let secret = hex::decode(secret_hex).map_err(|e| {
      Error::MalformedKeyEncoding(format!("bad secret hex: {}", e))
    })?;
    let pointer = match pointer_str {
      "0" => 0,
      "1" => 1,
      other => {
        return Err(Error::MalformedKeyEncoding(format!(
          "pointer {:?} is not 0 or 1", other,
        )));
      },
    };
    Ok(WireKey { secret, pointer })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;

  #[test]
  fn test_round_trip() {
    let mut rng = StdRng::seed_from_u64(11);
    for pointer in [0, 1] {
      let key = WireKey::generate(pointer, &mut rng);
      let round_tripped = WireKey::deserialize(&key.serialize()).unwrap();
      assert!(round_tripped == key);
    }
  }

  #[test]
  fn test_generated_secrets_differ() {
    let mut rng = StdRng::seed_from_u64(12);
    let k1 = WireKey::generate(0, &mut rng);
    let k2 = WireKey::generate(0, &mut rng);
    assert!(k1.secret != k2.secret);
  }

  #[test]
  fn test_missing_separator_is_rejected() {
    let res = WireKey::deserialize("deadbeef");
    assert!(matches!(res, Err(Error::MalformedKeyEncoding(_))));
  }

  #[test]
  fn test_bad_hex_is_rejected() {
    let res = WireKey::deserialize("zz,1");
    assert!(matches!(res, Err(Error::MalformedKeyEncoding(_))));
  }

  #[test]
  fn test_truncated_secret_is_rejected() {
    // odd number of hex digits cannot round-trip
    let res = WireKey::deserialize("deadbee,0");
    assert!(matches!(res, Err(Error::MalformedKeyEncoding(_))));
  }

  #[test]
  fn test_empty_secret_is_rejected() {
    let res = WireKey::deserialize(",1");
    assert!(matches!(res, Err(Error::MalformedKeyEncoding(_))));
  }

  #[test]
  fn test_out_of_range_pointer_is_rejected() {
    let res = WireKey::deserialize("deadbeef,2");
    assert!(matches!(res, Err(Error::MalformedKeyEncoding(_))));
  }
}
