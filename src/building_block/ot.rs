use crate::building_block::{
  trapdoor::{TrapdoorKeyPair, TrapdoorPublicKey, TRAPDOOR_MODULUS_BITS},
  util::random_below,
};
use crate::error::{Error, Result};
use rand::{
  rngs::StdRng,
  SeedableRng,
};
use rug::{
  ops::RemRounding,
  Integer,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

// 1-2 Oblivious Transfer in the semi-honest model. The sender holds two
// messages and delivers exactly one; the receiver's choice bit stays hidden
// from the sender, the unchosen message stays hidden from the receiver.
//
// Three-message exchange:
//   1. sender publishes (n, e, x0, x1)
//   2. receiver sends v = (x_b + k)^e mod n
//   3. sender sends both messages, each masked by k_i = v^d - x_i mod n
// The receiver can strip the mask only at index b, where k_b equals its own k.

// First protocol message. The blinding seeds x0 and x1 are not secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtPublicInputs {
  pub public_key: TrapdoorPublicKey,
  pub x0: Integer,
  pub x1: Integer,
}

pub struct OtSender {
  message0: String,
  message1: String,
  key_pair: TrapdoorKeyPair,
  x0: Integer,
  x1: Integer,
}

impl OtSender {
  pub fn new(message0: String, message1: String) -> Result<Self> {
    Self::with_rng(message0, message1, StdRng::from_entropy())
  }

  pub fn from_seed(message0: String, message1: String, seed: u64) -> Result<Self> {
    Self::with_rng(message0, message1, StdRng::seed_from_u64(seed))
  }

  fn with_rng(message0: String, message1: String, mut rng: StdRng) -> Result<Self> {
    let key_pair = TrapdoorKeyPair::generate(TRAPDOOR_MODULUS_BITS, &mut rng)?;
    let x0 = random_below(&key_pair.public_key.n, &mut rng);
    let x1 = random_below(&key_pair.public_key.n, &mut rng);

    Ok(OtSender {
      message0,
      message1,
      key_pair,
      x0,
      x1,
    })
  }

  pub fn public_inputs(&self) -> OtPublicInputs {
    OtPublicInputs {
      public_key: self.key_pair.public_key.clone(),
      x0: self.x0.clone(),
      x1: self.x1.clone(),
    }
  }

  // v^d mod n recovers x_b + k exactly, so the mask at the receiver's index
  // equals the receiver's own k. The other mask stays unrecoverable without
  // the matching blinding seed.
  pub fn encrypt_messages(&self, v: &Integer) -> Result<(Vec<Integer>, Vec<Integer>)> {
    let n = &self.key_pair.public_key.n;
    let xb_plus_k = self.key_pair.invert(v);

    let k0 = Integer::from(&xb_plus_k - &self.x0).rem_euc(n);
    let k1 = Integer::from(&xb_plus_k - &self.x1).rem_euc(n);

    let encrypted0 = encode_message(&self.message0, &k0, n)?;
    let encrypted1 = encode_message(&self.message1, &k1, n)?;
    Ok((encrypted0, encrypted1))
  }
}

pub struct OtReceiver {
  choice: bool,
  k: Option<Integer>,
  modulus: Option<Integer>,
  rng: StdRng,
}

impl OtReceiver {
  pub fn new(choice: bool) -> Self {
    Self::with_rng(choice, StdRng::from_entropy())
  }

  pub fn from_seed(choice: bool, seed: u64) -> Self {
    Self::with_rng(choice, StdRng::seed_from_u64(seed))
  }

  fn with_rng(choice: bool, rng: StdRng) -> Self {
    OtReceiver {
      choice,
      k: None,
      modulus: None,
      rng,
    }
  }

  // Blind the chosen seed with a fresh private k. For uniform k the
  // distribution of v carries no information about the choice bit.
  pub fn blind(&mut self, inputs: &OtPublicInputs) -> Integer {
    let xb = if self.choice { &inputs.x1 } else { &inputs.x0 };
    let k = random_below(&inputs.public_key.n, &mut self.rng);

    let v = inputs.public_key.forward(&Integer::from(xb + &k));

    self.k = Some(k);
    self.modulus = Some(inputs.public_key.n.clone());
    v
  }

  pub fn select(
    &self,
    encrypted0: &[Integer],
    encrypted1: &[Integer],
  ) -> Result<String> {
    let (k, n) = match (&self.k, &self.modulus) {
      (Some(k), Some(n)) => (k, n),
      _ => {
        return Err(Error::ProtocolMisuse(
          "selection attempted before the blinding step".into(),
        ));
      },
    };
    let encrypted = if self.choice { encrypted1 } else { encrypted0 };
    decode_message(encrypted, k, n)
  }
}

// One-time additive mask over the message's char codes, modulo n. The
// modulus must strictly exceed every symbol code; this is validated, not
// assumed.
fn encode_message(message: &str, mask: &Integer, n: &Integer) -> Result<Vec<Integer>> {
  let mut encrypted = Vec::new();
  for c in message.chars() {
    let code = c as u32;
    if *n <= code {
      return Err(Error::OutOfRangeCiphertext(format!(
        "symbol code {} does not fit below the modulus", code,
      )));
    }
    encrypted.push(Integer::from(mask + code) % n);
  }
  Ok(encrypted)
}

fn decode_message(encrypted: &[Integer], mask: &Integer, n: &Integer) -> Result<String> {
  let mut message = String::new();
  for cell in encrypted {
    let value = Integer::from(cell - mask).rem_euc(n);
    let code = value.to_u32().ok_or_else(|| {
      Error::OutOfRangeCiphertext(format!("decoded value {} is not a symbol code", value))
    })?;
    let c = char::from_u32(code).ok_or_else(|| {
      Error::OutOfRangeCiphertext(format!("decoded code {} is not a character", code))
    })?;
    message.push(c);
  }
  Ok(message)
}

// Drives one full transfer. Everything exchanged here is public; all secret
// state stays inside the sender and receiver.
pub fn perform_oblivious_transfer(
  sender: &OtSender,
  receiver: &mut OtReceiver,
) -> Result<String> {
  let inputs = sender.public_inputs();
  debug!("ot: sender published modulus of {} bits", inputs.public_key.n.significant_bits());

  let v = receiver.blind(&inputs);
  debug!("ot: receiver sent blinded value");

  let (encrypted0, encrypted1) = sender.encrypt_messages(&v)?;
  debug!(
    "ot: sender sent {} and {} encrypted symbols",
    encrypted0.len(),
    encrypted1.len(),
  );

  receiver.select(&encrypted0, &encrypted1)
}
