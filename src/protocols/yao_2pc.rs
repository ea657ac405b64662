use crate::building_block::{
  cipher::{GateCipher, Sha3GateCipher},
  circuit::Circuit,
  garbled_circuit::{GarbledCircuit, GarbledGate, GateWiring},
  gate::Gate,
  ot::{perform_oblivious_transfer, OtReceiver, OtSender},
  wire_key::WireKey,
};
use crate::error::{Error, Result};
use rand::{
  rngs::StdRng,
  Rng,
  SeedableRng,
};
use tracing::{debug, info};

// Yao's garbled circuit protocol between two semi-honest parties. The
// Garbler holds input a, garbles the circuit and hands over one key per
// input wire: its own directly, the Evaluator's through a 1-2 oblivious
// transfer so neither party learns the other's input.

const WIRE_A: usize = 0;
const WIRE_B: usize = 1;

pub struct Garbler {
  input: bool,
  // [wire][bit value as usize], populated by garble()
  keys: Option<[[WireKey; 2]; 2]>,
  cipher: Box<dyn GateCipher>,
  rng: StdRng,
}

impl Garbler {
  pub fn new(input: bool) -> Self {
    Self::with_rng(input, StdRng::from_entropy())
  }

  pub fn from_seed(input: bool, seed: u64) -> Self {
    Self::with_rng(input, StdRng::seed_from_u64(seed))
  }

  fn with_rng(input: bool, rng: StdRng) -> Self {
    Garbler {
      input,
      keys: None,
      cipher: Box::new(Sha3GateCipher),
      rng,
    }
  }

  pub fn with_cipher(input: bool, cipher: Box<dyn GateCipher>) -> Self {
    Garbler {
      input,
      keys: None,
      cipher,
      rng: StdRng::from_entropy(),
    }
  }

  // The shape garbling currently supports: one binary gate consuming both
  // external input wires. The DAG circuit model is the extension target.
  fn garbleable_gate(circuit: &Circuit) -> Result<&Gate> {
    if circuit.gates.len() != 1 {
      return Err(Error::UnsupportedCircuit(
        "garbling currently supports a single gate".into(),
      ));
    }
    let gate = &circuit.gates[0];
    if !gate.gate_type.is_binary() || gate.left != WIRE_A || gate.right != WIRE_B {
      return Err(Error::UnsupportedCircuit(
        "garbling currently supports one binary gate over the two input wires".into(),
      ));
    }
    Ok(gate)
  }

  pub fn garble(&mut self, circuit: &Circuit) -> Result<GarbledCircuit> {
    let gate = Self::garbleable_gate(circuit)?;

    // Two keys per input wire, one per bit value. Pointers start aligned
    // with the bit order.
    let mut keys = [
      [WireKey::generate(0, &mut self.rng), WireKey::generate(1, &mut self.rng)],
      [WireKey::generate(0, &mut self.rng), WireKey::generate(1, &mut self.rng)],
    ];

    // Encrypt the gate output for every input combination and place the
    // ciphertext at the cell the current pointers index.
    let mut garbled_gate = GarbledGate::empty();
    for input_a in [false, true] {
      for input_b in [false, true] {
        let output = gate.output(input_a, input_b);
        let key_a = &keys[WIRE_A][input_a as usize];
        let key_b = &keys[WIRE_B][input_b as usize];
        garbled_gate.cells[key_a.pointer as usize][key_b.pointer as usize] =
          self.cipher.encrypt(output, key_a, key_b);
      }
    }

    // Point-and-permute: one fair coin per wire. A swap must move the rows
    // or columns and the pointer fields together, so pointer-to-position
    // stays self-consistent while cell position decouples from bit value.
    if self.rng.gen::<bool>() {
      garbled_gate.swap_rows();
      let [key_false, key_true] = &mut keys[WIRE_A];
      std::mem::swap(&mut key_false.pointer, &mut key_true.pointer);
    }
    if self.rng.gen::<bool>() {
      garbled_gate.swap_columns();
      let [key_false, key_true] = &mut keys[WIRE_B];
      std::mem::swap(&mut key_false.pointer, &mut key_true.pointer);
    }

    self.keys = Some(keys);
    debug!("garbler: garbled 1 gate");

    Ok(GarbledCircuit {
      gates: vec![garbled_gate],
      wiring: vec![GateWiring {
        left: gate.left,
        right: gate.right,
        out: gate.out,
      }],
      output_wire: circuit.output_wire,
    })
  }

  fn keys(&self) -> Result<&[[WireKey; 2]; 2]> {
    self.keys.as_ref().ok_or_else(|| {
      Error::ProtocolMisuse("key transfer attempted before garbling".into())
    })
  }

  // The garbler already knows its own input, so this key is handed over
  // directly.
  pub fn key_a(&self) -> Result<String> {
    let keys = self.keys()?;
    Ok(keys[WIRE_A][self.input as usize].serialize())
  }

  // Both candidate keys for wire b, loaded into an OT sender so the garbler
  // never learns which one the evaluator takes.
  pub fn ot_sender_for_key_b(&self) -> Result<OtSender> {
    let keys = self.keys()?;
    OtSender::new(
      keys[WIRE_B][0].serialize(),
      keys[WIRE_B][1].serialize(),
    )
  }
}

pub struct Evaluator {
  input: bool,
  // set only by accept_key_b once the oblivious transfer delivers it
  key_b: Option<String>,
  cipher: Box<dyn GateCipher>,
  rng: StdRng,
}

impl Evaluator {
  pub fn new(input: bool) -> Self {
    Self::with_rng(input, StdRng::from_entropy())
  }

  pub fn from_seed(input: bool, seed: u64) -> Self {
    Self::with_rng(input, StdRng::seed_from_u64(seed))
  }

  fn with_rng(input: bool, rng: StdRng) -> Self {
    Evaluator {
      input,
      key_b: None,
      cipher: Box::new(Sha3GateCipher),
      rng,
    }
  }

  pub fn with_cipher(input: bool, cipher: Box<dyn GateCipher>) -> Self {
    Evaluator {
      input,
      key_b: None,
      cipher,
      rng: StdRng::from_entropy(),
    }
  }

  // OT receiver whose choice bit is the evaluator's private input. Its
  // blinding randomness derives from the evaluator's own rng.
  pub fn ot_receiver(&mut self) -> OtReceiver {
    OtReceiver::from_seed(self.input, self.rng.gen::<u64>())
  }

  pub fn accept_key_b(&mut self, key: String) {
    self.key_b = Some(key);
  }

  // Look up the cell the two key pointers index and decrypt it with both
  // keys.
  pub fn evaluate(&self, garbled_circuit: &GarbledCircuit, key_a: &str) -> Result<bool> {
    let key_b = self.key_b.as_ref().ok_or_else(|| {
      Error::ProtocolMisuse(
        "input-b key must be delivered through the oblivious transfer".into(),
      )
    })?;

    let key_a = WireKey::deserialize(key_a)?;
    let key_b = WireKey::deserialize(key_b)?;

    if garbled_circuit.gates.len() != 1 {
      return Err(Error::UnsupportedCircuit(
        "evaluation currently supports a single garbled gate".into(),
      ));
    }

    let cell = garbled_circuit.gates[0].cell(key_a.pointer, key_b.pointer);
    self.cipher.decrypt(cell, &key_a, &key_b)
  }
}

// One full protocol run. The garbled circuit and both keys are the only
// artifacts that cross between the parties.
pub fn run(circuit: &Circuit, input_a: bool, input_b: bool) -> Result<bool> {
  let mut garbler = Garbler::new(input_a);
  let mut evaluator = Evaluator::new(input_b);

  let garbled_circuit = garbler.garble(circuit)?;
  info!("garbler: sent garbled circuit");

  let key_a = garbler.key_a()?;
  info!("garbler: sent key a directly");

  let sender = garbler.ot_sender_for_key_b()?;
  let mut receiver = evaluator.ot_receiver();
  let key_b = perform_oblivious_transfer(&sender, &mut receiver)?;
  evaluator.accept_key_b(key_b);
  info!("evaluator: received key b obliviously");

  let output = evaluator.evaluate(&garbled_circuit, &key_a)?;
  info!("evaluator: output = {}", output);
  Ok(output)
}
