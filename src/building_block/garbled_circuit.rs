use serde::{Deserialize, Serialize};

// A garbled gate is a 2x2 matrix of opaque ciphertext cells indexed by the
// pointer fields of the two input-wire keys. Exactly one cell decrypts under
// the keys matching the real input bits; the rest are indistinguishable
// without the matching keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledGate {
  pub cells: [[String; 2]; 2],
}

impl GarbledGate {
  pub fn empty() -> Self {
    GarbledGate {
      cells: [
        [String::new(), String::new()],
        [String::new(), String::new()],
      ],
    }
  }

  pub fn cell(&self, pointer_a: u8, pointer_b: u8) -> &str {
    &self.cells[pointer_a as usize][pointer_b as usize]
  }

  pub fn swap_rows(&mut self) {
    self.cells.swap(0, 1);
  }

  pub fn swap_columns(&mut self) {
    for row in self.cells.iter_mut() {
      row.swap(0, 1);
    }
  }
}

// Wiring metadata chaining gate outputs to downstream gate inputs, carried
// for the multi-gate extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateWiring {
  pub left: usize,
  pub right: usize,
  pub out: usize,
}

// The artifact sent once, garbler to evaluator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledCircuit {
  pub gates: Vec<GarbledGate>,
  pub wiring: Vec<GateWiring>,
  pub output_wire: usize,
}
