use crate::building_block::{
  gate::Gate,
  gate_type::GateType,
};
use crate::error::{Error, Result};
use std::collections::HashMap;

// A boolean logic circuit: external input wires feed a DAG of gates.
//   - Wires 0..num_inputs are the circuit inputs; each must be connected to
//     at least one gate.
//   - Every other wire is produced by exactly one gate.
//   - Exactly one produced wire is consumed by no gate: the circuit output.
#[derive(Clone, Debug)]
pub struct Circuit {
  pub num_inputs: usize,
  pub gates: Vec<Gate>,
  pub output_wire: usize,
  topo_order: Vec<usize>,
}

impl Circuit {
  pub fn new(num_inputs: usize, gates: Vec<Gate>) -> Result<Self> {
    if num_inputs == 0 {
      return Err(Error::CircuitInvariantViolation(
        "circuit needs at least one input wire".into(),
      ));
    }
    if gates.is_empty() {
      return Err(Error::CircuitInvariantViolation(
        "circuit needs at least one gate".into(),
      ));
    }

    let num_wires = num_inputs + gates.len();

    // single producer per wire
    let mut producer_of = HashMap::new();
    for (i, gate) in gates.iter().enumerate() {
      if gate.out < num_inputs {
        return Err(Error::CircuitInvariantViolation(format!(
          "gate {} rewrites input wire {}", i, gate.out,
        )));
      }
      if gate.out >= num_wires {
        return Err(Error::CircuitInvariantViolation(format!(
          "gate {} produces wire {} which leaves a gap in the wiring", i, gate.out,
        )));
      }
      if producer_of.insert(gate.out, i).is_some() {
        return Err(Error::CircuitInvariantViolation(format!(
          "wire {} has two producers", gate.out,
        )));
      }
    }

    // every consumed wire is produced
    for (i, gate) in gates.iter().enumerate() {
      for wire in [gate.left, gate.right] {
        if wire >= num_inputs && !producer_of.contains_key(&wire) {
          return Err(Error::CircuitInvariantViolation(format!(
            "gate {} consumes unproduced wire {}", i, wire,
          )));
        }
      }
    }

    // every input wire feeds at least one gate
    for wire in 0..num_inputs {
      let connected = gates
        .iter()
        .any(|g| g.left == wire || g.right == wire);
      if !connected {
        return Err(Error::CircuitInvariantViolation(format!(
          "input wire {} is not connected to any gate", wire,
        )));
      }
    }

    // the unique unconsumed produced wire is the circuit output
    let mut sinks: Vec<usize> = gates
      .iter()
      .map(|g| g.out)
      .filter(|w| !gates.iter().any(|g| g.left == *w || g.right == *w))
      .collect();
    if sinks.len() != 1 {
      return Err(Error::CircuitInvariantViolation(format!(
        "circuit must have exactly one output wire, found {}", sinks.len(),
      )));
    }
    let output_wire = sinks.remove(0);

    let topo_order = Self::topological_order(num_inputs, &gates, &producer_of)?;

    Ok(Circuit {
      num_inputs,
      gates,
      output_wire,
      topo_order,
    })
  }

  // The single shape the garbler currently supports: one gate consuming both
  // external input wires.
  pub fn single_gate(gate_type: GateType) -> Self {
    let circuit = if gate_type.is_binary() {
      Circuit::new(2, vec![Gate::new(gate_type, 0, 1, 2)])
    } else {
      Circuit::new(1, vec![Gate::unary(gate_type, 0, 1)])
    };
    circuit.expect("a single gate over the input wires is well formed")
  }

  // Kahn's algorithm over the gate graph. A cycle leaves gates unordered.
  fn topological_order(
    num_inputs: usize,
    gates: &[Gate],
    producer_of: &HashMap<usize, usize>,
  ) -> Result<Vec<usize>> {
    let mut indegree = vec![0usize; gates.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); gates.len()];

    for (i, gate) in gates.iter().enumerate() {
      for wire in [gate.left, gate.right] {
        if wire >= num_inputs {
          let p = producer_of[&wire];
          dependents[p].push(i);
          indegree[i] += 1;
        }
      }
    }

    let mut ready: Vec<usize> = (0..gates.len())
      .filter(|i| indegree[*i] == 0)
      .collect();
    let mut order = Vec::new();

    while let Some(i) = ready.pop() {
      order.push(i);
      for d in &dependents[i] {
        indegree[*d] -= 1;
        if indegree[*d] == 0 {
          ready.push(*d);
        }
      }
    }

    if order.len() != gates.len() {
      return Err(Error::CircuitInvariantViolation(
        "gate graph contains a cycle".into(),
      ));
    }
    Ok(order)
  }

  // Plain evaluation in topological order. This is the ground truth the
  // garbled tables are built from and checked against.
  pub fn evaluate(&self, inputs: &[bool]) -> Result<bool> {
    if inputs.len() != self.num_inputs {
      return Err(Error::CircuitInvariantViolation(format!(
        "expected {} inputs, got {}", self.num_inputs, inputs.len(),
      )));
    }

    let num_wires = self.num_inputs + self.gates.len();
    let mut values: Vec<Option<bool>> = vec![None; num_wires];
    for (wire, value) in inputs.iter().enumerate() {
      values[wire] = Some(*value);
    }

    for i in &self.topo_order {
      let gate = &self.gates[*i];
      let a = values[gate.left].ok_or_else(|| {
        Error::CircuitInvariantViolation(format!("wire {} has no value", gate.left))
      })?;
      let b = values[gate.right].ok_or_else(|| {
        Error::CircuitInvariantViolation(format!("wire {} has no value", gate.right))
      })?;
      values[gate.out] = Some(gate.output(a, b));
    }

    values[self.output_wire].ok_or_else(|| {
      Error::CircuitInvariantViolation("output wire has no value".into())
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_single_gate_truth_tables() {
    for gate_type in [GateType::And, GateType::Or, GateType::Xor] {
      let circuit = Circuit::single_gate(gate_type);
      for a in [false, true] {
        for b in [false, true] {
          let out = circuit.evaluate(&[a, b]).unwrap();
          assert!(out == gate_type.output(a, b));
        }
      }
    }
  }

  #[test]
  fn test_single_not_gate() {
    let circuit = Circuit::single_gate(GateType::Not);
    assert!(circuit.evaluate(&[false]).unwrap() == true);
    assert!(circuit.evaluate(&[true]).unwrap() == false);
  }

  #[test]
  fn test_multi_gate_dag() {
    //        w4
    //      (2:Or)
    //    w2/    \w3
    // (0:And)  (1:Xor)
    //  0/ 1\    0/ 1\
    let circuit = Circuit::new(
      2,
      vec![
        Gate::new(GateType::And, 0, 1, 2),
        Gate::new(GateType::Xor, 0, 1, 3),
        Gate::new(GateType::Or, 2, 3, 4),
      ],
    ).unwrap();
    assert!(circuit.output_wire == 4);

    for a in [false, true] {
      for b in [false, true] {
        let expected = (a && b) || (a ^ b);
        assert!(circuit.evaluate(&[a, b]).unwrap() == expected);
      }
    }
  }

  #[test]
  fn test_rejects_two_producers() {
    let res = Circuit::new(
      2,
      vec![
        Gate::new(GateType::And, 0, 1, 2),
        Gate::new(GateType::Or, 0, 1, 2),
      ],
    );
    assert!(matches!(res, Err(Error::CircuitInvariantViolation(_))));
  }

  #[test]
  fn test_rejects_unproduced_wire() {
    let res = Circuit::new(
      2,
      vec![Gate::new(GateType::And, 0, 5, 2)],
    );
    assert!(matches!(res, Err(Error::CircuitInvariantViolation(_))));
  }

  #[test]
  fn test_rejects_cycle() {
    let res = Circuit::new(
      2,
      vec![
        Gate::new(GateType::And, 0, 3, 2),
        Gate::new(GateType::Or, 1, 2, 3),
        Gate::new(GateType::And, 2, 3, 4),
      ],
    );
    assert!(matches!(res, Err(Error::CircuitInvariantViolation(_))));
  }

  #[test]
  fn test_rejects_multiple_outputs() {
    let res = Circuit::new(
      2,
      vec![
        Gate::new(GateType::And, 0, 1, 2),
        Gate::new(GateType::Or, 0, 1, 3),
      ],
    );
    assert!(matches!(res, Err(Error::CircuitInvariantViolation(_))));
  }

  #[test]
  fn test_rejects_unconnected_input() {
    let res = Circuit::new(
      2,
      vec![Gate::new(GateType::Not, 0, 0, 2)],
    );
    assert!(matches!(res, Err(Error::CircuitInvariantViolation(_))));
  }

  #[test]
  fn test_rejects_wrong_input_arity() {
    let circuit = Circuit::single_gate(GateType::And);
    let res = circuit.evaluate(&[true]);
    assert!(matches!(res, Err(Error::CircuitInvariantViolation(_))));
  }
}
