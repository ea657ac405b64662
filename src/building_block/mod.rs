pub mod cipher;
pub mod circuit;
pub mod garbled_circuit;
pub mod gate;
pub mod gate_type;
pub mod ot;
pub mod trapdoor;
pub mod util;
pub mod wire_key;
