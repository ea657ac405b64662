use rand::{
  rngs::StdRng,
  RngCore,
};
use rug::{
  integer::Order,
  Integer,
};

pub fn xor_vecs(v1: &[u8], v2: &[u8]) -> Vec<u8> {
  assert!(v1.len() == v2.len());
  v1.iter()
    .zip(v2.iter())
    .map(|(a, b)| a ^ b)
    .collect()
}

// Uniform value in [0, bound). Oversamples by 8 bytes before reducing so the
// modulo bias is below 2^-64.
pub fn random_below(bound: &Integer, rng: &mut StdRng) -> Integer {
  let num_bytes = bound.significant_digits::<u8>() + 8;
  let mut buf = vec![0u8; num_bytes];
  rng.fill_bytes(&mut buf);
  Integer::from_digits(&buf, Order::Msf) % bound
}
