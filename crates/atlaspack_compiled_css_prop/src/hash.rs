/// Source of content-addressed identifiers.
///
/// Implementations must be referentially transparent: the same input always
/// produces the same output, on every thread and in every process.
pub trait StyleHasher {
  fn hash(&self, input: &str) -> String;
}

/// 32-bit murmurhash2 rendered in base 36, matching the identifiers the
/// JavaScript toolchain produces for the same input.
#[derive(Clone, Copy, Debug, Default)]
pub struct MurmurHasher {
  seed: u32,
}

impl MurmurHasher {
  pub fn new(seed: u32) -> Self {
    Self { seed }
  }
}

impl StyleHasher for MurmurHasher {
  fn hash(&self, input: &str) -> String {
    to_base36(murmurhash2(input.as_bytes(), self.seed))
  }
}

const M: u32 = 0x5bd1e995;

fn murmurhash2(key: &[u8], seed: u32) -> u32 {
  let mut h = seed ^ (key.len() as u32);

  let mut chunks = key.chunks_exact(4);
  for chunk in &mut chunks {
    let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    k = k.wrapping_mul(M);
    k ^= k >> 24;
    k = k.wrapping_mul(M);
    h = h.wrapping_mul(M) ^ k;
  }

  let tail = chunks.remainder();
  if !tail.is_empty() {
    for (index, byte) in tail.iter().enumerate().rev() {
      h ^= (*byte as u32) << (8 * index);
    }
    h = h.wrapping_mul(M);
  }

  h ^= h >> 13;
  h = h.wrapping_mul(M);
  h ^ (h >> 15)
}

fn to_base36(mut value: u32) -> String {
  const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

  if value == 0 {
    return "0".into();
  }

  let mut digits = Vec::new();
  while value > 0 {
    digits.push(DIGITS[(value % 36) as usize] as char);
    value /= 36;
  }
  digits.iter().rev().collect()
}

/// Derives the class name for a serialized stylesheet, `<prefix>-<hash>`.
pub fn name_class<H: StyleHasher>(prefix: &str, static_css: &str, hasher: &H) -> String {
  format!("{}-{}", prefix, hasher.hash(static_css))
}
