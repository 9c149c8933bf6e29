//! Block key and uuid generation.
//!
//! Block keys are short base-32 strings drawn from a 24-bit random space. A
//! generator never hands out the same key twice and never produces a key that
//! parses as a number, so keys stay distinguishable from array indices in the
//! raw format.
//!
//! Generator state is thread-local. Tests call [`reset_key_generator`] to get
//! reproducible keys:
//!
//! ```
//! use draftquill::keys::{generate_random_key, reset_key_generator, KeySource};
//!
//! reset_key_generator(KeySource::Sequential);
//! assert_eq!(generate_random_key(), "0a");
//! assert_eq!(generate_random_key(), "1a");
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::collections::HashSet;
use uuid::{Builder, Uuid};

const MULTIPLIER: u32 = 1 << 24;

/// Where newly generated block keys come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Entropy-seeded random keys.
    Random,
    /// Random keys from a fixed seed.
    Seeded(u64),
    /// `"0a"`, `"1a"`, `"2a"`, ...
    Sequential,
}

struct KeyGenerator {
    source: KeySource,
    rng: Option<StdRng>,
    counter: u64,
    uuid_counter: u128,
    seen: HashSet<String>,
}

impl KeyGenerator {
    fn new(source: KeySource) -> Self {
        let rng = match source {
            KeySource::Random => Some(StdRng::from_entropy()),
            KeySource::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
            KeySource::Sequential => None,
        };
        Self {
            source,
            rng,
            counter: 0,
            uuid_counter: 0,
            seen: HashSet::new(),
        }
    }

    fn next_key(&mut self) -> String {
        loop {
            let key = match self.rng.as_mut() {
                Some(rng) => to_radix_32(rng.gen_range(0..MULTIPLIER)),
                None => {
                    let key = format!("{}a", to_radix_32(self.counter as u32));
                    self.counter += 1;
                    key
                }
            };
            if key.parse::<f64>().is_ok() || self.seen.contains(&key) {
                continue;
            }
            self.seen.insert(key.clone());
            return key;
        }
    }
}

impl KeyGenerator {
    fn next_uuid(&mut self) -> Uuid {
        match (self.source, self.rng.as_mut()) {
            (KeySource::Random, _) => Uuid::new_v4(),
            (_, Some(rng)) => Builder::from_random_bytes(rng.gen()).into_uuid(),
            (_, None) => {
                self.uuid_counter += 1;
                Uuid::from_u128(self.uuid_counter)
            }
        }
    }
}

fn to_radix_32(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuv";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 32) as usize]);
        value /= 32;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

thread_local! {
    static GENERATOR: RefCell<KeyGenerator> = RefCell::new(KeyGenerator::new(KeySource::Random));
}

/// Returns a block key not previously issued by this thread's generator.
pub fn generate_random_key() -> String {
    GENERATOR.with(|generator| generator.borrow_mut().next_key())
}

/// Replaces this thread's key generator, forgetting every issued key.
pub fn reset_key_generator(source: KeySource) {
    tracing::debug!(?source, "resetting block key generator");
    GENERATOR.with(|generator| *generator.borrow_mut() = KeyGenerator::new(source));
}

/// Returns a uuid used to correlate entity stores and sessions.
///
/// Follows the same source as block keys: v4 uuids from entropy, uuids from
/// the seeded stream, or counting uuids after a sequential reset.
pub fn generate_uuid() -> String {
    GENERATOR.with(|generator| generator.borrow_mut().next_uuid().to_string())
}
