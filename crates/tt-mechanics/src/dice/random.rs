//! Uniform randomness behind a small trait.

use rand::Rng;
use rand::rngs::StdRng;

/// A source of uniform random numbers in `[0, 1)`.
pub trait RandomSource {
    /// The next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Sixteen random bytes for identifiers.
    fn next_id_bytes(&mut self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        for byte in &mut bytes {
            *byte = (self.next_unit() * 256.0).floor().clamp(0.0, 255.0) as u8;
        }
        bytes
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn next_id_bytes(&mut self) -> [u8; 16] {
        self.random()
    }
}

/// Replays a fixed sequence of unit values, cycling when exhausted.
///
/// An empty script always yields `0.0`. Identifiers are numbered
/// sequentially and never consume scripted values.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    index: usize,
    ids_issued: u128,
}

impl ScriptedRandom {
    /// Replay these unit values.
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            index: 0,
            ids_issued: 0,
        }
    }

    /// The unit value that makes a die with `sides` land on `face`.
    pub fn unit_for(face: u32, sides: u32) -> f64 {
        (f64::from(face) - 0.5) / f64::from(sides.max(1))
    }

    /// Replay these faces, all rolled on dice with `sides` sides.
    pub fn faces(sides: u32, faces: &[u32]) -> Self {
        Self::new(faces.iter().map(|f| Self::unit_for(*f, sides)).collect())
    }

    /// Replay these d20 faces.
    pub fn d20(faces: &[u32]) -> Self {
        Self::faces(20, faces)
    }

    /// Queue one more face for a die with `sides` sides.
    pub fn then(mut self, face: u32, sides: u32) -> Self {
        self.values.push(Self::unit_for(face, sides));
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }

    fn next_id_bytes(&mut self) -> [u8; 16] {
        self.ids_issued += 1;
        self.ids_issued.to_be_bytes()
    }
}
