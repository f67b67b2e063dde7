// Accelink - Sample Buffer
//
// Fixed-capacity batch of flattened axis values (x, y, z, x, y, z, ...).
// Owned by the sampler; the uploader only ever sees a full slice.

use crate::config::BATCH_CAPACITY;
use crate::error::BufferOverflow;

pub struct SampleBuffer {
    values: [f32; BATCH_CAPACITY],
    len: usize,
}

impl SampleBuffer {
    pub const CAPACITY: usize = BATCH_CAPACITY;

    pub fn new() -> Self {
        Self {
            values: [0.0; BATCH_CAPACITY],
            len: 0,
        }
    }

    /// Push one value. Returns `true` when this append filled the batch.
    pub fn append(&mut self, value: f32) -> Result<bool, BufferOverflow> {
        if self.len >= Self::CAPACITY {
            return Err(BufferOverflow {
                capacity: Self::CAPACITY,
            });
        }

        self.values[self.len] = value;
        self.len += 1;
        Ok(self.len == Self::CAPACITY)
    }

    /// Empty the batch for the next acquisition cycle.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == Self::CAPACITY
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}
