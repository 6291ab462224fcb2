// SPDX-License-Identifier: MIT OR Apache-2.0

/// Reads fixed-width values from fuzz input, yielding zeros once exhausted.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn next_u8(&mut self) -> u8 {
        let value = self.data.get(self.offset).copied().unwrap_or(0);
        self.offset = self.offset.saturating_add(1);
        value
    }

    /// Remaining bytes, consuming them.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = self.data.get(self.offset..).unwrap_or(&[]);
        self.offset = self.data.len();
        rest
    }
}

/// Maps `seed` into `[lo, hi]`.
pub fn bounded(seed: u8, lo: usize, hi: usize) -> usize {
    lo + usize::from(seed) % (hi - lo + 1)
}
