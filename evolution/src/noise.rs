use ndarray::{Array1, ArrayView1, s};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

use crate::{EsErr, Result};

/// A fixed buffer of standard-normal samples shared read-only by every worker.
///
/// Workers never exchange perturbation vectors, only a start index into the table, from which
/// the perturbation can be regenerated.
#[derive(Debug)]
pub struct NoiseTable {
    noise: Array1<f32>,
}

impl NoiseTable {
    /// Creates a new `NoiseTable`.
    ///
    /// # Arguments
    /// * `seed` - The seed of the generator, the same seed always yields the same table.
    /// * `size` - The amount of samples in the table.
    ///
    /// # Returns
    /// A new `NoiseTable` instance.
    pub fn new(seed: u64, size: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = (0..size)
            .map(|_| rng.sample::<f32, _>(StandardNormal))
            .collect();

        Self { noise }
    }

    pub fn len(&self) -> usize {
        self.noise.len()
    }

    pub fn is_empty(&self) -> bool {
        self.noise.is_empty()
    }

    /// Gives a read-only view of `len` contiguous samples.
    ///
    /// # Arguments
    /// * `start` - The index of the first sample.
    /// * `len` - The amount of samples.
    ///
    /// # Returns
    /// The view or an `OutOfRange` error if `start + len` exceeds the table.
    pub fn chunk(&self, start: usize, len: usize) -> Result<ArrayView1<'_, f32>> {
        let size = self.len();
        match start.checked_add(len) {
            Some(end) if end <= size => Ok(self.noise.slice(s![start..end])),
            _ => Err(EsErr::OutOfRange { start, len, size }),
        }
    }

    /// Samples a uniform start index such that a chunk of `len` samples fits in the table.
    ///
    /// # Arguments
    /// * `rng` - The caller's own random stream.
    /// * `len` - The length of the chunk that will be taken from the index.
    ///
    /// # Returns
    /// An index in `[0, self.len() - len]` or an `OutOfRange` error if `len` exceeds the table.
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R, len: usize) -> Result<usize> {
        let size = self.len();
        if len > size {
            return Err(EsErr::OutOfRange { start: 0, len, size });
        }

        Ok(rng.random_range(0..=size - len))
    }
}
