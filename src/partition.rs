//! Work partitioning for pairwise matrices.
//!
//! Every pairwise family fills its matrix through [`Partition::fill`], so the
//! sequential and worker-pool paths evaluate the very same cell function in
//! the same per-row order and produce bit-identical matrices. Workers share
//! no mutable state; rows are gathered once all of them have finished.

use log::debug;
use ndarray::Array2;
use rayon::prelude::*;

use crate::error::Result;

/// How a pairwise matrix is split across workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Partition {
    /// Fill rows one after another on the calling thread
    #[default]
    Sequential,
    /// Fill rows on a dedicated pool of `workers` threads
    Pool {
        /// Number of worker threads
        workers: usize,
    },
}

impl Partition {
    /// Strategy for a requested degree of parallelism; `0` and `1` mean sequential
    pub fn from_processes(processes: usize) -> Self {
        if processes > 1 {
            Self::Pool { workers: processes }
        } else {
            Self::Sequential
        }
    }

    /// Build a `rows × cols` matrix whose entry `(i, j)` is `cell(i, j)`
    pub fn fill<F>(&self, rows: usize, cols: usize, cell: F) -> Result<Array2<f64>>
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        let row = |i: usize| -> Vec<f64> { (0..cols).map(|j| cell(i, j)).collect() };

        let filled: Vec<Vec<f64>> = match self {
            Self::Sequential => (0..rows).map(&row).collect(),
            Self::Pool { workers } => {
                debug!("Filling {rows}x{cols} matrix on {workers} workers");
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(*workers)
                    .build()?;
                pool.install(|| (0..rows).into_par_iter().map(&row).collect())
            }
        };

        let flat: Vec<f64> = filled.into_iter().flatten().collect();
        Ok(Array2::from_shape_vec((rows, cols), flat)?)
    }
}
