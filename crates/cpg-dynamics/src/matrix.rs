// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Coupling Matrix
// ─────────────────────────────────────────────────────────────────────
//! Dense square coupling matrix, row-major.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingMatrix {
    n: usize,
    data: Vec<f64>,
}

impl CouplingMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    /// Write `value` at (row, col) and its negation at (col, row).
    #[inline]
    pub fn set_antisymmetric(&mut self, row: usize, col: usize, value: f64) {
        self.set(row, col, value);
        self.set(col, row, -value);
    }

    /// Row-major view.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// `M[i][j] == -M[j][i]` for every pair, exactly.
    pub fn is_antisymmetric(&self) -> bool {
        (0..self.n).all(|i| (i..self.n).all(|j| self.get(i, j) == -self.get(j, i)))
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// `out = Mᵗ x`, i.e. `out[i] = Σ_j x[j] · M[j][i]`.
    pub fn transpose_mul(&self, x: &[f64], out: &mut [f64]) {
        debug_assert_eq!(x.len(), self.n);
        debug_assert_eq!(out.len(), self.n);
        out.iter_mut().for_each(|v| *v = 0.0);
        for (j, &xj) in x.iter().enumerate() {
            if xj == 0.0 {
                continue;
            }
            let row = &self.data[j * self.n..(j + 1) * self.n];
            for (o, &m) in out.iter_mut().zip(row) {
                *o += xj * m;
            }
        }
    }
}
