//! Symmetric eigen-decomposition contract used by conic fitting.
//!
//! Fitting code only ever needs "eigenvectors of a small symmetric matrix,
//! in place". This module pins that call shape down once; the backing
//! implementation is chosen here and callers never branch on it.

use nalgebra::{DMatrix, SymmetricEigen};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EigenError {
    #[error("matrix buffer holds {got} values, expected {n}x{n}")]
    InvalidBuffer { n: usize, got: usize },
    #[error("matrix contains non-finite values")]
    NonFinite,
}

/// Solver for real symmetric eigenproblems.
pub trait SymmetricEigenSolver {
    /// Decompose the `n × n` symmetric matrix stored column-major in
    /// `matrix`.
    ///
    /// Only the upper triangle is read. On success `matrix` is overwritten
    /// with the orthonormal eigenvectors (column `k` pairs with eigenvalue
    /// `k`) and the eigenvalues are returned in ascending order.
    fn solve(&self, matrix: &mut [f64], n: usize) -> Result<Vec<f64>, EigenError>;
}

/// Pure-Rust backend built on `nalgebra::SymmetricEigen`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NalgebraEigenSolver;

impl SymmetricEigenSolver for NalgebraEigenSolver {
    fn solve(&self, matrix: &mut [f64], n: usize) -> Result<Vec<f64>, EigenError> {
        if n.checked_mul(n) != Some(matrix.len()) {
            return Err(EigenError::InvalidBuffer {
                n,
                got: matrix.len(),
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(EigenError::NonFinite);
        }

        let upper = DMatrix::from_column_slice(n, n, matrix);
        let sym = DMatrix::from_fn(n, n, |r, c| {
            if r <= c {
                upper[(r, c)]
            } else {
                upper[(c, r)]
            }
        });
        let eig = SymmetricEigen::new(sym);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));

        let mut values = Vec::with_capacity(n);
        for (dst, &src) in order.iter().enumerate() {
            values.push(eig.eigenvalues[src]);
            for (r, v) in eig.eigenvectors.column(src).iter().enumerate() {
                matrix[dst * n + r] = *v;
            }
        }
        Ok(values)
    }
}

/// The backend selected for this build.
pub type DefaultEigenSolver = NalgebraEigenSolver;

/// Solve the symmetric eigenproblem in place with [`DefaultEigenSolver`].
pub fn solve_symmetric_eigen(matrix: &mut [f64], n: usize) -> Result<Vec<f64>, EigenError> {
    DefaultEigenSolver::default().solve(matrix, n)
}
