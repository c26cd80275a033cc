extern crate rayon;
extern crate sized_vector;

/// Dense interop with Nalgebra
#[cfg(feature = "dense_export")]
pub mod linalg;
/// Upper-Triangular Matrix
mod sized_matrix;

pub use sized_matrix::{SizedMatrix, MAX_MATRIX_SIZE};
pub use sized_vector::{Coordinate, DomainError, Result, SizedVector, MAX_VECTOR_SIZE};
