use super::{SizedMatrix, MAX_MATRIX_SIZE};
use nalgebra::{DMatrix, Scalar};
use sized_vector::{validate_size, DomainError, Result};

impl<T: Scalar + Default> From<&SizedMatrix<T>> for DMatrix<T> {
    /// Dense copy of the matrix; entries below the diagonal are `T::default()`
    fn from(sm: &SizedMatrix<T>) -> Self {
        DMatrix::from_fn(sm.size(), sm.size(), |r, c| {
            if r <= c {
                sm[r][c].clone()
            } else {
                T::default()
            }
        })
    }
}

impl<T: Scalar + Default> From<SizedMatrix<T>> for DMatrix<T> {
    fn from(sm: SizedMatrix<T>) -> Self {
        (&sm).into()
    }
}

impl<T: Scalar + Default> SizedMatrix<T> {
    /// Read the upper triangle of a square dense matrix (the lower triangle is ignored)
    pub fn from_dense_upper(dense: &DMatrix<T>) -> Result<Self> {
        if dense.nrows() != dense.ncols() {
            return Err(DomainError::SizeMismatch {
                left: dense.nrows(),
                right: dense.ncols(),
            });
        }
        let size = validate_size(dense.nrows(), MAX_MATRIX_SIZE)?;

        Self::from_fn(size, |[r, c]| dense[(r, c)].clone())
    }
}
