use log::{debug, trace};
use rayon::prelude::*;
use sized_vector::{validate_size, Coordinate, DomainError, Result, SizedVector};
use std::fmt;
use std::ops::{Add, Index, IndexMut, Sub};

/// Largest number of rows (and columns) a [SizedMatrix] may have
pub const MAX_MATRIX_SIZE: usize = 10_000;

/// Square matrix which only stores its upper triangle
///
/// Row `i` is a [SizedVector] covering columns `i..size`, so `matrix[i][j]` is only valid for `j >= i`.
/// Every element access through the checked methods is validated against that range.
#[derive(Debug)]
pub struct SizedMatrix<T> {
    /// Number of rows (and columns) of the square matrix
    size: usize,
    /// Upper-triangular rows; row `i` starts at column `i`
    rows: Vec<SizedVector<T>>,
}

impl<T: Default + Clone> SizedMatrix<T> {
    /// Default-initialized matrix with `size` rows
    pub fn new(size: impl Coordinate) -> Result<Self> {
        let size = validate_size(size, MAX_MATRIX_SIZE)?;
        let rows = (0..size)
            .map(|i| SizedVector::with_start_index(size - i, i))
            .collect::<Result<Vec<_>>>()?;

        trace!("allocated {0}x{0} upper-triangular matrix", size);
        Ok(Self { size, rows })
    }

    /// Build a matrix by evaluating `f([row, col])` at every upper-triangular position
    pub fn from_fn(size: impl Coordinate, mut f: impl FnMut([usize; 2]) -> T) -> Result<Self> {
        let mut matrix = Self::new(size)?;
        for (r, row) in matrix.rows.iter_mut().enumerate() {
            for c in r..row.end_index() {
                row[c] = f([r, c]);
            }
        }
        Ok(matrix)
    }
}

impl<T> SizedMatrix<T> {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, row_idx: usize) -> Option<&SizedVector<T>> {
        self.rows.get(row_idx)
    }

    pub fn row_mut(&mut self, row_idx: usize) -> Option<&mut SizedVector<T>> {
        self.rows.get_mut(row_idx)
    }

    pub fn rows(&self) -> impl Iterator<Item = &SizedVector<T>> + '_ {
        self.rows.iter()
    }

    fn row_index_error(&self, row_idx: usize) -> DomainError {
        DomainError::InvalidIndex {
            index: row_idx.to_string(),
            start: 0,
            end: self.size,
        }
    }

    pub fn get(&self, [row_idx, col_idx]: [usize; 2]) -> Result<&T> {
        self.rows
            .get(row_idx)
            .ok_or_else(|| self.row_index_error(row_idx))?
            .get_element(col_idx)
    }

    pub fn get_mut(&mut self, [row_idx, col_idx]: [usize; 2]) -> Result<&mut T> {
        let err = self.row_index_error(row_idx);
        self.rows
            .get_mut(row_idx)
            .ok_or(err)?
            .get_element_mut(col_idx)
    }

    /// Overwrite a single element. Nothing changes if `[row_idx, col_idx]` lies outside the upper triangle.
    pub fn set(&mut self, [row_idx, col_idx]: [usize; 2], value: T) -> Result<()> {
        *self.get_mut([row_idx, col_idx])? = value;
        Ok(())
    }

    /// Iterate over the upper triangle of the matrix, row by row.
    pub fn iter_upper_tri(&self) -> impl Iterator<Item = ([usize; 2], &T)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().map(move |(c, value)| ([r, c], value)))
    }
}

impl<T: Clone> SizedMatrix<T> {
    /// Replace this matrix with a deep copy of `source`, adopting its size.
    ///
    /// The new rows are fully built before the old ones are released.
    pub fn assign(&mut self, source: &Self) {
        let rows = source.rows.clone();
        if self.size != source.size {
            debug!(
                "reallocating matrix storage: size {} -> {}",
                self.size, source.size
            );
        }

        let released = std::mem::replace(&mut self.rows, rows);
        self.size = source.size;
        drop(released);
    }
}

impl<T: Clone> Clone for SizedMatrix<T> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            rows: self.rows.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T: Send + Sync> SizedMatrix<T> {
    // apply `op` to each pair of corresponding rows
    fn combine<F>(&self, other: &Self, op_name: &str, op: F) -> Result<Self>
    where
        F: Fn(&SizedVector<T>, &SizedVector<T>) -> Result<SizedVector<T>> + Send + Sync,
    {
        if self.size != other.size {
            debug!(
                "rejected matrix {}: size {} vs {}",
                op_name, self.size, other.size
            );
            return Err(DomainError::SizeMismatch {
                left: self.size,
                right: other.size,
            });
        }

        let rows = self
            .rows
            .par_iter()
            .zip(other.rows.par_iter())
            .map(|(a, b)| op(a, b))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            size: self.size,
            rows,
        })
    }
}

impl<T: Clone + Add<Output = T> + Send + Sync> SizedMatrix<T> {
    /// Element-wise sum; both matrices must have the same size
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.combine(other, "addition", SizedVector::checked_add)
    }
}

impl<T: Clone + Sub<Output = T> + Send + Sync> SizedMatrix<T> {
    /// Element-wise difference; both matrices must have the same size
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.combine(other, "subtraction", SizedVector::checked_sub)
    }
}

impl<T: PartialEq> PartialEq for SizedMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.rows == other.rows
    }
}

impl<T: Eq> Eq for SizedMatrix<T> {}

impl<T> Index<usize> for SizedMatrix<T> {
    type Output = SizedVector<T>;
    fn index(&self, row_idx: usize) -> &Self::Output {
        assert!(
            row_idx < self.size,
            "Row {} exceeded matrix size {}; cannot access row!",
            row_idx,
            self.size
        );
        &self.rows[row_idx]
    }
}

impl<T> IndexMut<usize> for SizedMatrix<T> {
    fn index_mut(&mut self, row_idx: usize) -> &mut Self::Output {
        assert!(
            row_idx < self.size,
            "Row {} exceeded matrix size {}; cannot access row!",
            row_idx,
            self.size
        );
        &mut self.rows[row_idx]
    }
}

impl<'a, T: Clone + Add<Output = T> + Send + Sync> Add<&'a SizedMatrix<T>> for &'a SizedMatrix<T> {
    type Output = Result<SizedMatrix<T>>;
    fn add(self, other: &'a SizedMatrix<T>) -> Self::Output {
        self.checked_add(other)
    }
}

impl<'a, T: Clone + Sub<Output = T> + Send + Sync> Sub<&'a SizedMatrix<T>> for &'a SizedMatrix<T> {
    type Output = Result<SizedMatrix<T>>;
    fn sub(self, other: &'a SizedMatrix<T>) -> Self::Output {
        self.checked_sub(other)
    }
}

impl<T: fmt::Display + Default> fmt::Display for SizedMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows.iter() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangular_layout() {
        let m = SizedMatrix::<i32>::new(4).unwrap();

        for (i, row) in m.rows().enumerate() {
            assert_eq!(row.start_index(), i);
            assert_eq!(row.len(), 4 - i);
            assert_eq!(row.end_index(), 4);
        }
        assert_eq!(m.iter_upper_tri().count(), 10);
        assert!(m.row(4).is_none());
    }

    #[test]
    fn lower_triangle_is_rejected() {
        let mut m = SizedMatrix::<i32>::new(4).unwrap();

        assert!(m.get([2, 1]).is_err());
        assert!(m[3].set_element(0, 1).is_err());
        assert_eq!(
            m.set([4, 4], 1),
            Err(DomainError::InvalidIndex {
                index: String::from("4"),
                start: 0,
                end: 4
            })
        );
        assert_eq!(m, SizedMatrix::new(4).unwrap());
    }

    #[test]
    fn two_index_access() {
        let mut m = SizedMatrix::<i32>::new(3).unwrap();

        m.set([0, 2], 5).unwrap();
        *m.get_mut([1, 1]).unwrap() += 3;

        assert_eq!(*m.get([0, 2]).unwrap(), 5);
        assert_eq!(m[1][1], 3);
        assert_eq!(m.row_mut(2).map(|row| row.len()), Some(1));
    }

    #[test]
    fn from_fn_fills_upper_triangle() {
        let m = SizedMatrix::from_fn(3, |[r, c]| 10 * r + c).unwrap();

        let entries: Vec<([usize; 2], usize)> =
            m.iter_upper_tri().map(|(rc, v)| (rc, *v)).collect();
        assert_eq!(
            entries,
            vec![
                ([0, 0], 0),
                ([0, 1], 1),
                ([0, 2], 2),
                ([1, 1], 11),
                ([1, 2], 12),
                ([2, 2], 22),
            ]
        );
    }

    #[test]
    fn assign_replaces_storage() {
        let a = SizedMatrix::from_fn(5, |[r, c]| (r + c) as i64).unwrap();
        let mut b = SizedMatrix::<i64>::new(2).unwrap();
        b[1][1] = 7;

        b.assign(&a);

        assert_eq!(b.size(), 5);
        assert_eq!(b.rows().count(), 5);
        assert_eq!(b, a);

        b[0][0] = 100;
        assert_eq!(a[0][0], 0);
    }

    #[test]
    fn clone_from_matches_assign() {
        let a = SizedMatrix::from_fn(3, |[r, c]| r * c).unwrap();
        let mut b = SizedMatrix::<usize>::new(6).unwrap();

        b.clone_from(&a);

        assert_eq!(b.size(), 3);
        assert_eq!(b, a);
    }

    #[test]
    fn element_sums_and_differences() {
        let a = SizedMatrix::from_fn(4, |[r, c]| (r + c) as i32).unwrap();
        let b = SizedMatrix::from_fn(4, |[r, _]| r as i32).unwrap();

        let sum = (&a + &b).unwrap();
        let diff = (&a - &b).unwrap();

        for ([r, c], v) in sum.iter_upper_tri() {
            assert_eq!(*v, (2 * r + c) as i32);
        }
        for ([_, c], v) in diff.iter_upper_tri() {
            assert_eq!(*v, c as i32);
        }
    }

    #[test]
    fn mismatched_arithmetic() {
        let a = SizedMatrix::<i32>::new(5).unwrap();
        let b = SizedMatrix::<i32>::new(2).unwrap();

        assert_eq!(
            a.checked_add(&b),
            Err(DomainError::SizeMismatch { left: 5, right: 2 })
        );
        assert_eq!(
            b.checked_sub(&a),
            Err(DomainError::SizeMismatch { left: 2, right: 5 })
        );
    }

    #[test]
    fn display() {
        let m = SizedMatrix::from_fn(3, |[r, c]| r + c + 1).unwrap();
        assert_eq!(m.to_string(), "1 2 3\n0 3 4\n0 0 5\n");
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_row() {
        let m = SizedMatrix::<i32>::new(3).unwrap();
        let _ = &m[3];
    }
}
