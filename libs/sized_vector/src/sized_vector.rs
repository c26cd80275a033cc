use super::domain_error::{validate_size, Coordinate, DomainError, Result};
use smallvec::SmallVec;
use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// Largest number of elements a [SizedVector] may hold
pub const MAX_VECTOR_SIZE: usize = 100_000_000;

// rows this short are stored inline
const INLINE_CAPACITY: usize = 8;

/// Fixed-length vector whose logical indices begin at `start_index`
///
/// Elements are addressed over `start_index..start_index + len`; this lets each row of
/// an upper-triangular matrix be indexed by its true column number.
#[derive(Clone, Debug)]
pub struct SizedVector<T> {
    /// Logical index of the first stored element
    start_index: usize,
    /// Stored Elements
    elements: SmallVec<[T; INLINE_CAPACITY]>,
}

impl<T: Default + Clone> SizedVector<T> {
    /// Default-initialized vector with logical indices `0..len`
    pub fn new(len: impl Coordinate) -> Result<Self> {
        Self::with_start_index(len, 0)
    }

    /// Default-initialized vector with logical indices `start_index..start_index + len`
    pub fn with_start_index(len: impl Coordinate, start_index: usize) -> Result<Self> {
        let len = validate_size(len, MAX_VECTOR_SIZE)?;
        if start_index > MAX_VECTOR_SIZE {
            return Err(DomainError::InvalidStartIndex {
                requested: start_index,
                max: MAX_VECTOR_SIZE,
            });
        }

        Ok(Self {
            start_index,
            elements: SmallVec::from_elem(T::default(), len),
        })
    }
}

impl<T> SizedVector<T> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false: construction rejects empty vectors
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// One past the last valid logical index
    pub fn end_index(&self) -> usize {
        self.start_index + self.elements.len()
    }

    pub fn contains_index(&self, index: impl Coordinate) -> bool {
        self.position(index).is_ok()
    }

    // map a logical index onto a position in `elements`
    fn position(&self, index: impl Coordinate) -> Result<usize> {
        match index.to_usize() {
            Some(j) if j >= self.start_index && j < self.end_index() => Ok(j - self.start_index),
            _ => Err(DomainError::InvalidIndex {
                index: index.to_string(),
                start: self.start_index,
                end: self.end_index(),
            }),
        }
    }

    pub fn get_element(&self, index: impl Coordinate) -> Result<&T> {
        let pos = self.position(index)?;
        Ok(&self.elements[pos])
    }

    pub fn get_element_mut(&mut self, index: impl Coordinate) -> Result<&mut T> {
        let pos = self.position(index)?;
        Ok(&mut self.elements[pos])
    }

    /// Overwrite a single element. The vector is untouched if `index` is invalid.
    pub fn set_element(&mut self, index: impl Coordinate, value: T) -> Result<()> {
        let pos = self.position(index)?;
        self.elements[pos] = value;
        Ok(())
    }

    /// Iterate over `(logical_index, element)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(move |(pos, value)| (pos + self.start_index, value))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    // both operands must address the same logical indices
    fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.len() != other.len() {
            Err(DomainError::SizeMismatch {
                left: self.len(),
                right: other.len(),
            })
        } else if self.start_index != other.start_index {
            Err(DomainError::StartIndexMismatch {
                left: self.start_index,
                right: other.start_index,
            })
        } else {
            Ok(())
        }
    }

    fn zip_with<U>(&self, other: &Self, op: impl Fn(&T, &T) -> U) -> Result<SizedVector<U>> {
        self.check_compatible(other)?;

        Ok(SizedVector {
            start_index: self.start_index,
            elements: self
                .elements
                .iter()
                .zip(other.elements.iter())
                .map(|(a, b)| op(a, b))
                .collect(),
        })
    }

    fn map_with<U>(&self, op: impl Fn(&T) -> U) -> SizedVector<U> {
        SizedVector {
            start_index: self.start_index,
            elements: self.elements.iter().map(op).collect(),
        }
    }
}

impl<T: Clone + Add<Output = T>> SizedVector<T> {
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a.clone() + b.clone())
    }

    pub fn add_scalar(&self, value: T) -> Self {
        self.map_with(|a| a.clone() + value.clone())
    }
}

impl<T: Clone + Sub<Output = T>> SizedVector<T> {
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a.clone() - b.clone())
    }

    pub fn sub_scalar(&self, value: T) -> Self {
        self.map_with(|a| a.clone() - value.clone())
    }
}

impl<T: Clone + Mul<Output = T>> SizedVector<T> {
    pub fn scale(&self, coefficient: T) -> Self {
        self.map_with(|a| a.clone() * coefficient.clone())
    }
}

impl<T: Clone + Default + Add<Output = T> + Mul<Output = T>> SizedVector<T> {
    /// Sum of element-wise products
    pub fn dot(&self, other: &Self) -> Result<T> {
        Ok(self
            .zip_with(other, |a, b| a.clone() * b.clone())?
            .elements
            .into_iter()
            .fold(T::default(), |acc, p| acc + p))
    }
}

impl<T: PartialEq> PartialEq for SizedVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start_index == other.start_index && self.elements == other.elements
    }
}

impl<T: Eq> Eq for SizedVector<T> {}

impl<T> Index<usize> for SizedVector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        assert!(
            index >= self.start_index && index < self.end_index(),
            "Index {} is outside of {}..{}; cannot access element!",
            index,
            self.start_index,
            self.end_index()
        );
        &self.elements[index - self.start_index]
    }
}

impl<T> IndexMut<usize> for SizedVector<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        assert!(
            index >= self.start_index && index < self.end_index(),
            "Index {} is outside of {}..{}; cannot access element!",
            index,
            self.start_index,
            self.end_index()
        );
        let start = self.start_index;
        &mut self.elements[index - start]
    }
}

impl<'a, T: Clone + Add<Output = T>> Add<&'a SizedVector<T>> for &'a SizedVector<T> {
    type Output = Result<SizedVector<T>>;
    fn add(self, other: &'a SizedVector<T>) -> Self::Output {
        self.checked_add(other)
    }
}

impl<'a, T: Clone + Sub<Output = T>> Sub<&'a SizedVector<T>> for &'a SizedVector<T> {
    type Output = Result<SizedVector<T>>;
    fn sub(self, other: &'a SizedVector<T>) -> Self::Output {
        self.checked_sub(other)
    }
}

impl<T: fmt::Display + Default> fmt::Display for SizedVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let padding = std::iter::repeat_with(T::default).take(self.start_index);
        for (i, value) in padding.enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }
        for (pos, value) in self.elements.iter().enumerate() {
            if pos + self.start_index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}
