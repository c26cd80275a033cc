extern crate smallvec;
extern crate thiserror;

mod domain_error;
mod sized_vector;

pub use domain_error::{validate_size, Coordinate, DomainError, Result};
pub use sized_vector::{SizedVector, MAX_VECTOR_SIZE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_and_spilled_rows_behave_alike() {
        let mut short = SizedVector::<f64>::new(4).unwrap();
        let mut long = SizedVector::<f64>::new(40).unwrap();

        for j in 0..4 {
            short[j] = j as f64;
        }
        for j in 0..40 {
            long[j] = j as f64;
        }

        assert_eq!(&long.as_slice()[..4], short.as_slice());
        assert!((long.dot(&long).unwrap() - 20540.0).abs() < 1e-12);
    }
}
