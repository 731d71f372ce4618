//! Small shared matrix helpers.

use faer::Mat;

/// Zero every entry in place, keeping the allocation.
pub fn fill_zero(matrix: &mut Mat<f64>) {
    for j in 0..matrix.ncols() {
        for i in 0..matrix.nrows() {
            matrix[(i, j)] = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fill_zero_clears_without_resizing() {
        let mut matrix = Mat::from_fn(2, 3, |i, j| 1.0 + f64::from(u8::try_from(i + j).unwrap()));
        fill_zero(&mut matrix);
        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix.ncols(), 3);
        for i in 0..2 {
            for j in 0..3 {
                assert_relative_eq!(matrix[(i, j)], 0.0);
            }
        }
    }
}
