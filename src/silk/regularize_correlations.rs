//! Diagonal loading of LTP correlation matrices.

/// Adds `noise` to the diagonal of the row-major `dim × dim` matrix
/// `xx_matrix` and to the energy term `xx_vector[0]`.
///
/// Loading the diagonal keeps the later matrix inversion well conditioned
/// when the input is close to silent or strongly periodic.
pub fn regularize_correlations(
    xx_matrix: &mut [i32],
    xx_vector: &mut [i32],
    noise: i32,
    dim: usize,
) {
    debug_assert!(xx_matrix.len() >= dim * dim);

    for diagonal in xx_matrix.iter_mut().step_by(dim + 1).take(dim) {
        *diagonal = diagonal.wrapping_add(noise);
    }
    if let Some(energy) = xx_vector.first_mut() {
        *energy = energy.wrapping_add(noise);
    }
}

#[cfg(test)]
mod tests {
    use super::regularize_correlations;
    use crate::silk::LTP_ORDER;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_only_the_diagonal() {
        let mut matrix = [7i32; LTP_ORDER * LTP_ORDER];
        let mut vector = [3i32; LTP_ORDER];
        regularize_correlations(&mut matrix, &mut vector, 100, LTP_ORDER);

        for row in 0..LTP_ORDER {
            for col in 0..LTP_ORDER {
                let expected = if row == col { 107 } else { 7 };
                assert_eq!(matrix[row * LTP_ORDER + col], expected, "({row}, {col})");
            }
        }
        assert_eq!(vector, [103, 3, 3, 3, 3]);
    }

    #[test]
    fn ignores_trailing_storage() {
        let mut matrix = [0i32; 10];
        let mut vector = [0i32; 1];
        regularize_correlations(&mut matrix, &mut vector, -2, 3);
        assert_eq!(matrix, [-2, 0, 0, 0, -2, 0, 0, 0, -2, 0]);
        assert_eq!(vector, [-2]);
    }
}
