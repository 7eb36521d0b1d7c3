use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Percentage (0–100) of rows whose argmax equals the matching label.
///
/// Ties pick the lowest column, so a row of equal scores always predicts
/// class 0.
pub fn accuracy_percent(scores: &Matrix, labels: &[u8]) -> Result<f64> {
    if labels.is_empty() {
        return Err(Error::EmptyInput("accuracy needs at least one label"));
    }
    if scores.rows != labels.len() {
        return Err(Error::shape(
            "accuracy",
            format!("{} labels", scores.rows),
            format!("{} labels", labels.len()),
        ));
    }

    let correct = scores.row_argmax().iter().zip(labels.iter())
        .filter(|(&predicted, &label)| predicted == label as usize)
        .count();

    Ok(correct as f64 * 100.0 / labels.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::labels::convert_labels_with_classes;

    #[test]
    fn perfect_scores_give_exactly_100() {
        let labels = [2u8, 0, 1, 1];
        let scores = convert_labels_with_classes(&labels, 3).unwrap();
        assert_eq!(accuracy_percent(&scores, &labels).unwrap(), 100.0);
    }

    #[test]
    fn all_wrong_scores_give_exactly_0() {
        let labels = [2u8, 0, 1, 1];
        let wrong: Vec<u8> = labels.iter().map(|l| (l + 1) % 3).collect();
        let scores = convert_labels_with_classes(&wrong, 3).unwrap();
        assert_eq!(accuracy_percent(&scores, &labels).unwrap(), 0.0);
    }

    #[test]
    fn partial_accuracy() {
        let scores = Matrix::from_data(vec![
            vec![0.9, 0.1],
            vec![0.2, 0.8],
            vec![0.6, 0.4],
            vec![0.5, 0.5],
        ]).unwrap();
        assert_eq!(accuracy_percent(&scores, &[0, 1, 1, 0]).unwrap(), 75.0);
    }

    #[test]
    fn label_count_must_match_rows() {
        let scores = Matrix::zeros(3, 2);
        assert!(matches!(accuracy_percent(&scores, &[0, 1]), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(accuracy_percent(&Matrix::zeros(0, 2), &[]), Err(Error::EmptyInput(_))));
    }
}
