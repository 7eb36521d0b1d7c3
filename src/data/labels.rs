use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// One-hot encodes `labels` with `max(labels) + 1` columns.
///
/// The width depends on the labels seen, so encoding a training set and a test
/// set separately can produce different widths. Use
/// [`convert_labels_with_classes`] whenever two sets must agree.
pub fn convert_labels(labels: &[u8]) -> Result<Matrix> {
    let max = labels.iter().copied().max()
        .ok_or(Error::EmptyInput("cannot one-hot encode an empty label array"))?;
    convert_labels_with_classes(labels, max as usize + 1)
}

/// One-hot encodes `labels` into exactly `n_classes` columns.
pub fn convert_labels_with_classes(labels: &[u8], n_classes: usize) -> Result<Matrix> {
    if labels.is_empty() {
        return Err(Error::EmptyInput("cannot one-hot encode an empty label array"));
    }
    if n_classes == 0 {
        return Err(Error::InvalidConfig("class count must be at least 1".to_owned()));
    }

    let mut one_hot = Matrix::zeros(labels.len(), n_classes);
    for (index, &label) in labels.iter().enumerate() {
        let label = label as usize;
        if label >= n_classes {
            return Err(Error::LabelOutOfRange { index, label, n_classes });
        }
        one_hot.set(index, label, 1.0);
    }
    Ok(one_hot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_labels_give_identity() {
        let y = convert_labels(&[0, 1, 2]).unwrap();
        assert_eq!(y.data, vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ]);
    }

    #[test]
    fn width_follows_max_label() {
        let y = convert_labels(&[0, 0, 1]).unwrap();
        assert_eq!(y.data, vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn fixed_width_pads_unseen_classes() {
        let y = convert_labels_with_classes(&[1, 0], 10).unwrap();
        assert_eq!(y.shape(), (2, 10));
        assert_eq!(y.sum(), 2.0);
        assert_eq!(y.get(0, 1), 1.0);
    }

    #[test]
    fn out_of_range_label_is_reported() {
        let err = convert_labels_with_classes(&[0, 3, 1], 3).unwrap_err();
        assert!(matches!(err, Error::LabelOutOfRange { index: 1, label: 3, n_classes: 3 }));
    }

    #[test]
    fn empty_labels_fail() {
        assert!(matches!(convert_labels(&[]), Err(Error::EmptyInput(_))));
        assert!(matches!(convert_labels_with_classes(&[], 10), Err(Error::EmptyInput(_))));
        assert!(matches!(convert_labels_with_classes(&[0, 1], 0), Err(Error::InvalidConfig(_))));
    }
}
