use crate::error::{Id3Error, Result};
use nalgebra::{DMatrix, DVector};

/// 2×2 matrix of counts; rows are true labels, columns are predictions.
pub type ConfusionMatrix = DMatrix<usize>;

/// Rounds a percentage to one decimal place, halves rounding up.
pub fn round_percent(percent: f64) -> f64 {
    (percent * 10.0 + 0.5).floor() / 10.0
}

pub trait ClassificationMetrics {
    /// Computes the confusion matrix of binary labels.
    ///
    /// # Arguments
    ///
    /// * `y_true` - The true labels.
    /// * `y_pred` - The predicted labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the two vectors differ in length.
    fn confusion_matrix(&self, y_true: &DVector<u8>, y_pred: &DVector<u8>) -> Result<ConfusionMatrix> {
        if y_true.len() != y_pred.len() {
            return Err(Id3Error::LengthMismatch {
                expected: y_true.len(),
                found: y_pred.len(),
            });
        }

        let mut matrix = DMatrix::zeros(2, 2);
        for (&y_t, &y_p) in y_true.iter().zip(y_pred.iter()) {
            matrix[(usize::from(y_t != 0), usize::from(y_p != 0))] += 1;
        }
        Ok(matrix)
    }
}

/// Outcome of scoring a tree on one dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub instances: usize,
    pub correct: usize,
    pub confusion: ConfusionMatrix,
}

impl Evaluation {
    pub fn from_confusion(confusion: ConfusionMatrix) -> Self {
        Self {
            instances: confusion.sum(),
            correct: confusion.diagonal().sum(),
            confusion,
        }
    }

    /// Rounded accuracy percentage; `None` for an empty dataset.
    pub fn percent(&self) -> Option<f64> {
        if self.instances == 0 {
            return None;
        }
        Some(round_percent(
            self.correct as f64 / self.instances as f64 * 100.0,
        ))
    }

    /// The percentage with one decimal, or `n/a`.
    pub fn percent_label(&self) -> String {
        match self.percent() {
            Some(percent) => format!("{:.1}", percent),
            None => "n/a".to_string(),
        }
    }

    /// One line of the accuracy report, e.g.
    /// `Accuracy on training set (4 instances): 100.0%`.
    pub fn report_line(&self, label: &str) -> String {
        format!(
            "Accuracy on {} ({} instances): {}%",
            label,
            self.instances,
            self.percent_label()
        )
    }
}
