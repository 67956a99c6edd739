//! Per-class text report, printed by the trainer in verbose mode.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metrics::{confusion_matrix, f1_score, ConfusionMatrix};
use super::EvaluationError;

/// Precision/recall/F1 for one class (or one average)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Index 0 = negative class, 1 = positive class
    pub classes: [ClassScores; 2],
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
}

fn scores(tp: usize, fp: usize, fn_: usize) -> ClassScores {
    let precision = if tp + fp == 0 { 0.0 } else { tp as f64 / (tp + fp) as f64 };
    let recall = if tp + fn_ == 0 { 0.0 } else { tp as f64 / (tp + fn_) as f64 };
    ClassScores {
        precision,
        recall,
        f1: f1_score(precision, recall),
        support: tp + fn_,
    }
}

impl ClassificationReport {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let negative = scores(cm.tn, cm.fn_, cm.fp);
        let positive = scores(cm.tp, cm.fp, cm.fn_);
        let total = cm.total();

        let macro_avg = ClassScores {
            precision: (negative.precision + positive.precision) / 2.0,
            recall: (negative.recall + positive.recall) / 2.0,
            f1: (negative.f1 + positive.f1) / 2.0,
            support: total,
        };

        let weight = |neg: f64, pos: f64| {
            if total == 0 {
                0.0
            } else {
                (neg * negative.support as f64 + pos * positive.support as f64) / total as f64
            }
        };
        let weighted_avg = ClassScores {
            precision: weight(negative.precision, positive.precision),
            recall: weight(negative.recall, positive.recall),
            f1: weight(negative.f1, positive.f1),
            support: total,
        };

        Self {
            classes: [negative, positive],
            accuracy: if total == 0 { 0.0 } else { (cm.tn + cm.tp) as f64 / total as f64 },
            macro_avg,
            weighted_avg,
        }
    }
}

/// Build the report from labels and thresholded predictions
pub fn classification_report(
    y_true: &[u8],
    y_pred: &[u8],
) -> Result<ClassificationReport, EvaluationError> {
    let cm = confusion_matrix(y_true, y_pred)?;
    Ok(ClassificationReport::from_confusion(&cm))
}

const NAME_WIDTH: usize = 12;

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, s: &ClassScores) -> fmt::Result {
    writeln!(
        f,
        "{:>w$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name,
        s.precision,
        s.recall,
        s.f1,
        s.support,
        w = NAME_WIDTH
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>w$}  {:>9} {:>9} {:>9} {:>9}",
            "",
            "precision",
            "recall",
            "f1-score",
            "support",
            w = NAME_WIDTH
        )?;
        writeln!(f)?;
        write_row(f, "0", &self.classes[0])?;
        write_row(f, "1", &self.classes[1])?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>w$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.macro_avg.support,
            w = NAME_WIDTH
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}
