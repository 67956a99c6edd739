//! Stratified train/validation split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::DatasetError;

/// Row indices of each side, in ascending order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Shuffle each class with a seeded RNG and move `round(n_class * fraction)`
/// of its rows to validation. A class with two or more rows keeps at least
/// one row on each side, so both sides see both classes.
pub fn stratified_split(
    labels: &[u8],
    validation_fraction: f64,
    random_state: u64,
) -> Result<Split, DatasetError> {
    if !(validation_fraction > 0.0 && validation_fraction < 1.0) {
        return Err(DatasetError::InvalidFraction(validation_fraction));
    }
    if labels.len() < 2 {
        return Err(DatasetError::TooSmall { rows: labels.len() });
    }

    let mut rng = StdRng::seed_from_u64(random_state);
    let mut train = Vec::new();
    let mut validation = Vec::new();

    let mut classes: Vec<u8> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();

    for class in classes {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == class)
            .map(|(i, _)| i)
            .collect();
        members.shuffle(&mut rng);

        let n = members.len();
        let mut n_val = (n as f64 * validation_fraction).round() as usize;
        if n >= 2 {
            n_val = n_val.clamp(1, n - 1);
        }

        validation.extend_from_slice(&members[..n_val]);
        train.extend_from_slice(&members[n_val..]);
    }

    if train.is_empty() || validation.is_empty() {
        return Err(DatasetError::TooSmall { rows: labels.len() });
    }

    train.sort_unstable();
    validation.sort_unstable();

    Ok(Split { train, validation })
}
