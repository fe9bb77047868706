//! Reduction of per-trial results into configuration-level averages.

use std::collections::BTreeMap;
use std::fmt::Debug;

use stackrank_types::{AccuracyCounts, AggregateRow};

/// Errors that can occur while aggregating trial results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// A score key has no accuracy entry.
    #[error("no accuracy results for configuration {key}")]
    MissingAccuracy {
        /// Debug rendering of the missing key.
        key: String,
    },

    /// An accuracy key has no score entry.
    #[error("no score results for configuration {key}")]
    MissingScores {
        /// Debug rendering of the missing key.
        key: String,
    },

    /// A configuration has no trials to average.
    #[error("configuration {key} has no trials")]
    EmptyTrials {
        /// Debug rendering of the empty key.
        key: String,
    },

    /// Score and accuracy lists disagree on the number of trials.
    #[error("configuration {key} has {scores} score trials but {accuracy} accuracy trials")]
    TrialCountMismatch {
        /// Debug rendering of the key.
        key: String,
        /// Number of score entries.
        scores: usize,
        /// Number of accuracy entries.
        accuracy: usize,
    },
}

/// Average every configuration's trials into one row.
///
/// Rows follow the key order of `scores`. The two maps must share the same
/// key set and the same trial count per key.
///
/// # Errors
///
/// Returns [`AggregateError`] if the key sets differ, a key has no trials,
/// or a key's trial counts disagree.
pub fn aggregate<K>(
    scores: &BTreeMap<K, Vec<f64>>,
    accuracy: &BTreeMap<K, Vec<AccuracyCounts>>,
) -> Result<Vec<AggregateRow<K>>, AggregateError>
where
    K: Ord + Clone + Debug,
{
    if let Some(orphan) = accuracy.keys().find(|key| !scores.contains_key(key)) {
        return Err(AggregateError::MissingScores {
            key: format!("{orphan:?}"),
        });
    }

    let mut rows = Vec::with_capacity(scores.len());
    for (key, trial_scores) in scores {
        let trial_accuracy = accuracy
            .get(key)
            .ok_or_else(|| AggregateError::MissingAccuracy {
                key: format!("{key:?}"),
            })?;
        if trial_scores.is_empty() {
            return Err(AggregateError::EmptyTrials {
                key: format!("{key:?}"),
            });
        }
        if trial_scores.len() != trial_accuracy.len() {
            return Err(AggregateError::TrialCountMismatch {
                key: format!("{key:?}"),
                scores: trial_scores.len(),
                accuracy: trial_accuracy.len(),
            });
        }

        // Trial counts are small enough to convert to f64 exactly.
        #[allow(clippy::cast_precision_loss)]
        let trials = trial_scores.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let mean_of = |pick: fn(&AccuracyCounts) -> usize| {
            trial_accuracy.iter().map(pick).sum::<usize>() as f64 / trials
        };

        rows.push(AggregateRow {
            key: key.clone(),
            average_score: trial_scores.iter().sum::<f64>() / trials,
            average_underestimates: mean_of(|c| c.underestimates),
            average_correct: mean_of(|c| c.correct),
            average_overestimates: mean_of(|c| c.overestimates),
        });
    }
    Ok(rows)
}
