//! Probabilistic anomaly scoring.
//!
//! Each point gets a score in [0,1] from its empirical z-score and the
//! two-sided normal tail probability:
//!
//! ```text
//! z = (x - mu) / sd
//! p = 2 * (1 - Phi(|z|))
//! score = 1 - p
//! ```
//!
//! so very extreme points score near 1 and points near the mean score near 0.
//! This is a whole-series measure; periodic signals can legitimately swing far
//! from the global mean and will be over-flagged (see the policy card).

use crate::quality::statistics::{mean, normal_cdf, sample_std};

/// Scores how far each point sits from the rest of its series.
pub struct AnomalyScorer;

impl AnomalyScorer {
    /// Score every point, aligned 1:1 with the input. Missing points score
    /// 0.0, as does the whole series when it carries no usable spread
    /// (fewer than 2 present values, or zero standard deviation).
    pub fn score(&self, values: &[Option<f64>]) -> Vec<f64> {
        let clean: Vec<f64> = values.iter().flatten().copied().collect();
        if clean.len() < 2 {
            return vec![0.0; values.len()];
        }

        let Some(mu) = mean(&clean) else {
            return vec![0.0; values.len()];
        };
        let sd = match sample_std(&clean) {
            Some(sd) if sd > 0.0 => sd,
            _ => return vec![0.0; values.len()],
        };

        values
            .iter()
            .map(|opt| match opt {
                Some(x) => {
                    let z = (x - mu) / sd;
                    let p = 2.0 * (1.0 - normal_cdf(z.abs()));
                    1.0 - p
                }
                None => 0.0,
            })
            .collect()
    }

    /// Reduce a score series to its mean; 0.0 for an empty series.
    pub fn average(scores: &[f64]) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_outlier_dominates() {
        // Four constant points and one far outlier
        let scores = AnomalyScorer.score(&wrap(&[1.0, 1.0, 1.0, 1.0, 100.0]));

        assert!(scores[4] > 0.9, "outlier score {} too low", scores[4]);
        assert!(scores[0] < 0.4, "baseline score {} too high", scores[0]);
        assert_eq!(scores[0], scores[1]);

        // The single outlier drags the average into the amber band
        let avg = AnomalyScorer::average(&scores);
        assert!(avg > 0.45 && avg < 0.48, "average was {}", avg);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let scores = AnomalyScorer.score(&wrap(&[-1e6, 0.0, 1.0, 2.0, 1e6]));
        for score in scores {
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn test_symmetric_deviations_score_equally() {
        let scores = AnomalyScorer.score(&wrap(&[-5.0, 0.0, 5.0]));
        assert!((scores[0] - scores[2]).abs() < 1e-12);
    }

    #[test]
    fn test_short_series_scores_zero() {
        assert_eq!(AnomalyScorer.score(&[]), Vec::<f64>::new());
        assert_eq!(AnomalyScorer.score(&wrap(&[7.0])), vec![0.0]);
        assert_eq!(AnomalyScorer.score(&[Some(1.0), None]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_constant_series_scores_zero() {
        let scores = AnomalyScorer.score(&wrap(&[3.0, 3.0, 3.0, 3.0]));
        assert_eq!(scores, vec![0.0; 4]);
    }

    #[test]
    fn test_missing_points_score_zero() {
        let scores = AnomalyScorer.score(&[Some(1.0), None, Some(2.0), Some(3.0)]);
        assert_eq!(scores[1], 0.0);
        assert!(scores[2] > 0.0 || scores[0] > 0.0);
    }

    #[test]
    fn test_average() {
        assert_eq!(AnomalyScorer::average(&[]), 0.0);
        assert!((AnomalyScorer::average(&[0.2, 0.4]) - 0.3).abs() < 1e-12);
    }
}
