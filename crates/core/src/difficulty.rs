//! Difficulty adapter - turns level performance into the next level's budget
//!
//! Two independent linear regressors are fit on every recorded
//! [`PerformanceSample`], both over the features `(score, level)`:
//!
//! - moves model: predicts moves used
//! - time model: predicts seconds used
//!
//! Prediction for the upcoming level uses `(last score, last level + 1)`:
//!
//! ```text
//! move_limit = clamp(round(predicted_moves) + 1, 10, 30)
//! time_limit = clamp(round(predicted_time) + 10, 30, 120)
//! ```
//!
//! Until two samples exist the adapter returns the defaults `(20, 60)`.
//! Output feeds the next level, so the budget can oscillate between levels;
//! only the clamps bound it.

use crate::types::{
    DEFAULT_MOVE_LIMIT, DEFAULT_TIME_LIMIT_SECS, MOVE_LIMIT_MAX, MOVE_LIMIT_MIN,
    TIME_LIMIT_MAX_SECS, TIME_LIMIT_MIN_SECS,
};

/// Samples required before the models are fit.
pub const MIN_TRAINING_SAMPLES: usize = 2;

/// Relative eigenvalue cutoff below which the feature covariance counts as singular.
const RANK_TOLERANCE: f64 = 1e-10;

/// One completed level's outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSample {
    pub level: u32,
    pub moves_used: u32,
    pub score: u32,
    /// Seconds spent on the level.
    pub time_used: f64,
}

impl PerformanceSample {
    fn features(&self) -> [f64; 2] {
        [self.score as f64, self.level as f64]
    }
}

/// Move and time allowance for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Budget {
    pub move_limit: u32,
    pub time_limit_secs: u32,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            move_limit: DEFAULT_MOVE_LIMIT,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
        }
    }
}

/// Ordinary least squares with intercept over two features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub coef: [f64; 2],
    pub intercept: f64,
}

impl LinearModel {
    /// Fit `ys ~ xs`.
    ///
    /// Data is centered and the 2x2 normal equations are solved with a
    /// pseudo-inverse, giving the minimum-norm solution when the system is
    /// underdetermined (two samples, or collinear features).
    /// Returns `None` for empty or mismatched input.
    pub fn fit(xs: &[[f64; 2]], ys: &[f64]) -> Option<Self> {
        if xs.is_empty() || xs.len() != ys.len() {
            return None;
        }

        let n = xs.len() as f64;
        let mean_x = [
            xs.iter().map(|x| x[0]).sum::<f64>() / n,
            xs.iter().map(|x| x[1]).sum::<f64>() / n,
        ];
        let mean_y = ys.iter().sum::<f64>() / n;

        // Gram matrix [[a, b], [b, c]] and moment vector v of the centered data.
        let (mut a, mut b, mut c) = (0.0, 0.0, 0.0);
        let mut v = [0.0, 0.0];
        for (x, y) in xs.iter().zip(ys) {
            let d0 = x[0] - mean_x[0];
            let d1 = x[1] - mean_x[1];
            let dy = y - mean_y;
            a += d0 * d0;
            b += d0 * d1;
            c += d1 * d1;
            v[0] += d0 * dy;
            v[1] += d1 * dy;
        }

        let coef = solve_pinv_2x2(a, b, c, v);
        let intercept = mean_y - coef[0] * mean_x[0] - coef[1] * mean_x[1];
        Some(Self { coef, intercept })
    }

    pub fn predict(&self, x: [f64; 2]) -> f64 {
        self.intercept + self.coef[0] * x[0] + self.coef[1] * x[1]
    }
}

/// Solve `G w = v` for symmetric positive semi-definite `G = [[a, b], [b, c]]`
/// using its pseudo-inverse.
fn solve_pinv_2x2(a: f64, b: f64, c: f64, v: [f64; 2]) -> [f64; 2] {
    let trace = a + c;
    if trace <= 0.0 {
        return [0.0, 0.0];
    }

    let det = a * c - b * b;
    if det > RANK_TOLERANCE * trace * trace {
        return [(c * v[0] - b * v[1]) / det, (a * v[1] - b * v[0]) / det];
    }

    // Rank one: G = trace * u u^T where u spans the column space.
    let (u0, u1) = if a >= c { (a, b) } else { (b, c) };
    let norm = (u0 * u0 + u1 * u1).sqrt();
    if norm == 0.0 {
        return [0.0, 0.0];
    }
    let (u0, u1) = (u0 / norm, u1 / norm);
    let proj = (u0 * v[0] + u1 * v[1]) / trace;
    [u0 * proj, u1 * proj]
}

/// Rounds to the nearest integer, ties to even.
fn round_half_even(x: f64) -> i64 {
    x.round_ties_even() as i64
}

/// History of performance samples plus the two fitted regressors.
#[derive(Debug, Clone, Default)]
pub struct DifficultyAdapter {
    history: Vec<PerformanceSample>,
    move_model: Option<LinearModel>,
    time_model: Option<LinearModel>,
}

impl DifficultyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample and retrain once enough history exists.
    ///
    /// Returns `true` when this sample trained the models for the first time.
    pub fn record(&mut self, sample: PerformanceSample) -> bool {
        let was_trained = self.is_trained();
        self.history.push(sample);
        if self.history.len() >= MIN_TRAINING_SAMPLES {
            self.train();
        }
        !was_trained && self.is_trained()
    }

    fn train(&mut self) {
        let xs: Vec<[f64; 2]> = self.history.iter().map(|s| s.features()).collect();
        let moves: Vec<f64> = self.history.iter().map(|s| s.moves_used as f64).collect();
        let times: Vec<f64> = self.history.iter().map(|s| s.time_used).collect();

        self.move_model = LinearModel::fit(&xs, &moves);
        self.time_model = LinearModel::fit(&xs, &times);
    }

    pub fn is_trained(&self) -> bool {
        self.move_model.is_some() && self.time_model.is_some()
    }

    pub fn history(&self) -> &[PerformanceSample] {
        &self.history
    }

    pub fn move_model(&self) -> Option<&LinearModel> {
        self.move_model.as_ref()
    }

    pub fn time_model(&self) -> Option<&LinearModel> {
        self.time_model.as_ref()
    }

    /// Budget for the level after the most recent sample.
    pub fn calculate_difficulty(&self) -> Budget {
        let (Some(moves), Some(time), Some(last)) =
            (self.move_model, self.time_model, self.history.last())
        else {
            return Budget::default();
        };

        let x = [last.score as f64, last.level as f64 + 1.0];
        let predicted_moves = round_half_even(moves.predict(x)) + 1;
        let predicted_time = round_half_even(time.predict(x)) + 10;

        Budget {
            move_limit: predicted_moves.clamp(MOVE_LIMIT_MIN as i64, MOVE_LIMIT_MAX as i64) as u32,
            time_limit_secs: predicted_time
                .clamp(TIME_LIMIT_MIN_SECS as i64, TIME_LIMIT_MAX_SECS as i64)
                as u32,
        }
    }
}
