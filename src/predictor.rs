use nalgebra as na;

use super::math::{linear_ls, time_index};
use crate::config::Config;
use crate::error::Error;
use crate::{History, Position};

/// Extrapolates a track along independent per-axis least-squares lines.
///
/// Frames are assumed evenly spaced: sample `i` of a history of length `n`
/// sits at `t = i`, and the `k`-th predicted point at `t = n - 1 + k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPredictor {
    horizon: usize,
}

impl PathPredictor {
    pub fn new(horizon: usize) -> Result<Self, Error> {
        if horizon == 0 {
            return Err(Error::InvalidConfig("future_horizon must be at least 1"));
        }

        Ok(Self { horizon })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        config.validate()?;

        Self::new(config.future_horizon)
    }

    #[inline]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Predicts the next `horizon` centers of a track. Histories shorter than
    /// two samples carry no velocity and yield an empty path.
    #[inline]
    pub fn predict(&self, history: &History) -> Vec<Position> {
        self.extrapolate(history.iter().copied())
    }

    #[inline]
    pub fn predict_points(&self, points: &[Position]) -> Vec<Position> {
        self.extrapolate(points.iter().copied())
    }

    fn extrapolate<I>(&self, points: I) -> Vec<Position>
    where
        I: ExactSizeIterator<Item = Position>,
    {
        let n = points.len();
        if n < 2 {
            return Vec::new();
        }

        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        for p in points {
            x.push(p.x);
            y.push(p.y);
        }

        let t = time_index::<f64>(n);
        let (x, y): (na::DVector<f64>, na::DVector<f64>) = (x.into(), y.into());

        let (fx, fy) = match (linear_ls(&t, &x), linear_ls(&t, &y)) {
            (Some(fx), Some(fy)) => (fx, fy),
            _ => return Vec::new(),
        };

        let last = (n - 1) as f64;

        (1..=self.horizon)
            .map(|i| {
                let t = last + i as f64;
                na::Point2::new(fx.eval(t), fy.eval(t))
            })
            .collect()
    }
}
