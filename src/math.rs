use nalgebra as na;
use num_traits::Float;

/// First-degree polynomial `y = slope * t + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit<T> {
    pub slope: T,
    pub intercept: T,
}

impl<T: na::RealField + Float> LinearFit<T> {
    #[inline]
    pub fn eval(&self, t: T) -> T {
        self.slope * t + self.intercept
    }
}

/// Ordinary least squares line through `(t[i], y[i])`.
///
/// Closed form on mean-centered samples. Returns `None` for fewer than two
/// samples or when every `t` is the same. Inputs anywhere in the finite range
/// are accepted, but an extrapolated value past `T::max_value()` saturates to
/// infinity.
pub fn linear_ls<T: na::RealField + Float>(
    t: &na::DVector<T>,
    y: &na::DVector<T>,
) -> Option<LinearFit<T>> {
    if t.len() < 2 || t.len() != y.len() {
        return None;
    }

    let t_mean = running_mean(t);
    let y_mean = running_mean(y);

    let dt = t.map(|t| t - t_mean);
    let s_tt = dt.dot(&dt);

    if s_tt <= T::zero() {
        return None;
    }

    let s_ty = dt
        .iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (&dt, &y)| acc + dt * (y - y_mean));
    let slope = s_ty / s_tt;

    Some(LinearFit {
        slope,
        intercept: y_mean - slope * t_mean,
    })
}

/// Mean without summing first, so large finite samples cannot overflow
#[inline]
pub fn running_mean<T: na::RealField + Float>(v: &na::DVector<T>) -> T {
    v.iter().enumerate().fold(T::zero(), |m, (i, &x)| {
        let k = T::from(i + 1).unwrap_or_else(T::one);
        m + (x - m) / k
    })
}

/// Synthetic time index `0, 1, .., n - 1`
#[inline]
pub fn time_index<T: na::RealField + Float>(n: usize) -> na::DVector<T> {
    na::DVector::from_fn(n, |i, _| T::from(i).unwrap_or_else(T::zero))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn fits_exact_line() {
        let t = time_index::<f64>(4);
        let y = na::DVector::from_vec(vec![1.0, 3.0, 5.0, 7.0]);

        let fit = linear_ls(&t, &y).unwrap();

        assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.eval(10.0), 21.0, epsilon = 1e-12);
    }

    #[test]
    fn minimizes_squared_residuals() {
        // numpy.polyfit([0, 1, 2], [0, 2, 1], 1) == [0.5, 0.5]
        let t = time_index::<f64>(3);
        let y = na::DVector::from_vec(vec![0.0, 2.0, 1.0]);

        let fit = linear_ls(&t, &y).unwrap();

        assert_abs_diff_eq!(fit.slope, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.intercept, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn huge_samples_do_not_overflow() {
        let t = time_index::<f64>(2);
        let y = na::DVector::from_vec(vec![1.7e308, 1.6e308]);

        assert_relative_eq!(running_mean(&y), 1.65e308, max_relative = 1e-12);

        let fit = linear_ls(&t, &y).unwrap();
        assert_relative_eq!(fit.slope, -0.1e308, max_relative = 1e-12);
        assert_relative_eq!(fit.eval(2.0), 1.5e308, max_relative = 1e-12);
        assert_relative_eq!(fit.eval(3.0), 1.4e308, max_relative = 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        let one = na::DVector::from_vec(vec![1.0f64]);
        assert!(linear_ls(&one, &one).is_none());

        let same_t = na::DVector::from_vec(vec![2.0f64, 2.0, 2.0]);
        let y = na::DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert!(linear_ls(&same_t, &y).is_none());

        let short_y = na::DVector::from_vec(vec![1.0f64, 2.0]);
        assert!(linear_ls(&time_index(3), &short_y).is_none());
    }
}
