//! Constant-velocity Kalman filter over a region centre, using ndarray and a
//! nalgebra-based inverse.
//!
//! State is `(cx, cy, vx, vy)`, measurement is `(cx, cy)`.

use ndarray::{Array1, Array2, array};

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    std_weight_position: f64,
    std_weight_velocity: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let ndim = 2;
        let mut motion_mat = Array2::eye(2 * ndim);
        for i in 0..ndim {
            motion_mat[[i, ndim + i]] = 1.0;
        }

        let mut update_mat = Array2::zeros((ndim, 2 * ndim));
        for i in 0..ndim {
            update_mat[[i, i]] = 1.0;
        }

        Self {
            motion_mat,
            update_mat,
            std_weight_position: 1.0 / 20.0,
            std_weight_velocity: 1.0 / 160.0,
        }
    }

    /// Start a track at `center`; `scale` is the region's larger side and sets the noise level.
    pub fn initiate(&self, center: (f64, f64), scale: f64) -> (Array1<f64>, Array2<f64>) {
        let mean = array![center.0, center.1, 0.0, 0.0];

        let pos = 2.0 * self.std_weight_position * scale;
        let vel = 10.0 * self.std_weight_velocity * scale;
        let cov = Array2::from_diag(&array![pos * pos, pos * pos, vel * vel, vel * vel]);

        (mean, cov)
    }

    pub fn predict(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        scale: f64,
    ) -> (Array1<f64>, Array2<f64>) {
        let pos = self.std_weight_position * scale;
        let vel = self.std_weight_velocity * scale;
        let motion_cov = Array2::from_diag(&array![pos * pos, pos * pos, vel * vel, vel * vel]);

        let new_mean = self.motion_mat.dot(mean);
        let new_covariance = self.motion_mat.dot(covariance).dot(&self.motion_mat.t()) + motion_cov;

        (new_mean, new_covariance)
    }

    fn project(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        scale: f64,
    ) -> (Array1<f64>, Array2<f64>) {
        let pos = self.std_weight_position * scale;
        let innovation_cov = Array2::from_diag(&array![pos * pos, pos * pos]);

        let mean_proj = self.update_mat.dot(mean);
        let covariance_proj =
            self.update_mat.dot(covariance).dot(&self.update_mat.t()) + innovation_cov;

        (mean_proj, covariance_proj)
    }

    /// Correct the state with a measured centre. Returns `None` if the
    /// innovation covariance is singular.
    pub fn update(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        center: (f64, f64),
        scale: f64,
    ) -> Option<(Array1<f64>, Array2<f64>)> {
        let (projected_mean, projected_cov) = self.project(mean, covariance, scale);
        let innovation = array![center.0, center.1] - projected_mean;

        // K = P * H^T * S^-1
        let s_inv = invert_2x2(&projected_cov)?;
        let pht = covariance.dot(&self.update_mat.t()); // 4x2
        let kalman_gain = pht.dot(&s_inv); // 4x2

        let new_mean = mean + &kalman_gain.dot(&innovation);
        let new_covariance = covariance - &kalman_gain.dot(&projected_cov).dot(&kalman_gain.t());

        Some((new_mean, new_covariance))
    }
}

fn invert_2x2(m: &Array2<f64>) -> Option<Array2<f64>> {
    let nm = nalgebra::Matrix2::new(m[[0, 0]], m[[0, 1]], m[[1, 0]], m[[1, 1]]);
    let inv = nm.try_inverse()?;
    Some(array![[inv[(0, 0)], inv[(0, 1)]], [inv[(1, 0)], inv[(1, 1)]]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initiate() {
        let kf = KalmanFilter::new();
        let (mean, cov) = kf.initiate((100.0, 200.0), 50.0);
        assert_eq!(mean.to_vec(), vec![100.0, 200.0, 0.0, 0.0]);
        assert!(cov[[0, 0]] > 0.0);
    }

    #[test]
    fn test_learns_constant_velocity() {
        let kf = KalmanFilter::new();
        let (mut mean, mut cov) = kf.initiate((0.0, 0.0), 20.0);
        for step in 1..=20 {
            (mean, cov) = kf.predict(&mean, &cov, 20.0);
            (mean, cov) = kf
                .update(&mean, &cov, (step as f64 * 3.0, -(step as f64)), 20.0)
                .unwrap();
        }
        let (predicted, _) = kf.predict(&mean, &cov, 20.0);
        assert!((predicted[0] - 63.0).abs() < 1.5);
        assert!((predicted[1] + 21.0).abs() < 1.5);
    }
}
