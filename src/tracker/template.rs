//! Reference tracking capability: normalized cross-correlation template matching
//! around a Kalman-predicted position.

use log::debug;
use ndarray::{Array1, Array2, ArrayView2};

use crate::error::CapabilityError;
use crate::tracker::capability::TrackingCapability;
use crate::tracker::frame::Frame;
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::region::Region;

/// Configuration for the [`TemplateTracker`].
#[derive(Debug, Clone)]
pub struct TemplateTrackerConfig {
    /// Pixels searched on every side of the predicted position.
    pub search_margin: u32,
    /// Minimum correlation (in `[-1, 1]`) accepted as a match.
    pub min_score: f32,
    /// Predict the search centre with a constant-velocity Kalman filter.
    pub motion_prior: bool,
}

impl Default for TemplateTrackerConfig {
    fn default() -> Self {
        Self {
            search_margin: 32,
            min_score: 0.6,
            motion_prior: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Target {
    region: Region,
    /// Zero-mean template captured at initialization
    template: Array2<f32>,
    template_norm: f32,
    mean: Array1<f64>,
    covariance: Array2<f64>,
}

impl Target {
    fn scale(&self) -> f64 {
        self.region.width().max(self.region.height()) as f64
    }

    /// Normalized cross-correlation between the template and `patch`.
    fn score(&self, patch: ArrayView2<'_, u8>) -> f32 {
        let n = patch.len() as f32;
        let patch_mean = patch.iter().map(|&p| p as f32).sum::<f32>() / n;

        let mut dot = 0.0;
        let mut energy = 0.0;
        for (&p, &t) in patch.iter().zip(self.template.iter()) {
            let d = p as f32 - patch_mean;
            dot += d * t;
            energy += d * d;
        }

        if energy <= f32::EPSILON {
            return 0.0;
        }
        dot / (energy.sqrt() * self.template_norm)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateTracker {
    config: TemplateTrackerConfig,
    kalman_filter: KalmanFilter,
    target: Option<Target>,
}

impl TemplateTracker {
    pub fn new(config: TemplateTrackerConfig) -> Self {
        Self {
            config,
            kalman_filter: KalmanFilter::default(),
            target: None,
        }
    }

    /// Origin of the region where the search is centred.
    fn predicted_origin(&self, target: &Target) -> (i32, i32) {
        if !self.config.motion_prior {
            return (target.region.x(), target.region.y());
        }
        let cx = target.mean[0] - target.region.width() as f64 / 2.0;
        let cy = target.mean[1] - target.region.height() as f64 / 2.0;
        (cx.round() as i32, cy.round() as i32)
    }

    fn best_match(
        &self,
        target: &Target,
        frame: &Frame,
        origin: (i32, i32),
    ) -> Option<(Region, f32)> {
        let margin = i32::try_from(self.config.search_margin).unwrap_or(i32::MAX);
        let max_x = frame.width() as i32 - target.region.width();
        let max_y = frame.height() as i32 - target.region.height();
        if max_x < 0 || max_y < 0 {
            return None;
        }

        let x0 = origin.0.saturating_sub(margin).max(0);
        let x1 = origin.0.saturating_add(margin).min(max_x);
        let y0 = origin.1.saturating_sub(margin).max(0);
        let y1 = origin.1.saturating_add(margin).min(max_y);

        let (width, height) = (target.region.width(), target.region.height());
        let mut best: Option<(Region, f32)> = None;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let Ok(candidate) = Region::new(x, y, width, height) else {
                    continue;
                };
                let Some(patch) = frame.crop(&candidate) else {
                    continue;
                };
                let score = target.score(patch);
                if best.is_none_or(|(_, s)| score > s) {
                    best = Some((candidate, score));
                }
            }
        }
        best
    }
}

impl TrackingCapability for TemplateTracker {
    fn init(&mut self, frame: &Frame, region: Region) -> Result<(), CapabilityError> {
        if region.width() < 2 || region.height() < 2 {
            return Err(CapabilityError::Degenerate(region));
        }
        let patch = frame
            .crop(&region)
            .ok_or(CapabilityError::OutOfBounds {
                region,
                width: frame.width(),
                height: frame.height(),
            })?;

        let patch = patch.mapv(|p| p as f32);
        let template = &patch - patch.mean().unwrap_or(0.0);
        let template_norm = template.mapv(|t| t * t).sum().sqrt();
        if template_norm <= f32::EPSILON {
            return Err(CapabilityError::Rejected(format!(
                "region {region} has no texture to track"
            )));
        }

        let scale = region.width().max(region.height()) as f64;
        let (mean, covariance) = self.kalman_filter.initiate(region.center(), scale);

        self.target = Some(Target {
            region,
            template,
            template_norm,
            mean,
            covariance,
        });
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Option<Region> {
        let mut target = self.target.take()?;

        let scale = target.scale();
        (target.mean, target.covariance) = self
            .kalman_filter
            .predict(&target.mean, &target.covariance, scale);

        let origin = self.predicted_origin(&target);
        let found = self
            .best_match(&target, frame, origin)
            .filter(|&(_, score)| score >= self.config.min_score);

        let result = match found {
            Some((region, score)) => {
                debug!("Template match at {region}, score {score:.3}");
                if let Some((mean, covariance)) = self.kalman_filter.update(
                    &target.mean,
                    &target.covariance,
                    region.center(),
                    scale,
                ) {
                    target.mean = mean;
                    target.covariance = covariance;
                }
                target.region = region;
                Some(region)
            }
            None => {
                // Stop drifting while the target is not visible
                target.mean[2] = 0.0;
                target.mean[3] = 0.0;
                None
            }
        };

        self.target = Some(target);
        result
    }
}
