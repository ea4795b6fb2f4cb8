use crate::error::{ParameterError, Result};
use crate::math::ellipse_2d::EllipticMetric;
use crate::planar::InconsistencyPolicy;

/// How convex corners of the offset curve are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerStyle {
    /// Extend both offset lines to their intersection.
    Sharp,
    /// Follow the offset ellipse between the two offset vectors.
    #[default]
    Round,
}

/// How the ends of a line (and 180° turn-backs) are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapStyle {
    /// Close straight across the end point.
    Butt,
    /// Extend past the end point: a half ellipse with round corners, a
    /// square with sharp ones.
    #[default]
    Cap,
}

/// Parameters of a buffer operation.
///
/// The distance metric is an ellipse with semi-axes `distance_major` and
/// `distance_minor`, its major axis rotated by `axis_angle` degrees from +x.
/// A negative distance shrinks areas; both distances share one sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferParams {
    distance_major: f64,
    distance_minor: f64,
    axis_angle: f64,
    corner_style: CornerStyle,
    cap_style: CapStyle,
    tolerance: f64,
    miter_limit: Option<f64>,
    inconsistency: InconsistencyPolicy,
}

impl BufferParams {
    /// Default maximum deviation between an arc and its chords.
    pub const DEFAULT_TOLERANCE: f64 = 0.01;

    /// Creates elliptical buffer parameters.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError::Invalid` when a value is not finite or the
    /// two distances have different signs.
    #[allow(clippy::float_cmp)]
    pub fn new(distance_major: f64, distance_minor: f64, axis_angle: f64) -> Result<Self> {
        if !distance_major.is_finite() || !distance_minor.is_finite() || !axis_angle.is_finite() {
            return Err(ParameterError::Invalid(format!(
                "non-finite distance or angle ({distance_major}, {distance_minor}, {axis_angle})"
            ))
            .into());
        }
        if distance_major * distance_minor < 0.0 {
            return Err(ParameterError::Invalid(format!(
                "distances {distance_major} and {distance_minor} differ in sign"
            ))
            .into());
        }
        if (distance_major == 0.0) != (distance_minor == 0.0) {
            return Err(ParameterError::Invalid(
                "only one of the two distances is zero".to_owned(),
            )
            .into());
        }
        Ok(Self {
            distance_major,
            distance_minor,
            axis_angle,
            corner_style: CornerStyle::default(),
            cap_style: CapStyle::default(),
            tolerance: Self::DEFAULT_TOLERANCE,
            miter_limit: None,
            inconsistency: InconsistencyPolicy::default(),
        })
    }

    /// Creates circular buffer parameters.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError::Invalid` for a non-finite distance.
    pub fn circular(distance: f64) -> Result<Self> {
        Self::new(distance, distance, 0.0)
    }

    #[must_use]
    pub fn with_corner_style(mut self, style: CornerStyle) -> Self {
        self.corner_style = style;
        self
    }

    #[must_use]
    pub fn with_cap_style(mut self, style: CapStyle) -> Self {
        self.cap_style = style;
        self
    }

    /// Sets the maximum deviation between a true arc and its chords.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError::Invalid` unless `tolerance` is finite and
    /// positive.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(ParameterError::Invalid(format!(
                "tolerance must be positive, got {tolerance}"
            ))
            .into());
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Replaces a sharp corner by a bevel once its tip lies further than
    /// `limit` times the larger axis from the corner. Non-positive values
    /// disable the limit.
    #[must_use]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = (limit > 0.0).then_some(limit);
        self
    }

    #[must_use]
    pub fn with_inconsistency_policy(mut self, policy: InconsistencyPolicy) -> Self {
        self.inconsistency = policy;
        self
    }

    #[must_use]
    pub fn distance_major(&self) -> f64 {
        self.distance_major
    }

    #[must_use]
    pub fn distance_minor(&self) -> f64 {
        self.distance_minor
    }

    /// Major axis angle in degrees.
    #[must_use]
    pub fn axis_angle(&self) -> f64 {
        self.axis_angle
    }

    #[must_use]
    pub fn corner_style(&self) -> CornerStyle {
        self.corner_style
    }

    #[must_use]
    pub fn cap_style(&self) -> CapStyle {
        self.cap_style
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn miter_limit(&self) -> Option<f64> {
        self.miter_limit
    }

    #[must_use]
    pub fn inconsistency_policy(&self) -> InconsistencyPolicy {
        self.inconsistency
    }

    /// `true` when both distances are zero.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_zero(&self) -> bool {
        self.distance_major == 0.0
    }

    /// `true` for a shrinking (inward) buffer.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.distance_major < 0.0 || self.distance_minor < 0.0
    }

    /// The distance ellipse, built from the absolute distances.
    #[must_use]
    pub fn metric(&self) -> EllipticMetric {
        EllipticMetric::new(
            self.distance_major.abs(),
            self.distance_minor.abs(),
            self.axis_angle,
        )
    }
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance_major: 1.0,
            distance_minor: 1.0,
            axis_angle: 0.0,
            corner_style: CornerStyle::default(),
            cap_style: CapStyle::default(),
            tolerance: Self::DEFAULT_TOLERANCE,
            miter_limit: None,
            inconsistency: InconsistencyPolicy::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_is_round_capped_unit_circle() {
        let p = BufferParams::default();
        assert_eq!(p.corner_style(), CornerStyle::Round);
        assert_eq!(p.cap_style(), CapStyle::Cap);
        assert!((p.tolerance() - 0.01).abs() < 1e-15);
        assert!(p.metric().is_circular());
        assert!(p.miter_limit().is_none());
        assert_eq!(p.inconsistency_policy(), InconsistencyPolicy::Reject);
    }

    #[test]
    fn builders_set_fields() {
        let p = BufferParams::circular(2.0)
            .unwrap()
            .with_corner_style(CornerStyle::Sharp)
            .with_cap_style(CapStyle::Butt)
            .with_miter_limit(3.0)
            .with_tolerance(0.5)
            .unwrap();
        assert_eq!(p.corner_style(), CornerStyle::Sharp);
        assert_eq!(p.cap_style(), CapStyle::Butt);
        assert_eq!(p.miter_limit(), Some(3.0));
        assert!((p.tolerance() - 0.5).abs() < 1e-15);
        assert!(p.with_miter_limit(0.0).miter_limit().is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = BufferParams::new(1.0, -1.0, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
        assert!(BufferParams::circular(f64::NAN).is_err());
        assert!(BufferParams::new(1.0, 0.0, 0.0).is_err());
        assert!(BufferParams::default().with_tolerance(0.0).is_err());
        assert!(BufferParams::default().with_tolerance(-1.0).is_err());
    }

    #[test]
    fn negative_distance_gives_positive_metric() {
        let p = BufferParams::new(-3.0, -1.0, 30.0).unwrap();
        assert!(p.is_negative());
        assert!(!p.is_zero());
        let m = p.metric();
        assert!((m.major() - 3.0).abs() < 1e-15);
        assert!((m.minor() - 1.0).abs() < 1e-15);
        assert!(BufferParams::circular(0.0).unwrap().is_zero());
    }
}
