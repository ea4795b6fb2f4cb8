use std::f64::consts::PI;

use nalgebra::Rotation2;

use super::{Point3, Vector2, TOLERANCE};

/// Returns the unit direction from `from` to `to` in XY, or `None` for a
/// zero-length step.
#[must_use]
pub fn norm_vector(from: &Point3, to: &Point3) -> Option<Vector2> {
    let v = Vector2::new(to.x - from.x, to.y - from.y);
    let len = v.norm();
    if len > 0.0 {
        Some(v / len)
    } else {
        None
    }
}

/// Rotates `v` counter-clockwise by `angle` radians.
#[must_use]
pub fn rotate_vector(v: Vector2, angle: f64) -> Vector2 {
    Rotation2::new(angle) * v
}

/// Anisotropic distance metric: an ellipse with semi-axes `major` (along the
/// rotated x axis) and `minor`, rotated by the axis angle.
///
/// A circle is the special case `major == minor`.
#[derive(Debug, Clone, Copy)]
pub struct EllipticMetric {
    major: f64,
    minor: f64,
    rotation: Rotation2<f64>,
}

impl EllipticMetric {
    /// Creates a metric from the two semi-axes and the axis angle in degrees.
    ///
    /// Both axes are expected to be positive; callers pass absolute distances.
    #[must_use]
    pub fn new(major: f64, minor: f64, angle_degrees: f64) -> Self {
        Self {
            major,
            minor,
            rotation: Rotation2::new(angle_degrees.to_radians()),
        }
    }

    /// Creates a circular metric of the given radius.
    #[must_use]
    pub fn circular(radius: f64) -> Self {
        Self::new(radius, radius, 0.0)
    }

    #[must_use]
    pub fn major(&self) -> f64 {
        self.major
    }

    #[must_use]
    pub fn minor(&self) -> f64 {
        self.minor
    }

    /// Returns the larger semi-axis.
    #[must_use]
    pub fn max_axis(&self) -> f64 {
        self.major.max(self.minor)
    }

    #[must_use]
    pub fn is_circular(&self) -> bool {
        (self.major - self.minor).abs() < TOLERANCE
    }

    /// Returns the metric with both axes reduced by `by`, never below half
    /// their length.
    #[must_use]
    pub fn shrunk(&self, by: f64) -> Self {
        Self {
            major: (self.major - by).max(self.major * 0.5),
            minor: (self.minor - by).max(self.minor * 0.5),
            rotation: self.rotation,
        }
    }

    /// Maps a vector from unit-circle space into ellipse space.
    #[must_use]
    pub fn transform(&self, v: Vector2) -> Vector2 {
        let local = self.rotation.inverse() * v;
        self.rotation * Vector2::new(local.x * self.major, local.y * self.minor)
    }

    /// Maps a vector from ellipse space back into unit-circle space.
    #[must_use]
    pub fn inverse_transform(&self, v: Vector2) -> Vector2 {
        let local = self.rotation.inverse() * v;
        self.rotation * Vector2::new(local.x / self.major, local.y / self.minor)
    }

    /// Returns the point of the ellipse (relative to its center) whose tangent
    /// is parallel to `dir`, on the right-hand side of `dir`.
    ///
    /// For a circle this is the right normal of `dir` scaled by the radius.
    #[must_use]
    pub fn tangent_point(&self, dir: Vector2) -> Vector2 {
        let local = self.rotation.inverse() * dir;
        let a = self.major;
        let b = self.minor;
        let u = a * a * local.y;
        let v = -b * b * local.x;
        let len = a * b / (a * a * v * v + b * b * u * u).sqrt();
        self.rotation * Vector2::new(u * len, v * len)
    }

    /// Returns the point of the ellipse at unit-circle parameter `phi`.
    #[must_use]
    pub fn point_at(&self, phi: f64) -> Vector2 {
        self.transform(Vector2::new(phi.cos(), phi.sin()))
    }

    /// Returns the unit-circle parameter of an ellipse-space vector.
    #[must_use]
    pub fn parameter_of(&self, v: Vector2) -> f64 {
        let u = self.inverse_transform(v);
        u.y.atan2(u.x)
    }

    /// Angular step whose chord deviates from the ellipse by at most
    /// `tolerance`, measured on the larger semi-axis.
    #[must_use]
    pub fn angular_step(&self, tolerance: f64) -> f64 {
        let a = self.max_axis();
        let tol = tolerance.min(a);
        2.0 * (1.0 - tol / a).acos()
    }

    /// Number of chords used to approximate an arc of `sweep` radians.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn arc_segment_count(&self, sweep: f64, tolerance: f64) -> usize {
        let step = self.angular_step(tolerance);
        if step <= 0.0 || !step.is_finite() {
            return 1;
        }
        (sweep.abs() / step).floor() as usize + 1
    }

    /// Number of chords for a full turn around the ellipse.
    #[must_use]
    pub fn full_turn_segments(&self, tolerance: f64) -> usize {
        self.arc_segment_count(2.0 * PI, tolerance)
    }
}
