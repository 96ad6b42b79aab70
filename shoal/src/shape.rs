//! Local-space shape templates and the transforms that pose them.
//!
//! Templates are built once around their own origin and reused every frame;
//! only the [`Transform2D`] changes as a fish swims.

use std::f32::consts::PI;

use glam::Vec2;

use crate::heading::heading_to_vector;

/// Ring resolution of every fan.
pub const FAN_STEPS: usize = 30;

/// Which part of an ellipse a fan covers, in the ellipse's own angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcSpan {
    Full,
    /// 0..π: the half on the right of the shape's orientation.
    Lower,
    /// π..2π: the half on the left of the shape's orientation.
    Upper,
}

impl ArcSpan {
    fn range(self) -> (f32, f32) {
        match self {
            ArcSpan::Full => (0.0, 2.0 * PI),
            ArcSpan::Lower => (0.0, PI),
            ArcSpan::Upper => (PI, 2.0 * PI),
        }
    }
}

/// Filled fan: `points[0]` is the centre, the rest walk the rim.
#[derive(Debug, Clone, PartialEq)]
pub struct Fan {
    pub points: Vec<Vec2>,
}

impl Fan {
    pub fn circle(radius: f32) -> Self {
        ellipse_fan(Vec2::splat(radius), ArcSpan::Full, 0.0)
    }

    pub fn translated(mut self, by: Vec2) -> Self {
        for p in &mut self.points {
            *p += by;
        }
        self
    }

    /// Triangle-list indices equivalent to drawing the fan.
    pub fn triangle_indices(&self) -> Vec<u16> {
        let rim = self.points.len().saturating_sub(1);
        (1..rim)
            .flat_map(|i| [0, i as u16, i as u16 + 1])
            .collect()
    }
}

/// Ellipse centred on the origin. `radii.x` lies along `orientation`
/// (a heading in degrees), `radii.y` across it.
pub fn ellipse_fan(radii: Vec2, span: ArcSpan, orientation: f32) -> Fan {
    let (start, end) = span.range();
    let along = heading_to_vector(orientation);
    let across = heading_to_vector(orientation + 90.0);

    let mut points = Vec::with_capacity(FAN_STEPS + 2);
    points.push(Vec2::ZERO);
    for i in 0..=FAN_STEPS {
        let theta = start + (i as f32 / FAN_STEPS as f32) * (end - start);
        let (sin, cos) = theta.sin_cos();
        points.push(along * (radii.x * cos) + across * (radii.y * sin));
    }

    Fan { points }
}

/// Pose of a template: turned clockwise by `rotation` degrees about its
/// origin, then moved to `translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub translation: Vec2,
    pub rotation: f32,
}

impl Transform2D {
    pub const IDENTITY: Self = Self { translation: Vec2::ZERO, rotation: 0.0 };

    pub fn new(translation: Vec2, rotation: f32) -> Self {
        Self { translation, rotation }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        // clockwise by heading == counter-clockwise by -heading
        let (sin, cos) = (-self.rotation).to_radians().sin_cos();
        Vec2::new(cos * p.x - sin * p.y, sin * p.x + cos * p.y) + self.translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn fan_starts_at_centre_and_closes_the_ring() {
        let fan = Fan::circle(2.0);
        assert_eq!(fan.points.len(), FAN_STEPS + 2);
        assert_eq!(fan.points[0], Vec2::ZERO);
        assert!((fan.points[1] - fan.points[FAN_STEPS + 1]).length() < EPS);
        assert!(fan.points[1..].iter().all(|p| (p.length() - 2.0).abs() < EPS));
    }

    #[test]
    fn long_axis_follows_orientation() {
        let fan = ellipse_fan(Vec2::new(3.0, 1.0), ArcSpan::Full, 90.0);
        // theta = 0 lands on the long axis, which points right at heading 90
        assert!((fan.points[1] - Vec2::new(3.0, 0.0)).length() < EPS);
    }

    #[test]
    fn lower_half_sits_right_of_the_orientation() {
        let fan = ellipse_fan(Vec2::new(3.0, 1.0), ArcSpan::Lower, 0.0);
        assert!(fan.points[1..].iter().all(|p| p.x >= -EPS));

        let fan = ellipse_fan(Vec2::new(3.0, 1.0), ArcSpan::Upper, 0.0);
        assert!(fan.points[1..].iter().all(|p| p.x <= EPS));
    }

    #[test]
    fn fan_indices_cover_every_rim_edge() {
        let fan = Fan::circle(1.0);
        let idx = fan.triangle_indices();
        assert_eq!(idx.len(), FAN_STEPS * 3);
        assert_eq!(&idx[..3], &[0, 1, 2]);
        assert_eq!(*idx.last().unwrap() as usize, FAN_STEPS + 1);
    }

    #[test]
    fn transform_turns_clockwise_like_headings() {
        let t = Transform2D::new(Vec2::new(10.0, 0.0), 90.0);
        // a point straight ahead (up) ends up straight right
        assert!((t.apply(Vec2::Y) - Vec2::new(11.0, 0.0)).length() < EPS);
        assert_eq!(Transform2D::IDENTITY.apply(Vec2::ONE), Vec2::ONE);
    }
}
