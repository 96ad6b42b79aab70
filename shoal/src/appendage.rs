use glam::Vec2;

use crate::chain::SegmentChain;
use crate::heading::{angle_difference, heading_between, heading_to_vector};
use crate::shape::ArcSpan;

pub const EYE_RADIUS: f32 = 0.2;
pub const EYE_FORWARD: f32 = 0.5;
pub const EYE_SPREAD: f32 = 0.7;
pub const EYE_ANGLE: f32 = 80.0;

pub const DORSAL_LENGTH: f32 = 1.2;
pub const TAIL_LENGTH: f32 = 1.85;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePose {
    pub position: Vec2,
    pub radius: f32,
}

/// Elliptical fin: `length` along `facing + bend`, `width` across it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinPose {
    pub position: Vec2,
    pub facing: f32,
    pub bend: f32,
    pub length: f32,
    pub width: f32,
    pub span: ArcSpan,
}

impl FinPose {
    pub fn orientation(&self) -> f32 {
        self.facing + self.bend
    }
}

/// Dorsal fin or tail: a thin full base plus a half-width flare on the
/// outside of the turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailingFinPose {
    pub base: FinPose,
    pub flare: FinPose,
}

/// How fast the flare of a trailing fin widens with the bend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlareProfile {
    /// Bend (degrees) at which the flare has grown by one full length.
    pub per_degree: f32,
    /// The flare never gets narrower than `length / min_divisor`.
    pub min_divisor: f32,
}

pub const DORSAL_FLARE: FlareProfile = FlareProfile { per_degree: 100.0, min_divisor: 10.0 };
pub const TAIL_FLARE: FlareProfile = FlareProfile { per_degree: 75.0, min_divisor: 15.0 };

impl FlareProfile {
    pub fn width(&self, length: f32, bend: f32) -> f32 {
        length * bend.abs() / self.per_degree + length / self.min_divisor
    }
}

/// Paired fin placement for one side of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairedFinSpec {
    pub anchor: usize,
    pub length: f32,
    /// Width is `length / width_divisor`.
    pub width_divisor: f32,
}

/// Eyes sit on the back of the head, nudged forward and spread sideways.
pub fn eyes(chain: &SegmentChain, size: f32) -> [EyePose; 2] {
    let seg = &chain.segments()[1];
    let base = seg.position + heading_to_vector(seg.heading) * (size * EYE_FORWARD);
    let eye = |angle: f32| EyePose {
        position: base + heading_to_vector(seg.heading + angle) * (size * EYE_SPREAD),
        radius: size * EYE_RADIUS,
    };

    [eye(-EYE_ANGLE), eye(EYE_ANGLE)]
}

/// Left then right fin hanging off the edges of `spec.anchor`, bent inward
/// by `rotation` degrees.
pub fn paired_fins(chain: &SegmentChain, spec: &PairedFinSpec, rotation: f32) -> [FinPose; 2] {
    let sides = chain.part_sides(spec.anchor);
    let facing = chain.segments()[spec.anchor].heading;
    let fin = |position: Vec2, bend: f32| FinPose {
        position,
        facing,
        bend,
        length: spec.length,
        width: spec.length / spec.width_divisor,
        span: ArcSpan::Full,
    };

    [fin(sides.left, rotation), fin(sides.right, -rotation)]
}

/// Fin anchored between `anchor` and the segment in front of it. It faces
/// the front segment and bends by their heading difference.
pub fn trailing_fin(chain: &SegmentChain, anchor: usize, length: f32, profile: FlareProfile) -> TrailingFinPose {
    let segs = chain.segments();
    let front = &segs[anchor - 1];
    let cur = &segs[anchor];

    let position = (front.position + cur.position) * 0.5;
    let facing = heading_between(cur.position, front.position);
    let bend = angle_difference(front.heading, cur.heading);

    let span = if bend < 0.0 {
        ArcSpan::Lower
    } else if bend > 0.0 {
        ArcSpan::Upper
    } else {
        ArcSpan::Full
    };

    let base = FinPose {
        position,
        facing,
        bend,
        length,
        width: length / 10.0,
        span: ArcSpan::Full,
    };
    let flare = FinPose { width: profile.width(length, bend), span, ..base };

    TrailingFinPose { base, flare }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Placement;

    const EPS: f32 = 1e-3;

    fn straight_chain() -> SegmentChain {
        let mut c = SegmentChain::new(Vec2::ZERO, 0.0, &[1.0, 1.0, 1.0, 0.5], 10.0).unwrap();
        c.propagate(Placement::Bootstrap, 1);
        c
    }

    #[test]
    fn straight_body_has_no_bend() {
        let tail = trailing_fin(&straight_chain(), 3, 18.5, TAIL_FLARE);

        assert_eq!(tail.base.bend, 0.0);
        assert_eq!(tail.flare.span, ArcSpan::Full);
        assert!((tail.base.position - Vec2::new(0.0, -25.0)).length() < EPS);
        assert!(tail.base.facing.abs() < EPS || (tail.base.facing - 360.0).abs() < EPS);
        assert!((tail.flare.width - 18.5 / 15.0).abs() < EPS);
    }

    #[test]
    fn quarter_turn_bends_by_ninety() {
        let mut c = straight_chain();
        // hand-set headings: the segment in front turned right by 90
        let mut segs = c.segments().to_vec();
        segs[2].heading = 90.0;
        segs[3].heading = 0.0;
        c = chain_from(segs);

        let fin = trailing_fin(&c, 3, 12.0, DORSAL_FLARE);
        assert_eq!(fin.base.bend, 90.0);
        assert_eq!(fin.flare.span, ArcSpan::Upper);
        assert!((fin.flare.width - (12.0 * 0.9 + 1.2)).abs() < EPS);

        let mut segs = c.segments().to_vec();
        segs[2].heading = 0.0;
        segs[3].heading = 90.0;
        let fin = trailing_fin(&chain_from(segs), 3, 12.0, DORSAL_FLARE);
        assert_eq!(fin.base.bend, -90.0);
        assert_eq!(fin.flare.span, ArcSpan::Lower);
    }

    fn chain_from(segs: Vec<crate::chain::Segment>) -> SegmentChain {
        let radii: Vec<f32> = segs.iter().map(|s| s.radius).collect();
        let mut c = SegmentChain::new(Vec2::ZERO, 0.0, &radii, 10.0).unwrap();
        for (i, s) in segs.into_iter().enumerate() {
            c.set_segment(i, s);
        }
        c
    }

    #[test]
    fn eyes_flank_the_back_of_the_head() {
        let [left, right] = eyes(&straight_chain(), 10.0);

        assert!(left.position.x < 0.0 && right.position.x > 0.0);
        assert!((left.position.y - right.position.y).abs() < EPS);
        assert!((left.position.x + right.position.x).abs() < EPS);
        assert_eq!(left.radius, 2.0);
    }

    #[test]
    fn paired_fins_mirror_their_bend() {
        let spec = PairedFinSpec { anchor: 1, length: 15.0, width_divisor: 3.0 };
        let [left, right] = paired_fins(&straight_chain(), &spec, 25.0);

        assert_eq!(left.bend, 25.0);
        assert_eq!(right.bend, -25.0);
        assert_eq!(left.width, 5.0);
        assert!((left.position - Vec2::new(-1.0, -10.0)).length() < EPS);
        assert!((right.position - Vec2::new(1.0, -10.0)).length() < EPS);
    }
}
