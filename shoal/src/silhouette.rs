use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::chain::{SegmentChain, Sides};
use crate::error::{FishError, Result};

/// Edge points of every segment, head first.
pub fn body_lines(chain: &SegmentChain) -> Vec<Sides> {
    (0..chain.len()).map(|i| chain.part_sides(i)).collect()
}

/// Quads joining consecutive segment edges so the circles read as one body.
/// Corner order is `l1, r1, r2, l2`.
pub fn body_panels(lines: &[Sides]) -> Vec<[Vec2; 4]> {
    lines
        .windows(2)
        .map(|w| [w[0].left, w[0].right, w[1].right, w[1].left])
        .collect()
}

/// Damped rescaling of the size scalar on viewport changes.
///
/// `size' = (1 - carry) * base * (width / reference_width) + carry * size`
///
/// `reference_width` is the viewport width the base size was chosen for, so
/// an unchanged viewport is a fixed point and a changed one is approached
/// geometrically, `carry` of the remaining gap surviving each call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeScaling {
    pub carry: f32,
}

impl Default for SizeScaling {
    fn default() -> Self {
        Self { carry: 0.5 }
    }
}

impl SizeScaling {
    /// A carry of 1 or more never converges and can flip the size negative.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.carry) {
            return Err(FishError::InvalidCarry(self.carry));
        }
        Ok(())
    }

    pub fn target(&self, base: f32, reference_width: f32, width: f32) -> f32 {
        base * (width / reference_width)
    }

    pub fn next(&self, base: f32, reference_width: f32, width: f32, size: f32) -> f32 {
        (1.0 - self.carry) * self.target(base, reference_width, width) + self.carry * size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Placement;

    #[test]
    fn panels_join_neighbouring_edges() {
        let mut c = SegmentChain::new(Vec2::ZERO, 0.0, &[2.0, 1.0, 1.0], 5.0).unwrap();
        c.propagate(Placement::Bootstrap, 1);

        let lines = body_lines(&c);
        assert_eq!(lines.len(), 3);

        let panels = body_panels(&lines);
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0], [lines[0].left, lines[0].right, lines[1].right, lines[1].left]);
        assert!((panels[0][0] - Vec2::new(-2.0, 0.0)).length() < 1e-4);
        assert!((panels[0][2] - Vec2::new(1.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn unchanged_width_is_a_fixed_point() {
        let s = SizeScaling::default();
        assert_eq!(s.next(4.0, 800.0, 800.0, 4.0), 4.0);
    }

    #[test]
    fn doubling_width_closes_half_the_gap_per_call() {
        let s = SizeScaling::default();
        let once = s.next(4.0, 800.0, 1600.0, 4.0);
        assert_eq!(once, 6.0);

        let twice = s.next(4.0, 800.0, 1600.0, once);
        // target - carry^2 * (target - start)
        assert_eq!(twice, 8.0 - 0.25 * 4.0);
    }

    #[test]
    fn carry_must_leave_room_to_converge() {
        assert!(SizeScaling::default().validate().is_ok());
        assert!(SizeScaling { carry: 0.0 }.validate().is_ok());

        for carry in [1.0, 3.0, -0.1, f32::NAN] {
            let err = SizeScaling { carry }.validate().unwrap_err();
            assert!(matches!(err, FishError::InvalidCarry(_)), "{carry}");
        }
    }
}
