use glam::Vec2;

use crate::error::{FishError, Result};
use crate::heading::{heading_between, heading_to_vector, normalize_heading};

/// One circular body piece. Index 0 is the head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub position: Vec2,
    /// Degrees in [0, 360).
    pub heading: f32,
    pub radius: f32,
}

/// How trailing segments are placed during propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// First-ever placement: inherit the heading of the segment in front and
    /// sit behind it along that heading. Only run at setup.
    Bootstrap,
    /// Steady state: turn toward the segment in front, then sit one spacing
    /// behind it along the new heading.
    Follow,
}

/// Left and right edge points of a segment, perpendicular to its heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sides {
    pub left: Vec2,
    pub right: Vec2,
}

/// Drag chain of segments; every trailing segment stays exactly `spacing`
/// behind the one in front of it.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentChain {
    segments: Vec<Segment>,
    spacing: f32,
}

impl SegmentChain {
    /// All segments start stacked on `origin` facing `heading`; call
    /// [`SegmentChain::propagate`] with [`Placement::Bootstrap`] to lay them out.
    pub fn new(origin: Vec2, heading: f32, radii: &[f32], spacing: f32) -> Result<Self> {
        if radii.is_empty() {
            return Err(FishError::EmptyChain);
        }
        if radii.len() < 2 {
            return Err(FishError::ChainTooShort(radii.len()));
        }
        if let Some((index, &value)) = radii.iter().enumerate().find(|(_, r)| !(r.is_finite() && **r > 0.0)) {
            return Err(FishError::InvalidProportion { index, value });
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(FishError::InvalidSize(spacing));
        }

        let heading = normalize_heading(heading);
        let segments = radii
            .iter()
            .map(|&radius| Segment { position: origin, heading, radius })
            .collect();

        Ok(Self { segments, spacing })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub(crate) fn head_heading_mut(&mut self) -> &mut f32 {
        &mut self.segments[0].heading
    }

    #[cfg(test)]
    pub(crate) fn set_segment(&mut self, index: usize, segment: Segment) {
        self.segments[index] = segment;
    }

    /// Resizes the chain in place; positions catch up on the next propagation.
    pub(crate) fn rescale(&mut self, spacing: f32, radii: impl IntoIterator<Item = f32>) {
        self.spacing = spacing;
        for (seg, r) in self.segments.iter_mut().zip(radii) {
            seg.radius = r;
        }
    }

    /// Moves the head `velocity` units along its heading and drags the rest
    /// of the chain after it.
    pub fn advance_head(&mut self, velocity: f32) {
        let head = &mut self.segments[0];
        head.position += heading_to_vector(head.heading) * velocity;

        self.propagate(Placement::Follow, 1);
    }

    /// Recomputes every segment from `start` to the tail, in order. The head
    /// is never touched: steering owns its heading.
    pub fn propagate(&mut self, placement: Placement, start: usize) {
        for i in start.max(1)..self.segments.len() {
            let prev = self.segments[i - 1];
            let cur = &mut self.segments[i];

            cur.heading = match placement {
                Placement::Bootstrap => prev.heading,
                Placement::Follow => heading_between(cur.position, prev.position),
            };

            let behind = heading_to_vector(cur.heading + 180.0);
            cur.position = prev.position + behind * self.spacing;
        }
    }

    /// Edge points at the segment's own radius, 90 degrees either side of
    /// its heading.
    pub fn part_sides(&self, index: usize) -> Sides {
        let seg = &self.segments[index];
        Sides {
            left: seg.position + heading_to_vector(seg.heading - 90.0) * seg.radius,
            right: seg.position + heading_to_vector(seg.heading + 90.0) * seg.radius,
        }
    }
}
