//! Turns a fish pose into an ordered list of things to draw.
//!
//! Shapes whose local geometry only changes on resize are [`DrawOp::Template`]s:
//! the renderer builds them once per layout epoch from [`template_fan`] and
//! poses them with a transform. Everything whose shape changes every frame is
//! sent as raw geometry.

use glam::Vec2;

use crate::appendage::FinPose;
use crate::fish::{Fish, FishPose, Rgba};
use crate::shape::{ArcSpan, Fan, Transform2D, ellipse_fan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Segment(usize),
    Eye,
    FrontFin(Side),
    BackFin(Side),
    DorsalBase,
    TailBase,
}

/// Identifies one cached template: which part of which fish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    pub fish: usize,
    pub part: Part,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Template {
        key: TemplateKey,
        transform: Transform2D,
        color: Rgba,
    },
    Fan {
        fan: Fan,
        color: Rgba,
    },
    /// Corner order per quad is `l1, r1, r2, l2`.
    Quads {
        quads: Vec<[Vec2; 4]>,
        color: Rgba,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub ops: Vec<DrawOp>,
}

impl DrawList {
    pub fn extend(&mut self, other: DrawList) {
        self.ops.extend(other.ops);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Local geometry of a template, centred on the part's anchor.
///
/// Returns `None` for a segment index past the end of the chain.
pub fn template_fan(fish: &Fish, part: Part) -> Option<Fan> {
    let fan = match part {
        Part::Segment(i) => Fan::circle(fish.chain().segments().get(i)?.radius),
        Part::Eye => Fan::circle(fish.eye_radius()),
        Part::FrontFin(side) => paired_fin_template(fish.front_fin().length, 3.0, fish.plan().fin_rotation, side),
        Part::BackFin(side) => paired_fin_template(fish.back_fin().length, 2.0, fish.plan().fin_rotation, side),
        Part::DorsalBase => base_template(fish.dorsal_length()),
        Part::TailBase => base_template(fish.tail_length()),
    };
    Some(fan)
}

fn paired_fin_template(length: f32, width_divisor: f32, rotation: f32, side: Side) -> Fan {
    let bend = match side {
        Side::Left => rotation,
        Side::Right => -rotation,
    };
    ellipse_fan(Vec2::new(length, length / width_divisor), ArcSpan::Full, bend)
}

fn base_template(length: f32) -> Fan {
    ellipse_fan(Vec2::new(length, length / 10.0), ArcSpan::Full, 0.0)
}

/// Draw order, back to front: paired fins, body circles, body panels,
/// dorsal fin, tail, eyes.
pub fn build_draw_list(fish_index: usize, fish: &Fish, pose: &FishPose) -> DrawList {
    let key = |part| TemplateKey { fish: fish_index, part };
    let mut ops = Vec::with_capacity(pose.segments.len() + 11);

    let fin_parts = [
        Part::FrontFin(Side::Left),
        Part::FrontFin(Side::Right),
        Part::BackFin(Side::Left),
        Part::BackFin(Side::Right),
    ];
    for (part, fin) in fin_parts.into_iter().zip(&pose.fins) {
        // bend is baked into the template
        ops.push(DrawOp::Template {
            key: key(part),
            transform: Transform2D::new(fin.position, fin.facing),
            color: fish.fin_color(),
        });
    }

    for (i, seg) in pose.segments.iter().enumerate() {
        ops.push(DrawOp::Template {
            key: key(Part::Segment(i)),
            transform: Transform2D::new(seg.position, 0.0),
            color: fish.color(),
        });
    }

    ops.push(DrawOp::Quads { quads: pose.panels(), color: fish.color() });

    for (part, fin) in [(Part::DorsalBase, &pose.dorsal), (Part::TailBase, &pose.tail)] {
        ops.push(DrawOp::Template {
            key: key(part),
            transform: Transform2D::new(fin.base.position, fin.base.orientation()),
            color: fish.fin_color(),
        });
        ops.push(DrawOp::Fan { fan: flare_fan(&fin.flare), color: fish.fin_color() });
    }

    for eye in &pose.eyes {
        ops.push(DrawOp::Template {
            key: key(Part::Eye),
            transform: Transform2D::new(eye.position, 0.0),
            color: fish.eye_color(),
        });
    }

    DrawList { ops }
}

fn flare_fan(fin: &FinPose) -> Fan {
    ellipse_fan(Vec2::new(fin.length, fin.width), fin.span, fin.orientation()).translated(fin.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::SceneBounds;
    use crate::fish::{BodyPlan, FishConfig};

    fn fish() -> Fish {
        let bounds = SceneBounds::new(800.0, 600.0).unwrap();
        let cfg = FishConfig::new([0.7, 0.5, 0.2, 1.0], 3.0, 0.6).with_plan(BodyPlan::compact());
        Fish::at(cfg, &bounds, Vec2::ZERO, 0.0).unwrap()
    }

    fn templates(list: &DrawList) -> Vec<Part> {
        list.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Template { key, .. } => Some(key.part),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn ops_follow_layering_order() {
        let fish = fish();
        let list = build_draw_list(2, &fish, &fish.pose());

        // 4 fins, 8 circles, panels, 2 x (base, flare), 2 eyes
        assert_eq!(list.len(), 4 + 8 + 1 + 4 + 2);
        assert!(matches!(list.ops[12], DrawOp::Quads { ref quads, .. } if quads.len() == 7));
        assert!(matches!(list.ops[14], DrawOp::Fan { .. }));
        assert!(matches!(list.ops[16], DrawOp::Fan { .. }));

        let parts = templates(&list);
        assert_eq!(parts[0], Part::FrontFin(Side::Left));
        assert_eq!(parts[3], Part::BackFin(Side::Right));
        assert_eq!(parts[4], Part::Segment(0));
        assert_eq!(parts[11], Part::Segment(7));
        assert_eq!(parts[12], Part::DorsalBase);
        assert_eq!(parts[13], Part::TailBase);
        assert_eq!(&parts[14..], &[Part::Eye, Part::Eye]);

        assert!(list.ops.iter().all(|op| match op {
            DrawOp::Template { key, .. } => key.fish == 2,
            _ => true,
        }));
    }

    #[test]
    fn colours_by_part() {
        let fish = fish();
        let list = build_draw_list(0, &fish, &fish.pose());

        for op in &list.ops {
            match op {
                DrawOp::Template { key, color, .. } => match key.part {
                    Part::Segment(_) => assert_eq!(*color, fish.color()),
                    Part::Eye => assert_eq!(*color, fish.eye_color()),
                    _ => assert_eq!(*color, fish.fin_color()),
                },
                DrawOp::Fan { color, .. } => assert_eq!(*color, fish.fin_color()),
                DrawOp::Quads { color, .. } => assert_eq!(*color, fish.color()),
            }
        }
    }

    #[test]
    fn posed_template_matches_derived_fin() {
        let fish = fish();
        let pose = fish.pose();
        let list = build_draw_list(0, &fish, &pose);

        let DrawOp::Template { key, transform, .. } = &list.ops[0] else {
            panic!("first op should be a fin template");
        };
        let fan = template_fan(&fish, key.part).unwrap();
        let fin = pose.fins[0];
        let expected = ellipse_fan(Vec2::new(fin.length, fin.width), ArcSpan::Full, fin.orientation());

        for (local, want) in fan.points.iter().zip(&expected.points) {
            let got = transform.apply(*local);
            assert!((got - (*want + fin.position)).length() < 1e-3);
        }
    }

    #[test]
    fn segment_templates_stop_at_the_tail() {
        let fish = fish();
        assert!(template_fan(&fish, Part::Segment(7)).is_some());
        assert!(template_fan(&fish, Part::Segment(8)).is_none());
    }
}
