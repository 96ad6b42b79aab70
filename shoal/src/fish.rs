use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::appendage::{
    self, DORSAL_FLARE, DORSAL_LENGTH, EYE_RADIUS, EyePose, FinPose, PairedFinSpec, TAIL_FLARE,
    TAIL_LENGTH, TrailingFinPose,
};
use crate::bounds::SceneBounds;
use crate::chain::{Placement, Segment, SegmentChain, Sides};
use crate::error::{FishError, Result};
use crate::silhouette::{self, SizeScaling};
use crate::steering::{Steer, SteeringConfig, SteeringController, TurnBias};

pub type Rgba = [f32; 4];

/// Eyes are always opaque black.
pub const EYE_COLOR: Rgba = [0.0, 0.0, 0.0, 1.0];

/// How much darker than the body the fins are, per RGB channel.
pub const FIN_SHADE: f32 = 0.2;

/// Shape of a fish: segment radii as multiples of the size scalar, and which
/// segments carry the fins. The tail always hangs off the last segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyPlan {
    pub proportions: Vec<f32>,
    pub front_fin: usize,
    pub back_fin: usize,
    pub front_fin_length: f32,
    pub back_fin_length: f32,
    /// Inward tilt of the paired fins, degrees.
    pub fin_rotation: f32,
    pub dorsal: usize,
}

impl Default for BodyPlan {
    fn default() -> Self {
        Self {
            proportions: vec![0.65, 0.9, 1.0, 1.1, 1.0, 0.9, 0.8, 0.75, 0.6, 0.4, 0.3, 0.2, 0.01],
            front_fin: 3,
            back_fin: 8,
            front_fin_length: 1.5,
            back_fin_length: 0.65,
            fin_rotation: 25.0,
            dorsal: 6,
        }
    }
}

impl BodyPlan {
    /// Shorter eight-segment body.
    pub fn compact() -> Self {
        Self {
            proportions: vec![0.65, 0.95, 1.05, 0.9, 0.7, 0.45, 0.25, 0.05],
            front_fin: 2,
            back_fin: 5,
            dorsal: 3,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.proportions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proportions.is_empty()
    }

    pub fn tail(&self) -> usize {
        self.len().saturating_sub(1)
    }

    pub fn validate(&self) -> Result<()> {
        let len = self.len();
        if len == 0 {
            return Err(FishError::EmptyChain);
        }
        if len < 2 {
            return Err(FishError::ChainTooShort(len));
        }
        if let Some((index, &value)) =
            self.proportions.iter().enumerate().find(|(_, p)| !(p.is_finite() && **p > 0.0))
        {
            return Err(FishError::InvalidProportion { index, value });
        }

        let anchors = [
            ("front fin", self.front_fin, 0),
            ("back fin", self.back_fin, 0),
            // dorsal sits between its anchor and the segment in front
            ("dorsal fin", self.dorsal, 1),
        ];
        for (part, index, min) in anchors {
            if index < min || index >= len {
                return Err(FishError::AnchorOutOfRange { part, index, len });
            }
        }

        let lengths = [("front fin", self.front_fin_length), ("back fin", self.back_fin_length)];
        for (part, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(FishError::InvalidFinLength { part, value });
            }
        }
        if !self.fin_rotation.is_finite() {
            return Err(FishError::InvalidFinRotation(self.fin_rotation));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishConfig {
    pub color: Rgba,
    pub size: f32,
    pub velocity: f32,
    #[serde(default)]
    pub plan: BodyPlan,
    #[serde(default)]
    pub steering: SteeringConfig,
    #[serde(default)]
    pub scaling: SizeScaling,
}

impl FishConfig {
    pub fn new(color: Rgba, size: f32, velocity: f32) -> Self {
        Self {
            color,
            size,
            velocity,
            plan: BodyPlan::default(),
            steering: SteeringConfig::default(),
            scaling: SizeScaling::default(),
        }
    }

    pub fn with_plan(mut self, plan: BodyPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_steering(mut self, steering: SteeringConfig) -> Self {
        self.steering = steering;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(FishError::InvalidSize(self.size));
        }
        if !(self.velocity.is_finite() && self.velocity > 0.0) {
            return Err(FishError::InvalidVelocity(self.velocity));
        }
        self.plan.validate()?;
        self.steering.validate()?;
        self.scaling.validate()
    }
}

/// Everything the renderer needs for one frame of one fish. Rebuilt from the
/// chain on demand and never stored across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FishPose {
    pub segments: Vec<Segment>,
    pub eyes: [EyePose; 2],
    /// Front left, front right, back left, back right.
    pub fins: [FinPose; 4],
    pub dorsal: TrailingFinPose,
    pub tail: TrailingFinPose,
    pub silhouette: Vec<Sides>,
}

impl FishPose {
    pub fn panels(&self) -> Vec<[Vec2; 4]> {
        silhouette::body_panels(&self.silhouette)
    }
}

#[derive(Debug, Clone)]
pub struct Fish {
    color: Rgba,
    fin_color: Rgba,
    velocity: f32,
    base_size: f32,
    size: f32,
    reference_width: f32,
    plan: BodyPlan,
    scaling: SizeScaling,
    chain: SegmentChain,
    steering: SteeringController,
}

impl Fish {
    /// Fish somewhere near the middle of `bounds`, facing a random whole
    /// degree, with a random turn bias. It starts at `config.size` whatever
    /// the viewport; only later resizes scale it, relative to `bounds.width`.
    pub fn new<R: Rng + ?Sized>(config: FishConfig, bounds: &SceneBounds, rng: &mut R) -> Result<Self> {
        let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
        let origin = Vec2::new(
            sign * rng.random::<f32>() * (bounds.width / 4.0),
            rng.random::<f32>() * (bounds.height / 10.0),
        );
        let heading = rng.random_range(0..360) as f32;
        let steering = SteeringController::random(config.steering, rng);

        Self::build(config, bounds, origin, heading, steering)
    }

    /// Fish with its head at `origin`, every segment facing `heading`.
    pub fn at(config: FishConfig, bounds: &SceneBounds, origin: Vec2, heading: f32) -> Result<Self> {
        let steering = SteeringController::new(TurnBias::Clockwise, config.steering);
        Self::build(config, bounds, origin, heading, steering)
    }

    fn build(
        config: FishConfig,
        bounds: &SceneBounds,
        origin: Vec2,
        heading: f32,
        steering: SteeringController,
    ) -> Result<Self> {
        config.validate()?;
        let bounds = SceneBounds::new(bounds.width, bounds.height)?;

        let radii: Vec<f32> = config.plan.proportions.iter().map(|p| p * config.size).collect();
        let mut chain = SegmentChain::new(origin, heading, &radii, config.size)?;
        chain.propagate(Placement::Bootstrap, 1);

        log::debug!(
            "fish: size {} velocity {} with {} segments at {origin}",
            config.size,
            config.velocity,
            chain.len()
        );

        Ok(Self {
            fin_color: shade(config.color, FIN_SHADE),
            color: config.color,
            velocity: config.velocity,
            base_size: config.size,
            size: config.size,
            reference_width: bounds.width,
            plan: config.plan,
            scaling: config.scaling,
            chain,
            steering,
        })
    }

    /// Steer, then swim one step.
    pub fn tick<R: Rng + ?Sized>(&mut self, bounds: &SceneBounds, rng: &mut R) -> Steer {
        let head = self.chain.head().position;
        let steer = self
            .steering
            .update(head, self.chain.head_heading_mut(), self.size, bounds, rng);
        self.chain.advance_head(self.velocity);
        steer
    }

    /// Damped proportional resize; see [`SizeScaling`]. Every dimension is
    /// re-derived from the new size scalar.
    pub fn update_fish_size(&mut self, width: f32, height: f32) {
        if SceneBounds::new(width, height).is_err() {
            log::warn!("ignoring resize to {width}x{height}");
            return;
        }

        let size = self.scaling.next(self.base_size, self.reference_width, width, self.size);
        log::debug!("fish resize {}x{}: size {} -> {}", width, height, self.size, size);

        self.size = size;
        let radii = self.plan.proportions.iter().map(|p| p * size);
        self.chain.rescale(size, radii);
    }

    pub fn pose(&self) -> FishPose {
        let [front_left, front_right] =
            appendage::paired_fins(&self.chain, &self.front_fin(), self.plan.fin_rotation);
        let [back_left, back_right] =
            appendage::paired_fins(&self.chain, &self.back_fin(), self.plan.fin_rotation);

        FishPose {
            segments: self.chain.segments().to_vec(),
            eyes: appendage::eyes(&self.chain, self.size),
            fins: [front_left, front_right, back_left, back_right],
            dorsal: appendage::trailing_fin(&self.chain, self.plan.dorsal, self.dorsal_length(), DORSAL_FLARE),
            tail: appendage::trailing_fin(&self.chain, self.plan.tail(), self.tail_length(), TAIL_FLARE),
            silhouette: silhouette::body_lines(&self.chain),
        }
    }

    pub fn front_fin(&self) -> PairedFinSpec {
        PairedFinSpec {
            anchor: self.plan.front_fin,
            length: self.plan.front_fin_length * self.size,
            width_divisor: 3.0,
        }
    }

    pub fn back_fin(&self) -> PairedFinSpec {
        PairedFinSpec {
            anchor: self.plan.back_fin,
            length: self.plan.back_fin_length * self.size,
            width_divisor: 2.0,
        }
    }

    pub fn eye_radius(&self) -> f32 {
        EYE_RADIUS * self.size
    }

    pub fn dorsal_length(&self) -> f32 {
        DORSAL_LENGTH * self.size
    }

    pub fn tail_length(&self) -> f32 {
        TAIL_LENGTH * self.size
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn base_size(&self) -> f32 {
        self.base_size
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn fin_color(&self) -> Rgba {
        self.fin_color
    }

    pub fn eye_color(&self) -> Rgba {
        EYE_COLOR
    }

    pub fn plan(&self) -> &BodyPlan {
        &self.plan
    }

    pub fn chain(&self) -> &SegmentChain {
        &self.chain
    }

    /// The chain's own API keeps the spacing and heading invariants.
    pub fn chain_mut(&mut self) -> &mut SegmentChain {
        &mut self.chain
    }

    pub fn steering(&self) -> &SteeringController {
        &self.steering
    }
}

fn shade(color: Rgba, by: f32) -> Rgba {
    let [r, g, b, a] = color;
    [(r - by).max(0.0), (g - by).max(0.0), (b - by).max(0.0), a]
}
