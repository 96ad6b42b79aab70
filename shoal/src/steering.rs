use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bounds::SceneBounds;
use crate::error::{FishError, Result};
use crate::heading::{angle_difference, normalize_heading};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnBias {
    Clockwise,
    CounterClockwise,
}

impl TurnBias {
    pub fn flipped(self) -> Self {
        match self {
            TurnBias::Clockwise => TurnBias::CounterClockwise,
            TurnBias::CounterClockwise => TurnBias::Clockwise,
        }
    }

    fn sign(self) -> f32 {
        match self {
            TurnBias::Clockwise => 1.0,
            TurnBias::CounterClockwise => -1.0,
        }
    }
}

/// Scene edge a head can get too close to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Top,
    Floor,
}

impl Wall {
    /// Heading that points straight into this wall.
    pub fn heading(self) -> f32 {
        match self {
            Wall::Top => 0.0,
            Wall::Right => 90.0,
            Wall::Floor => 180.0,
            Wall::Left => 270.0,
        }
    }
}

/// What a steering tick did to the head heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steer {
    /// Inside a wall margin and pointed outward: turned by the forced step.
    Forced(Wall),
    /// Inside a wall margin but already pointed back inside: untouched.
    Holding(Wall),
    /// Free water: random drift, possibly after reversing the turn bias.
    Wander { flipped: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Degrees turned per tick during a forced turnaround.
    pub forced_turn_step: f32,
    /// Side/top margin, in fish sizes.
    pub wall_margin_factor: f32,
    /// Extra multiple of the wall margin kept above the floor line.
    pub floor_margin_factor: f32,
    /// Share of the viewport height, from the bottom edge, that is floor.
    pub floor_fraction: f32,
    /// Half width of the "pointed back inside" range, in degrees.
    pub range_half_width: f32,
    /// Upper bound of the per-check random narrowing of each range edge.
    pub range_jitter: f32,
    /// Upper bound of the per-tick growth of the turn persistence.
    pub persistence_step: f32,
    /// Upper bound of the per-tick random drift, in degrees.
    pub drift_max: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            forced_turn_step: 1.1,
            wall_margin_factor: 2.0,
            floor_margin_factor: 5.0,
            floor_fraction: 0.5,
            range_half_width: 45.0,
            range_jitter: 15.0,
            persistence_step: 0.0005,
            drift_max: 1.0,
        }
    }
}

impl SteeringConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("forced_turn_step", self.forced_turn_step),
            ("wall_margin_factor", self.wall_margin_factor),
            ("floor_margin_factor", self.floor_margin_factor),
            ("floor_fraction", self.floor_fraction),
            ("range_half_width", self.range_half_width),
            ("range_jitter", self.range_jitter),
            ("persistence_step", self.persistence_step),
            ("drift_max", self.drift_max),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FishError::InvalidSteering { field, value });
            }
        }
        if self.floor_fraction > 1.0 {
            return Err(FishError::InvalidSteering { field: "floor_fraction", value: self.floor_fraction });
        }
        if self.range_jitter > self.range_half_width {
            return Err(FishError::JitterExceedsRange {
                jitter: self.range_jitter,
                half_width: self.range_half_width,
            });
        }
        Ok(())
    }
}

/// Decides how the head heading changes every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SteeringController {
    bias: TurnBias,
    persistence: f32,
    config: SteeringConfig,
}

impl SteeringController {
    pub fn new(bias: TurnBias, config: SteeringConfig) -> Self {
        Self { bias, persistence: 0.0, config }
    }

    pub fn random<R: Rng + ?Sized>(config: SteeringConfig, rng: &mut R) -> Self {
        let bias = if rng.random::<bool>() {
            TurnBias::Clockwise
        } else {
            TurnBias::CounterClockwise
        };
        Self::new(bias, config)
    }

    pub fn bias(&self) -> TurnBias {
        self.bias
    }

    pub fn persistence(&self) -> f32 {
        self.persistence
    }

    pub fn config(&self) -> &SteeringConfig {
        &self.config
    }

    /// Distance from an edge at which avoidance kicks in.
    pub fn margin(&self, size: f32) -> f32 {
        self.config.wall_margin_factor * size
    }

    /// Lowest y the head may reach before the floor pushes it back up.
    pub fn floor_limit(&self, size: f32, bounds: &SceneBounds) -> f32 {
        let floor_line = -bounds.height * 0.5 + self.config.floor_fraction * bounds.height;
        floor_line + self.config.floor_margin_factor * self.margin(size)
    }

    /// Wall whose margin contains `head`, side walls first.
    pub fn wall_near(&self, head: Vec2, size: f32, bounds: &SceneBounds) -> Option<Wall> {
        let margin = self.margin(size);
        let half = bounds.half_extents();

        if head.x >= half.x - margin {
            Some(Wall::Right)
        } else if head.x <= -half.x + margin {
            Some(Wall::Left)
        } else if head.y >= half.y - margin {
            Some(Wall::Top)
        } else if head.y <= self.floor_limit(size, bounds) {
            Some(Wall::Floor)
        } else {
            None
        }
    }

    /// One steering tick. `heading` is the head segment's heading and is left
    /// normalised into [0, 360).
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        head: Vec2,
        heading: &mut f32,
        size: f32,
        bounds: &SceneBounds,
        rng: &mut R,
    ) -> Steer {
        let steer = match self.wall_near(head, size, bounds) {
            Some(wall) => {
                if self.points_inside(*heading, wall, rng) {
                    Steer::Holding(wall)
                } else {
                    *heading = self.turn(*heading, self.config.forced_turn_step);
                    log::trace!("forced turnaround at {wall:?}, heading now {heading}");
                    Steer::Forced(wall)
                }
            }
            None => {
                let flipped = rng.random::<f32>() < self.persistence;
                if flipped {
                    self.bias = self.bias.flipped();
                    self.persistence = 0.0;
                } else {
                    // the longer a fish turns one way, the likelier it reverses
                    self.persistence += rng.random::<f32>() * self.config.persistence_step;
                }

                let drift = rng.random::<f32>() * self.config.drift_max;
                *heading = self.turn(*heading, drift);
                Steer::Wander { flipped }
            }
        };

        *heading = normalize_heading(*heading);
        steer
    }

    fn points_inside<R: Rng + ?Sized>(&self, heading: f32, wall: Wall, rng: &mut R) -> bool {
        let inward = normalize_heading(wall.heading() + 180.0);
        let jitter = self.config.range_jitter;
        let low = -(self.config.range_half_width - rng.random::<f32>() * jitter);
        let high = self.config.range_half_width - rng.random::<f32>() * jitter;

        let d = angle_difference(heading, inward);
        (low..=high).contains(&d)
    }

    fn turn(&self, heading: f32, amount: f32) -> f32 {
        normalize_heading(heading + self.bias.sign() * amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn still_config() -> SteeringConfig {
        SteeringConfig { range_jitter: 0.0, ..SteeringConfig::default() }
    }

    fn bounds() -> SceneBounds {
        SceneBounds::new(1000.0, 1000.0).unwrap()
    }

    #[test]
    fn forced_turn_exactly_at_side_margin() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut ctl = SteeringController::new(TurnBias::Clockwise, still_config());

        // size 10 -> margin 20 -> right margin starts at x = 480
        let mut heading = 90.0;
        let steer = ctl.update(Vec2::new(480.0, 200.0), &mut heading, 10.0, &bounds(), &mut rng);

        assert_eq!(steer, Steer::Forced(Wall::Right));
        assert!((heading - 91.1).abs() < 1e-4);
    }

    #[test]
    fn pointed_inside_near_wall_is_left_alone() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ctl = SteeringController::new(TurnBias::CounterClockwise, still_config());

        let mut heading = 300.0;
        let steer = ctl.update(Vec2::new(490.0, 200.0), &mut heading, 10.0, &bounds(), &mut rng);

        assert_eq!(steer, Steer::Holding(Wall::Right));
        assert_eq!(heading, 300.0);
    }

    #[test]
    fn inward_range_wraps_through_north() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ctl = SteeringController::new(TurnBias::Clockwise, still_config());

        // floor pushes up; 350 is within 45 degrees of 0 across the wrap
        let mut heading = 350.0;
        let steer = ctl.update(Vec2::new(0.0, 50.0), &mut heading, 10.0, &bounds(), &mut rng);
        assert_eq!(steer, Steer::Holding(Wall::Floor));

        let mut heading = 180.0;
        let steer = ctl.update(Vec2::new(0.0, 50.0), &mut heading, 10.0, &bounds(), &mut rng);
        assert_eq!(steer, Steer::Forced(Wall::Floor));
    }

    #[test]
    fn floor_sits_above_the_centre_line_by_default() {
        let ctl = SteeringController::new(TurnBias::Clockwise, SteeringConfig::default());
        // floor line at y = 0, plus 5 * (2 * 10)
        assert_eq!(ctl.floor_limit(10.0, &bounds()), 100.0);
        assert_eq!(ctl.wall_near(Vec2::new(0.0, 100.0), 10.0, &bounds()), Some(Wall::Floor));
        assert_eq!(ctl.wall_near(Vec2::new(0.0, 101.0), 10.0, &bounds()), None);
        assert_eq!(ctl.wall_near(Vec2::new(0.0, 481.0), 10.0, &bounds()), Some(Wall::Top));
        assert_eq!(ctl.wall_near(Vec2::new(-480.0, 481.0), 10.0, &bounds()), Some(Wall::Left));
    }

    #[test]
    fn counter_clockwise_forced_turn_wraps_below_zero() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ctl = SteeringController::new(TurnBias::CounterClockwise, still_config());

        let mut heading = 0.5;
        let steer = ctl.update(Vec2::new(0.0, 490.0), &mut heading, 10.0, &bounds(), &mut rng);

        assert_eq!(steer, Steer::Forced(Wall::Top));
        assert!((heading - 359.4).abs() < 1e-3);
    }

    #[test]
    fn full_persistence_always_flips_and_resets() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut ctl = SteeringController::new(TurnBias::Clockwise, SteeringConfig::default());
        ctl.persistence = 1.0;

        let mut heading = 45.0;
        let steer = ctl.update(Vec2::new(0.0, 300.0), &mut heading, 10.0, &bounds(), &mut rng);

        assert_eq!(steer, Steer::Wander { flipped: true });
        assert_eq!(ctl.bias(), TurnBias::CounterClockwise);
        assert_eq!(ctl.persistence(), 0.0);
        // drift is sub-degree and now counter-clockwise
        assert!(heading <= 45.0 && heading > 44.0);
    }

    #[test]
    fn persistence_only_grows_while_wandering() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut ctl = SteeringController::new(TurnBias::Clockwise, SteeringConfig::default());

        let mut heading = 45.0;
        let mut last = ctl.persistence();
        for _ in 0..50 {
            if let Steer::Wander { flipped: false } =
                ctl.update(Vec2::new(0.0, 300.0), &mut heading, 10.0, &bounds(), &mut rng)
            {
                assert!(ctl.persistence() >= last);
            }
            last = ctl.persistence();
            assert!((0.0..360.0).contains(&heading));
        }
    }

    #[test]
    fn same_seed_same_wandering() {
        let run = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut ctl = SteeringController::random(SteeringConfig::default(), &mut rng);
            let mut heading = 10.0;
            for _ in 0..500 {
                ctl.update(Vec2::new(0.0, 300.0), &mut heading, 10.0, &bounds(), &mut rng);
            }
            (heading, ctl.bias(), ctl.persistence())
        };

        assert_eq!(run(0xF15B), run(0xF15B));
    }

    #[test]
    fn config_values_are_checked() {
        assert!(SteeringConfig::default().validate().is_ok());
        assert!(still_config().validate().is_ok());

        let bad = SteeringConfig { forced_turn_step: -1.1, ..SteeringConfig::default() };
        assert_eq!(
            bad.validate().unwrap_err(),
            FishError::InvalidSteering { field: "forced_turn_step", value: -1.1 }
        );

        let bad = SteeringConfig { drift_max: f32::INFINITY, ..SteeringConfig::default() };
        assert!(matches!(bad.validate().unwrap_err(), FishError::InvalidSteering { field: "drift_max", .. }));

        let bad = SteeringConfig { floor_fraction: 1.5, ..SteeringConfig::default() };
        assert!(matches!(bad.validate().unwrap_err(), FishError::InvalidSteering { field: "floor_fraction", .. }));

        let bad = SteeringConfig { range_jitter: 60.0, ..SteeringConfig::default() };
        assert_eq!(
            bad.validate().unwrap_err(),
            FishError::JitterExceedsRange { jitter: 60.0, half_width: 45.0 }
        );
    }
}
