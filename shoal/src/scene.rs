use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::bounds::SceneBounds;
use crate::draw::{self, DrawList, TemplateKey};
use crate::error::Result;
use crate::fish::{Fish, FishConfig, FishPose, Rgba};
use crate::shape::Fan;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    /// Canvas side as a fraction of the window side.
    pub canvas_scale: f32,
    pub clear_color: Rgba,
    /// Vertical stretch applied when mapping world space to clip space.
    pub aspect_correction: f32,
    pub school: Vec<FishConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            canvas_scale: 0.25,
            clear_color: [0.0, 0.15, 0.4, 0.6],
            aspect_correction: 1.5,
            school: vec![
                FishConfig::new([0.7, 0.5, 0.2, 1.0], 3.0, 0.6),
                FishConfig::new([0.7, 0.5, 0.7, 1.0], 5.0, 0.5),
                FishConfig::new([0.6, 0.6, 0.8, 1.0], 2.5, 0.7),
            ],
        }
    }
}

/// A school of fish sharing one viewport and one seeded random source.
///
/// Fish are ticked in insertion order, so the same seed and the same
/// sequence of viewport sizes always reproduce the same frames.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    bounds: SceneBounds,
    fish: Vec<Fish>,
    poses: Vec<FishPose>,
    rng: SmallRng,
    layout_epoch: u64,
}

impl Scene {
    /// Empty scene; add fish with [`Scene::spawn`].
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let config = SceneConfig { school: Vec::new(), ..SceneConfig::default() };
        Self::empty(config, width, height)
    }

    /// Scene with the whole configured school spawned.
    pub fn with_config(config: SceneConfig, width: f32, height: f32) -> Result<Self> {
        let school = config.school.clone();
        let mut scene = Self::empty(config, width, height)?;
        for fish in school {
            scene.spawn(fish)?;
        }
        Ok(scene)
    }

    fn empty(config: SceneConfig, width: f32, height: f32) -> Result<Self> {
        let bounds = SceneBounds::new(width, height)?;
        log::debug!("scene {width}x{height}, seed {:#x}", config.seed);

        Ok(Self {
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            bounds,
            fish: Vec::new(),
            poses: Vec::new(),
            layout_epoch: 0,
        })
    }

    /// Adds a fish at a random spot near the centre and returns its index.
    pub fn spawn(&mut self, config: FishConfig) -> Result<usize> {
        let fish = Fish::new(config, &self.bounds, &mut self.rng)?;
        self.poses.push(fish.pose());
        self.fish.push(fish);
        Ok(self.fish.len() - 1)
    }

    /// One frame: steer, swim, and re-derive every pose. A viewport size that
    /// differs from the current one is applied as a resize first.
    pub fn tick(&mut self, width: f32, height: f32) {
        // a collapsed canvas keeps the last good bounds without a resize per frame
        if let Ok(bounds) = SceneBounds::new(width, height) {
            if bounds != self.bounds {
                self.apply_resize(bounds);
            }
        }

        for fish in &mut self.fish {
            fish.tick(&self.bounds, &mut self.rng);
        }
        self.poses = self.fish.iter().map(Fish::pose).collect();
    }

    /// Rescales every fish. Degenerate sizes (a collapsed canvas) are ignored.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        match SceneBounds::new(width, height) {
            Ok(bounds) => self.apply_resize(bounds),
            Err(e) => log::warn!("resize ignored: {e}"),
        }
    }

    fn apply_resize(&mut self, bounds: SceneBounds) {
        let SceneBounds { width, height } = bounds;
        self.bounds = bounds;
        for fish in &mut self.fish {
            fish.update_fish_size(width, height);
        }
        // poses must match the templates of the new epoch
        self.poses = self.fish.iter().map(Fish::pose).collect();
        self.layout_epoch += 1;
        log::debug!("resized to {width}x{height}, layout epoch {}", self.layout_epoch);
    }

    /// Poses from the last tick (or spawn).
    pub fn poses(&self) -> &[FishPose] {
        &self.poses
    }

    pub fn draw_list(&self) -> DrawList {
        let mut list = DrawList::default();
        for (i, (fish, pose)) in self.fish.iter().zip(&self.poses).enumerate() {
            list.extend(draw::build_draw_list(i, fish, pose));
        }
        list
    }

    pub fn template(&self, key: TemplateKey) -> Option<Fan> {
        draw::template_fan(self.fish.get(key.fish)?, key.part)
    }

    /// Bumped on every applied resize; templates built in an older epoch are
    /// stale.
    pub fn layout_epoch(&self) -> u64 {
        self.layout_epoch
    }

    pub fn bounds(&self) -> SceneBounds {
        self.bounds
    }

    pub fn fish(&self) -> &[Fish] {
        &self.fish
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn clear_color(&self) -> Rgba {
        self.config.clear_color
    }

    pub fn aspect_correction(&self) -> f32 {
        self.config.aspect_correction
    }
}
