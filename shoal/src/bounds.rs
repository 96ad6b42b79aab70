use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{FishError, Result};

/// Viewport the school swims in. World space is centred on the viewport with
/// y growing upward, so x spans `[-w/2, w/2]` and y spans `[-h/2, h/2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub width: f32,
    pub height: f32,
}

impl SceneBounds {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if !ok(width) || !ok(height) {
            return Err(FishError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_viewports() {
        assert!(SceneBounds::new(0.0, 10.0).is_err());
        assert!(SceneBounds::new(10.0, -1.0).is_err());
        assert!(SceneBounds::new(f32::NAN, 10.0).is_err());
        assert_eq!(SceneBounds::new(200.0, 100.0).unwrap().half_extents(), Vec2::new(100.0, 50.0));
    }
}
