//! Procedurally articulated fish: a drag chain of circular segments steered
//! around a viewport, with fins, eyes and an outline derived from the chain
//! every frame.
//!
//! Headings are degrees, 0 pointing up (+y) and growing clockwise.

pub mod appendage;
pub mod bounds;
pub mod chain;
pub mod draw;
pub mod error;
pub mod fish;
pub mod heading;
pub mod scene;
pub mod shape;
pub mod silhouette;
pub mod steering;

pub use bounds::SceneBounds;
pub use chain::{Placement, Segment, SegmentChain, Sides};
pub use draw::{DrawList, DrawOp, Part, Side, TemplateKey};
pub use error::{FishError, Result};
pub use fish::{BodyPlan, Fish, FishConfig, FishPose, Rgba};
pub use scene::{Scene, SceneConfig};
pub use shape::{ArcSpan, Fan, Transform2D};
pub use steering::{Steer, SteeringConfig, SteeringController, TurnBias};
