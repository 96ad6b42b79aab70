use thiserror::Error;

pub type Result<T> = std::result::Result<T, FishError>;

/// Construction-time configuration problems. Ticking never fails once a
/// fish or scene has been built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FishError {
    #[error("fish size must be positive and finite, got {0}")]
    InvalidSize(f32),

    #[error("fish velocity must be positive and finite, got {0}")]
    InvalidVelocity(f32),

    #[error("viewport must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("segment chain is empty")]
    EmptyChain,

    #[error("segment chain needs at least two segments, got {0}")]
    ChainTooShort(usize),

    #[error("body proportion {index} must be positive and finite, got {value}")]
    InvalidProportion { index: usize, value: f32 },

    #[error("{part} anchor {index} does not fit a {len}-segment chain")]
    AnchorOutOfRange {
        part: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{part} length must be positive and finite, got {value}")]
    InvalidFinLength { part: &'static str, value: f32 },

    #[error("fin rotation must be finite, got {0}")]
    InvalidFinRotation(f32),

    #[error("resize carry must be in [0, 1), got {0}")]
    InvalidCarry(f32),

    #[error("steering {field} must be non-negative and finite, got {value}")]
    InvalidSteering { field: &'static str, value: f32 },

    #[error("steering range jitter {jitter} exceeds the range half width {half_width}")]
    JitterExceedsRange { jitter: f32, half_width: f32 },
}
