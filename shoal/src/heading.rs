use glam::Vec2;

/// Unit vector for a heading in degrees.
///
/// Sine and cosine are swapped with respect to the usual maths convention so
/// heading 0 points up (+y) and headings grow clockwise: 90 points right.
/// Everything that turns an angle into a displacement goes through here.
pub fn heading_to_vector(degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(sin, cos)
}

/// Heading (degrees, [0, 360)) of the direction pointing from `from` to `to`.
pub fn heading_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    normalize_heading(d.x.atan2(d.y).to_degrees())
}

/// Wraps any angle into [0, 360).
pub fn normalize_heading(degrees: f32) -> f32 {
    let h = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

/// Signed difference `a - b` wrapped into (-180, 180].
pub fn angle_difference(a: f32, b: f32) -> f32 {
    let d = normalize_heading(a - b);
    if d > 180.0 { d - 360.0 } else { d }
}
