//! Small images with known contents. All buffers are row-major.

/// A `width × height` image with every pixel at `value`.
pub fn uniform(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Pixel `(x, y)` is `(x * 17 + y * 31) % 256`: distinct along both axes
/// and always a valid byte.
pub fn gradient(width: usize, height: usize) -> Vec<f32> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x * 17 + y * 31) % 256) as f32))
        .collect()
}

/// The 2×2 image with a black left column and a 200 right column.
pub fn two_by_two() -> Vec<f32> {
    vec![0.0, 200.0, 0.0, 200.0]
}
