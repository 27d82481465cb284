//! Animated water normal reconstruction
//!
//! Water normals are precomputed as a looping stack of 2-channel frames
//! (X in green, Y in alpha). Sampling blends the two frames around the
//! animation phase and rebuilds Z from the unit-length constraint.

use crate::foundation::math::{utils, Vec2, Vec3, Vec4};
use crate::sampling::{SurfaceSampler, TextureArray};

/// Default animation phase speed, in loops per second
pub const WATER_COUNTER_SPEED: f32 = 0.45;

/// Capability to sample one frame of a looping normal-map animation
///
/// Out-of-range frame indices are the implementor's concern;
/// [`TextureArray`] clamps to its last layer.
pub trait NormalFrames {
    /// Number of frames in the loop
    fn frame_count(&self) -> usize;

    /// Sample `frame` at `uv`
    fn sample(&self, uv: Vec2, frame: usize) -> Vec4;
}

impl NormalFrames for TextureArray {
    fn frame_count(&self) -> usize {
        self.layer_count()
    }

    fn sample(&self, uv: Vec2, frame: usize) -> Vec4 {
        self.layer(frame).sample(uv)
    }
}

/// Reconstruct the animated water normal at `uv`
///
/// `counter` is the animation phase in [0, 1). The two frames around
/// `counter * frame_count` are blended by its fractional part; X and Y
/// come from the green and alpha channels remapped to [-1, 1], and Z is
/// `sqrt(abs(1 - x^2 - y^2))`; the abs mirrors slightly negative
/// interiors produced by interpolation instead of flattening them.
/// Returns a unit-length normal.
pub fn sample_water_normal<F: NormalFrames>(frames: &F, uv: Vec2, counter: f32) -> Vec3 {
    let frame = counter * frames.frame_count() as f32;
    let normal_a = frames.sample(uv, frame.floor() as usize);
    let normal_b = frames.sample(uv, frame.ceil() as usize);
    let color = normal_a.lerp(&normal_b, utils::fract(frame));

    let nx = (color.y * 2.0) - 1.0;
    let ny = (color.w * 2.0) - 1.0;
    let normal = Vec3::new(nx, ny, (1.0 - (nx * nx) - (ny * ny)).abs().sqrt());
    normal.normalize()
}

/// Looping animation phase for water normal frames
#[derive(Debug, Clone, PartialEq)]
pub struct WaterAnimation {
    counter: f32,
    speed: f32,
}

impl WaterAnimation {
    /// Create an animation at phase 0 with the default speed
    pub fn new() -> Self {
        Self {
            counter: 0.0,
            speed: WATER_COUNTER_SPEED,
        }
    }

    /// Set the phase speed in loops per second
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Advance the phase by `delta_time` seconds, wrapping past 1
    pub fn update(&mut self, delta_time: f32) {
        self.counter += delta_time * self.speed;
        if self.counter > 1.0 {
            self.counter = 0.0;
        }
    }

    /// Current phase, fed to [`sample_water_normal`]
    pub fn counter(&self) -> f32 {
        self.counter
    }
}

impl Default for WaterAnimation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::Texture2d;

    const EPSILON: f32 = 0.001;

    fn frame(green: f32, alpha: f32) -> Texture2d {
        Texture2d::solid(Vec4::new(0.0, green, 0.0, alpha), 2, 2).unwrap()
    }

    fn two_frames() -> TextureArray {
        // Frame 0 tilts fully +X, frame 1 is flat
        TextureArray::from_layers(vec![frame(1.0, 0.5), frame(0.5, 0.5)]).unwrap()
    }

    #[test]
    fn test_zero_counter_reads_frame_zero_alone() {
        let frames = two_frames();
        let normal = sample_water_normal(&frames, Vec2::new(0.5, 0.5), 0.0);
        assert!((normal - Vec3::new(1.0, 0.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_flat_frame_reconstructs_up_normal() {
        let frames = TextureArray::from_layers(vec![frame(0.5, 0.5)]).unwrap();
        let normal = sample_water_normal(&frames, Vec2::new(0.5, 0.5), 0.0);
        assert!((normal - Vec3::new(0.0, 0.0, 1.0)).norm() < EPSILON);
    }

    #[test]
    fn test_half_frame_blends_evenly() {
        let frames = two_frames();
        // Two frames, counter 0.25: frame coordinate 0.5
        let normal = sample_water_normal(&frames, Vec2::new(0.5, 0.5), 0.25);
        let nx = 0.5;
        let expected = Vec3::new(nx, 0.0, (1.0_f32 - nx * nx).sqrt());
        assert!((normal - expected).norm() < EPSILON);
    }

    #[test]
    fn test_overlong_xy_mirrors_under_the_root() {
        // x = y = 1 puts the interior at -1; abs mirrors it to z = 1
        let frames = TextureArray::from_layers(vec![frame(1.0, 1.0)]).unwrap();
        let normal = sample_water_normal(&frames, Vec2::new(0.5, 0.5), 0.0);
        let expected = Vec3::new(1.0, 1.0, 1.0).normalize();
        assert!((normal - expected).norm() < EPSILON);
    }

    #[test]
    fn test_output_is_unit_length() {
        let frames = two_frames();
        for step in 0..10 {
            let counter = step as f32 / 10.0;
            let normal = sample_water_normal(&frames, Vec2::new(0.3, 0.7), counter);
            assert!((normal.norm() - 1.0).abs() < EPSILON, "counter {counter}");
        }
    }

    #[test]
    fn test_animation_wraps_past_one() {
        let mut animation = WaterAnimation::new();
        animation.update(1.0);
        assert!((animation.counter() - WATER_COUNTER_SPEED).abs() < EPSILON);

        animation.update(10.0);
        assert_eq!(animation.counter(), 0.0);
    }

    #[test]
    fn test_animation_custom_speed() {
        let mut animation = WaterAnimation::new().with_speed(0.5);
        animation.update(1.0);
        assert!((animation.counter() - 0.5).abs() < EPSILON);
    }
}
