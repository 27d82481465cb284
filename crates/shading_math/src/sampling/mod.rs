//! Read-only sampling capabilities
//!
//! Every shading function in this crate models texture access as an
//! injected lookup: the caller supplies something that answers
//! `sample(coordinate) -> value`, and owns the addressing behavior at
//! coordinate boundaries. This module defines those capability traits
//! and a CPU-side texture implementation for software shading and tests.

mod texture;

pub use texture::{Texture2d, TextureArray, TextureError};

use crate::foundation::math::{Vec2, Vec4};

/// Capability to sample a 4-channel surface at a UV coordinate
pub trait SurfaceSampler {
    /// Sample the surface at `uv`
    ///
    /// Boundary behavior (wrap/clamp/mirror) is owned by the implementor.
    fn sample(&self, uv: Vec2) -> Vec4;
}

impl<F> SurfaceSampler for F
where
    F: Fn(Vec2) -> Vec4,
{
    fn sample(&self, uv: Vec2) -> Vec4 {
        self(uv)
    }
}

/// Capability to sample a scalar height field at a UV coordinate
///
/// Which texture and channel back the height field is the caller's
/// policy; see [`ChannelSampler`] for the common "one channel of a
/// 4-channel surface" case.
pub trait HeightSampler {
    /// Sample the height field at `uv`
    fn height(&self, uv: Vec2) -> f32;
}

impl<F> HeightSampler for F
where
    F: Fn(Vec2) -> f32,
{
    fn height(&self, uv: Vec2) -> f32 {
        self(uv)
    }
}

/// Addressing behavior for coordinates outside [0, 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    /// Tile the texture (GL_REPEAT)
    Repeat,
    /// Clamp to the edge texel (GL_CLAMP_TO_EDGE)
    ClampToEdge,
    /// Tile with every other repetition mirrored (GL_MIRRORED_REPEAT)
    MirroredRepeat,
}

impl AddressMode {
    /// Resolve a texel index onto [0, size)
    pub(crate) fn resolve(self, index: i64, size: u32) -> u32 {
        let size = i64::from(size);
        let resolved = match self {
            Self::Repeat => index.rem_euclid(size),
            Self::ClampToEdge => index.clamp(0, size - 1),
            Self::MirroredRepeat => {
                let period = index.rem_euclid(2 * size);
                if period >= size {
                    2 * size - 1 - period
                } else {
                    period
                }
            }
        };
        resolved as u32
    }
}

/// Color channel of a 4-channel sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Red channel
    R,
    /// Green channel
    G,
    /// Blue channel
    B,
    /// Alpha channel
    A,
}

impl Channel {
    /// Extract this channel from a sample
    pub fn extract(self, value: Vec4) -> f32 {
        match self {
            Self::R => value.x,
            Self::G => value.y,
            Self::B => value.z,
            Self::A => value.w,
        }
    }
}

/// Height field backed by one channel of a 4-channel surface
///
/// Injects the "which channel encodes height" policy per call site,
/// without runtime cost beyond the channel match.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSampler<'a, S> {
    surface: &'a S,
    channel: Channel,
}

impl<'a, S: SurfaceSampler> ChannelSampler<'a, S> {
    /// Create a height field reading `channel` of `surface`
    pub fn new(surface: &'a S, channel: Channel) -> Self {
        Self { surface, channel }
    }
}

impl<S: SurfaceSampler> HeightSampler for ChannelSampler<'_, S> {
    fn height(&self, uv: Vec2) -> f32 {
        self.channel.extract(self.surface.sample(uv))
    }
}
