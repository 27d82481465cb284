//! Shared-exponent HDR color encoding
//!
//! RGBE packs linear HDR color into four 8-bit channels: three mantissas
//! and one shared exponent. The exponential base is chosen so the 8-bit
//! exponent spans the full 16-bit intensity range with the available
//! mantissa precision: `BASE^128 = 65535`.

use crate::foundation::math::{Vec3, Vec4};
use crate::sampling::{Texture2d, TextureError};

/// Exponential base of the shared-exponent encoding, `65535^(1/128)`
pub const RGBE_BASE: f64 = 1.090_507_602_665_621_5;

/// Bias subtracted from the stored exponent
pub const RGBE_BIAS: i32 = 127;

/// Largest stored exponent
pub const RGBE_MAX_EXPONENT: i32 = 255;

/// Largest intensity the encoding can represent, `BASE^128`
pub const RGBE_MAX_VALUE: f32 = 65535.0;

/// Smallest nonzero intensity the encoding can represent
///
/// One mantissa step at the smallest exponent, `BASE^-127 / 255`.
pub fn rgbe_min_value() -> f32 {
    exponent_scale(0) / 255.0
}

fn exponent_scale(exponent: i32) -> f32 {
    RGBE_BASE.powi(exponent - RGBE_BIAS) as f32
}

/// Decode a normalized RGBE sample to opaque linear RGB
///
/// The alpha channel carries the shared exponent normalized to [0, 1];
/// output is `rgb * BASE^(a*255 - 127)` with alpha forced to 1. There is
/// no clamping: out-of-range exponents overflow or underflow per IEEE
/// float semantics.
pub fn rgbe_to_rgba(rgbe: Vec4) -> Vec4 {
    let scale =
        (RGBE_BASE as f32).powf(rgbe.w * RGBE_MAX_EXPONENT as f32 - RGBE_BIAS as f32);
    Vec4::new(rgbe.x * scale, rgbe.y * scale, rgbe.z * scale, 1.0)
}

fn encode_texel(r: f32, g: f32, b: f32) -> [u8; 4] {
    if !r.is_finite() || !g.is_finite() || !b.is_finite() {
        return [255, 255, 255, 255];
    }
    let r = r.clamp(0.0, RGBE_MAX_VALUE);
    let g = g.clamp(0.0, RGBE_MAX_VALUE);
    let b = b.clamp(0.0, RGBE_MAX_VALUE);

    let intensity = r.max(g).max(b);
    if intensity < rgbe_min_value() {
        return [0, 0, 0, 0];
    }

    let exponent = (f64::from(intensity).ln() / RGBE_BASE.ln() + f64::from(RGBE_BIAS)).ceil();
    let exponent = (exponent as i32).clamp(0, RGBE_MAX_EXPONENT);
    let scale = exponent_scale(exponent);

    let quantize = |channel: f32| ((channel / scale) * 255.0).round().clamp(0.0, 255.0) as u8;
    [quantize(r), quantize(g), quantize(b), exponent as u8]
}

fn decode_texel(texel: [u8; 4]) -> Vec3 {
    let scale = exponent_scale(i32::from(texel[3]));
    Vec3::new(
        f32::from(texel[0]),
        f32::from(texel[1]),
        f32::from(texel[2]),
    ) / 255.0
        * scale
}

/// HDR image stored as RGBE bytes
#[derive(Debug, Clone, PartialEq)]
pub struct RgbeImage {
    rgbe: Vec<u8>,
    width: u32,
    height: u32,
}

impl RgbeImage {
    /// Create an image from already encoded RGBE bytes
    pub fn from_bytes(rgbe: Vec<u8>, width: u32, height: u32) -> Result<Self, TextureError> {
        let required = width as usize * height as usize;
        if rgbe.len() / 4 != required {
            return Err(TextureError::TexelCountMismatch {
                required,
                found: rgbe.len() / 4,
            });
        }
        Ok(Self { rgbe, width, height })
    }

    /// Encode an image from tightly packed linear RGB floats
    pub fn from_rgb(rgb: &[f32], width: u32, height: u32) -> Result<Self, TextureError> {
        let required = width as usize * height as usize;
        if rgb.len() / 3 != required {
            return Err(TextureError::TexelCountMismatch {
                required,
                found: rgb.len() / 3,
            });
        }
        let rgbe = rgb
            .chunks_exact(3)
            .flat_map(|texel| encode_texel(texel[0], texel[1], texel[2]))
            .collect();
        Ok(Self { rgbe, width, height })
    }

    /// Image width in texels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in texels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded RGBE bytes, row-major
    pub fn bytes(&self) -> &[u8] {
        &self.rgbe
    }

    /// Decode the texel at `x`, `y` to linear RGB
    pub fn read(&self, x: u32, y: u32) -> Vec3 {
        let index = (y as usize * self.width as usize + x as usize) * 4;
        decode_texel([
            self.rgbe[index],
            self.rgbe[index + 1],
            self.rgbe[index + 2],
            self.rgbe[index + 3],
        ])
    }

    /// Encode `color` into the texel at `x`, `y`
    pub fn write(&mut self, x: u32, y: u32, color: Vec3) {
        let index = (y as usize * self.width as usize + x as usize) * 4;
        self.rgbe[index..index + 4].copy_from_slice(&encode_texel(color.x, color.y, color.z));
    }

    /// Decode the whole image into a sampleable opaque texture
    pub fn to_texture(&self) -> Result<Texture2d, TextureError> {
        let texels = self
            .rgbe
            .chunks_exact(4)
            .map(|texel| {
                let rgb = decode_texel([texel[0], texel[1], texel[2], texel[3]]);
                [rgb.x, rgb.y, rgb.z, 1.0]
            })
            .collect();
        Texture2d::from_texels(texels, self.width, self.height)
    }
}
