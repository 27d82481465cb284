//! Dual-Kawase blur sampling
//!
//! Small fixed kernels applied over repeated downsample/upsample passes
//! approximate a large-radius blur cheaply. Tap positions and weights
//! define the blur's frequency response and must not be altered.

use crate::foundation::math::{Vec2, Vec4};
use crate::sampling::{SurfaceSampler, Texture2d, TextureError};

/// Reciprocal of the sampled surface resolution
///
/// Scales the kernel's neighbor offsets to one texel.
pub fn half_pixel(width: u32, height: u32) -> Vec2 {
    Vec2::new(1.0 / width as f32, 1.0 / height as f32)
}

/// 5-tap downsampling filter
///
/// Center weight 4, four diagonal corners weight 1, normalized by 8.
/// Used when progressively shrinking a surface.
pub fn downsample<S: SurfaceSampler>(surface: &S, uv: Vec2, half_pixel: Vec2) -> Vec4 {
    let mut sum = surface.sample(uv) * 4.0;
    sum += surface.sample(uv - half_pixel);
    sum += surface.sample(uv + half_pixel);
    sum += surface.sample(uv + Vec2::new(half_pixel.x, -half_pixel.y));
    sum += surface.sample(uv - Vec2::new(half_pixel.x, -half_pixel.y));
    sum / 8.0
}

/// 8-tap tent upsampling filter
///
/// Axis taps at two half-pixels weight 1, diagonal taps weight 2,
/// normalized by 12. Used when progressively growing a surface back up.
pub fn upsample<S: SurfaceSampler>(surface: &S, uv: Vec2, half_pixel: Vec2) -> Vec4 {
    let mut sum = surface.sample(uv + Vec2::new(-half_pixel.x * 2.0, 0.0));
    sum += surface.sample(uv + Vec2::new(-half_pixel.x, half_pixel.y)) * 2.0;
    sum += surface.sample(uv + Vec2::new(0.0, half_pixel.y * 2.0));
    sum += surface.sample(uv + Vec2::new(half_pixel.x, half_pixel.y)) * 2.0;
    sum += surface.sample(uv + Vec2::new(half_pixel.x * 2.0, 0.0));
    sum += surface.sample(uv + Vec2::new(half_pixel.x, -half_pixel.y)) * 2.0;
    sum += surface.sample(uv + Vec2::new(0.0, -half_pixel.y * 2.0));
    sum += surface.sample(uv + Vec2::new(-half_pixel.x, -half_pixel.y)) * 2.0;
    sum / 12.0
}

/// Blur a texture with a dual-Kawase pyramid
///
/// Runs `passes` downsample passes into progressively halved surfaces,
/// then the matching upsample passes back to the source resolution. Each
/// pass samples its source surface with that surface's half-pixel, like
/// the mip-chain the kernels were designed for. Zero passes returns a
/// copy of the source.
pub fn blur_pyramid(source: &Texture2d, passes: u32) -> Result<Texture2d, TextureError> {
    if passes == 0 {
        return Ok(source.clone());
    }

    let mut levels: Vec<Texture2d> = Vec::with_capacity(passes as usize);
    for pass in 0..passes as usize {
        let src = if pass == 0 { source } else { &levels[pass - 1] };
        let width = (src.width() / 2).max(1);
        let height = (src.height() / 2).max(1);
        let src_half_pixel = half_pixel(src.width(), src.height());
        let next = Texture2d::from_fn(width, height, |x, y| {
            let uv = Vec2::new(
                (x as f32 + 0.5) / width as f32,
                (y as f32 + 0.5) / height as f32,
            );
            downsample(src, uv, src_half_pixel)
        })?;
        log::trace!("blur downsample pass {} -> {}x{}", pass, width, height);
        levels.push(next);
    }

    let mut result = levels[passes as usize - 1].clone();
    for pass in (0..passes as usize).rev() {
        let (width, height) = if pass == 0 {
            (source.width(), source.height())
        } else {
            (levels[pass - 1].width(), levels[pass - 1].height())
        };
        let src = result;
        let src_half_pixel = half_pixel(src.width(), src.height());
        result = Texture2d::from_fn(width, height, |x, y| {
            let uv = Vec2::new(
                (x as f32 + 0.5) / width as f32,
                (y as f32 + 0.5) / height as f32,
            );
            upsample(&src, uv, src_half_pixel)
        })?;
        log::trace!("blur upsample pass {} -> {}x{}", pass, width, height);
    }

    Ok(result)
}
