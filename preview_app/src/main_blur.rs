//! Blur pyramid preview
//!
//! Scatters bright spots over a dark background, runs the dual-Kawase
//! pyramid, and writes `blur_preview_input.png` and
//! `blur_preview_output.png` side by side for inspection.

mod config;

use config::{PreviewConfig, PreviewError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shading_math::prelude::*;
use std::time::Instant;

const SPOT_COUNT: usize = 24;

fn save(texture: &Texture2d, path: &str) -> Result<(), PreviewError> {
    let image =
        image::RgbaImage::from_raw(texture.width(), texture.height(), texture.to_rgba8())
            .expect("texel buffer matches image dimensions");
    image.save(path)?;
    log::info!("wrote {}", path);
    Ok(())
}

fn main() -> Result<(), PreviewError> {
    shading_math::foundation::logging::init();
    let config = PreviewConfig::from_args()?;
    let start = Instant::now();

    let mut rng = StdRng::seed_from_u64(7);
    let spots: Vec<(Vec2, Vec3)> = (0..SPOT_COUNT)
        .map(|_| {
            let position = Vec2::new(
                rng.gen::<f32>() * config.width as f32,
                rng.gen::<f32>() * config.height as f32,
            );
            let color = Vec3::new(
                0.4 + rng.gen::<f32>() * 0.6,
                0.4 + rng.gen::<f32>() * 0.6,
                0.4 + rng.gen::<f32>() * 0.6,
            );
            (position, color)
        })
        .collect();

    let source = Texture2d::from_fn(config.width, config.height, |x, y| {
        let pixel = Vec2::new(x as f32, y as f32);
        let mut color = Vec3::new(0.02, 0.02, 0.03);
        for (position, spot_color) in &spots {
            let falloff = (-(pixel - position).norm_squared() / 12.0).exp();
            color += spot_color * falloff;
        }
        Vec4::new(color.x, color.y, color.z, 1.0)
    })?;

    let blurred = blur_pyramid(&source, config.blur_passes)?;

    save(&source, "blur_preview_input.png")?;
    save(&blurred, "blur_preview_output.png")?;

    log::info!(
        "blurred {}x{} with {} passes in {:.1?}",
        config.width,
        config.height,
        config.blur_passes,
        start.elapsed()
    );
    Ok(())
}
