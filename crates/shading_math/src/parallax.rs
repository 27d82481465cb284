//! Parallax occlusion mapping
//!
//! Ray-marches a height field in tangent space to offset texture
//! coordinates, simulating surface depth. The height field is an injected
//! [`HeightSampler`] so callers pick the texture and channel policy per
//! call site.

use crate::config::Config;
use crate::foundation::math::{utils, Vec2, Vec3};
use crate::sampling::HeightSampler;
use serde::{Deserialize, Serialize};

/// Layer counts and height scale for the parallax march
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    /// Layer count at head-on view angles
    pub min_layers: f32,
    /// Layer count at grazing view angles; also the march step cap
    pub max_layers: f32,
    /// World-space depth of the height field
    pub height_scale: f32,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            min_layers: 8.0,
            max_layers: 32.0,
            height_scale: 0.05,
        }
    }
}

impl Config for ParallaxSettings {}

/// Offset `uv` by marching the height field along the view direction
///
/// The layer count interpolates between `min_layers` and `max_layers`
/// with view-angle steepness. The march steps the UV backward along the
/// tangent-space view direction until the inverted sampled height no
/// longer exceeds the accumulated layer depth, then interpolates between
/// the UVs on either side of the crossing.
///
/// The march is capped at `max_layers` rounded; if a degenerate height
/// field never satisfies the termination predicate, the last marched UV
/// is returned unrefined.
///
/// # Arguments
/// * `height_map` - Height field in [0, 1], 1 at the surface
/// * `uv` - Texture coordinate at the fragment
/// * `tangent_view_direction` - View direction in tangent space
/// * `settings` - Layer counts and height scale
pub fn parallax_mapping<H: HeightSampler>(
    height_map: &H,
    uv: Vec2,
    tangent_view_direction: Vec3,
    settings: &ParallaxSettings,
) -> Vec2 {
    let num_layers = utils::lerp(
        settings.max_layers,
        settings.min_layers,
        Vec3::new(0.0, 0.0, 1.0).dot(&tangent_view_direction).max(0.0),
    );

    let layer_depth = 1.0 / num_layers;
    let mut current_layer_depth = 0.0;

    let scaled_view_direction = tangent_view_direction.xy() * settings.height_scale;
    let delta_uv = scaled_view_direction / num_layers;

    let mut current_uv = uv;
    let mut current_depth = 1.0 - height_map.height(current_uv);

    let max_steps = settings.max_layers.round() as u32;
    let mut steps = 0;
    while current_layer_depth < current_depth {
        // Degenerate height fields never satisfy the predicate; bail out
        // with the last marched coordinate.
        if steps >= max_steps {
            return current_uv;
        }
        current_uv -= delta_uv;
        current_depth = 1.0 - height_map.height(current_uv);
        current_layer_depth += layer_depth;
        steps += 1;
    }

    let previous_uv = current_uv + delta_uv;

    let after_depth = current_depth - current_layer_depth;
    let before_depth =
        (1.0 - height_map.height(current_uv)) - current_layer_depth + layer_depth;

    let weight = after_depth / (after_depth - before_depth);
    previous_uv * weight + current_uv * (1.0 - weight)
}
