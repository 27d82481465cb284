//! # Shading Math
//!
//! Reusable rendering math for software shading and render-pipeline
//! testing.
//!
//! ## Features
//!
//! - **Blinn-Phong Lighting**: directional/point/spot evaluation with
//!   physically-inspired attenuation and energy-conserving materials
//! - **Parallax Occlusion Mapping**: iteration-capped height-field
//!   marching in tangent space
//! - **Dual-Kawase Blur**: downsample/upsample kernels and a pyramid
//!   driver
//! - **RGBE**: shared-exponent HDR decoding and encoding
//! - **Ray-Box Intersection**: exit distances for rays starting inside a
//!   probe volume
//! - **Water Normals**: animated normal reconstruction from frame stacks
//!
//! Every function is pure and reentrant; texture access is modeled as
//! injected read-only sampling capabilities, so the same code runs
//! per-pixel on a software rasterizer or per-sample in a test.
//!
//! ## Quick Start
//!
//! ```rust
//! use shading_math::prelude::*;
//!
//! let material = BlinnPhongMaterial::derive(
//!     Vec3::new(0.8, 0.3, 0.2), // base color
//!     0.0,                      // metallic
//!     0.4,                      // roughness
//!     1.0,                      // ambient occlusion
//! );
//!
//! let sun = Light::directional(Vec3::new(-0.3, -1.0, -0.5));
//! let color = sun.evaluate(
//!     &material,
//!     Vec3::zeros(),             // fragment position
//!     Vec3::new(0.0, -1.0, 0.0), // view direction
//!     Vec3::new(0.0, 1.0, 0.0),  // surface normal
//! );
//! assert!(color.norm() > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;

pub mod blur;
pub mod config;
pub mod lighting;
pub mod parallax;
pub mod raybox;
pub mod rgbe;
pub mod sampling;
pub mod water;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        blur::{blur_pyramid, downsample, half_pixel, upsample},
        config::{Config, ConfigError},
        foundation::math::{Mat3, Mat4, Vec2, Vec3, Vec4},
        lighting::{
            fresnel_factor, spotlight_intensity, BlinnPhongMaterial, DirectionalLight, Light,
            LightColors, PointLight, SpotLight,
        },
        parallax::{parallax_mapping, ParallaxSettings},
        raybox::intersect_ray_inside_box,
        rgbe::{rgbe_to_rgba, RgbeImage},
        sampling::{
            AddressMode, Channel, ChannelSampler, HeightSampler, SurfaceSampler, Texture2d,
            TextureArray, TextureError,
        },
        water::{sample_water_normal, NormalFrames, WaterAnimation},
    };
}
