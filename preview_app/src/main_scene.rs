//! Software-shaded scene preview
//!
//! Ray-traces a small scene entirely through the library's shading
//! functions and writes `scene_preview.png`:
//! - parallax-displaced stone floor
//! - animated water strip with reconstructed normals
//! - polished metal sphere with a probe-box reflection lookup
//! - RGBE-encoded HDR sky
//! - one directional, one point, and one spot light

mod config;

use config::{PreviewConfig, PreviewError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shading_math::prelude::*;
use std::f32::consts::PI;
use std::time::Instant;

const SPHERE_RADIUS: f32 = 1.0;
const FLOOR_Y: f32 = -1.0;
const WATER_START_X: f32 = 1.2;
const PROBE_HALF_EXTENT: f32 = 6.0;

const HEIGHT_MAP_SIZE: u32 = 64;
const WATER_FRAME_SIZE: u32 = 32;
const WATER_FRAME_COUNT: usize = 8;
const SKY_WIDTH: u32 = 128;
const SKY_HEIGHT: u32 = 64;

fn sphere_center() -> Vec3 {
    Vec3::new(-0.4, 0.0, -3.2)
}

fn sun_direction() -> Vec3 {
    // Direction the sunlight travels
    Vec3::new(-0.35, -0.8, -0.45).normalize()
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - normal * (2.0 * incident.dot(&normal))
}

/// Random bump field for the stone floor
fn build_height_map(rng: &mut StdRng) -> Result<Texture2d, PreviewError> {
    let bumps: Vec<f32> = (0..HEIGHT_MAP_SIZE * HEIGHT_MAP_SIZE)
        .map(|_| rng.gen::<f32>())
        .collect();
    let texture = Texture2d::from_fn(HEIGHT_MAP_SIZE, HEIGHT_MAP_SIZE, |x, y| {
        let height = bumps[(y * HEIGHT_MAP_SIZE + x) as usize];
        Vec4::new(height, height, height, 1.0)
    })?;
    Ok(texture)
}

/// Looping ripple frames, X in green and Y in alpha
fn build_water_frames(rng: &mut StdRng) -> Result<TextureArray, PreviewError> {
    let mut layers = Vec::with_capacity(WATER_FRAME_COUNT);
    for frame in 0..WATER_FRAME_COUNT {
        let phase = frame as f32 / WATER_FRAME_COUNT as f32;
        let amplitude = 0.22 + rng.gen::<f32>() * 0.06;
        layers.push(Texture2d::from_fn(WATER_FRAME_SIZE, WATER_FRAME_SIZE, |x, y| {
            let u = x as f32 / WATER_FRAME_SIZE as f32;
            let v = y as f32 / WATER_FRAME_SIZE as f32;
            let ripple_x = ((u * 3.0 + phase) * 2.0 * PI).sin();
            let ripple_y = ((v * 2.0 + u + phase) * 2.0 * PI).sin();
            Vec4::new(
                0.0,
                0.5 + ripple_x * amplitude,
                0.0,
                0.5 + ripple_y * amplitude,
            )
        })?);
    }
    Ok(TextureArray::from_layers(layers)?)
}

/// HDR sky with a bright sun disk, round-tripped through RGBE
fn build_sky() -> Result<Texture2d, PreviewError> {
    let towards_sun = -sun_direction();
    let mut rgb = Vec::with_capacity((SKY_WIDTH * SKY_HEIGHT * 3) as usize);
    for y in 0..SKY_HEIGHT {
        for x in 0..SKY_WIDTH {
            let u = (x as f32 + 0.5) / SKY_WIDTH as f32;
            let v = (y as f32 + 0.5) / SKY_HEIGHT as f32;
            let azimuth = (u - 0.5) * 2.0 * PI;
            let elevation = (0.5 - v) * PI;
            let direction = Vec3::new(
                elevation.cos() * azimuth.cos(),
                elevation.sin(),
                elevation.cos() * azimuth.sin(),
            );

            let zenith = Vec3::new(0.25, 0.45, 0.85);
            let horizon = Vec3::new(0.75, 0.8, 0.9);
            let ground = Vec3::new(0.2, 0.17, 0.15);
            let mut color = if direction.y >= 0.0 {
                horizon.lerp(&zenith, direction.y)
            } else {
                horizon.lerp(&ground, -direction.y)
            };
            let sun = direction.dot(&towards_sun).max(0.0).powf(256.0);
            color += Vec3::new(1.0, 0.95, 0.85) * sun * 40.0;

            rgb.extend_from_slice(&[color.x, color.y, color.z]);
        }
    }
    let encoded = RgbeImage::from_rgb(&rgb, SKY_WIDTH, SKY_HEIGHT)?;
    Ok(encoded.to_texture()?)
}

fn sample_sky(sky: &Texture2d, direction: Vec3) -> Vec3 {
    let u = direction.z.atan2(direction.x) / (2.0 * PI) + 0.5;
    let v = 0.5 - direction.y.clamp(-1.0, 1.0).asin() / PI;
    sky.sample(Vec2::new(u, v)).xyz()
}

fn build_lights() -> Vec<Light> {
    vec![
        Light::Directional(DirectionalLight {
            direction: sun_direction(),
            colors: LightColors {
                diffuse: Vec3::new(2.4, 2.25, 2.0),
                specular: Vec3::new(2.4, 2.25, 2.0),
                ambient: Vec3::new(0.35, 0.4, 0.5),
            },
            ..Default::default()
        }),
        Light::Point(PointLight {
            position: Vec3::new(1.8, 0.8, -2.0),
            range: 8.0,
            colors: LightColors::uniform(Vec3::new(2.0, 1.2, 0.6)),
            ..Default::default()
        }),
        Light::Spot(SpotLight {
            position: Vec3::new(-2.5, 2.5, -1.0),
            direction: Vec3::new(0.6, -1.0, -0.8).normalize(),
            range: 14.0,
            colors: LightColors::uniform(Vec3::new(1.5, 1.5, 1.8)),
            ..Default::default()
        }
        .with_cone_angles(18.0, 40.0)),
    ]
}

fn shade_fragment(
    position: Vec3,
    normal: Vec3,
    view_direction: Vec3,
    material: &BlinnPhongMaterial,
    lights: &[Light],
) -> Vec3 {
    lights.iter().fold(Vec3::zeros(), |sum, light| {
        sum + light.evaluate(material, position, view_direction, normal)
    })
}

fn main() -> Result<(), PreviewError> {
    shading_math::foundation::logging::init();
    let config = PreviewConfig::from_args()?;
    let start = Instant::now();

    let mut rng = StdRng::seed_from_u64(42);
    let height_map = build_height_map(&mut rng)?;
    let water_frames = build_water_frames(&mut rng)?;
    let sky = build_sky()?;
    let lights = build_lights();

    let mut water_animation = WaterAnimation::new();
    water_animation.update(0.8);
    let water_counter = water_animation.counter();

    let stone = BlinnPhongMaterial::derive(Vec3::new(0.55, 0.5, 0.45), 0.0, 0.85, 1.0);
    let stone_dark = BlinnPhongMaterial::derive(Vec3::new(0.35, 0.33, 0.3), 0.0, 0.9, 1.0);
    let water = BlinnPhongMaterial::derive(Vec3::new(0.1, 0.28, 0.35), 0.0, 0.08, 1.0);
    let metal = BlinnPhongMaterial::derive(Vec3::new(0.95, 0.93, 0.88), 1.0, 0.12, 1.0);

    // Probe box around the scene, local ±1 cube
    let probe_center = Vec3::new(0.0, 0.0, -3.0);
    let probe_world_to_local = Mat4::new_scaling(1.0 / PROBE_HALF_EXTENT)
        * Mat4::new_translation(&-probe_center);

    let camera_position = Vec3::new(0.0, 0.6, 1.5);
    let tan_half_fov = (60.0_f32.to_radians() * 0.5).tan();
    let aspect = config.width as f32 / config.height as f32;
    let sphere_center = sphere_center();
    let height_field = ChannelSampler::new(&height_map, Channel::R);

    let frame = Texture2d::from_fn(config.width, config.height, |x, y| {
        let ndc_x = (x as f32 + 0.5) / config.width as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - (y as f32 + 0.5) / config.height as f32 * 2.0;
        let ray = Vec3::new(ndc_x * aspect * tan_half_fov, ndc_y * tan_half_fov, -1.0)
            .normalize();

        // Nearest hit between the sphere and the floor plane
        let mut sphere_t = f32::INFINITY;
        let oc = camera_position - sphere_center;
        let b = oc.dot(&ray);
        let discriminant = b * b - (oc.dot(&oc) - SPHERE_RADIUS * SPHERE_RADIUS);
        if discriminant > 0.0 {
            let t = -b - discriminant.sqrt();
            if t > 1e-3 {
                sphere_t = t;
            }
        }
        let mut floor_t = f32::INFINITY;
        if ray.y < -1e-5 {
            floor_t = (FLOOR_Y - camera_position.y) / ray.y;
        }

        let mut color = if sphere_t < floor_t {
            let position = camera_position + ray * sphere_t;
            let normal = (position - sphere_center) / SPHERE_RADIUS;
            let mut shaded = shade_fragment(position, normal, ray, &metal, &lights);

            // Reflection through the probe volume
            let reflected = reflect(ray, normal);
            let exit = intersect_ray_inside_box(position, reflected, &probe_world_to_local);
            if exit >= 0.0 {
                let probe_point = position + reflected * exit;
                let lookup = (probe_point - probe_center).normalize();
                let fresnel = fresnel_factor(normal.dot(&-ray).max(0.0), metal.roughness);
                shaded += sample_sky(&sky, lookup)
                    .component_mul(&metal.specular.normalize())
                    * fresnel.max(0.6);
            }
            shaded
        } else if floor_t.is_finite() {
            let position = camera_position + ray * floor_t;
            let uv = Vec2::new(position.x, position.z) * 0.5;

            if position.x < WATER_START_X {
                // Tangent basis: +x tangent, +z bitangent, +y normal
                let to_camera = (camera_position - position).normalize();
                let tangent_view = Vec3::new(to_camera.x, to_camera.z, to_camera.y);
                let displaced =
                    parallax_mapping(&height_field, uv, tangent_view, &config.parallax);

                let checker =
                    ((displaced.x * 4.0).floor() + (displaced.y * 4.0).floor()).rem_euclid(2.0);
                let material = if checker < 1.0 { &stone } else { &stone_dark };
                shade_fragment(position, Vec3::new(0.0, 1.0, 0.0), ray, material, &lights)
            } else {
                let local = sample_water_normal(&water_frames, uv * 0.8, water_counter);
                let normal = Vec3::new(local.x, local.z, local.y).normalize();
                let mut shaded = shade_fragment(position, normal, ray, &water, &lights);

                let reflected = reflect(ray, normal);
                let fresnel = fresnel_factor(normal.dot(&-ray).max(0.0), water.roughness);
                shaded += sample_sky(&sky, reflected) * fresnel;
                shaded
            }
        } else {
            sample_sky(&sky, ray)
        };

        // Exposure and gamma, like the tonemap stage the surfaces feed
        color *= config.exposure;
        let tonemapped = Vec3::new(
            color.x.clamp(0.0, 1.0).powf(1.0 / config.gamma),
            color.y.clamp(0.0, 1.0).powf(1.0 / config.gamma),
            color.z.clamp(0.0, 1.0).powf(1.0 / config.gamma),
        );
        Vec4::new(tonemapped.x, tonemapped.y, tonemapped.z, 1.0)
    })?;

    let output = image::RgbaImage::from_raw(config.width, config.height, frame.to_rgba8())
        .expect("frame buffer matches image dimensions");
    output.save("scene_preview.png")?;

    log::info!(
        "rendered {}x{} scene preview in {:.1?}",
        config.width,
        config.height,
        start.elapsed()
    );
    Ok(())
}
