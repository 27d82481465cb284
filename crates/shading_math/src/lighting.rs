//! Blinn-Phong lighting with physically-inspired attenuation
//!
//! Evaluates per-fragment light contributions for directional, point, and
//! spot lights. Materials are derived on the fly from a base
//! color/metallic/roughness/ambient-occlusion input and keep the diffuse
//! term energy-conserving (base color over pi, ambient zeroed for pure
//! metals).

use crate::foundation::math::{constants::PI, utils, Vec3};

/// Base reflectance of the Schlick fresnel approximation
pub const FRESNEL_F0: f32 = 0.05;

/// Default light source radius
pub const DEFAULT_LIGHT_SIZE: f32 = 0.05;

/// Default point/spot light range
pub const DEFAULT_LIGHT_RANGE: f32 = 10.0;

// Additive offset in the attenuation denominator; the denominator stays
// >= 1 at zero distance.
const LIGHT_DISTANCE_OFFSET: f32 = 1.0;

/// Diffuse, specular, and ambient color triplet of a light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColors {
    /// Diffuse color
    pub diffuse: Vec3,
    /// Specular color
    pub specular: Vec3,
    /// Ambient color
    pub ambient: Vec3,
}

impl LightColors {
    /// Set diffuse, specular, and ambient to the same color
    pub fn uniform(color: Vec3) -> Self {
        Self {
            diffuse: color,
            specular: color,
            ambient: color,
        }
    }
}

impl Default for LightColors {
    fn default() -> Self {
        Self {
            diffuse: Vec3::new(1.0, 1.0, 1.0),
            specular: Vec3::new(1.0, 1.0, 1.0),
            ambient: Vec3::new(0.05, 0.05, 0.05),
        }
    }
}

/// Directional light (like sunlight)
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, in world space
    pub direction: Vec3,
    /// Light colors
    pub colors: LightColors,
    /// Light source radius
    pub size: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, -1.0, 0.0),
            colors: LightColors::default(),
            size: DEFAULT_LIGHT_SIZE,
        }
    }
}

/// Point light (like a lightbulb)
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// Light position in world space
    pub position: Vec3,
    /// Distance at which the falloff reaches exactly zero
    pub range: f32,
    /// Light colors
    pub colors: LightColors,
    /// Light source radius
    pub size: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            range: DEFAULT_LIGHT_RANGE,
            colors: LightColors::default(),
            size: DEFAULT_LIGHT_SIZE,
        }
    }
}

/// Spot light (like a flashlight)
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    /// Light position in world space
    pub position: Vec3,
    /// Direction the light travels, in world space
    pub direction: Vec3,
    /// Distance at which the falloff reaches exactly zero
    pub range: f32,
    /// Cosine of the inner cone angle
    pub inner_cone: f32,
    /// Cosine of the outer cone angle
    pub outer_cone: f32,
    /// Light colors
    pub colors: LightColors,
    /// Light source radius
    pub size: f32,
}

impl SpotLight {
    /// Set the cone extents from angles in degrees
    pub fn with_cone_angles(mut self, inner_degrees: f32, outer_degrees: f32) -> Self {
        self.inner_cone = utils::deg_to_rad(inner_degrees).cos();
        self.outer_cone = utils::deg_to_rad(outer_degrees).cos();
        self
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            direction: Vec3::new(0.0, -1.0, 0.0),
            range: DEFAULT_LIGHT_RANGE,
            inner_cone: utils::deg_to_rad(25.0).cos(),
            outer_cone: utils::deg_to_rad(65.0).cos(),
            colors: LightColors::default(),
            size: DEFAULT_LIGHT_SIZE,
        }
    }
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Directional light
    Directional(DirectionalLight),
    /// Point light
    Point(PointLight),
    /// Spot light
    Spot(SpotLight),
}

impl Light {
    /// Create a directional light with default colors
    pub fn directional(direction: Vec3) -> Self {
        Self::Directional(DirectionalLight {
            direction,
            ..Default::default()
        })
    }

    /// Create a point light with default colors and range
    pub fn point(position: Vec3) -> Self {
        Self::Point(PointLight {
            position,
            ..Default::default()
        })
    }

    /// Create a spot light with default colors, range, and cone angles
    pub fn spot(position: Vec3, direction: Vec3) -> Self {
        Self::Spot(SpotLight {
            position,
            direction,
            ..Default::default()
        })
    }

    /// Light colors of this light
    pub fn colors(&self) -> &LightColors {
        match self {
            Self::Directional(light) => &light.colors,
            Self::Point(light) => &light.colors,
            Self::Spot(light) => &light.colors,
        }
    }

    /// Position and range, for the variants with distance falloff
    fn attenuation_source(&self) -> Option<(Vec3, f32)> {
        match self {
            Self::Directional(_) => None,
            Self::Point(light) => Some((light.position, light.range)),
            Self::Spot(light) => Some((light.position, light.range)),
        }
    }

    /// Evaluate this light's contribution at a fragment
    ///
    /// Returns the summed diffuse, specular, and ambient contributions.
    /// Directional lights are unattenuated; point and spot lights apply an
    /// inverse-square attenuation with a quartic falloff that reaches
    /// exactly zero at `range`. Spot lights additionally apply the cone
    /// falloff, with the specular cone pinned at cos(90 degrees) so it
    /// never fully closes at the diffuse outer edge.
    ///
    /// # Arguments
    /// * `material` - Material response at the fragment
    /// * `frag_position` - Fragment position in world space
    /// * `view_direction` - Direction from the camera towards the fragment
    /// * `normal` - Unit surface normal at the fragment
    ///
    /// Preconditions: `range > 0` and the light must not be coincident with
    /// the fragment; degenerate configurations propagate per IEEE float
    /// semantics.
    pub fn evaluate(
        &self,
        material: &BlinnPhongMaterial,
        frag_position: Vec3,
        view_direction: Vec3,
        normal: Vec3,
    ) -> Vec3 {
        let light_direction = match self {
            Self::Directional(light) => light.direction.normalize(),
            Self::Point(light) => (frag_position - light.position).normalize(),
            Self::Spot(light) => (frag_position - light.position).normalize(),
        };
        let halfway_direction = -(light_direction + view_direction).normalize();

        let normal_dot_halfway = normal.dot(&halfway_direction).max(0.0);
        let fresnel = utils::lerp(
            fresnel_factor(normal_dot_halfway, material.roughness),
            1.0,
            material.metallic,
        );

        let mut diffuse_factor = utils::clamp(normal.dot(&-light_direction), 0.0, 1.0);
        let mut specular_factor = normal_dot_halfway.powf(material.shininess) * diffuse_factor * fresnel;
        let mut ambient_factor = 1.0;

        if let Some((position, range)) = self.attenuation_source() {
            let distance = (position - frag_position).norm();
            let point_attenuation = utils::clamp(1.0 - (distance / range).powi(4), 0.0, 1.0)
                / (distance * distance + LIGHT_DISTANCE_OFFSET);

            diffuse_factor *= point_attenuation;
            specular_factor *= point_attenuation;
            ambient_factor *= point_attenuation;

            if let Self::Spot(light) = self {
                let theta = light_direction.dot(&light.direction.normalize());
                diffuse_factor *=
                    spotlight_intensity(theta, light.inner_cone, light.outer_cone);
                specular_factor *=
                    spotlight_intensity(theta, light.inner_cone, utils::deg_to_rad(90.0).cos());
            }
        }

        let colors = self.colors();
        colors.diffuse.component_mul(&material.diffuse) * diffuse_factor
            + colors.specular.component_mul(&material.specular) * specular_factor
            + colors.ambient.component_mul(&material.ambient) * ambient_factor
    }
}

/// Blinn-Phong material derived from base color, metallic, roughness, and
/// ambient occlusion
#[derive(Debug, Clone, PartialEq)]
pub struct BlinnPhongMaterial {
    /// Specular exponent, derived from roughness
    pub shininess: f32,
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,
    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,
    /// Diffuse response
    pub diffuse: Vec3,
    /// Specular response
    pub specular: Vec3,
    /// Ambient response
    pub ambient: Vec3,
}

impl BlinnPhongMaterial {
    /// Derive the Blinn-Phong responses from a base color
    ///
    /// Shininess is `65535^(1-roughness)`; the specular term carries the
    /// Blinn-Phong energy-conserving normalization for that shininess.
    /// Dielectric and metallic responses are interpolated by `metallic`.
    pub fn derive(base_color: Vec3, metallic: f32, roughness: f32, ambient_occlusion: f32) -> Self {
        let shininess = 65535.0_f32.powf(1.0 - roughness);
        let specular = ((shininess + 2.0) * (shininess + 4.0))
            / (8.0 * PI * (2.0_f32.powf(-shininess * 0.5) + shininess));
        Self {
            shininess,
            metallic,
            roughness,
            diffuse: (base_color / PI).lerp(&Vec3::zeros(), metallic),
            specular: Vec3::new(specular, specular, specular)
                .lerp(&(base_color * specular), metallic),
            ambient: (base_color * ambient_occlusion).lerp(&Vec3::zeros(), metallic),
        }
    }
}

/// Schlick-style fresnel approximation
///
/// Exactly [`FRESNEL_F0`] at normal incidence; the grazing response is
/// scaled by `max(1-roughness, FRESNEL_F0)`.
pub fn fresnel_factor(view_direction_dot: f32, roughness: f32) -> f32 {
    FRESNEL_F0
        + ((1.0 - roughness).max(FRESNEL_F0) - FRESNEL_F0)
            * utils::clamp(1.0 - view_direction_dot, 0.0, 1.0).powf(5.0)
}

/// Smooth spot cone falloff
///
/// 0 at and outside the outer cone, 1 at and inside the inner cone,
/// squared interpolation between. Cone extents are cosines.
pub fn spotlight_intensity(theta: f32, inner_cone: f32, outer_cone: f32) -> f32 {
    let epsilon = inner_cone - outer_cone;
    utils::clamp((theta - outer_cone) / epsilon, 0.0, 1.0).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 0.001;

    fn test_material() -> BlinnPhongMaterial {
        BlinnPhongMaterial::derive(Vec3::new(0.8, 0.4, 0.2), 0.0, 0.5, 1.0)
    }

    #[test]
    fn test_fresnel_vanishes_at_normal_incidence() {
        for roughness in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(fresnel_factor(1.0, roughness), FRESNEL_F0);
        }
    }

    #[test]
    fn test_fresnel_grazing_response() {
        // At grazing incidence the pow term is 1
        let grazing = fresnel_factor(0.0, 0.0);
        assert_relative_eq!(grazing, 1.0, epsilon = EPSILON);

        // Full roughness collapses the grazing term to the base reflectance
        let rough = fresnel_factor(0.0, 1.0);
        assert_relative_eq!(rough, FRESNEL_F0, epsilon = EPSILON);
    }

    #[test]
    fn test_spotlight_intensity_bounds() {
        let inner = utils::deg_to_rad(25.0).cos();
        let outer = utils::deg_to_rad(65.0).cos();

        assert_eq!(spotlight_intensity(outer, inner, outer), 0.0);
        assert_eq!(spotlight_intensity(outer - 0.2, inner, outer), 0.0);
        assert_eq!(spotlight_intensity(inner, inner, outer), 1.0);
        assert_eq!(spotlight_intensity(1.0, inner, outer), 1.0);
    }

    #[test]
    fn test_spotlight_intensity_monotone() {
        let inner = utils::deg_to_rad(25.0).cos();
        let outer = utils::deg_to_rad(65.0).cos();

        let mut previous = 0.0;
        for step in 0..=100 {
            let theta = utils::lerp(outer, inner, step as f32 / 100.0);
            let intensity = spotlight_intensity(theta, inner, outer);
            assert!(intensity >= previous, "not monotone at theta {theta}");
            previous = intensity;
        }
    }

    #[test]
    fn test_specular_cone_stays_open_at_diffuse_edge() {
        let inner = utils::deg_to_rad(25.0).cos();
        let outer = utils::deg_to_rad(65.0).cos();
        let specular_outer = utils::deg_to_rad(90.0).cos();

        // At the diffuse outer edge the diffuse falloff is closed but the
        // wider specular cone still passes light
        assert_eq!(spotlight_intensity(outer, inner, outer), 0.0);
        assert!(spotlight_intensity(outer, inner, specular_outer) > 0.1);
    }

    #[test]
    fn test_material_shininess_range() {
        let rough = BlinnPhongMaterial::derive(Vec3::new(1.0, 1.0, 1.0), 0.0, 1.0, 1.0);
        assert_relative_eq!(rough.shininess, 1.0, epsilon = EPSILON);

        let polished = BlinnPhongMaterial::derive(Vec3::new(1.0, 1.0, 1.0), 0.0, 0.0, 1.0);
        assert_relative_eq!(polished.shininess, 65535.0, epsilon = 1.0);
    }

    #[test]
    fn test_dielectric_diffuse_divides_by_pi() {
        let base = Vec3::new(0.9, 0.6, 0.3);
        let material = BlinnPhongMaterial::derive(base, 0.0, 0.5, 1.0);
        assert_relative_eq!(material.diffuse.x, base.x / PI, epsilon = EPSILON);
        assert_relative_eq!(material.diffuse.y, base.y / PI, epsilon = EPSILON);
        assert_relative_eq!(material.diffuse.z, base.z / PI, epsilon = EPSILON);
    }

    #[test]
    fn test_pure_metal_has_no_diffuse_or_ambient() {
        let base = Vec3::new(0.9, 0.6, 0.3);
        let material = BlinnPhongMaterial::derive(base, 1.0, 0.5, 1.0);
        assert!(material.diffuse.norm() < EPSILON);
        assert!(material.ambient.norm() < EPSILON);
        // Metal specular is tinted by the base color
        assert_relative_eq!(
            material.specular.x / material.specular.y,
            base.x / base.y,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_ambient_occlusion_scales_ambient() {
        let base = Vec3::new(1.0, 1.0, 1.0);
        let occluded = BlinnPhongMaterial::derive(base, 0.0, 0.5, 0.25);
        let open = BlinnPhongMaterial::derive(base, 0.0, 0.5, 1.0);
        assert_relative_eq!(occluded.ambient.x, open.ambient.x * 0.25, epsilon = EPSILON);
    }

    #[test]
    fn test_directional_light_ignores_distance() {
        let light = Light::directional(Vec3::new(0.0, -1.0, 0.0));
        let material = test_material();
        let view = Vec3::new(0.0, -1.0, 0.0);
        let normal = Vec3::new(0.0, 1.0, 0.0);

        let near = light.evaluate(&material, Vec3::zeros(), view, normal);
        let far = light.evaluate(&material, Vec3::new(100.0, -50.0, 3.0), view, normal);
        assert!((near - far).norm() < EPSILON);
    }

    #[test]
    fn test_point_light_dies_at_range() {
        let light = Light::Point(PointLight {
            position: Vec3::zeros(),
            range: 10.0,
            ..Default::default()
        });
        let material = test_material();
        let normal = Vec3::new(0.0, 1.0, 0.0);
        let view = Vec3::new(0.0, -1.0, 0.0);

        // Quartic falloff reaches exactly zero at range
        let at_range = light.evaluate(&material, Vec3::new(0.0, -10.0, 0.0), view, normal);
        assert_eq!(at_range, Vec3::zeros());

        let inside = light.evaluate(&material, Vec3::new(0.0, -5.0, 0.0), view, normal);
        assert!(inside.norm() > 0.0);
    }

    #[test]
    fn test_point_light_attenuation_monotone() {
        let light = Light::point(Vec3::zeros());
        let material = test_material();
        let normal = Vec3::new(0.0, 1.0, 0.0);
        let view = Vec3::new(0.0, -1.0, 0.0);

        let mut previous = f32::INFINITY;
        for step in 1..10 {
            let frag = Vec3::new(0.0, -(step as f32), 0.0);
            let contribution = light.evaluate(&material, frag, view, normal).norm();
            assert!(contribution <= previous, "brighter at distance {step}");
            previous = contribution;
        }
    }

    #[test]
    fn test_spot_light_cone() {
        let light = Light::spot(Vec3::zeros(), Vec3::new(0.0, -1.0, 0.0));
        let material = test_material();
        let normal = Vec3::new(0.0, 1.0, 0.0);
        let view = Vec3::new(0.0, -1.0, 0.0);

        // Dead ahead, inside the inner cone
        let ahead = light.evaluate(&material, Vec3::new(0.0, -2.0, 0.0), view, normal);
        // Same distance, far outside the outer cone
        let aside = light.evaluate(&material, Vec3::new(2.0, 0.0, 0.0).normalize() * 2.0, view, normal);

        assert!(ahead.norm() > aside.norm());
    }

    #[test]
    fn test_spot_defaults_match_cone_angles() {
        let Light::Spot(spot) = Light::spot(Vec3::zeros(), Vec3::new(0.0, -1.0, 0.0)) else {
            unreachable!()
        };
        assert_relative_eq!(spot.inner_cone, utils::deg_to_rad(25.0).cos(), epsilon = EPSILON);
        assert_relative_eq!(spot.outer_cone, utils::deg_to_rad(65.0).cos(), epsilon = EPSILON);
    }

    #[test]
    fn test_light_colors_uniform() {
        let colors = LightColors::uniform(Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(colors.diffuse, colors.specular);
        assert_eq!(colors.diffuse, colors.ambient);
    }
}
