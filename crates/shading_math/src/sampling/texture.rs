//! CPU-side texture storage with GL-style filtering
//!
//! [`Texture2d`] keeps texels as linear RGBA f32 and samples them the way
//! a GPU samples its surfaces: bilinear filtering with
//! texel centers at `(i + 0.5) / size`, and wrap/clamp/mirror addressing
//! outside [0, 1).

use crate::foundation::math::{Vec2, Vec4};
use crate::sampling::{AddressMode, SurfaceSampler};
use thiserror::Error;

/// Texture construction errors
#[derive(Error, Debug)]
pub enum TextureError {
    /// Texel data does not match the declared dimensions
    #[error("invalid amount of texels: required {required}, found {found}")]
    TexelCountMismatch {
        /// Texel count implied by width * height
        required: usize,
        /// Texel count actually provided
        found: usize,
    },

    /// Width or height is zero
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
    },

    /// Array layer dimensions differ from the first layer
    #[error("array layer {layer} is {found_width}x{found_height}, expected {width}x{height}")]
    LayerSizeMismatch {
        /// Index of the offending layer
        layer: usize,
        /// Expected width
        width: u32,
        /// Expected height
        height: u32,
        /// Actual width
        found_width: u32,
        /// Actual height
        found_height: u32,
    },

    /// A texture array needs at least one layer
    #[error("texture array requires at least one layer")]
    NoLayers,
}

/// 2D RGBA texture with bilinear sampling
#[derive(Debug, Clone, PartialEq)]
pub struct Texture2d {
    width: u32,
    height: u32,
    texels: Vec<[f32; 4]>,
    address_mode: AddressMode,
}

impl Texture2d {
    /// Create a texture from linear RGBA texels in row-major order
    pub fn from_texels(texels: Vec<[f32; 4]>, width: u32, height: u32) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimension { width, height });
        }
        let required = width as usize * height as usize;
        if texels.len() != required {
            return Err(TextureError::TexelCountMismatch {
                required,
                found: texels.len(),
            });
        }
        log::debug!("created {}x{} texture", width, height);
        Ok(Self {
            width,
            height,
            texels,
            address_mode: AddressMode::Repeat,
        })
    }

    /// Create a texture from tightly packed 8-bit RGBA bytes
    ///
    /// Channels are normalized to [0, 1].
    pub fn from_rgba8(bytes: &[u8], width: u32, height: u32) -> Result<Self, TextureError> {
        let required = width as usize * height as usize;
        if bytes.len() != required * 4 {
            return Err(TextureError::TexelCountMismatch {
                required,
                found: bytes.len() / 4,
            });
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|texel| {
                [
                    f32::from(texel[0]) / 255.0,
                    f32::from(texel[1]) / 255.0,
                    f32::from(texel[2]) / 255.0,
                    f32::from(texel[3]) / 255.0,
                ]
            })
            .collect();
        Self::from_texels(texels, width, height)
    }

    /// Create a texture from an 8-bit RGBA image buffer
    pub fn from_image(image: &image::RgbaImage) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        Self::from_rgba8(image.as_raw(), width, height)
    }

    /// Create a texture by evaluating `texel` at every coordinate
    pub fn from_fn<F>(width: u32, height: u32, mut texel: F) -> Result<Self, TextureError>
    where
        F: FnMut(u32, u32) -> Vec4,
    {
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let value = texel(x, y);
                texels.push([value.x, value.y, value.z, value.w]);
            }
        }
        Self::from_texels(texels, width, height)
    }

    /// Create a texture filled with a single color
    pub fn solid(color: Vec4, width: u32, height: u32) -> Result<Self, TextureError> {
        Self::from_texels(
            vec![[color.x, color.y, color.z, color.w]; width as usize * height as usize],
            width,
            height,
        )
    }

    /// Set the addressing mode used outside [0, 1)
    pub fn with_address_mode(mut self, address_mode: AddressMode) -> Self {
        self.address_mode = address_mode;
        self
    }

    /// Texture width in texels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in texels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texels as a flat f32 slice (r, g, b, a per texel, row-major)
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Fetch a single texel without filtering
    ///
    /// `x` and `y` must be inside the texture.
    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        let texel = self.texels[y as usize * self.width as usize + x as usize];
        Vec4::new(texel[0], texel[1], texel[2], texel[3])
    }

    fn fetch(&self, x: i64, y: i64) -> Vec4 {
        let x = self.address_mode.resolve(x, self.width);
        let y = self.address_mode.resolve(y, self.height);
        self.texel(x, y)
    }

    /// Convert to tightly packed 8-bit RGBA bytes, clamping to [0, 1]
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.texels
            .iter()
            .flat_map(|texel| {
                texel.map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
            })
            .collect()
    }
}

impl SurfaceSampler for Texture2d {
    /// Bilinear sample at `uv`, with texel centers at `(i + 0.5) / size`
    fn sample(&self, uv: Vec2) -> Vec4 {
        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;

        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let x0 = x0 as i64;
        let y0 = y0 as i64;

        let bottom = self.fetch(x0, y0).lerp(&self.fetch(x0 + 1, y0), tx);
        let top = self.fetch(x0, y0 + 1).lerp(&self.fetch(x0 + 1, y0 + 1), tx);
        bottom.lerp(&top, ty)
    }
}

/// Layered collection of equally sized textures
///
/// Stands in for a GPU 2D array texture. Layer lookups clamp to the last
/// layer, matching array-layer clamping on the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureArray {
    layers: Vec<Texture2d>,
}

impl TextureArray {
    /// Create an array from at least one equally sized layer
    pub fn from_layers(layers: Vec<Texture2d>) -> Result<Self, TextureError> {
        let first = layers.first().ok_or(TextureError::NoLayers)?;
        let (width, height) = (first.width(), first.height());
        for (index, layer) in layers.iter().enumerate() {
            if layer.width() != width || layer.height() != height {
                return Err(TextureError::LayerSizeMismatch {
                    layer: index,
                    width,
                    height,
                    found_width: layer.width(),
                    found_height: layer.height(),
                });
            }
        }
        log::debug!("created {}x{} texture array, {} layers", width, height, layers.len());
        Ok(Self { layers })
    }

    /// Number of layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer at `index`, clamped to the last layer
    pub fn layer(&self, index: usize) -> &Texture2d {
        &self.layers[index.min(self.layers.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn checkerboard(width: u32, height: u32) -> Texture2d {
        Texture2d::from_fn(width, height, |x, y| {
            let value = if (x + y) % 2 == 0 { 1.0 } else { 0.0 };
            Vec4::new(value, value, value, 1.0)
        })
        .unwrap()
    }

    #[test]
    fn test_dimension_validation() {
        assert!(matches!(
            Texture2d::from_texels(vec![[0.0; 4]; 5], 2, 2),
            Err(TextureError::TexelCountMismatch { required: 4, found: 5 })
        ));
        assert!(matches!(
            Texture2d::from_texels(Vec::new(), 0, 4),
            Err(TextureError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_constant_texture_samples_constant() {
        let color = Vec4::new(0.3, 0.5, 0.7, 1.0);
        let texture = Texture2d::solid(color, 8, 8).unwrap();

        for &(u, v) in &[(0.0, 0.0), (0.5, 0.5), (0.99, 0.01), (-0.3, 1.7)] {
            let sampled = texture.sample(Vec2::new(u, v));
            assert!((sampled - color).norm() < EPSILON, "at ({u}, {v})");
        }
    }

    #[test]
    fn test_bilinear_blends_texel_centers() {
        // Two texels, black and white; halfway between centers is 0.5
        let texture = Texture2d::from_texels(
            vec![[0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0]],
            2,
            1,
        )
        .unwrap();
        let sampled = texture.sample(Vec2::new(0.5, 0.5));
        assert!((sampled.x - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_texel_center_is_exact() {
        let texture = checkerboard(4, 4);
        // Texel (1, 0) center: ((1 + 0.5) / 4, (0 + 0.5) / 4)
        let sampled = texture.sample(Vec2::new(1.5 / 4.0, 0.5 / 4.0));
        assert!((sampled.x - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_clamp_mode_extends_edge() {
        let texture = Texture2d::from_texels(
            vec![[0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0]],
            2,
            1,
        )
        .unwrap()
        .with_address_mode(AddressMode::ClampToEdge);

        let sampled = texture.sample(Vec2::new(2.0, 0.5));
        assert!((sampled.x - 1.0).abs() < EPSILON);
        let sampled = texture.sample(Vec2::new(-1.0, 0.5));
        assert!((sampled.x - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_rgba8_round_trip() {
        let texture = checkerboard(4, 4);
        let bytes = texture.to_rgba8();
        let rebuilt = Texture2d::from_rgba8(&bytes, 4, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert!((texture.texel(x, y) - rebuilt.texel(x, y)).norm() < EPSILON);
            }
        }
    }

    #[test]
    fn test_flat_slice_layout() {
        let texture = Texture2d::solid(Vec4::new(0.25, 0.5, 0.75, 1.0), 2, 1).unwrap();
        assert_eq!(texture.as_flat(), &[0.25, 0.5, 0.75, 1.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_array_layer_clamping() {
        let layers = vec![
            Texture2d::solid(Vec4::new(0.0, 0.0, 0.0, 1.0), 2, 2).unwrap(),
            Texture2d::solid(Vec4::new(1.0, 1.0, 1.0, 1.0), 2, 2).unwrap(),
        ];
        let array = TextureArray::from_layers(layers).unwrap();
        assert_eq!(array.layer_count(), 2);
        assert_eq!(array.layer(5).texel(0, 0).x, 1.0);
    }

    #[test]
    fn test_array_rejects_mismatched_layers() {
        let layers = vec![
            Texture2d::solid(Vec4::new(0.0, 0.0, 0.0, 1.0), 2, 2).unwrap(),
            Texture2d::solid(Vec4::new(1.0, 1.0, 1.0, 1.0), 4, 4).unwrap(),
        ];
        assert!(matches!(
            TextureArray::from_layers(layers),
            Err(TextureError::LayerSizeMismatch { layer: 1, .. })
        ));
        assert!(matches!(
            TextureArray::from_layers(Vec::new()),
            Err(TextureError::NoLayers)
        ));
    }
}
