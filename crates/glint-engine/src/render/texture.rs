use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::device::Gpu;

/// Error returned when an image cannot be turned into a [`TextureImage`].
#[derive(Debug)]
pub enum TextureLoadError {
    /// The file could not be read or decoded.
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// Raw pixel data does not match the stated dimensions.
    Size { width: u32, height: u32, len: usize },
}

impl fmt::Display for TextureLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path, source } => {
                write!(f, "unable to load image {}: {source}", path.display())
            }
            Self::Size { width, height, len } => {
                write!(f, "{len} bytes of pixel data do not form a {width}x{height} RGBA8 image")
            }
        }
    }
}

impl std::error::Error for TextureLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::Size { .. } => None,
        }
    }
}

/// Decoded RGBA8 pixels ready for upload. Rows are stored top to bottom.
#[derive(Debug, Clone)]
pub struct TextureImage {
    label: String,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TextureImage {
    /// Reads and decodes an image file (PNG, JPEG, BMP), converting to RGBA8.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TextureLoadError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| TextureLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let image = Self::from_dynamic(path.display().to_string(), decoded);
        log::debug!("loaded {} ({}x{})", image.label, image.width, image.height);
        Ok(image)
    }

    /// Decodes an in-memory encoded image; the format is guessed from its header.
    pub fn decode(label: impl Into<String>, bytes: &[u8]) -> Result<Self, TextureLoadError> {
        let label = label.into();
        let decoded =
            image::load_from_memory(bytes).map_err(|source| TextureLoadError::Decode {
                path: PathBuf::from(&label),
                source,
            })?;
        Ok(Self::from_dynamic(label, decoded))
    }

    /// Wraps raw RGBA8 pixels.
    pub fn from_rgba8(
        label: impl Into<String>,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Result<Self, TextureLoadError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(TextureLoadError::Size { width, height, len: rgba.len() });
        }
        Ok(Self { label: label.into(), width, height, rgba })
    }

    fn from_dynamic(label: String, decoded: image::DynamicImage) -> Self {
        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();
        Self { label, width, height, rgba: rgba.into_raw() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }
}

/// Sampler settings for an uploaded texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureSampling {
    pub address_mode: wgpu::AddressMode,
    pub filter: wgpu::FilterMode,
}

impl TextureSampling {
    /// Clamped, nearest-neighbour sampling for pixel sprites.
    pub const SPRITE: TextureSampling = TextureSampling {
        address_mode: wgpu::AddressMode::ClampToEdge,
        filter: wgpu::FilterMode::Nearest,
    };

    /// Tiling, bilinear sampling.
    pub const REPEAT_LINEAR: TextureSampling = TextureSampling {
        address_mode: wgpu::AddressMode::Repeat,
        filter: wgpu::FilterMode::Linear,
    };
}

impl Default for TextureSampling {
    fn default() -> Self {
        Self::SPRITE
    }
}

/// Picks the texture format whose encoding matches the surface.
///
/// An sRGB surface re-encodes shader output, so texels are decoded from sRGB
/// on sampling; a linear surface gets the bytes as-is. Either way the image's
/// stored colors reach the screen unchanged.
pub fn texture_format_for(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if surface_format.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// A texture resident on the GPU with its view and sampler.
///
/// Renderers key their cached bind groups on [`id`](Self::id).
pub struct GpuTexture {
    id: u64,
    // Kept alive for the view.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Uploads `image` as a single-level 2D texture.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &TextureImage,
        sampling: TextureSampling,
        format: wgpu::TextureFormat,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(image.label()),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glint texture sampler"),
            address_mode_u: sampling.address_mode,
            address_mode_v: sampling.address_mode,
            address_mode_w: sampling.address_mode,
            mag_filter: sampling.filter,
            min_filter: sampling.filter,
            ..Default::default()
        });

        Self {
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            _texture: texture,
            view,
            sampler,
        }
    }

    /// Uploads `image` in the format matching `gpu`'s surface.
    pub fn upload_for(gpu: &Gpu<'_>, image: &TextureImage, sampling: TextureSampling) -> Self {
        let format = texture_format_for(gpu.surface_format());
        Self::upload(gpu.device(), gpu.queue(), image, sampling, format)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}
