// ============================================
// Atlas Binding - Привязка текстурного атласа
// ============================================
// Сшивка атласа — забота внешнего плагина, сюда приходит уже
// готовая RGBA-полоса тайлов и их количество. До первого
// install() привязан нейтральный плейсхолдер 1x1, чтобы
// bind group был валиден с первого кадра.

use std::fmt;

/// Ошибки установки атласа
#[derive(Debug)]
pub enum AtlasError {
    EmptyDimensions {
        width: u32,
        height: u32,
        tile_count: u32,
    },
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::EmptyDimensions {
                width,
                height,
                tile_count,
            } => write!(
                f,
                "atlas has empty dimensions: {}x{}, {} tiles",
                width, height, tile_count
            ),
            AtlasError::SizeMismatch {
                width,
                height,
                expected,
                actual,
            } => write!(
                f,
                "atlas size mismatch: {}x{} needs {} bytes, got {}",
                width, height, expected, actual
            ),
        }
    }
}

impl std::error::Error for AtlasError {}

pub struct AtlasBinding {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    #[allow(dead_code)]
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
    tile_count: u32,
    ready: bool,
}

impl AtlasBinding {
    /// Нейтральная 1x1 текстура до прихода настоящего атласа
    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let texture = create_texture(device, 1, 1);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[180, 180, 180, 255],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = create_sampler(device);
        let bind_group = create_bind_group(device, layout, &view, &sampler);

        Self {
            texture,
            view,
            sampler,
            bind_group,
            tile_count: 1,
            ready: false,
        }
    }

    /// Установить сшитый атлас (аналог события updateTexture).
    /// Пиксели премультиплицируются по альфе один раз здесь —
    /// porous-проход блендится в premultiplied-режиме.
    pub fn install(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        pixels: &[u8],
        width: u32,
        height: u32,
        tile_count: u32,
    ) -> Result<(), AtlasError> {
        validate_dimensions(pixels.len(), width, height, tile_count)?;

        let mut data = pixels.to_vec();
        premultiply_alpha(&mut data);

        let texture = create_texture(device, width, height);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.bind_group = create_bind_group(device, layout, &view, &self.sampler);
        self.texture = texture;
        self.view = view;
        self.tile_count = tile_count;
        self.ready = true;

        log::info!("atlas installed: {}x{}, {} tiles", width, height, tile_count);
        Ok(())
    }

    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Проверка входа install(): размеры ненулевые, байтов ровно w*h*4
fn validate_dimensions(
    pixels_len: usize,
    width: u32,
    height: u32,
    tile_count: u32,
) -> Result<(), AtlasError> {
    if width == 0 || height == 0 || tile_count == 0 {
        return Err(AtlasError::EmptyDimensions {
            width,
            height,
            tile_count,
        });
    }

    let expected = (width as usize) * (height as usize) * 4;
    if pixels_len != expected {
        return Err(AtlasError::SizeMismatch {
            width,
            height,
            expected,
            actual: pixels_len,
        });
    }
    Ok(())
}

fn create_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Atlas Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    // Nearest-neighbor сэмплер для пиксельного стиля
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Atlas Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Atlas Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// Премультипликация альфы на месте (RGBA8)
pub fn premultiply_alpha(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3] as u16;
        px[0] = ((px[0] as u16 * a) / 255) as u8;
        px[1] = ((px[1] as u16 * a) / 255) as u8;
        px[2] = ((px[2] as u16 * a) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiply_scales_rgb_by_alpha() {
        let mut pixels = vec![200, 100, 50, 255, 200, 100, 50, 0, 200, 100, 50, 128];
        premultiply_alpha(&mut pixels);

        // Полная альфа — без изменений
        assert_eq!(&pixels[0..4], &[200, 100, 50, 255]);
        // Нулевая альфа — RGB обнуляется
        assert_eq!(&pixels[4..8], &[0, 0, 0, 0]);
        // Половинная альфа — примерно половина
        assert_eq!(pixels[8], 100);
        assert_eq!(pixels[9], 50);
        assert_eq!(pixels[10], 25);
        assert_eq!(pixels[11], 128);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            validate_dimensions(4, 0, 1, 1),
            Err(AtlasError::EmptyDimensions { .. })
        ));
        assert!(matches!(
            validate_dimensions(4, 1, 0, 1),
            Err(AtlasError::EmptyDimensions { .. })
        ));
        assert!(matches!(
            validate_dimensions(4, 1, 1, 0),
            Err(AtlasError::EmptyDimensions { .. })
        ));
    }

    #[test]
    fn byte_count_must_match_dimensions() {
        assert!(validate_dimensions(96 * 16 * 4, 96, 16, 6).is_ok());
        assert!(matches!(
            validate_dimensions(96 * 16 * 4 - 1, 96, 16, 6),
            Err(AtlasError::SizeMismatch { .. })
        ));
    }
}
