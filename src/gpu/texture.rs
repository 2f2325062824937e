//! Sampled textures uploaded from decoded images.

use crate::engine::loader::{CubeImages, DecodedImage};

/// Sampled color format for every uploaded image.
pub const IMAGE_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba8UnormSrgb;

/// A sampled texture and its default view.
pub struct GpuTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// View matching the texture's dimension (cube or 2D).
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    /// Upload six faces as a cube texture, one array layer per face.
    #[must_use]
    pub fn cube(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        images: &CubeImages,
    ) -> Self {
        let size = images.size();
        let texture = create(device, "Skybox Cube", size, size, 6);
        for (face, image) in images.iter() {
            write_layer(queue, &texture, face.layer() as u32, image);
        }
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Skybox Cube View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        Self { texture, view }
    }

    /// Upload a single image as a 2D texture.
    #[must_use]
    pub fn image_2d(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &DecodedImage,
    ) -> Self {
        let texture = create(device, label, image.width, image.height, 1);
        write_layer(queue, &texture, 0, image);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

fn create(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    layers: u32,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: layers,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: IMAGE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn write_layer(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    layer: u32,
    image: &DecodedImage,
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
    );
}
