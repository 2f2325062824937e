//! wgpu implementation of [`RenderBackend`]: a skybox pass followed by
//! alpha-blended particle sprites, drawn straight into the surface.

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use super::dynamic_buffer::TypedBuffer;
use super::pipeline_helpers::{
    create_pipeline, linear_sampler, texture_sampler_layout, uniform_buffer,
};
use super::render_context::RenderContext;
use super::shader_composer::{ShaderComposer, PARTICLE_SHADER, SKYBOX_SHADER};
use super::texture::GpuTexture;
use crate::camera::{Camera, CameraUniform};
use crate::engine::loader::{CubeImages, DecodedImage};
use crate::engine::particles::Particle;
use crate::engine::scene::Scene;
use crate::engine::{RenderBackend, TextureId};
use crate::error::SkyscapeError;

/// Per-instance particle data (20 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    /// World-space centre.
    pub position: [f32; 3],
    /// Size in logical pixels.
    pub size: f32,
    /// Fade factor in `[0, 1]`.
    pub opacity: f32,
}

impl From<&Particle> for ParticleInstance {
    fn from(particle: &Particle) -> Self {
        Self {
            position: particle.position.to_array(),
            size: particle.size,
            opacity: particle.opacity(),
        }
    }
}

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32];

/// Two triangles per sprite.
const VERTICES_PER_SPRITE: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextureKind {
    Cube,
    Flat,
}

struct BoundTexture {
    kind: TextureKind,
    _texture: GpuTexture,
    bind_group: wgpu::BindGroup,
}

/// Renders the environment scene with wgpu.
pub struct WgpuRenderer {
    context: RenderContext,
    pixel_ratio: f64,

    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    cube_layout: wgpu::BindGroupLayout,
    flat_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    skybox_pipeline: wgpu::RenderPipeline,
    particle_pipeline: wgpu::RenderPipeline,

    instances: TypedBuffer<ParticleInstance>,
    instance_scratch: Vec<ParticleInstance>,

    textures: FxHashMap<TextureId, BoundTexture>,
    next_texture: u64,
    disposed: bool,
}

impl WgpuRenderer {
    /// Create the GPU context for `target` and build both pipelines.
    ///
    /// `logical_size` is the host size in logical pixels; the surface is
    /// allocated at `logical_size * pixel_ratio`.
    ///
    /// # Errors
    ///
    /// Returns [`SkyscapeError::Gpu`] if no device or surface is available
    /// and [`SkyscapeError::Shader`] if a pipeline shader fails to compose.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        logical_size: (u32, u32),
        pixel_ratio: f64,
    ) -> Result<Self, SkyscapeError> {
        let physical = physical_size(logical_size, pixel_ratio);
        let context = RenderContext::new(target, physical).await?;
        let device = &context.device;

        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform"),
                contents: bytemuck::bytes_of(&camera_uniform),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Layout"),
                entries: &[uniform_buffer(0)],
            });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let cube_layout = texture_sampler_layout(
            device,
            "Skybox Texture Layout",
            wgpu::TextureViewDimension::Cube,
        );
        let flat_layout = texture_sampler_layout(
            device,
            "Sprite Texture Layout",
            wgpu::TextureViewDimension::D2,
        );
        let sampler = linear_sampler(device, "Environment Sampler");

        let mut composer = ShaderComposer::new()?;
        let skybox_shader = composer.compose(device, "Skybox", SKYBOX_SHADER)?;
        let particle_shader =
            composer.compose(device, "Particles", PARTICLE_SHADER)?;

        let skybox_pipeline = create_pipeline(
            device,
            "Skybox",
            &skybox_shader,
            context.format(),
            None,
            &[&camera_layout, &cube_layout],
            &[],
        );
        let particle_pipeline = create_pipeline(
            device,
            "Particles",
            &particle_shader,
            context.format(),
            Some(wgpu::BlendState::ALPHA_BLENDING),
            &[&camera_layout, &flat_layout],
            &[wgpu::VertexBufferLayout {
                array_stride: size_of::<ParticleInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &INSTANCE_ATTRIBUTES,
            }],
        );

        let instances = TypedBuffer::with_capacity(
            device,
            "Particle Instances",
            1000,
            wgpu::BufferUsages::VERTEX,
        );

        Ok(Self {
            context,
            pixel_ratio,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            cube_layout,
            flat_layout,
            sampler,
            skybox_pipeline,
            particle_pipeline,
            instances,
            instance_scratch: Vec::new(),
            textures: FxHashMap::default(),
            next_texture: 0,
            disposed: false,
        })
    }

    /// Physical pixels per logical pixel.
    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn bind(
        &mut self,
        kind: TextureKind,
        texture: GpuTexture,
    ) -> TextureId {
        let layout = match kind {
            TextureKind::Cube => &self.cube_layout,
            TextureKind::Flat => &self.flat_layout,
        };
        let bind_group =
            self.context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Texture Bind Group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(
                                &texture.view,
                            ),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(
                                &self.sampler,
                            ),
                        },
                    ],
                });
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        let _ = self.textures.insert(
            id,
            BoundTexture {
                kind,
                _texture: texture,
                bind_group,
            },
        );
        id
    }

    fn check_dimension(&self, width: u32, height: u32) -> Result<(), String> {
        let max = self.context.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(format!(
                "{width}x{height} outside supported texture size 1..={max}"
            ));
        }
        Ok(())
    }

    /// Fill the instance buffer; returns the instance count and sprite, or
    /// `None` when there is nothing to draw.
    fn upload_particles(&mut self, scene: &Scene) -> Option<(u32, TextureId)> {
        let (system, sprite) = scene.renderable_particles()?;
        self.instance_scratch.clear();
        self.instance_scratch
            .extend(system.particles().iter().map(ParticleInstance::from));
        if self.instance_scratch.is_empty() {
            return None;
        }
        let _ = self.instances.write(
            &self.context.device,
            &self.context.queue,
            &self.instance_scratch,
        );
        Some((self.instances.count() as u32, sprite))
    }

    fn bound(&self, id: TextureId, kind: TextureKind) -> Option<&BoundTexture> {
        self.textures.get(&id).filter(|t| t.kind == kind)
    }
}

impl RenderBackend for WgpuRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        if self.disposed {
            return;
        }
        let (w, h) = physical_size((width, height), self.pixel_ratio);
        self.context.resize(w, h);
    }

    fn create_cube_texture(
        &mut self,
        faces: &CubeImages,
    ) -> Result<TextureId, SkyscapeError> {
        if self.disposed {
            return Err(SkyscapeError::Disposed);
        }
        self.check_dimension(faces.size(), faces.size())
            .map_err(SkyscapeError::InvalidCubemap)?;
        let texture = GpuTexture::cube(
            &self.context.device,
            &self.context.queue,
            faces,
        );
        let id = self.bind(TextureKind::Cube, texture);
        log::debug!("cube texture {} uploaded ({}px)", id.0, faces.size());
        Ok(id)
    }

    fn create_texture_2d(
        &mut self,
        image: &DecodedImage,
    ) -> Result<TextureId, SkyscapeError> {
        if self.disposed {
            return Err(SkyscapeError::Disposed);
        }
        self.check_dimension(image.width, image.height)
            .map_err(SkyscapeError::InvalidImage)?;
        let texture = GpuTexture::image_2d(
            &self.context.device,
            &self.context.queue,
            "Sprite Texture",
            image,
        );
        Ok(self.bind(TextureKind::Flat, texture))
    }

    fn release_texture(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_some() {
            log::debug!("texture {} released", texture.0);
        }
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
    ) -> Result<(), SkyscapeError> {
        if self.disposed {
            return Ok(());
        }
        let frame = match self.context.get_next_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Ok(());
            }
            Err(e) => return Err(SkyscapeError::Surface(e.to_string())),
        };

        self.camera_uniform.update(
            camera,
            self.context.size(),
            self.pixel_ratio as f32,
        );
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera_uniform),
        );
        let particles = self.upload_particles(scene);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Environment Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            let sky = scene
                .skybox
                .texture()
                .and_then(|id| self.bound(id, TextureKind::Cube));
            if let Some(sky) = sky {
                pass.set_pipeline(&self.skybox_pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_bind_group(1, &sky.bind_group, &[]);
                pass.draw(0..3, 0..1);
            }

            let sprites = particles.and_then(|(count, id)| {
                Some((count, self.bound(id, TextureKind::Flat)?))
            });
            if let Some((count, sprite)) = sprites {
                pass.set_pipeline(&self.particle_pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_bind_group(1, &sprite.bind_group, &[]);
                pass.set_vertex_buffer(0, self.instances.buffer().slice(..));
                pass.draw(0..VERTICES_PER_SPRITE, 0..count);
            }
        }
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }

    fn dispose_scene(&mut self, _scene: &Scene) {
        self.instance_scratch = Vec::new();
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.textures.clear();
        self.context.release_surface();
        self.disposed = true;
        log::debug!("wgpu renderer disposed");
    }
}

/// Logical size scaled by the pixel ratio, at least 1x1.
fn physical_size(logical: (u32, u32), pixel_ratio: f64) -> (u32, u32) {
    let scale = |v: u32| ((f64::from(v) * pixel_ratio).round() as u32).max(1);
    (scale(logical.0), scale(logical.1))
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn physical_size_applies_ratio() {
        assert_eq!(physical_size((800, 600), 2.0), (1600, 1200));
        assert_eq!(physical_size((101, 51), 1.5), (152, 77));
        assert_eq!(physical_size((0, 0), 2.0), (1, 1));
    }

    #[test]
    fn particle_instance_layout() {
        assert_eq!(size_of::<ParticleInstance>(), 20);
        let particle = Particle {
            position: Vec3::new(1.0, 2.0, 3.0),
            velocity: Vec3::ZERO,
            size: 40.0,
            age: 5.0,
            life: 10.0,
        };
        let instance = ParticleInstance::from(&particle);
        assert_eq!(instance.position, [1.0, 2.0, 3.0]);
        assert_eq!(instance.size, 40.0);
        assert_eq!(instance.opacity, 1.0);
    }
}
