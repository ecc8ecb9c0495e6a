use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

use super::common::{texture_bind_group, texture_bind_group_layout, triangle_list};
use super::texture::GpuTexture;

/// Vertex of a static textured mesh: NDC position plus texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    #[inline]
    pub const fn new(pos: [f32; 3], uv: [f32; 2]) -> Self {
        Self { pos, uv }
    }

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Draws a fixed triangle list with one texture.
///
/// Vertices are uploaded once; no blending, no depth test.
pub struct MeshRenderer {
    vertices: Vec<MeshVertex>,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    bind_group: Option<(u64, wgpu::BindGroup)>,
    vbo: Option<wgpu::Buffer>,
}

impl MeshRenderer {
    /// `vertices` is a triangle list; a trailing partial triangle is ignored.
    pub fn new(vertices: Vec<MeshVertex>) -> Self {
        if vertices.len() % 3 != 0 {
            log::warn!("mesh has {} vertices; trailing partial triangle dropped", vertices.len());
        }
        Self {
            vertices,
            pipeline_format: None,
            pipeline: None,
            texture_bgl: None,
            bind_group: None,
            vbo: None,
        }
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Number of vertices submitted per draw (whole triangles only).
    pub fn draw_count(&self) -> u32 {
        (self.vertices.len() - self.vertices.len() % 3) as u32
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, texture: &GpuTexture) {
        let count = self.draw_count();
        if count == 0 {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_vertex_buffer(ctx);
        self.ensure_bind_group(ctx, texture);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some((_, bind_group)) = self.bind_group.as_ref() else { return };

        let mut rpass = target.begin_load_pass("glint mesh pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..count, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        log::debug!("building mesh pipeline for {:?}", ctx.surface_format);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glint mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let texture_bgl = texture_bind_group_layout(ctx.device, "glint mesh texture bgl");

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("glint mesh pipeline layout"),
                bind_group_layouts: &[&texture_bgl],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glint mesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.texture_bgl = Some(texture_bgl);
        self.bind_group = None;
    }

    fn ensure_vertex_buffer(&mut self, ctx: &RenderCtx<'_>) {
        if self.vbo.is_some() {
            return;
        }

        self.vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glint mesh vbo"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    fn ensure_bind_group(&mut self, ctx: &RenderCtx<'_>, texture: &GpuTexture) {
        if matches!(&self.bind_group, Some((id, _)) if *id == texture.id()) {
            return;
        }
        let Some(bgl) = self.texture_bgl.as_ref() else { return };
        self.bind_group = Some((texture.id(), texture_bind_group(ctx.device, bgl, texture)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32) -> MeshVertex {
        MeshVertex::new([x, 0.0, 0.0], [0.0, 0.0])
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 20);
        assert_eq!(MeshVertex::layout().array_stride, 20);
        assert_eq!(MeshVertex::ATTRS[1].offset, 12);
    }

    #[test]
    fn draw_count_covers_whole_triangles() {
        assert_eq!(MeshRenderer::new(vec![v(0.0), v(1.0), v(2.0)]).draw_count(), 3);
        assert_eq!(MeshRenderer::new(vec![v(0.0); 5]).draw_count(), 3);
        assert_eq!(MeshRenderer::new(Vec::new()).draw_count(), 0);
    }

    #[test]
    fn vertices_are_uploaded_as_raw_floats() {
        let mesh = MeshRenderer::new(vec![MeshVertex::new([1.0, 2.0, 3.0], [4.0, 5.0])]);
        let floats: &[f32] = bytemuck::cast_slice(mesh.vertices());
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
