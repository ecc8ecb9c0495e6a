use std::collections::{HashMap, HashSet};

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{Rect, Viewport};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    texture_bind_group, texture_bind_group_layout, triangle_list, viewport_ubo_min_binding_size,
    QuadVertex, ViewportUniform, QUAD_INDICES, QUAD_VERTICES,
};
use super::texture::GpuTexture;

/// One textured quad: the whole texture stretched over `rect` (logical px).
#[derive(Copy, Clone)]
pub struct Sprite<'t> {
    pub texture: &'t GpuTexture,
    pub rect: Rect,
}

impl<'t> Sprite<'t> {
    #[inline]
    pub fn new(texture: &'t GpuTexture, rect: Rect) -> Self {
        Self { texture, rect }
    }
}

/// Textured sprite renderer.
///
/// Sprites are drawn in slice order with straight-alpha blending, matching
/// the usual convention for decoded PNG sprites. Rects may extend past the
/// viewport; only sprites entirely outside it are skipped.
///
/// Instance data is uploaded once per call, so call `render` at most once per
/// frame and pass every sprite in that call. Texture bind groups are cached
/// only for the textures drawn by the latest call.
#[derive(Default)]
pub struct SpriteRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    viewport_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    texture_bind_groups: HashMap<u64, wgpu::BindGroup>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `sprites` into `target`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        sprites: &[Sprite<'_>],
    ) {
        let visible = collect_instances(
            sprites.iter().enumerate().map(|(i, s)| (i, s.rect)),
            ctx.viewport,
        );
        if visible.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        let used: HashSet<u64> = visible.iter().map(|(_, i)| sprites[*i].texture.id()).collect();
        evict_unused(&mut self.texture_bind_groups, &used);
        for (_, index) in &visible {
            self.ensure_texture_binding(ctx, sprites[*index].texture);
        }

        // Mutating methods must happen before borrowing pipeline/buffers immutably.
        self.write_viewport_uniform(ctx);
        self.ensure_instance_capacity(ctx, visible.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let raw: Vec<SpriteInstance> = visible.iter().map(|(inst, _)| *inst).collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&raw));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(viewport_bg) = self.viewport_bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.begin_load_pass("glint sprite pass");

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, viewport_bg, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (slot, (_, index)) in visible.iter().enumerate() {
            let id = sprites[*index].texture.id();
            let Some(texture_bg) = self.texture_bind_groups.get(&id) else { continue };
            let slot = slot as u32;
            rpass.set_bind_group(1, texture_bg, &[]);
            rpass.draw_indexed(0..6, 0, slot..slot + 1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        log::debug!("building sprite pipeline for {:?}", ctx.surface_format);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glint sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let viewport_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("glint sprite viewport bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(viewport_ubo_min_binding_size()),
                    },
                    count: None,
                }],
            });
        let texture_bgl = texture_bind_group_layout(ctx.device, "glint sprite texture bgl");

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("glint sprite pipeline layout"),
                bind_group_layouts: &[&viewport_bgl, &texture_bgl],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glint sprite pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), SpriteInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
        self.viewport_bgl = Some(viewport_bgl);
        self.texture_bgl = Some(texture_bgl);

        // Bindings were created against the old layouts.
        self.viewport_bind_group = None;
        self.viewport_ubo = None;
        self.texture_bind_groups.clear();
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.viewport_bgl.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glint sprite viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glint sprite viewport bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(bind_group);
    }

    fn ensure_texture_binding(&mut self, ctx: &RenderCtx<'_>, texture: &GpuTexture) {
        if self.texture_bind_groups.contains_key(&texture.id()) {
            return;
        }
        let Some(bgl) = self.texture_bgl.as_ref() else { return };
        let bind_group = texture_bind_group(ctx.device, bgl, texture);
        self.texture_bind_groups.insert(texture.id(), bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glint sprite quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glint sprite quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_viewport_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required_instances.next_power_of_two().max(16);
        let new_size = (new_cap * std::mem::size_of::<SpriteInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glint sprite instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

/// Builds instance data for the rects that touch the viewport, keeping each
/// instance paired with the caller's index.
fn collect_instances(
    rects: impl IntoIterator<Item = (usize, Rect)>,
    viewport: Viewport,
) -> Vec<(SpriteInstance, usize)> {
    let screen = viewport.rect();

    rects
        .into_iter()
        .filter_map(|(index, rect)| {
            let r = rect.normalized();
            if r.is_empty() || !r.is_finite() || r.intersect(screen).is_none() {
                return None;
            }
            let instance = SpriteInstance {
                origin: [r.origin.x, r.origin.y],
                size: [r.size.x, r.size.y],
            };
            Some((instance, index))
        })
        .collect()
}

/// Drops cache entries for texture ids not in `used`.
fn evict_unused<V>(cache: &mut HashMap<u64, V>, used: &HashSet<u64>) {
    cache.retain(|id, _| used.contains(id));
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct SpriteInstance {
    origin: [f32; 2],
    size: [f32; 2],
}

impl SpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2  // size
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn onscreen_sprite_keeps_its_rect() {
        let out = collect_instances([(0, Rect::new(400.0, 300.0, 72.0, 72.0))], WINDOW);
        assert_eq!(
            out,
            vec![(SpriteInstance { origin: [400.0, 300.0], size: [72.0, 72.0] }, 0)]
        );
    }

    #[test]
    fn partially_offscreen_sprite_is_not_clipped() {
        let out = collect_instances([(3, Rect::new(735.0, 540.0, 72.0, 72.0))], WINDOW);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0.origin, [735.0, 540.0]);
        assert_eq!(out[0].0.size, [72.0, 72.0]);
        assert_eq!(out[0].1, 3);
    }

    #[test]
    fn offscreen_and_degenerate_sprites_are_skipped() {
        let out = collect_instances(
            [
                (0, Rect::new(900.0, 100.0, 72.0, 72.0)),
                (1, Rect::new(10.0, 10.0, 0.0, 72.0)),
                (2, Rect::new(f32::NAN, 10.0, 72.0, 72.0)),
                (3, Rect::new(10.0, 10.0, 72.0, 72.0)),
            ],
            WINDOW,
        );
        let indices: Vec<usize> = out.iter().map(|(_, i)| *i).collect();
        assert_eq!(indices, vec![3]);
    }

    #[test]
    fn bind_group_cache_keeps_only_textures_in_use() {
        let mut cache: HashMap<u64, &str> = HashMap::from([(1, "ball"), (2, "old ball"), (3, "bg")]);

        evict_unused(&mut cache, &HashSet::from([1, 3]));
        let mut ids: Vec<u64> = cache.keys().copied().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3]);

        evict_unused(&mut cache, &HashSet::from([4]));
        assert!(cache.is_empty());
    }

    #[test]
    fn instance_layout_matches_struct() {
        assert_eq!(SpriteInstance::layout().array_stride, 16);
    }
}
