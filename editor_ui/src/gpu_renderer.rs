//! GPU-based text and shape renderer using wgpu.
//!
//! Everything is drawn as textured or solid quads in pixel coordinates.
//! Two glyph atlases are kept: a fixed one for the command bar and one for
//! the editing surface that is rebuilt whenever the font is zoomed.

use crate::font::{self, GlyphAtlas};
use fontdue::Font;
use notepad_core::Color;
use wgpu::util::DeviceExt;

/// A vertex for rendering quads (text glyphs or rectangles).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in pixels.
    pub position: [f32; 2],
    /// Texture coordinates (0-1 range, for glyph atlas).
    pub tex_coords: [f32; 2],
    /// RGBA color.
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2,  // position
        1 => Float32x2,  // tex_coords
        2 => Float32x4,  // color
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Six vertices of an axis-aligned quad.
fn quad(x0: f32, y0: f32, x1: f32, y1: f32, uv: [f32; 4], color: Color) -> [Vertex; 6] {
    let [u0, v0, u1, v1] = uv;
    [
        Vertex { position: [x0, y0], tex_coords: [u0, v0], color },
        Vertex { position: [x1, y0], tex_coords: [u1, v0], color },
        Vertex { position: [x1, y1], tex_coords: [u1, v1], color },
        Vertex { position: [x0, y0], tex_coords: [u0, v0], color },
        Vertex { position: [x1, y1], tex_coords: [u1, v1], color },
        Vertex { position: [x0, y1], tex_coords: [u0, v1], color },
    ]
}

/// Uniform buffer for projection matrix.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    projection: [[f32; 4]; 4],
}

impl Uniforms {
    fn new(width: f32, height: f32) -> Self {
        // Orthographic projection: (0,0) top-left, (width, height) bottom-right
        let projection = [
            [2.0 / width, 0.0, 0.0, 0.0],
            [0.0, -2.0 / height, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0, 1.0],
        ];
        Self { projection }
    }
}

/// Which glyph atlas a piece of text is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    /// Command bar labels. Not affected by zoom.
    Ui,
    /// The document text.
    Text,
}

/// An atlas, its GPU texture and the glyph quads queued against it.
struct FontLayer {
    atlas: GlyphAtlas,
    bind_group: wgpu::BindGroup,
    vertices: Vec<Vertex>,
    vertex_buffer: wgpu::Buffer,
}

impl FontLayer {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        atlas: GlyphAtlas,
        label: &str,
        max_vertices: usize,
    ) -> Self {
        let bind_group = upload_atlas(device, queue, layout, sampler, &atlas, label);
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (max_vertices * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            atlas,
            bind_group,
            vertices: Vec::with_capacity(max_vertices),
            vertex_buffer,
        }
    }
}

/// Creates the atlas texture, uploads the glyph bitmap and binds it.
fn upload_atlas(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    atlas: &GlyphAtlas,
    label: &str,
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d {
        width: atlas.width,
        height: atlas.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R8Unorm,
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
        &atlas.texture_data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(atlas.width),
            rows_per_image: Some(atlas.height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

/// GPU-based text and shape renderer.
pub struct GpuRenderer {
    font: Font,

    text_pipeline: wgpu::RenderPipeline,
    rect_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    atlas_bind_group_layout: wgpu::BindGroupLayout,
    atlas_sampler: wgpu::Sampler,

    ui_layer: FontLayer,
    text_layer: FontLayer,

    /// Vertices for solid rectangles (background, caret, selection).
    rect_vertices: Vec<Vertex>,
    /// Rectangles drawn over the text layer but under UI glyphs.
    overlay_vertices: Vec<Vertex>,
    rect_vertex_buffer: wgpu::Buffer,
    /// Maximum number of vertices in each buffer.
    max_vertices: usize,
}

impl GpuRenderer {
    /// Creates a new GPU renderer. Pixel sizes are already scaled for the
    /// window's DPI.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        font: Font,
        ui_px: f32,
        text_px: f32,
    ) -> Self {
        let atlas_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniforms = Uniforms::new(width.max(1) as f32, height.max(1) as f32);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let atlas_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Atlas Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let text_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Text Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });
        let rect_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rect Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rect.wgsl").into()),
        });

        let text_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Text Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &atlas_bind_group_layout],
            push_constant_ranges: &[],
        });
        let rect_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Rect Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let text_pipeline = create_pipeline(
            device,
            "Text Render Pipeline",
            &text_pipeline_layout,
            &text_shader,
            surface_format,
        );
        let rect_pipeline = create_pipeline(
            device,
            "Rect Render Pipeline",
            &rect_pipeline_layout,
            &rect_shader,
            surface_format,
        );

        let max_vertices = 65536;
        let max_dimension = device.limits().max_texture_dimension_2d;
        let ui_px = font::clamp_pixel_size(ui_px, max_dimension);
        let text_px = font::clamp_pixel_size(text_px, max_dimension);
        let ui_layer = FontLayer::new(
            device,
            queue,
            &atlas_bind_group_layout,
            &atlas_sampler,
            GlyphAtlas::new(&font, ui_px),
            "UI Glyphs",
            max_vertices,
        );
        let text_layer = FontLayer::new(
            device,
            queue,
            &atlas_bind_group_layout,
            &atlas_sampler,
            GlyphAtlas::new(&font, text_px),
            "Text Glyphs",
            max_vertices,
        );

        let rect_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Rect Vertex Buffer"),
            size: (max_vertices * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            font,
            text_pipeline,
            rect_pipeline,
            uniform_buffer,
            uniform_bind_group,
            atlas_bind_group_layout,
            atlas_sampler,
            ui_layer,
            text_layer,
            rect_vertices: Vec::with_capacity(max_vertices),
            overlay_vertices: Vec::new(),
            rect_vertex_buffer,
            max_vertices,
        }
    }

    /// Returns the glyph atlas used for the given role.
    pub fn atlas(&self, role: FontRole) -> &GlyphAtlas {
        &self.layer(role).atlas
    }

    fn layer(&self, role: FontRole) -> &FontLayer {
        match role {
            FontRole::Ui => &self.ui_layer,
            FontRole::Text => &self.text_layer,
        }
    }

    fn layer_mut(&mut self, role: FontRole) -> &mut FontLayer {
        match role {
            FontRole::Ui => &mut self.ui_layer,
            FontRole::Text => &mut self.text_layer,
        }
    }

    /// Re-rasterises the atlas for `role` if the pixel size changed.
    pub fn set_font_px(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        role: FontRole,
        px: f32,
    ) {
        let px = font::clamp_pixel_size(px, device.limits().max_texture_dimension_2d);
        if (self.layer(role).atlas.pixel_size() - px).abs() < f32::EPSILON {
            return;
        }
        let atlas = GlyphAtlas::new(&self.font, px);
        let bind_group = upload_atlas(
            device,
            queue,
            &self.atlas_bind_group_layout,
            &self.atlas_sampler,
            &atlas,
            "Glyph Atlas",
        );
        log::debug!("Rebuilt {role:?} atlas at {px:.1}px");
        let layer = self.layer_mut(role);
        layer.atlas = atlas;
        layer.bind_group = bind_group;
    }

    /// Resizes the renderer.
    pub fn resize(&mut self, queue: &wgpu::Queue, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let uniforms = Uniforms::new(width as f32, height as f32);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Clears all queued vertices.
    pub fn clear(&mut self) {
        self.rect_vertices.clear();
        self.overlay_vertices.clear();
        self.ui_layer.vertices.clear();
        self.text_layer.vertices.clear();
    }

    /// Draws a filled rectangle.
    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let queued = self.rect_vertices.len() + self.overlay_vertices.len();
        if width <= 0.0 || height <= 0.0 || queued + 6 > self.max_vertices {
            return;
        }
        self.rect_vertices
            .extend_from_slice(&quad(x, y, x + width, y + height, [0.0, 0.0, 1.0, 1.0], color));
    }

    /// Draws a filled rectangle that covers editor text. UI glyphs still
    /// land on top of it.
    pub fn draw_overlay_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let queued = self.rect_vertices.len() + self.overlay_vertices.len();
        if width <= 0.0 || height <= 0.0 || queued + 6 > self.max_vertices {
            return;
        }
        self.overlay_vertices
            .extend_from_slice(&quad(x, y, x + width, y + height, [0.0, 0.0, 1.0, 1.0], color));
    }

    /// Draws a single character with its cell's top-left corner at (x, y).
    pub fn draw_char(&mut self, role: FontRole, ch: char, x: f32, y: f32, color: Color) {
        let max_vertices = self.max_vertices;
        let layer = self.layer_mut(role);
        let atlas = &layer.atlas;
        let Some(glyph) = atlas.get_glyph(ch) else {
            return;
        };
        if glyph.width == 0 || glyph.height == 0 || layer.vertices.len() + 6 > max_vertices {
            return;
        }

        let gx = x + glyph.offset_x;
        let baseline_y = y + atlas.ascent;
        let gy = baseline_y - glyph.offset_y - glyph.height as f32;

        let atlas_width = atlas.width as f32;
        let atlas_height = atlas.height as f32;
        let uv = [
            glyph.atlas_x as f32 / atlas_width,
            glyph.atlas_y as f32 / atlas_height,
            (glyph.atlas_x + glyph.width) as f32 / atlas_width,
            (glyph.atlas_y + glyph.height) as f32 / atlas_height,
        ];
        let vertices = quad(
            gx,
            gy,
            gx + glyph.width as f32,
            gy + glyph.height as f32,
            uv,
            color,
        );
        layer.vertices.extend_from_slice(&vertices);
    }

    /// Draws a string at the given position. Returns the x after the last
    /// character.
    pub fn draw_text(&mut self, role: FontRole, text: &str, mut x: f32, y: f32, color: Color) -> f32 {
        let advance = self.layer(role).atlas.char_width;
        for ch in text.chars() {
            self.draw_char(role, ch, x, y, color);
            x += advance;
        }
        x
    }

    /// Renders all queued geometry over a cleared background.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        clear: Color,
    ) {
        // Overlay rects share the rect buffer, right after the base rects.
        let base = self.rect_vertices.len() as u32;
        let overlay_end = base + self.overlay_vertices.len() as u32;
        if !self.rect_vertices.is_empty() {
            queue.write_buffer(
                &self.rect_vertex_buffer,
                0,
                bytemuck::cast_slice(&self.rect_vertices),
            );
        }
        if !self.overlay_vertices.is_empty() {
            queue.write_buffer(
                &self.rect_vertex_buffer,
                (base as usize * std::mem::size_of::<Vertex>()) as u64,
                bytemuck::cast_slice(&self.overlay_vertices),
            );
        }
        for layer in [&self.ui_layer, &self.text_layer] {
            if !layer.vertices.is_empty() {
                queue.write_buffer(&layer.vertex_buffer, 0, bytemuck::cast_slice(&layer.vertices));
            }
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear[0] as f64,
                            g: clear[1] as f64,
                            b: clear[2] as f64,
                            a: clear[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Rectangles first (backgrounds, selection, caret)
            self.draw_rects(&mut render_pass, 0..base);
            // Editor text, then overlays, then UI glyphs on top
            self.draw_glyphs(&mut render_pass, &self.text_layer);
            self.draw_rects(&mut render_pass, base..overlay_end);
            self.draw_glyphs(&mut render_pass, &self.ui_layer);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn draw_rects(&self, render_pass: &mut wgpu::RenderPass<'_>, vertices: std::ops::Range<u32>) {
        if vertices.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.rect_pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.rect_vertex_buffer.slice(..));
        render_pass.draw(vertices, 0..1);
    }

    fn draw_glyphs(&self, render_pass: &mut wgpu::RenderPass<'_>, layer: &FontLayer) {
        if layer.vertices.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.text_pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &layer.bind_group, &[]);
        render_pass.set_vertex_buffer(0, layer.vertex_buffer.slice(..));
        render_pass.draw(0..layer.vertices.len() as u32, 0..1);
    }
}
