//! Glyph passes: instanced quads for targets and arrows.
//!
//! Each live entity becomes one instance; the vertex shader expands it to a
//! quad sized for the glyph's full extent (glow disc, trail) and the fragment
//! shader evaluates ring, stroke, and triangle coverage in quad-local pixel
//! coordinates, composited with straight-alpha blending.

use crate::scene::{ArrowInstance, TargetInstance};

/// WGSL for the target glyph: a soft radial glow disc of radius `3r` under
/// three 1 px concentric rings at `r/2`, `r`, `3r/2`.
pub const TARGET_SHADER: &str = r#"
struct View {
    resolution: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> view: View;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) radius: f32,
    @location(2) glow: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec2<f32>,
    @location(1) radius: f32,
    @location(2) glow: f32,
) -> VertexOutput {
    var quad = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let corner = quad[vertex_index];
    let extent = radius * 3.0 + 1.0;
    let local = corner * extent;
    let world = position + local;
    let ndc = vec2<f32>(
        world.x / view.resolution.x * 2.0 - 1.0,
        1.0 - world.y / view.resolution.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.local = local;
    out.radius = radius;
    out.glow = glow;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = length(in.local);

    // glow disc fades linearly to 3r, drawn at half layer opacity
    let glow_a = 0.25 * clamp(1.0 - d / (in.radius * 3.0), 0.0, 1.0) * 0.5;

    // three 1 px rings
    var ring = 0.0;
    for (var i = 1; i <= 3; i = i + 1) {
        let rr = in.radius * 0.5 * f32(i);
        ring = max(ring, 1.0 - smoothstep(0.3, 0.8, abs(d - rr)));
    }
    let ring_a = ring * 0.8 * (0.5 + in.glow * 0.3);

    let blue = vec3<f32>(0.231, 0.51, 0.965);
    let a = ring_a + glow_a * (1.0 - ring_a);
    if a < 0.003 {
        discard;
    }
    let rgb = (vec3<f32>(1.0) * ring_a + blue * glow_a * (1.0 - ring_a)) / a;
    return vec4<f32>(rgb, a);
}
"#;

/// WGSL for the arrow glyph, oriented along its unit heading: blue trailing
/// gradient stroke, white shaft, head triangle at the tip, small fletching
/// triangle at the tail.
pub const ARROW_SHADER: &str = r#"
struct View {
    resolution: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> view: View;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) len: f32,
    @location(2) width: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec2<f32>,
    @location(1) direction: vec2<f32>,
    @location(2) len: f32,
    @location(3) width: f32,
) -> VertexOutput {
    var quad = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    // quad-local x spans the trail tail (-1.5 len) to the head tip (len),
    // plus an anti-aliasing margin
    let corner = quad[vertex_index];
    let half_x = len * 1.25 + 2.0;
    let center_x = -0.25 * len;
    let local = vec2<f32>(center_x + corner.x * half_x, corner.y * 4.0);

    let perp = vec2<f32>(-direction.y, direction.x);
    let world = position + direction * local.x + perp * local.y;
    let ndc = vec2<f32>(
        world.x / view.resolution.x * 2.0 - 1.0,
        1.0 - world.y / view.resolution.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.local = local;
    out.len = len;
    out.width = width;
    return out;
}

// coverage of a horizontal stroke from x0 to x1 along y = 0
fn stroke_h(p: vec2<f32>, x0: f32, x1: f32, half_width: f32) -> f32 {
    let cx = clamp(p.x, x0, x1);
    let d = distance(p, vec2<f32>(cx, 0.0));
    return 1.0 - smoothstep(half_width - 0.5, half_width + 0.5, d);
}

fn edge_dist(p: vec2<f32>, a: vec2<f32>, b: vec2<f32>) -> f32 {
    let e = b - a;
    let n = normalize(vec2<f32>(-e.y, e.x));
    return dot(p - a, n);
}

// coverage of a counter-clockwise triangle via half-plane tests
fn tri(p: vec2<f32>, a: vec2<f32>, b: vec2<f32>, c: vec2<f32>) -> f32 {
    let d = min(edge_dist(p, a, b), min(edge_dist(p, b, c), edge_dist(p, c, a)));
    return smoothstep(-0.5, 0.5, d);
}

// source-over compositing with straight alpha
fn over(dst: vec4<f32>, rgb: vec3<f32>, a: f32) -> vec4<f32> {
    let out_a = a + dst.a * (1.0 - a);
    let out_rgb = (rgb * a + dst.rgb * dst.a * (1.0 - a)) / max(out_a, 0.0001);
    return vec4<f32>(out_rgb, out_a);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let p = in.local;
    let len = in.len;
    let blue = vec3<f32>(0.231, 0.51, 0.965);

    // trail: stroke from -1.5 len to 0.2 len whose alpha ramps across the
    // full -1.5 len .. len gradient span
    let trail_t = clamp((p.x + len * 1.5) / (len * 2.5), 0.0, 1.0);
    let trail_w = max(in.width - 0.5, 0.8) * 0.5;
    let trail_a = stroke_h(p, -len * 1.5, len * 0.2, trail_w) * trail_t * 0.35;
    var acc = vec4<f32>(blue, trail_a);

    // shaft
    let shaft_a = stroke_h(p, 0.0, len, in.width * 0.5) * 0.8;
    acc = over(acc, vec3<f32>(1.0), shaft_a);

    // head at the leading tip, fletching at the tail
    let head = tri(
        p,
        vec2<f32>(len, 0.0),
        vec2<f32>(len - 4.0, 2.2),
        vec2<f32>(len - 4.0, -2.2),
    );
    let fletch = tri(
        p,
        vec2<f32>(0.0, 0.0),
        vec2<f32>(-3.5, 1.8),
        vec2<f32>(-3.5, -1.8),
    );
    acc = over(acc, vec3<f32>(1.0), max(head, fletch) * 0.9);

    if acc.a < 0.003 {
        discard;
    }
    return acc;
}
"#;

const TARGET_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x2,
    },
    wgpu::VertexAttribute {
        offset: 8,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32,
    },
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32,
    },
];

const ARROW_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x2,
    },
    wgpu::VertexAttribute {
        offset: 8,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x2,
    },
    wgpu::VertexAttribute {
        offset: 16,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32,
    },
    wgpu::VertexAttribute {
        offset: 20,
        shader_location: 3,
        format: wgpu::VertexFormat::Float32,
    },
];

/// One instanced-quad pipeline plus its fixed-capacity instance buffer.
pub struct GlyphPass {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl GlyphPass {
    /// Pass for target glyphs, sized for the target cap.
    pub fn targets(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        view_layout: &wgpu::BindGroupLayout,
        capacity: usize,
    ) -> Self {
        Self::new(
            device,
            format,
            view_layout,
            capacity,
            TARGET_SHADER,
            std::mem::size_of::<TargetInstance>(),
            &TARGET_ATTRIBUTES,
            "Target",
        )
    }

    /// Pass for arrow glyphs, sized for the arrow cap.
    pub fn arrows(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        view_layout: &wgpu::BindGroupLayout,
        capacity: usize,
    ) -> Self {
        Self::new(
            device,
            format,
            view_layout,
            capacity,
            ARROW_SHADER,
            std::mem::size_of::<ArrowInstance>(),
            &ARROW_ATTRIBUTES,
            "Arrow",
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        view_layout: &wgpu::BindGroupLayout,
        capacity: usize,
        shader_src: &str,
        stride: usize,
        attributes: &[wgpu::VertexAttribute],
        label: &str,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} Shader", label)),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", label)),
            bind_group_layouts: &[view_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} Pipeline", label)),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: stride as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Instance Buffer", label)),
            size: (capacity * stride) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            instance_buffer,
            capacity,
            count: 0,
        }
    }

    /// Write this frame's instances. Anything past the pass capacity is
    /// dropped; the field caps keep populations within it.
    pub fn upload<T: bytemuck::Pod>(&mut self, queue: &wgpu::Queue, instances: &[T]) {
        let n = instances.len().min(self.capacity);
        self.count = n as u32;
        if n > 0 {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances[..n]),
            );
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}
