//! Background pass: diagonal gradient plus vignette.
//!
//! A single fullscreen triangle; both gradients are evaluated in the
//! fragment shader from logical surface coordinates, so resizing only needs
//! a uniform update.

/// WGSL for the fullscreen background pass.
///
/// Two layers in one pass: a two-stop dark gradient projected along the
/// (0,0) to (w,h) diagonal, then a radial vignette that is transparent out
/// to 20% of min(w,h) and reaches 0.6 black at 80% of max(w,h).
pub const BACKGROUND_SHADER: &str = r#"
struct View {
    resolution: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> view: View;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    out.uv = uvs[vertex_index];
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let p = in.uv * view.resolution;

    // diagonal two-stop gradient, #0b0f17 to #0a0c12
    let diag = view.resolution;
    let t = clamp(dot(p, diag) / dot(diag, diag), 0.0, 1.0);
    let start = vec3<f32>(0.043, 0.059, 0.090);
    let end = vec3<f32>(0.039, 0.047, 0.071);
    var color = mix(start, end, t);

    // vignette: transparent center, 0.6 black at the outer stop
    let center = view.resolution * 0.5;
    let inner = min(view.resolution.x, view.resolution.y) * 0.2;
    let outer = max(view.resolution.x, view.resolution.y) * 0.8;
    let d = distance(p, center);
    let v = clamp((d - inner) / (outer - inner), 0.0, 1.0);
    color = mix(color, vec3<f32>(0.0), v * 0.6);

    return vec4<f32>(color, 1.0);
}
"#;

/// Pipeline for the background pass. No vertex buffers, no blending; it
/// repaints the whole surface at the start of every frame.
pub struct BackgroundPass {
    pipeline: wgpu::RenderPipeline,
}

impl BackgroundPass {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        view_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(BACKGROUND_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Background Pipeline Layout"),
            bind_group_layouts: &[view_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
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

        Self { pipeline }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.draw(0..3, 0..1);
    }
}
