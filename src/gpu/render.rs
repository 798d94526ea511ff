use wgpu::{
    BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline as WgpuRenderPipeline,
    TextureFormat, TextureView,
};

use crate::gpu::buffers::{FrameBuffers, LineVertex, TraceInstance};

/// Pipelines for the tube schematic (line list) and the phosphor trace (instanced spots)
pub struct RenderPipeline {
    schematic: WgpuRenderPipeline,
    trace: WgpuRenderPipeline,
    bind_group_layout: BindGroupLayout,
}

impl RenderPipeline {
    /// Create both pipelines for the given surface format
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let schematic_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("schematic-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/schematic.wgsl").into()),
        });
        let trace_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trace-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/trace.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trace-bind-group-layout"),
            entries: &[
                // Screen parameters (uniform)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let schematic_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("schematic-pipeline-layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });
        let trace_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("trace-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let schematic = create_pipeline(
            device,
            "schematic-pipeline",
            &schematic_layout,
            &schematic_shader,
            LineVertex::layout(),
            wgpu::PrimitiveTopology::LineList,
            format,
        );
        let trace = create_pipeline(
            device,
            "trace-pipeline",
            &trace_layout,
            &trace_shader,
            TraceInstance::layout(),
            wgpu::PrimitiveTopology::TriangleList,
            format,
        );

        Self {
            schematic,
            trace,
            bind_group_layout,
        }
    }

    /// Create a bind group for the screen parameter buffer
    pub fn create_bind_group(&self, device: &Device, screen_params_buffer: &Buffer) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("trace-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_params_buffer.as_entire_binding(),
            }],
        })
    }

    /// Clear, then draw the schematic and the trace spots on top
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &TextureView,
        bind_group: &BindGroup,
        buffers: &FrameBuffers,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("render-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if buffers.schematic_count() > 0 {
            pass.set_pipeline(&self.schematic);
            pass.set_vertex_buffer(0, buffers.schematic_buffer.slice(..));
            pass.draw(0..buffers.schematic_count(), 0..1);
        }

        if buffers.trace_count() > 0 {
            pass.set_pipeline(&self.trace);
            pass.set_bind_group(0, bind_group, &[]);
            pass.set_vertex_buffer(0, buffers.trace_buffer.slice(..));
            pass.draw(0..6, 0..buffers.trace_count()); // one quad per spot
        }
    }
}

fn create_pipeline(
    device: &Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    format: TextureFormat,
) -> WgpuRenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
