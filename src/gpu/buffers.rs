use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::{
    MAX_TRACE_POINTS, SCHEMATIC_MAX_VERTICES, SCREEN_PANEL, SCREEN_ZOOM, TRACE_SPOT_RADIUS,
    WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::schematic;
use crate::simulation::Frame;

/// One schematic line endpoint (24 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// Clip space
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One glowing spot on the front screen (24 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TraceInstance {
    /// Normalized screen position, [-1, 1]
    pub position: [f32; 2],
    /// RGB from the beam colour, alpha from the fade opacity
    pub color: [f32; 4],
}

impl TraceInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TraceInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Front screen placement passed to the trace shader (32 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenParams {
    /// Panel centre in clip space
    pub panel_center: [f32; 2],
    /// Clip-space extent reached by a normalized 1.0 (zoom applied)
    pub panel_half: [f32; 2],
    /// Spot radius in clip space
    pub spot_radius: [f32; 2],
    pub _padding: [f32; 2],
}

impl ScreenParams {
    /// Derive the panel placement from the window layout
    pub fn from_layout() -> Self {
        let (px, py, pw, ph) = SCREEN_PANEL;
        let panel_center = schematic::pixel_to_clip(px + pw / 2.0, py + ph / 2.0);
        let panel_half = [
            (pw / 2.0 * SCREEN_ZOOM / WINDOW_WIDTH * 2.0) as f32,
            (ph / 2.0 * SCREEN_ZOOM / WINDOW_HEIGHT * 2.0) as f32,
        ];
        let spot_radius = [
            (TRACE_SPOT_RADIUS / WINDOW_WIDTH * 2.0) as f32,
            (TRACE_SPOT_RADIUS / WINDOW_HEIGHT * 2.0) as f32,
        ];
        Self {
            panel_center,
            panel_half,
            spot_radius,
            _padding: [0.0, 0.0],
        }
    }
}

/// Pack the frame's visible trace points for upload, oldest first
pub fn trace_instances(frame: &Frame) -> Vec<TraceInstance> {
    frame
        .visible_points()
        .take(MAX_TRACE_POINTS)
        .map(|(point, opacity)| TraceInstance {
            position: [point.x as f32, point.y as f32],
            color: [
                point.color[0] as f32 / 255.0,
                point.color[1] as f32 / 255.0,
                point.color[2] as f32 / 255.0,
                opacity as f32 / 255.0,
            ],
        })
        .collect()
}

/// Per-frame vertex data and the screen uniform
pub struct FrameBuffers {
    /// Instance buffer sized for a full trace
    pub trace_buffer: Buffer,
    /// Schematic line-list vertices
    pub schematic_buffer: Buffer,
    pub screen_params_buffer: Buffer,
    trace_count: u32,
    schematic_count: u32,
}

impl FrameBuffers {
    /// Allocate buffers and upload the fixed screen parameters
    pub fn new(device: &Device, queue: &Queue) -> Self {
        let trace_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trace-instance-buffer"),
            size: (MAX_TRACE_POINTS * std::mem::size_of::<TraceInstance>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let schematic_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("schematic-vertex-buffer"),
            size: (SCHEMATIC_MAX_VERTICES * std::mem::size_of::<LineVertex>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let screen_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("screen-params-buffer"),
            size: std::mem::size_of::<ScreenParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params = ScreenParams::from_layout();
        queue.write_buffer(&screen_params_buffer, 0, bytemuck::bytes_of(&params));

        Self {
            trace_buffer,
            schematic_buffer,
            screen_params_buffer,
            trace_count: 0,
            schematic_count: 0,
        }
    }

    /// Upload the frame's trace spots and schematic geometry
    pub fn upload(&mut self, queue: &Queue, frame: &Frame) {
        let instances = trace_instances(frame);
        if !instances.is_empty() {
            queue.write_buffer(&self.trace_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.trace_count = instances.len() as u32;

        let vertices = schematic::build(frame);
        if !vertices.is_empty() {
            queue.write_buffer(&self.schematic_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        self.schematic_count = vertices.len() as u32;
    }

    pub fn trace_count(&self) -> u32 {
        self.trace_count
    }

    pub fn schematic_count(&self) -> u32 {
        self.schematic_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Command, Simulator};

    const NO_COMMANDS: [Command; 0] = [];

    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(std::mem::size_of::<LineVertex>(), 24);
        assert_eq!(std::mem::size_of::<TraceInstance>(), 24);
        assert_eq!(std::mem::size_of::<ScreenParams>(), 32);
    }

    #[test]
    fn test_screen_params_inside_clip_space() {
        let params = ScreenParams::from_layout();
        for axis in 0..2 {
            let lo = params.panel_center[axis] - params.panel_half[axis];
            let hi = params.panel_center[axis] + params.panel_half[axis];
            assert!(lo >= -1.0 && hi <= 1.0, "panel leaves the window on axis {}", axis);
            assert!(params.spot_radius[axis] > 0.0);
        }
    }

    #[test]
    fn test_trace_instances_carry_color_and_opacity() {
        let mut sim = Simulator::new();
        sim.tick(0.0, [Command::IncrementAccel; 10]);
        let frame = sim.tick(1.0, NO_COMMANDS);

        let instances = trace_instances(&frame);
        assert_eq!(instances.len(), 2);

        // 2000 V → brightness 100; first spot is 1 s into a 2 s fade
        let older = instances[0];
        assert_eq!(older.color[1], 100.0 / 255.0);
        assert_eq!(older.color[3], 128.0 / 255.0);
        assert_eq!(instances[1].color[3], 1.0);
        assert_eq!(older.position, [0.0, 0.0]);
    }
}
