use crate::record::{TurtleColor, TurtleModel};

// Location 0 is the shape geometry vertex; instance attributes follow it.

impl TurtleModel {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x4, // position, scale
        2 => Float32x4, // degrees, speed, sin, cos
        3 => Float32x4, // unused
        4 => Float32x4  // unused
    ];

    /// Per-instance layout of a model buffer: one 4x4 float slot per turtle.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TurtleModel>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

impl TurtleColor {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        5 => Float32x3, // fill rgb
        6 => Float32x3, // fill a, pen rg
        7 => Float32x3  // pen ba, pen width
    ];

    /// Per-instance layout of a color buffer: one 3x3 float slot per turtle.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TurtleColor>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
