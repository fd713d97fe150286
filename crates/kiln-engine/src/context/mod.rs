//! The graphics-context seam buffers upload, bind and draw through.
//!
//! [`WgpuContext`] drives a real device (and optionally a render pass).
//! [`RecordingContext`] keeps an in-memory log of every call instead, which is
//! what headless tools and the test-suite use.

mod pass;
mod program;
mod recording;

use std::ops::Range;

use crate::buffer::{BufferTarget, Usage, VertexRecord};

pub use pass::WgpuContext;
pub use program::{FLAT_COLOR_WGSL, ShaderProgram, ShaderProgramDesc};
pub use recording::{GpuCall, RecordedBuffer, RecordingContext, RecordingShader};

/// GPU operations a [`Buffer`](crate::buffer::Buffer) needs.
///
/// Calls run synchronously on the thread owning the context. `Buffer` handles
/// are released by dropping them.
pub trait GraphicsContext {
    type Buffer;

    /// Allocates `size` bytes of undefined content for `target`.
    fn create_buffer(&mut self, target: BufferTarget, usage: Usage, size: u64) -> Self::Buffer;

    /// Copies `data` into `buffer` starting at byte `offset`.
    fn write_buffer(&mut self, buffer: &Self::Buffer, offset: u64, data: &[u8]);

    fn bind_vertex_buffer(&mut self, buffer: &Self::Buffer);

    fn unbind_vertex_buffer(&mut self);

    fn bind_index_buffer(&mut self, buffer: &Self::Buffer, format: wgpu::IndexFormat);

    fn unbind_index_buffer(&mut self);

    /// Non-indexed draw over the bound vertex buffer.
    fn draw(&mut self, primitive: wgpu::PrimitiveTopology, vertices: Range<u32>);

    /// Indexed draw over the bound index buffer.
    fn draw_indexed(
        &mut self,
        primitive: wgpu::PrimitiveTopology,
        indices: Range<u32>,
        format: wgpu::IndexFormat,
    );
}

/// Shader-side attribute binding for a vertex record layout.
pub trait ShaderAttributes<C: GraphicsContext> {
    fn bind_attributes<T: VertexRecord>(&self, ctx: &mut C);

    fn unbind_attributes<T: VertexRecord>(&self, ctx: &mut C);
}
