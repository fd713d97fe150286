use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use crate::buffer::{BufferTarget, RecordKind, Usage, VertexRecord};

use super::{GraphicsContext, ShaderAttributes};

/// One call observed by a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateBuffer {
        id: u32,
        target: BufferTarget,
        usage: Usage,
        size: u64,
    },
    WriteBuffer {
        id: u32,
        offset: u64,
        len: u64,
    },
    BindVertexBuffer {
        id: u32,
    },
    UnbindVertexBuffer,
    BindIndexBuffer {
        id: u32,
        format: wgpu::IndexFormat,
    },
    UnbindIndexBuffer,
    Draw {
        primitive: wgpu::PrimitiveTopology,
        vertices: Range<u32>,
    },
    DrawIndexed {
        primitive: wgpu::PrimitiveTopology,
        indices: Range<u32>,
        format: wgpu::IndexFormat,
    },
    BindAttributes(RecordKind),
    UnbindAttributes(RecordKind),
}

/// Buffer handle of a [`RecordingContext`]: an id plus a byte image of its content.
///
/// Dropping it reports the id back to the context as released.
#[derive(Debug)]
pub struct RecordedBuffer {
    id: u32,
    bytes: RefCell<Vec<u8>>,
    released: Rc<RefCell<Vec<u32>>>,
}

impl RecordedBuffer {
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.bytes.borrow().len() as u64
    }

    /// Snapshot of the buffer bytes; zero where nothing was written yet.
    pub fn contents(&self) -> Vec<u8> {
        self.bytes.borrow().clone()
    }
}

impl Drop for RecordedBuffer {
    fn drop(&mut self) {
        self.released.borrow_mut().push(self.id);
    }
}

/// [`GraphicsContext`] that performs no GPU work and logs every call.
#[derive(Debug, Default)]
pub struct RecordingContext {
    calls: Vec<GpuCall>,
    next_id: u32,
    released: Rc<RefCell<Vec<u32>>>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn calls(&self) -> &[GpuCall] {
        &self.calls
    }

    /// Ids of buffers dropped so far, in drop order.
    pub fn released(&self) -> Vec<u32> {
        self.released.borrow().clone()
    }

    pub fn create_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, GpuCall::CreateBuffer { .. }))
            .count()
    }

    pub fn write_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, GpuCall::WriteBuffer { .. }))
            .count()
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &GpuCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, GpuCall::Draw { .. } | GpuCall::DrawIndexed { .. }))
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl GraphicsContext for RecordingContext {
    type Buffer = RecordedBuffer;

    fn create_buffer(&mut self, target: BufferTarget, usage: Usage, size: u64) -> RecordedBuffer {
        let id = self.next_id;
        self.next_id += 1;
        self.calls.push(GpuCall::CreateBuffer {
            id,
            target,
            usage,
            size,
        });

        RecordedBuffer {
            id,
            bytes: RefCell::new(vec![0; size as usize]),
            released: Rc::clone(&self.released),
        }
    }

    fn write_buffer(&mut self, buffer: &RecordedBuffer, offset: u64, data: &[u8]) {
        self.calls.push(GpuCall::WriteBuffer {
            id: buffer.id,
            offset,
            len: data.len() as u64,
        });

        let mut bytes = buffer.bytes.borrow_mut();
        let start = offset as usize;
        let end = start + data.len();
        if end > bytes.len() {
            log::error!(
                "write of {} bytes at {offset} overflows buffer #{} ({} bytes)",
                data.len(),
                buffer.id,
                bytes.len()
            );
            return;
        }
        bytes[start..end].copy_from_slice(data);
    }

    fn bind_vertex_buffer(&mut self, buffer: &RecordedBuffer) {
        self.calls.push(GpuCall::BindVertexBuffer { id: buffer.id });
    }

    fn unbind_vertex_buffer(&mut self) {
        self.calls.push(GpuCall::UnbindVertexBuffer);
    }

    fn bind_index_buffer(&mut self, buffer: &RecordedBuffer, format: wgpu::IndexFormat) {
        self.calls.push(GpuCall::BindIndexBuffer {
            id: buffer.id,
            format,
        });
    }

    fn unbind_index_buffer(&mut self) {
        self.calls.push(GpuCall::UnbindIndexBuffer);
    }

    fn draw(&mut self, primitive: wgpu::PrimitiveTopology, vertices: Range<u32>) {
        self.calls.push(GpuCall::Draw {
            primitive,
            vertices,
        });
    }

    fn draw_indexed(
        &mut self,
        primitive: wgpu::PrimitiveTopology,
        indices: Range<u32>,
        format: wgpu::IndexFormat,
    ) {
        self.calls.push(GpuCall::DrawIndexed {
            primitive,
            indices,
            format,
        });
    }
}

/// Shader stand-in that records attribute binds on a [`RecordingContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingShader;

impl ShaderAttributes<RecordingContext> for RecordingShader {
    fn bind_attributes<T: VertexRecord>(&self, ctx: &mut RecordingContext) {
        ctx.calls.push(GpuCall::BindAttributes(T::KIND));
    }

    fn unbind_attributes<T: VertexRecord>(&self, ctx: &mut RecordingContext) {
        ctx.calls.push(GpuCall::UnbindAttributes(T::KIND));
    }
}
