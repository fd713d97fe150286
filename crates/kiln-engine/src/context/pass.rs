use std::ops::Range;

use crate::buffer::{BufferTarget, Usage};

use super::GraphicsContext;

/// [`GraphicsContext`] over a wgpu device/queue and an optional render pass.
///
/// Without a pass, binds and draws are dropped and only uploads happen; this is
/// how geometry is staged ahead of the frame that draws it.
pub struct WgpuContext<'a, 'p> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pass: Option<&'a mut wgpu::RenderPass<'p>>,
    /// Topology of the currently set pipeline.
    topology: Option<wgpu::PrimitiveTopology>,
}

impl<'a, 'p> WgpuContext<'a, 'p> {
    #[inline]
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            pass: None,
            topology: None,
        }
    }

    #[inline]
    pub fn with_pass(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        pass: &'a mut wgpu::RenderPass<'p>,
    ) -> Self {
        Self {
            device,
            queue,
            pass: Some(pass),
            topology: None,
        }
    }

    #[inline]
    pub fn has_pass(&self) -> bool {
        self.pass.is_some()
    }

    pub(crate) fn set_pipeline(
        &mut self,
        pipeline: &wgpu::RenderPipeline,
        topology: wgpu::PrimitiveTopology,
    ) {
        self.topology = Some(topology);
        if let Some(pass) = self.pass.as_deref_mut() {
            pass.set_pipeline(pipeline);
        }
    }

    pub(crate) fn clear_pipeline(&mut self) {
        self.topology = None;
    }

    fn check_topology(&self, primitive: wgpu::PrimitiveTopology) {
        match self.topology {
            Some(topology) if topology != primitive => log::warn!(
                "draw as {primitive:?} with a pipeline built for {topology:?}; \
                 the pipeline topology wins"
            ),
            None if self.pass.is_some() => log::warn!("draw without a bound shader program"),
            _ => {}
        }
    }
}

/// wgpu copies and buffer sizes must be multiples of 4 bytes; slices must not be empty.
fn padded_size(size: u64) -> u64 {
    size.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
        .max(wgpu::COPY_BUFFER_ALIGNMENT)
}

impl GraphicsContext for WgpuContext<'_, '_> {
    type Buffer = wgpu::Buffer;

    fn create_buffer(&mut self, target: BufferTarget, usage: Usage, size: u64) -> wgpu::Buffer {
        let (label, usages) = match target {
            BufferTarget::Array => ("kiln vertex buffer", wgpu::BufferUsages::VERTEX),
            BufferTarget::ElementArray => ("kiln index buffer", wgpu::BufferUsages::INDEX),
        };

        log::trace!("create {label} ({usage:?}, {size} bytes)");

        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: padded_size(size),
            usage: usages | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn write_buffer(&mut self, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
        if data.is_empty() {
            return;
        }

        let len = data.len() as u64;
        if len % wgpu::COPY_BUFFER_ALIGNMENT == 0 {
            self.queue.write_buffer(buffer, offset, data);
        } else {
            // Odd u16 index counts end mid-word.
            let mut padded = data.to_vec();
            padded.resize(padded_size(len) as usize, 0);
            self.queue.write_buffer(buffer, offset, &padded);
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: &wgpu::Buffer) {
        if let Some(pass) = self.pass.as_deref_mut() {
            pass.set_vertex_buffer(0, buffer.slice(..));
        }
    }

    fn unbind_vertex_buffer(&mut self) {
        // Pass state is replaced by the next bind; nothing to reset.
    }

    fn bind_index_buffer(&mut self, buffer: &wgpu::Buffer, format: wgpu::IndexFormat) {
        if let Some(pass) = self.pass.as_deref_mut() {
            pass.set_index_buffer(buffer.slice(..), format);
        }
    }

    fn unbind_index_buffer(&mut self) {}

    fn draw(&mut self, primitive: wgpu::PrimitiveTopology, vertices: Range<u32>) {
        self.check_topology(primitive);
        if let Some(pass) = self.pass.as_deref_mut() {
            pass.draw(vertices, 0..1);
        }
    }

    fn draw_indexed(
        &mut self,
        primitive: wgpu::PrimitiveTopology,
        indices: Range<u32>,
        _format: wgpu::IndexFormat,
    ) {
        self.check_topology(primitive);
        if let Some(pass) = self.pass.as_deref_mut() {
            pass.draw_indexed(indices, 0, 0..1);
        }
    }
}
