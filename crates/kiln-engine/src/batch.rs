//! A vertex buffer and an index buffer drawn as one unit.

use crate::buffer::{Buffer, IndexRecord, Usage, VertexRecord};
use crate::context::{GraphicsContext, ShaderAttributes};

/// Pairs a vertex [`Buffer`] with an index [`Buffer`].
///
/// Geometry writers append to both without resetting them, so one batch can
/// collect many shapes before a single draw. Cloning aliases both buffers.
pub struct IndexedVertexBatch<V: VertexRecord, I: IndexRecord = u32, H = wgpu::Buffer> {
    pub vertices: Buffer<V, H>,
    pub indices: Buffer<I, H>,
}

impl<V: VertexRecord, I: IndexRecord, H> IndexedVertexBatch<V, I, H> {
    pub fn new(usage: Usage) -> Self {
        Self {
            vertices: Buffer::new(usage),
            indices: Buffer::new(usage),
        }
    }

    pub fn from_buffers(vertices: Buffer<V, H>, indices: Buffer<I, H>) -> Self {
        Self { vertices, indices }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a vertex and returns its position in the vertex buffer.
    pub fn add_vertex(&mut self, vertex: impl Into<V>) -> usize {
        let index = self.vertices.len();
        self.vertices.add(vertex);
        index
    }

    /// Appends one triangle of absolute vertex positions.
    pub fn add_triangle(&mut self, a: usize, b: usize, c: usize) {
        self.indices
            .extend([I::from_vertex(a), I::from_vertex(b), I::from_vertex(c)]);
    }

    /// Binds vertices (with their attribute layout), then indices.
    pub fn bind<C, S>(&mut self, ctx: &mut C, shader: &S, force_upload: bool)
    where
        C: GraphicsContext<Buffer = H>,
        S: ShaderAttributes<C>,
    {
        self.vertices.bind(ctx, shader, force_upload);
        self.indices.bind(ctx, shader, force_upload);
    }

    pub fn unbind<C, S>(&self, ctx: &mut C, shader: &S)
    where
        C: GraphicsContext<Buffer = H>,
        S: ShaderAttributes<C>,
    {
        self.indices.unbind(ctx, shader);
        self.vertices.unbind(ctx, shader);
    }

    /// Indexed draw over every index.
    pub fn draw<C>(&self, ctx: &mut C, primitive: wgpu::PrimitiveTopology)
    where
        C: GraphicsContext<Buffer = H>,
    {
        self.indices.draw(ctx, primitive);
    }
}

impl<V: VertexRecord, I: IndexRecord, H> Default for IndexedVertexBatch<V, I, H> {
    fn default() -> Self {
        Self::new(Usage::default())
    }
}

impl<V: VertexRecord, I: IndexRecord, H> Clone for IndexedVertexBatch<V, I, H> {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            indices: self.indices.clone(),
        }
    }
}

impl<V: VertexRecord, I: IndexRecord, H> std::fmt::Debug for IndexedVertexBatch<V, I, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedVertexBatch")
            .field("vertices", &self.vertices)
            .field("indices", &self.indices)
            .finish()
    }
}
