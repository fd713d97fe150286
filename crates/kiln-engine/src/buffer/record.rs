use std::sync::atomic::AtomicUsize;

use bytemuck::Pod;
use glam::{Vec2, Vec3, Vec4};

use crate::context::{GraphicsContext, ShaderAttributes};

use super::vertex::{
    Vertex, VertexN, VertexRgba, VertexRgbaN, VertexUv, VertexUvN, VertexUvRgba, VertexUvRgbaN,
};

/// Closed set of record layouts a [`Buffer`](super::Buffer) can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Vertex,
    VertexUv,
    VertexRgba,
    VertexN,
    VertexUvRgba,
    VertexUvN,
    VertexRgbaN,
    VertexUvRgbaN,
    Vec2,
    Vec3,
    Vec4,
    U16,
    U32,
}

impl RecordKind {
    #[inline]
    pub const fn target(self) -> BufferTarget {
        match self {
            RecordKind::U16 | RecordKind::U32 => BufferTarget::ElementArray,
            _ => BufferTarget::Array,
        }
    }

    #[inline]
    pub const fn is_index(self) -> bool {
        matches!(self.target(), BufferTarget::ElementArray)
    }
}

/// GPU binding point class of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Index data.
    ElementArray,
}

mod sealed {
    pub trait Sealed {}
}

/// A record type that can live in a [`Buffer`](super::Buffer).
///
/// Implemented for the vertex layouts in [`vertex`](super::vertex), the raw
/// `glam` vectors and the two index widths. The set is sealed; bind, unbind and
/// draw resolve to the vertex or index operation set per type at compile time.
pub trait Record: Pod + sealed::Sealed {
    const KIND: RecordKind;
    const TARGET: BufferTarget;

    /// Process-wide counter handing out buffer ids for this record type.
    #[doc(hidden)]
    fn usage_counter() -> &'static AtomicUsize;

    #[doc(hidden)]
    fn bind<C, S>(ctx: &mut C, shader: &S, buffer: &C::Buffer)
    where
        C: GraphicsContext,
        S: ShaderAttributes<C>;

    #[doc(hidden)]
    fn unbind<C, S>(ctx: &mut C, shader: &S)
    where
        C: GraphicsContext,
        S: ShaderAttributes<C>;

    #[doc(hidden)]
    fn draw<C: GraphicsContext>(ctx: &mut C, primitive: wgpu::PrimitiveTopology, count: u32);
}

/// Records bound to the vertex-attribute target.
pub trait VertexRecord: Record {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Records bound to the index target.
pub trait IndexRecord: Record + Copy {
    const FORMAT: wgpu::IndexFormat;
    /// Number of distinct vertices this index width can address.
    const MAX_VERTICES: usize;

    /// Converts a vertex position. Callers check against [`Self::MAX_VERTICES`].
    fn from_vertex(index: usize) -> Self;

    fn to_vertex(self) -> usize;
}

// ── operation sets ────────────────────────────────────────────────────────

fn bind_vertex<T, C, S>(ctx: &mut C, shader: &S, buffer: &C::Buffer)
where
    T: VertexRecord,
    C: GraphicsContext,
    S: ShaderAttributes<C>,
{
    ctx.bind_vertex_buffer(buffer);
    shader.bind_attributes::<T>(ctx);
}

fn unbind_vertex<T, C, S>(ctx: &mut C, shader: &S)
where
    T: VertexRecord,
    C: GraphicsContext,
    S: ShaderAttributes<C>,
{
    shader.unbind_attributes::<T>(ctx);
    ctx.unbind_vertex_buffer();
}

fn draw_vertex<C: GraphicsContext>(ctx: &mut C, primitive: wgpu::PrimitiveTopology, count: u32) {
    ctx.draw(primitive, 0..count);
}

fn bind_index<T: IndexRecord, C: GraphicsContext>(ctx: &mut C, buffer: &C::Buffer) {
    ctx.bind_index_buffer(buffer, T::FORMAT);
}

fn draw_index<T: IndexRecord, C: GraphicsContext>(
    ctx: &mut C,
    primitive: wgpu::PrimitiveTopology,
    count: u32,
) {
    ctx.draw_indexed(primitive, 0..count, T::FORMAT);
}

// ── registrations ─────────────────────────────────────────────────────────

macro_rules! vertex_record {
    ($($ty:ty => $kind:ident [$($loc:literal => $fmt:ident),+];)+) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Record for $ty {
                const KIND: RecordKind = RecordKind::$kind;
                const TARGET: BufferTarget = BufferTarget::Array;

                fn usage_counter() -> &'static AtomicUsize {
                    static COUNTER: AtomicUsize = AtomicUsize::new(0);
                    &COUNTER
                }

                #[inline]
                fn bind<C, S>(ctx: &mut C, shader: &S, buffer: &C::Buffer)
                where
                    C: GraphicsContext,
                    S: ShaderAttributes<C>,
                {
                    bind_vertex::<Self, C, S>(ctx, shader, buffer);
                }

                #[inline]
                fn unbind<C, S>(ctx: &mut C, shader: &S)
                where
                    C: GraphicsContext,
                    S: ShaderAttributes<C>,
                {
                    unbind_vertex::<Self, C, S>(ctx, shader);
                }

                #[inline]
                fn draw<C: GraphicsContext>(
                    ctx: &mut C,
                    primitive: wgpu::PrimitiveTopology,
                    count: u32,
                ) {
                    draw_vertex(ctx, primitive, count);
                }
            }

            impl VertexRecord for $ty {
                const ATTRIBUTES: &'static [wgpu::VertexAttribute] =
                    &wgpu::vertex_attr_array![$($loc => $fmt),+];
            }
        )+
    };
}

macro_rules! index_record {
    ($($ty:ty => $kind:ident, $format:ident;)+) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Record for $ty {
                const KIND: RecordKind = RecordKind::$kind;
                const TARGET: BufferTarget = BufferTarget::ElementArray;

                fn usage_counter() -> &'static AtomicUsize {
                    static COUNTER: AtomicUsize = AtomicUsize::new(0);
                    &COUNTER
                }

                #[inline]
                fn bind<C, S>(ctx: &mut C, _shader: &S, buffer: &C::Buffer)
                where
                    C: GraphicsContext,
                    S: ShaderAttributes<C>,
                {
                    bind_index::<Self, C>(ctx, buffer);
                }

                #[inline]
                fn unbind<C, S>(ctx: &mut C, _shader: &S)
                where
                    C: GraphicsContext,
                    S: ShaderAttributes<C>,
                {
                    ctx.unbind_index_buffer();
                }

                #[inline]
                fn draw<C: GraphicsContext>(
                    ctx: &mut C,
                    primitive: wgpu::PrimitiveTopology,
                    count: u32,
                ) {
                    draw_index::<Self, C>(ctx, primitive, count);
                }
            }

            impl IndexRecord for $ty {
                const FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::$format;
                const MAX_VERTICES: usize = (<$ty>::MAX as usize).saturating_add(1);

                #[inline]
                fn from_vertex(index: usize) -> Self {
                    debug_assert!(index < Self::MAX_VERTICES);
                    index as $ty
                }

                #[inline]
                fn to_vertex(self) -> usize {
                    self as usize
                }
            }
        )+
    };
}

vertex_record! {
    Vertex => Vertex [0 => Float32x3];
    VertexUv => VertexUv [0 => Float32x3, 1 => Float32x2];
    VertexRgba => VertexRgba [0 => Float32x3, 2 => Float32x4];
    VertexN => VertexN [0 => Float32x3, 3 => Float32x3];
    VertexUvRgba => VertexUvRgba [0 => Float32x3, 1 => Float32x2, 2 => Float32x4];
    VertexUvN => VertexUvN [0 => Float32x3, 1 => Float32x2, 3 => Float32x3];
    VertexRgbaN => VertexRgbaN [0 => Float32x3, 2 => Float32x4, 3 => Float32x3];
    VertexUvRgbaN => VertexUvRgbaN [0 => Float32x3, 1 => Float32x2, 2 => Float32x4, 3 => Float32x3];
    Vec2 => Vec2 [0 => Float32x2];
    Vec3 => Vec3 [0 => Float32x3];
    Vec4 => Vec4 [0 => Float32x4];
}

index_record! {
    u16 => U16, Uint16;
    u32 => U32, Uint32;
}
