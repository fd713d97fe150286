//! Typed GPU buffers with shared ownership and lazy upload.
//!
//! A [`Buffer`] is a cheap handle. Cloning it aliases the same storage and GPU
//! allocation; the allocation is released when the last alias is dropped.
//! Nothing touches the GPU until [`Buffer::bind`].
//!
//! Handles are `!Send`: storage, refcount and GPU handle all belong to the
//! thread that owns the graphics context.

mod element;
mod record;
pub mod vertex;

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::Ordering;

use crate::context::{GraphicsContext, ShaderAttributes};

use element::Element;

pub use record::{BufferTarget, IndexRecord, Record, RecordKind, VertexRecord};
pub use vertex::{
    Vertex, VertexN, VertexRgba, VertexRgbaN, VertexUv, VertexUvN, VertexUvRgba, VertexUvRgbaN,
};

/// Upload strategy of a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Usage {
    /// Uploaded once; later changes never reach the GPU.
    Static,
    /// Re-uploaded whenever content changed; the allocation only grows.
    #[default]
    Dynamic,
}

/// Handle to a growable array of `T` records mirrored on the GPU.
///
/// `H` is the GPU buffer handle type of the [`GraphicsContext`] the buffer is
/// bound with; it defaults to `wgpu::Buffer`.
pub struct Buffer<T: Record, H = wgpu::Buffer> {
    id: usize,
    element: Rc<RefCell<Element<T, H>>>,
    usage: Usage,
    upload_required: bool,
}

impl<T: Record, H> Buffer<T, H> {
    /// Creates a buffer with its own, empty storage.
    pub fn new(usage: Usage) -> Self {
        let id = T::usage_counter().fetch_add(1, Ordering::Relaxed);
        log::trace!("{:?} buffer #{id} created ({usage:?})", T::KIND);

        Self {
            id,
            element: Rc::new(RefCell::new(Element::new())),
            usage,
            upload_required: true,
        }
    }

    /// Creates a buffer filled with `records`.
    pub fn from_records(usage: Usage, records: impl IntoIterator<Item = T>) -> Self {
        let mut buffer = Self::new(usage);
        buffer.extend(records);
        buffer
    }

    /// Identifier shared by all aliases; unique per record type within the process.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn usage(&self) -> Usage {
        self.usage
    }

    #[inline]
    pub fn kind(&self) -> RecordKind {
        T::KIND
    }

    /// Number of live handles aliasing this buffer's storage.
    #[inline]
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.element)
    }

    /// Returns `true` if both handles alias the same storage.
    #[inline]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.element, &other.element)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.element.borrow().storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.element.borrow().storage.is_empty()
    }

    /// Borrows the records. Do not hold the borrow across mutations.
    pub fn storage(&self) -> Ref<'_, [T]> {
        Ref::map(self.element.borrow(), |e| e.storage.as_slice())
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.element.borrow().storage.get(index).copied()
    }

    /// Appends one record.
    #[inline]
    pub fn add(&mut self, record: impl Into<T>) {
        let mut element = self.element.borrow_mut();
        element.storage.push(record.into());
        element.touch();
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = T>) {
        let mut element = self.element.borrow_mut();
        element.storage.extend(records);
        element.touch();
    }

    /// Empties the storage, keeping its capacity and the GPU allocation.
    pub fn clear(&mut self) {
        let mut element = self.element.borrow_mut();
        element.storage.clear();
        element.touch();
    }

    /// Capacity hint for the in-memory storage only.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.element.borrow_mut().storage.reserve(additional);
    }

    /// Forces the next bind through this handle to upload.
    #[inline]
    pub fn request_upload(&mut self) {
        self.upload_required = true;
    }

    /// Returns `true` if the next bind through this handle will upload.
    pub fn upload_pending(&self) -> bool {
        self.upload_required || self.element.borrow().is_stale()
    }

    /// Records the GPU allocation can currently hold.
    #[inline]
    pub fn allocated_size(&self) -> usize {
        self.element.borrow().allocated_size
    }

    #[inline]
    pub fn has_gpu_handle(&self) -> bool {
        self.element.borrow().handle.is_some()
    }

    /// Borrows the GPU handle, if one was created.
    pub fn gpu_handle(&self) -> Option<Ref<'_, H>> {
        Ref::filter_map(self.element.borrow(), |e| e.handle.as_ref()).ok()
    }

    /// Makes the buffer current on `ctx`, uploading first when needed.
    ///
    /// The GPU handle is created on first use. Vertex records additionally ask
    /// `shader` to bind their attribute layout.
    pub fn bind<C, S>(&mut self, ctx: &mut C, shader: &S, force_upload: bool)
    where
        C: GraphicsContext<Buffer = H>,
        S: ShaderAttributes<C>,
    {
        let mut element = self.element.borrow_mut();

        if force_upload || self.upload_required || element.is_stale() {
            element.upload(ctx, self.usage);
            self.upload_required = false;
        }

        if element.handle.is_none() {
            element.handle = Some(ctx.create_buffer(T::TARGET, self.usage, 0));
        }

        if let Some(handle) = element.handle.as_ref() {
            T::bind(ctx, shader, handle);
        }
    }

    pub fn unbind<C, S>(&self, ctx: &mut C, shader: &S)
    where
        C: GraphicsContext<Buffer = H>,
        S: ShaderAttributes<C>,
    {
        T::unbind(ctx, shader);
    }

    /// Draws every record: indexed for index buffers, from offset 0 otherwise.
    pub fn draw<C>(&self, ctx: &mut C, primitive: wgpu::PrimitiveTopology)
    where
        C: GraphicsContext<Buffer = H>,
    {
        let count = self.len() as u32;
        T::draw(ctx, primitive, count);
    }
}

impl<T: Record, H> Default for Buffer<T, H> {
    fn default() -> Self {
        Self::new(Usage::default())
    }
}

impl<T: Record, H> Clone for Buffer<T, H> {
    /// Aliases the same storage. The new handle starts with an upload pending.
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            element: Rc::clone(&self.element),
            usage: self.usage,
            upload_required: true,
        }
    }
}

impl<T: Record, H> fmt::Debug for Buffer<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = self.element.borrow();
        f.debug_struct("Buffer")
            .field("id", &self.id)
            .field("kind", &T::KIND)
            .field("usage", &self.usage)
            .field("len", &element.storage.len())
            .field("allocated_size", &element.allocated_size)
            .field("use_count", &Rc::strong_count(&self.element))
            .finish()
    }
}
