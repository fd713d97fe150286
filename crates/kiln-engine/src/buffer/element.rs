use crate::context::GraphicsContext;

use super::{Record, Usage};

/// Storage shared by every [`Buffer`](super::Buffer) handle aliasing it.
///
/// Dropped, together with its GPU handle, when the last handle goes away.
pub(super) struct Element<T: Record, H> {
    pub(super) storage: Vec<T>,
    /// Records the current GPU allocation can hold.
    pub(super) allocated_size: usize,
    pub(super) handle: Option<H>,
    /// Bumped by every storage mutation.
    pub(super) revision: u64,
    /// Revision the GPU copy was last synchronized with.
    pub(super) synced_revision: u64,
}

impl<T: Record, H> Element<T, H> {
    pub(super) fn new() -> Self {
        Self {
            storage: Vec::new(),
            allocated_size: 0,
            handle: None,
            revision: 0,
            synced_revision: 0,
        }
    }

    #[inline]
    pub(super) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    #[inline]
    pub(super) fn is_stale(&self) -> bool {
        self.revision != self.synced_revision
    }

    /// Copies storage to the GPU following the usage policy.
    ///
    /// Static: one allocation sized to the storage, filled once; later calls are
    /// no-ops once something was allocated.
    /// Dynamic: grows (re-creates) the allocation when storage outgrew it, then
    /// rewrites `[0, len)`.
    pub(super) fn upload<C>(&mut self, ctx: &mut C, usage: Usage)
    where
        C: GraphicsContext<Buffer = H>,
    {
        let bytes: &[u8] = bytemuck::cast_slice(&self.storage);

        match usage {
            Usage::Static => {
                if self.allocated_size == 0 {
                    self.allocated_size = self.storage.len();
                    let handle = ctx.create_buffer(T::TARGET, usage, bytes.len() as u64);
                    if !bytes.is_empty() {
                        ctx.write_buffer(&handle, 0, bytes);
                    }
                    self.handle = Some(handle);
                    log::debug!(
                        "{:?} static buffer uploaded ({} records)",
                        T::KIND,
                        self.allocated_size
                    );
                } else {
                    log::trace!("{:?} static buffer already uploaded; skipped", T::KIND);
                }
            }
            Usage::Dynamic => {
                if self.handle.is_none() || self.allocated_size < self.storage.len() {
                    self.allocated_size = self.allocated_size.max(self.storage.len());
                    let size = (self.allocated_size * std::mem::size_of::<T>()) as u64;
                    self.handle = Some(ctx.create_buffer(T::TARGET, usage, size));
                    log::debug!(
                        "{:?} dynamic buffer (re)allocated for {} records",
                        T::KIND,
                        self.allocated_size
                    );
                }
                match self.handle.as_ref() {
                    Some(handle) if !bytes.is_empty() => ctx.write_buffer(handle, 0, bytes),
                    _ => {}
                }
            }
        }

        self.synced_revision = self.revision;
    }
}

impl<T: Record, H> Drop for Element<T, H> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            log::debug!(
                "{:?} buffer released ({} records allocated)",
                T::KIND,
                self.allocated_size
            );
        }
    }
}
