use std::{cell::RefCell, rc::Rc};


/// The bytes of one file in a [`MemoryFS`].
///
/// Cloning a `ContentBuffer` is cheap, and the clone refers to the same bytes; every
/// [`MemoryFile`] opened on a path holds a clone of the buffer registered at that path, so a
/// write through one handle is visible through every other.
///
/// [`MemoryFS`]: super::fs::MemoryFS
/// [`MemoryFile`]: super::file::MemoryFile
#[derive(Debug, Clone, Default)]
pub struct ContentBuffer(Rc<RefCell<Vec<u8>>>);

impl ContentBuffer {
    /// Returns a new, empty buffer not shared with anything else.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the length of the buffer in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Checks whether the buffer has a length of zero bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Whether `self` and `other` refer to the same bytes.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Read into `buf` from the buffer, starting at `offset`. Returns the number of bytes read,
    /// which is zero if `offset` is at or past the end of the buffer.
    pub fn read_at(&self, buf: &mut [u8], offset: usize) -> usize {
        let inner = self.0.borrow();

        let Some(source) = inner.get(offset..) else {
            // `offset` is past the end; there's nothing to read.
            return 0;
        };

        // Truncating the buffers to `read_len` does not panic, since it's shorter than either
        // length.
        let read_len = source.len().min(buf.len());
        #[expect(
            clippy::indexing_slicing,
            reason = "`read_len` is less than either slice's length",
        )]
        buf[..read_len].copy_from_slice(&source[..read_len]);

        read_len
    }

    /// Write all of `data` into the buffer, starting at `offset`.
    ///
    /// Bytes in `offset..offset + data.len()` are overwritten, and bytes outside that range are
    /// kept, so the buffer never shrinks. If `offset` is past the end of the buffer, the gap is
    /// filled with zeroes.
    ///
    /// Returns `None`, and leaves the buffer unchanged, if `offset + data.len()` overflows.
    pub fn write_at(&self, data: &[u8], offset: usize) -> Option<()> {
        let end = offset.checked_add(data.len())?;
        let mut inner = self.0.borrow_mut();

        if inner.len() < end {
            inner.resize(end, 0);
        }

        inner.get_mut(offset..end)?.copy_from_slice(data);
        Some(())
    }

    /// Discard every byte in the buffer. Handles sharing the buffer keep sharing it.
    #[inline]
    pub fn truncate(&self) {
        self.0.borrow_mut().clear();
    }

    /// Call `callback` with the current bytes of the buffer.
    ///
    /// # Panics
    /// Panics if `callback` writes to this buffer (through any handle sharing it).
    #[inline]
    pub fn with_bytes<T, F>(&self, callback: F) -> T
    where
        F: FnOnce(&[u8]) -> T,
    {
        callback(&self.0.borrow())
    }
}
