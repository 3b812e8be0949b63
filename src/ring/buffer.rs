use super::RingError;
use crate::allocator::{self, GlobalHook, RingAllocator};
use crate::storage::{OwnedStorage, Storage};
use std::fmt;

/// Fixed-capacity byte FIFO over a contiguous region.
///
/// The region holds `capacity + 1` slots. `head` is where the next byte is
/// written, `tail` where the next byte is read; the spare slot keeps a full
/// buffer (`head` one behind `tail`) distinct from an empty one
/// (`head == tail`).
///
/// Every mutating operation takes `&mut self`. There is no internal
/// synchronisation.
pub struct RingBuffer<S> {
    pub(crate) buf: S,
    pub(crate) size: usize,
    pub(crate) head: usize,
    pub(crate) tail: usize,
}

/// Ring that allocated its own storage and releases it on drop.
pub type OwnedRing<A = GlobalHook> = RingBuffer<OwnedStorage<A>>;

/// Ring over caller-owned bytes. Dropping it leaves the bytes alone.
pub type ExternalRing<'a> = RingBuffer<&'a mut [u8]>;

impl RingBuffer<OwnedStorage<GlobalHook>> {
    /// Allocates `capacity + 1` bytes through the process-wide allocator hook.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if allocator::active().is_none() {
            return Err(RingError::AllocatorUnavailable);
        }
        Self::new_in(capacity, GlobalHook)
    }
}

impl<A: RingAllocator> RingBuffer<OwnedStorage<A>> {
    pub fn new_in(capacity: usize, allocator: A) -> Result<Self, RingError> {
        let size = capacity.checked_add(1).ok_or(RingError::InvalidCapacity {
            capacity,
            reason: "capacity + 1 overflows usize",
        })?;

        Ok(Self {
            buf: OwnedStorage::allocate_in(size, allocator)?,
            size,
            head: 0,
            tail: 0,
        })
    }
}

impl<S: Storage> RingBuffer<S> {
    /// Runs a ring over caller-supplied storage without copying it.
    ///
    /// # Panics
    /// Panics unless `storage` is exactly `capacity + 1` bytes long.
    pub fn wrap(capacity: usize, storage: S) -> Self {
        let size = storage.as_ref().len();
        assert!(
            capacity.checked_add(1) == Some(size),
            "external storage must be capacity + 1 bytes: capacity {}, storage {}",
            capacity,
            size
        );

        Self {
            buf: storage,
            size,
            head: 0,
            tail: 0,
        }
    }

    /// Gives the storage back. Contents are left as they are.
    pub fn into_storage(self) -> S {
        self.buf
    }

    /// Empties the buffer. Stale bytes stay in storage until overwritten.
    #[inline]
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Slot count, one more than [`capacity`](Self::capacity).
    #[inline(always)]
    pub fn buffer_size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.size - 1
    }

    #[inline]
    pub fn bytes_free(&self) -> usize {
        if self.head >= self.tail {
            self.capacity() - (self.head - self.tail)
        } else {
            self.tail - self.head - 1
        }
    }

    #[inline]
    pub fn bytes_used(&self) -> usize {
        self.capacity() - self.bytes_free()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.bytes_free() == 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes_free() == self.capacity()
    }

    /// Slot index the next write lands on.
    #[inline(always)]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Slot index the next read comes from.
    #[inline(always)]
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Raw view of every slot, for peeking at `head`/`tail` without a copy.
    #[inline]
    pub fn storage(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Unread bytes in FIFO order, split at the wrap point.
    ///
    /// The second slice is empty unless the data wraps.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        let buf = self.buf.as_ref();
        if self.head >= self.tail {
            (&buf[self.tail..self.head], &[])
        } else {
            (&buf[self.tail..], &buf[..self.head])
        }
    }

    /// Slot after `pos`, wrapping to 0 past the last slot.
    #[inline]
    pub(crate) fn next_pos(&self, pos: usize) -> usize {
        debug_assert!(pos < self.size, "slot {} outside ring of {}", pos, self.size);
        (pos + 1) % self.size
    }

    /// Slot `n` places after `pos`.
    #[inline]
    pub(crate) fn advance(&self, pos: usize, n: usize) -> usize {
        debug_assert!(pos < self.size, "slot {} outside ring of {}", pos, self.size);
        (pos + n % self.size) % self.size
    }
}

impl<S: Storage> fmt::Debug for RingBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("bytes_used", &self.bytes_used())
            .finish()
    }
}
