use crate::allocator::{GlobalHook, RingAllocator};
use crate::ring::RingError;
use std::ptr::{self, NonNull};
use std::slice;

/// Byte region obtained from a [`RingAllocator`] and released back to it on
/// drop.
pub struct OwnedStorage<A: RingAllocator = GlobalHook> {
    ptr: NonNull<u8>,
    len: usize,
    allocator: A,
}

unsafe impl<A: RingAllocator + Send> Send for OwnedStorage<A> {}
unsafe impl<A: RingAllocator + Sync> Sync for OwnedStorage<A> {}

impl<A: RingAllocator> OwnedStorage<A> {
    pub fn allocate_in(len: usize, allocator: A) -> Result<Self, RingError> {
        let Some(ptr) = allocator.allocate(len) else {
            log::debug!("ring storage allocation of {} bytes failed", len);
            return Err(RingError::AllocationFailed { size: len });
        };

        // Hooks hand out uninitialised memory.
        unsafe { ptr::write_bytes(ptr.as_ptr(), 0, len) };

        Ok(Self {
            ptr,
            len,
            allocator,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }
}

impl<A: RingAllocator> AsRef<[u8]> for OwnedStorage<A> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<A: RingAllocator> AsMut<[u8]> for OwnedStorage<A> {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<A: RingAllocator> Drop for OwnedStorage<A> {
    fn drop(&mut self) {
        unsafe { self.allocator.release(self.ptr, self.len) }
    }
}
