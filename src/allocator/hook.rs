//! Memory source for ring buffers that own their storage.
//!
//! Two ways to pick an allocator:
//!
//! - pass any [`RingAllocator`] to `RingBuffer::new_in`, or
//! - install a process-wide [`AllocatorHook`] once with [`install`] and let
//!   `RingBuffer::new` go through [`GlobalHook`].
//!
//! On unix and windows targets the global hook defaults to `libc::malloc` /
//! `libc::free`. Other targets have no default and must call [`install`]
//! before the first owned buffer is created.

use crate::ring::RingError;
use std::ptr::NonNull;
use std::sync::OnceLock;

pub trait RingAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>>;

    /// # Safety
    /// `ptr` must have been returned by `allocate` on this allocator with the
    /// same `size`, and must not be released twice.
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize);
}

impl<A: RingAllocator + ?Sized> RingAllocator for &A {
    #[inline]
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        (**self).allocate(size)
    }

    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        unsafe { (**self).release(ptr, size) }
    }
}

/// An `allocate` / `release` function pair.
///
/// `allocate` returns null on failure. `release` receives exactly the
/// pointers `allocate` handed out.
#[derive(Debug, Clone, Copy)]
pub struct AllocatorHook {
    pub allocate: fn(usize) -> *mut u8,
    pub release: fn(*mut u8),
}

impl AllocatorHook {
    #[cfg(any(unix, windows))]
    pub const LIBC: Self = Self {
        allocate: libc_allocate,
        release: libc_release,
    };

    pub const fn new(allocate: fn(usize) -> *mut u8, release: fn(*mut u8)) -> Self {
        Self { allocate, release }
    }
}

impl RingAllocator for AllocatorHook {
    #[inline]
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        NonNull::new((self.allocate)(size))
    }

    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, _size: usize) {
        (self.release)(ptr.as_ptr())
    }
}

#[cfg(any(unix, windows))]
fn libc_allocate(size: usize) -> *mut u8 {
    // malloc(0) may legally return null
    unsafe { libc::malloc(size.max(1)) as *mut u8 }
}

#[cfg(any(unix, windows))]
fn libc_release(ptr: *mut u8) {
    unsafe { libc::free(ptr as *mut libc::c_void) }
}

static HOOK: OnceLock<AllocatorHook> = OnceLock::new();

/// Installs the process-wide allocator pair.
///
/// Succeeds at most once, and only before the first buffer has been created
/// through [`GlobalHook`]: that creation latches the default pair.
pub fn install(hook: AllocatorHook) -> Result<(), RingError> {
    HOOK.set(hook).map_err(|_| RingError::AllocatorAlreadyInstalled)?;
    log::debug!("ring allocator hook installed");
    Ok(())
}

/// The pair set with [`install`] or latched by the first owned buffer.
///
/// Pure query: it never latches the default, so checking before
/// [`install`] is fine.
pub fn installed() -> Option<AllocatorHook> {
    HOOK.get().copied()
}

/// The pair buffers allocate with, latching the platform default on first
/// use. After this returns `Some`, [`install`] is refused.
pub fn active() -> Option<AllocatorHook> {
    #[cfg(any(unix, windows))]
    {
        Some(*HOOK.get_or_init(|| AllocatorHook::LIBC))
    }
    #[cfg(not(any(unix, windows)))]
    {
        HOOK.get().copied()
    }
}

/// Allocator that forwards to the process-wide [`AllocatorHook`].
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalHook;

impl RingAllocator for GlobalHook {
    #[inline]
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        active()?.allocate(size)
    }

    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        // A pointer from `allocate` implies a hook is present.
        if let Some(hook) = active() {
            unsafe { hook.release(ptr, size) }
        }
    }
}
