//! Runs as its own test binary: the process-wide hook must still be unset
//! when the test starts, so nothing else may create an owned ring here.

use bytering::allocator::{self, AllocatorHook};
use bytering::ring::{RingBuffer, RingError};
use std::sync::atomic::{AtomicUsize, Ordering};

static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);
static RELEASES: AtomicUsize = AtomicUsize::new(0);
static LAST_SIZE: AtomicUsize = AtomicUsize::new(0);

fn counting_allocate(size: usize) -> *mut u8 {
    ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
    LAST_SIZE.store(size, Ordering::SeqCst);
    unsafe { libc::malloc(size.max(1)) as *mut u8 }
}

fn counting_release(ptr: *mut u8) {
    RELEASES.fetch_add(1, Ordering::SeqCst);
    unsafe { libc::free(ptr as *mut libc::c_void) }
}

#[test]
fn installed_hook_backs_new_buffers() {
    assert!(allocator::installed().is_none());
    // Querying must not latch the default pair.
    assert!(allocator::installed().is_none());

    allocator::install(AllocatorHook::new(counting_allocate, counting_release)).unwrap();
    assert!(allocator::installed().is_some());

    {
        let mut ring = RingBuffer::new(4).unwrap();
        assert_eq!(ALLOCATIONS.load(Ordering::SeqCst), 1);
        assert_eq!(LAST_SIZE.load(Ordering::SeqCst), 5);
        assert_eq!(RELEASES.load(Ordering::SeqCst), 0);

        ring.write(b"hook");
        let mut out = [0u8; 4];
        ring.read_into(&mut out).unwrap();
        assert_eq!(&out, b"hook");
    }

    assert_eq!(ALLOCATIONS.load(Ordering::SeqCst), 1);
    assert_eq!(RELEASES.load(Ordering::SeqCst), 1);

    let second = AllocatorHook::new(counting_allocate, counting_release);
    assert!(matches!(
        allocator::install(second),
        Err(RingError::AllocatorAlreadyInstalled)
    ));
}
