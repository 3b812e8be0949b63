use crate::ring::RingError;
use memmap2::MmapMut;
use std::fs::OpenOptions;
use std::path::Path;

/// File-backed ring storage.
///
/// The mapping is exactly `capacity + 1` bytes long so it can be handed
/// straight to `RingBuffer::wrap`. Only the bytes live in the file; cursors
/// stay with the ring.
pub struct MappedStorage {
    mmap: MmapMut,
}

impl MappedStorage {
    pub fn create<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self, RingError> {
        let size = capacity.checked_add(1).ok_or(RingError::InvalidCapacity {
            capacity,
            reason: "capacity + 1 overflows usize",
        })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(size as u64)?;

        let mmap = unsafe { MmapMut::map_mut(&file)? };
        log::debug!("mapped {} bytes of ring storage", size);

        Ok(Self { mmap })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RingError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            return Err(RingError::InvalidCapacity {
                capacity: 0,
                reason: "mapped file is empty, need at least one sentinel byte",
            });
        }

        let mmap = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self { mmap })
    }

    /// Ring capacity this region supports (one byte is the sentinel slot).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.mmap.len() - 1
    }

    pub fn flush(&self) -> Result<(), RingError> {
        self.mmap.flush()?;
        Ok(())
    }

    pub fn flush_async(&self) -> Result<(), RingError> {
        self.mmap.flush_async()?;
        Ok(())
    }
}

impl AsRef<[u8]> for MappedStorage {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.mmap
    }
}

impl AsMut<[u8]> for MappedStorage {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.mmap
    }
}

impl Drop for MappedStorage {
    fn drop(&mut self) {
        let _ = self.mmap.flush();
    }
}
