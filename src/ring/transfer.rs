use super::{RingBuffer, RingError};
use crate::storage::Storage;

impl<S: Storage> RingBuffer<S> {
    /// Writes `len` copies of `byte` at `head`.
    ///
    /// At most [`buffer_size`](Self::buffer_size) bytes are written; more
    /// would only revisit slots already written. If the fill does not fit,
    /// the oldest unread bytes are dropped and the buffer ends up full.
    /// Returns the number of bytes written.
    pub fn fill(&mut self, byte: u8, len: usize) -> usize {
        let count = len.min(self.size);
        let free = self.bytes_free();
        let buf = self.buf.as_mut();

        let mut written = 0;
        while written != count {
            let head = self.head;
            let n = (self.size - head).min(count - written);
            buf[head..head + n].fill(byte);
            written += n;

            self.head = if head + n == self.size { 0 } else { head + n };
        }

        self.evict_overflow(count, free);
        written
    }

    /// Copies `src` in at `head` and returns the new `head`.
    ///
    /// Never fails. When `src` is longer than the free space the oldest
    /// unread bytes are dropped, so afterwards the buffer is full and holds
    /// the most recent `capacity` bytes written.
    pub fn write(&mut self, src: &[u8]) -> usize {
        let count = src.len();
        let free = self.bytes_free();
        let buf = self.buf.as_mut();

        let mut nread = 0;
        while nread != count {
            let head = self.head;
            let n = (self.size - head).min(count - nread);
            buf[head..head + n].copy_from_slice(&src[nread..nread + n]);
            nread += n;

            self.head = if head + n == self.size { 0 } else { head + n };
        }

        self.evict_overflow(count, free);
        self.head
    }

    /// Moves exactly `dst.len()` bytes out from `tail` and returns the new
    /// `tail`.
    ///
    /// Fails with [`RingError::Underflow`] when fewer bytes are buffered, in
    /// which case neither the ring nor `dst` is touched.
    pub fn read_into(&mut self, dst: &mut [u8]) -> Result<usize, RingError> {
        let count = dst.len();
        let used = self.bytes_used();
        if count > used {
            log::trace!("read of {} bytes refused, {} buffered", count, used);
            return Err(RingError::Underflow {
                requested: count,
                available: used,
            });
        }

        let buf = self.buf.as_ref();
        let mut written = 0;
        while written != count {
            let tail = self.tail;
            let n = (self.size - tail).min(count - written);
            dst[written..written + n].copy_from_slice(&buf[tail..tail + n]);
            written += n;

            self.tail = if tail + n == self.size { 0 } else { tail + n };
        }

        debug_assert_eq!(count + self.bytes_used(), used);
        Ok(self.tail)
    }

    /// Moves `count` bytes from `src`'s unread data into `self` and returns
    /// `self`'s new `head`.
    ///
    /// Source underflow fails with [`RingError::Underflow`] and leaves both
    /// rings untouched. Destination overflow drops the oldest destination
    /// bytes, as [`write`](Self::write) does. Each step copies the longest run
    /// that crosses neither ring's wrap point.
    pub fn copy_from<T: Storage>(
        &mut self,
        src: &mut RingBuffer<T>,
        count: usize,
    ) -> Result<usize, RingError> {
        let src_used = src.bytes_used();
        if count > src_used {
            log::trace!("copy of {} bytes refused, source holds {}", count, src_used);
            return Err(RingError::Underflow {
                requested: count,
                available: src_used,
            });
        }
        let free = self.bytes_free();

        let src_buf = src.buf.as_ref();
        let dst_buf = self.buf.as_mut();

        let mut ncopied = 0;
        while ncopied != count {
            let (tail, head) = (src.tail, self.head);
            let nsrc = (src.size - tail).min(count - ncopied);
            let n = (self.size - head).min(nsrc);
            dst_buf[head..head + n].copy_from_slice(&src_buf[tail..tail + n]);
            ncopied += n;

            src.tail = if tail + n == src.size { 0 } else { tail + n };
            self.head = if head + n == self.size { 0 } else { head + n };
        }

        debug_assert_eq!(count + src.bytes_used(), src_used);

        self.evict_overflow(count, free);
        Ok(self.head)
    }

    /// Drops exactly as many of the oldest bytes as `written` overran the
    /// space that was free before the write.
    fn evict_overflow(&mut self, written: usize, free_before: usize) {
        if written <= free_before {
            return;
        }

        let evicted = written - free_before;
        self.tail = self.advance(self.tail, evicted);
        log::trace!("ring overflow, evicted {} oldest bytes", evicted);

        debug_assert_eq!(self.tail, self.next_pos(self.head));
        debug_assert!(self.is_full());
    }
}
