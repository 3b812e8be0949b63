use super::RingBuffer;
use crate::storage::Storage;

impl<S: Storage> RingBuffer<S> {
    /// Offset from `tail` of the first `byte` at or after `offset`.
    ///
    /// Nothing is consumed. Returns [`bytes_used`](Self::bytes_used) when the
    /// byte is absent or `offset` is already past the unread data. The scan
    /// touches at most two contiguous runs: up to the end of storage, then
    /// from slot 0.
    pub fn find_byte(&self, byte: u8, offset: usize) -> usize {
        let used = self.bytes_used();
        let buf = self.buf.as_ref();

        let mut offset = offset;
        while offset < used {
            let start = self.advance(self.tail, offset);
            let n = (self.size - start).min(used - offset);

            if let Some(i) = buf[start..start + n].iter().position(|&b| b == byte) {
                return offset + i;
            }
            offset += n;
        }

        used
    }
}
