use bytering::ring::RingBuffer;
use bytering::storage::Storage;
use std::io::{self, BufWriter, Read, Write};

const DEFAULT_CAPACITY: usize = 4096;
const CHUNK_SIZE: usize = 512;

#[derive(Debug, Default)]
struct LineStats {
    bytes_in: u64,
    lines: u64,
    bytes_dropped: u64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let capacity = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .map_err(|e| format!("Invalid capacity {:?}: {}", arg, e))?,
        None => DEFAULT_CAPACITY,
    };
    if capacity == 0 {
        return Err("Capacity must be at least 1 byte".into());
    }

    let mut ring = RingBuffer::new(capacity)?;
    log::info!("line buffer ready, capacity={}", ring.capacity());

    let mut input = io::stdin().lock();
    let mut out = BufWriter::new(io::stdout().lock());
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut stats = LineStats::default();

    loop {
        let n = input.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        stats.bytes_in += n as u64;

        for piece in chunk[..n].chunks(capacity) {
            // Lines longer than the ring lose their head.
            stats.bytes_dropped += piece.len().saturating_sub(ring.bytes_free()) as u64;
            ring.write(piece);
            drain_lines(&mut ring, &mut out, &mut stats)?;
        }
    }

    if !ring.is_empty() {
        let mut rest = vec![0u8; ring.bytes_used()];
        ring.read_into(&mut rest)?;
        out.write_all(&rest)?;
        out.write_all(b"\n")?;
        stats.lines += 1;
    }
    out.flush()?;

    eprintln!(
        "[STATUS] bytes_in={} lines={} bytes_dropped={}",
        stats.bytes_in, stats.lines, stats.bytes_dropped
    );
    Ok(())
}

fn drain_lines<S: Storage, W: Write>(
    ring: &mut RingBuffer<S>,
    out: &mut W,
    stats: &mut LineStats,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut line = Vec::new();
    loop {
        let used = ring.bytes_used();
        let end = ring.find_byte(b'\n', 0);
        if end == used {
            return Ok(());
        }

        line.resize(end + 1, 0);
        ring.read_into(&mut line)?;
        out.write_all(&line)?;
        stats.lines += 1;
    }
}
