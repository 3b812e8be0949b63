use bytering::ring::{RingBuffer, RingError};
use bytering::storage::{MappedStorage, Storage};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const INGRESS_CAPACITY: usize = 64 * 1024;
const EGRESS_CAPACITY: usize = 16 * 1024;
const FRAME_LEN: usize = 256;
const FRAME_END: u8 = 0xFF;

#[derive(Debug, Default)]
struct PumpStats {
    bytes_in: u64,
    bytes_copied: u64,
    frames: u64,
    corrupted: u64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let seconds = match args.next() {
        Some(arg) => arg
            .parse::<u64>()
            .map_err(|e| format!("Invalid duration {:?}: {}", arg, e))?,
        None => 5,
    };
    let path = args.next();

    println!("bytering stress test\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let mut ingress = RingBuffer::new(INGRESS_CAPACITY)?;
    let deadline = Instant::now() + Duration::from_secs(seconds);

    println!("Running for {} seconds...", seconds);
    let started = Instant::now();

    let stats = match &path {
        Some(path) => {
            let storage = MappedStorage::create(path, EGRESS_CAPACITY)?;
            let mut egress = RingBuffer::wrap(storage.capacity(), storage);
            let stats = pump(&mut ingress, &mut egress, &running, deadline)?;
            egress.into_storage().flush()?;
            stats
        }
        None => {
            let mut egress = RingBuffer::new(EGRESS_CAPACITY)?;
            pump(&mut ingress, &mut egress, &running, deadline)?
        }
    };

    let elapsed = started.elapsed().as_secs_f64().max(f64::EPSILON);

    println!("\nResults:");
    println!("  Written to ingress: {} bytes", stats.bytes_in);
    println!("  Copied ring to ring: {} bytes", stats.bytes_copied);
    println!("  Frames delivered: {} ({} corrupted)", stats.frames, stats.corrupted);
    println!(
        "  Throughput: {:.2} MB/sec",
        stats.bytes_in as f64 / elapsed / 1024.0 / 1024.0
    );
    if let Some(path) = path {
        println!("  Egress storage: {}", path);
    }

    Ok(())
}

fn pump<A: Storage, B: Storage>(
    ingress: &mut RingBuffer<A>,
    egress: &mut RingBuffer<B>,
    running: &AtomicBool,
    deadline: Instant,
) -> Result<PumpStats, RingError> {
    let payload: Vec<u8> = (0..FRAME_LEN - 1).map(|i| (i % 251) as u8).collect();
    let mut frame = Vec::with_capacity(FRAME_LEN);
    let mut stats = PumpStats::default();

    while running.load(Ordering::Relaxed) && Instant::now() < deadline {
        if ingress.bytes_free() >= FRAME_LEN {
            ingress.write(&payload);
            ingress.fill(FRAME_END, 1);
            stats.bytes_in += FRAME_LEN as u64;
        }

        let movable = ingress.bytes_used().min(egress.bytes_free());
        if movable > 0 {
            egress.copy_from(ingress, movable)?;
            stats.bytes_copied += movable as u64;
        }

        loop {
            let used = egress.bytes_used();
            let end = egress.find_byte(FRAME_END, 0);
            if end == used {
                break;
            }

            frame.resize(end + 1, 0);
            egress.read_into(&mut frame)?;
            if frame[..end] == payload[..] {
                stats.frames += 1;
            } else {
                stats.corrupted += 1;
            }
        }
    }

    log::debug!(
        "pump stopped, ingress={:?} egress={:?}",
        ingress,
        egress
    );
    Ok(stats)
}
