use std::fmt;
use std::io;

#[derive(Debug)]
pub enum RingError {
    Underflow {
        requested: usize,
        available: usize,
    },
    InvalidCapacity {
        capacity: usize,
        reason: &'static str,
    },
    AllocationFailed {
        size: usize,
    },
    AllocatorUnavailable,
    AllocatorAlreadyInstalled,
    Io(io::Error),
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underflow {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Not enough data in ring buffer: requested {} bytes, available {} bytes",
                    requested, available
                )
            }
            Self::InvalidCapacity { capacity, reason } => {
                write!(f, "Invalid capacity {}: {}", capacity, reason)
            }
            Self::AllocationFailed { size } => {
                write!(f, "Failed to allocate {} bytes of ring storage", size)
            }
            Self::AllocatorUnavailable => {
                write!(f, "No allocator hook installed for this target")
            }
            Self::AllocatorAlreadyInstalled => {
                write!(f, "Allocator hook already installed or in use")
            }
            Self::Io(err) => write!(f, "Storage I/O error: {}", err),
        }
    }
}

impl std::error::Error for RingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for RingError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
