pub mod mapped;
pub mod owned;

pub use mapped::MappedStorage;
pub use owned::OwnedStorage;

/// Contiguous byte region a ring buffer can run over.
///
/// Blanket-implemented for anything that derefs to a byte slice both ways:
/// `&mut [u8]`, `Vec<u8>`, `Box<[u8]>`, [`OwnedStorage`], [`MappedStorage`].
pub trait Storage: AsRef<[u8]> + AsMut<[u8]> {}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Storage for T {}
