pub mod allocator;
pub mod ring;
pub mod storage;
