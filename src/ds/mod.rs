pub mod tombstone_heap;

#[cfg(feature = "concurrency")]
pub use tombstone_heap::ConcurrentTombstoneHeap;
pub use tombstone_heap::TombstoneHeap;
