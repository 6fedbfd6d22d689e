//! Collections used by the search algorithms.

mod min_heap;

pub use min_heap::MinHeap;
