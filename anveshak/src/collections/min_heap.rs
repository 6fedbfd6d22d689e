//! Binary min-heap.
//!
//! Array-backed: the children of slot `i` live at `2i + 1` and `2i + 2`.
//!
//! ```text
//!            [0]
//!          /     \
//!       [1]       [2]
//!      /   \     /   \
//!    [3]   [4] [5]   [6]
//! ```
//!
//! Equal keys come out in no particular order; there is no stability
//! guarantee.

/// Min-heap over any totally ordered item.
///
/// Ordering comes from `Ord`; wrap float keys in a type whose `Ord` uses
/// `f32::total_cmp`.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    items: Vec<T>,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Smallest item without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Add an item. O(log n).
    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Remove and return the smallest item. O(log n).
    ///
    /// `None` when the heap is empty.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let min = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        min
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.items[parent] > self.items[idx] {
                self.items.swap(parent, idx);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            if left >= len {
                break;
            }

            let smaller = if right < len && self.items[right] < self.items[left] {
                right
            } else {
                left
            };

            if self.items[idx] > self.items[smaller] {
                self.items.swap(idx, smaller);
                idx = smaller;
            } else {
                break;
            }
        }
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = MinHeap::new();
        for item in iter {
            heap.insert(item);
        }
        heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    #[test]
    fn test_empty_heap() {
        let mut heap: MinHeap<u32> = MinHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), None);
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn test_random_permutation_extracts_sorted() {
        let mut rng = StdRng::seed_from_u64(17);
        for k in [1usize, 2, 3, 10, 257] {
            let mut keys: Vec<u32> = (0..k as u32).collect();
            keys.shuffle(&mut rng);

            let mut heap = MinHeap::with_capacity(k);
            for key in &keys {
                heap.insert(*key);
            }
            assert_eq!(heap.len(), k);

            let drained: Vec<u32> = std::iter::from_fn(|| heap.extract_min()).collect();
            let expected: Vec<u32> = (0..k as u32).collect();
            assert_eq!(drained, expected);
        }
    }

    #[test]
    fn test_peek_tracks_minimum() {
        let mut heap = MinHeap::new();
        heap.insert(5);
        assert_eq!(heap.peek(), Some(&5));
        heap.insert(2);
        heap.insert(8);
        assert_eq!(heap.peek(), Some(&2));
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.extract_min(), Some(2));
        assert_eq!(heap.peek(), Some(&5));
    }

    #[test]
    fn test_duplicates_non_decreasing() {
        let mut heap: MinHeap<i32> = [3, 1, 3, 2, 1, 3].into_iter().collect();
        let mut last = i32::MIN;
        while let Some(v) = heap.extract_min() {
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_interleaved_insert_extract() {
        let mut heap = MinHeap::new();
        heap.insert(10);
        heap.insert(4);
        assert_eq!(heap.extract_min(), Some(4));
        heap.insert(1);
        heap.insert(7);
        assert_eq!(heap.extract_min(), Some(1));
        assert_eq!(heap.extract_min(), Some(7));
        assert_eq!(heap.extract_min(), Some(10));
        assert!(heap.is_empty());
    }
}
