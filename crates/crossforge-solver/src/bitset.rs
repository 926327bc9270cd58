//! Fixed-capacity bit set over `0..len`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Set containing every element of `0..len`.
    pub fn full(len: usize) -> Self {
        let mut set = Self::new(len);
        for w in set.words.iter_mut() {
            *w = u64::MAX;
        }
        set.clear_excess();
        set
    }

    pub fn capacity(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        i < self.len && self.words[i / 64] & (1 << (i % 64)) != 0
    }

    /// Inserts `i`; returns true if it was absent.
    #[inline]
    pub fn insert(&mut self, i: usize) -> bool {
        let mask = 1 << (i % 64);
        let word = &mut self.words[i / 64];
        let absent = *word & mask == 0;
        *word |= mask;
        absent
    }

    /// Removes `i`; returns true if it was present.
    #[inline]
    pub fn remove(&mut self, i: usize) -> bool {
        let mask = 1 << (i % 64);
        let word = &mut self.words[i / 64];
        let present = *word & mask != 0;
        *word &= !mask;
        present
    }

    pub fn union_with(&mut self, other: &BitSet) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Smallest element at or above `from`.
    pub fn next_from(&self, from: usize) -> Option<usize> {
        if from >= self.len {
            return None;
        }
        let mut idx = from / 64;
        let mut word = self.words[idx] & (u64::MAX << (from % 64));
        loop {
            if word != 0 {
                return Some(idx * 64 + word.trailing_zeros() as usize);
            }
            idx += 1;
            if idx == self.words.len() {
                return None;
            }
            word = self.words[idx];
        }
    }

    /// Largest element at or below `from`.
    pub fn prev_from(&self, from: usize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let from = from.min(self.len - 1);
        let mut idx = from / 64;
        let shift = 63 - (from % 64);
        let mut word = self.words[idx] & (u64::MAX >> shift);
        loop {
            if word != 0 {
                return Some(idx * 64 + 63 - word.leading_zeros() as usize);
            }
            if idx == 0 {
                return None;
            }
            idx -= 1;
            word = self.words[idx];
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(idx, &word)| {
            let mut w = word;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let bit = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(idx * 64 + bit)
            })
        })
    }

    fn clear_excess(&mut self) {
        let rem = self.len % 64;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_contains() {
        let mut set = BitSet::new(130);
        assert!(set.insert(0));
        assert!(set.insert(64));
        assert!(set.insert(129));
        assert!(!set.insert(64));
        assert!(set.contains(129));
        assert!(!set.contains(130));
        assert_eq!(set.count(), 3);
        assert!(set.remove(64));
        assert!(!set.remove(64));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 129]);
    }

    #[test]
    fn test_full_respects_capacity() {
        let set = BitSet::full(70);
        assert_eq!(set.count(), 70);
        assert_eq!(set.prev_from(usize::MAX), Some(69));
    }

    #[test]
    fn test_next_and_prev() {
        let mut set = BitSet::new(200);
        set.insert(3);
        set.insert(100);
        set.insert(150);

        assert_eq!(set.next_from(0), Some(3));
        assert_eq!(set.next_from(4), Some(100));
        assert_eq!(set.next_from(151), None);
        assert_eq!(set.prev_from(149), Some(100));
        assert_eq!(set.prev_from(2), None);
        assert_eq!(set.prev_from(3), Some(3));
    }

    #[test]
    fn test_union() {
        let mut a = BitSet::new(10);
        let mut b = BitSet::new(10);
        a.insert(1);
        b.insert(8);
        a.union_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 8]);
        assert!(!a.is_empty());
        assert!(BitSet::new(5).is_empty());
    }
}
