//! Integer domains over `0..capacity`.

use crate::bitset::BitSet;

/// Finite set of non-negative integers with cached bounds and size.
///
/// Never empty while the owning store is consistent: removals that would
/// empty it are refused by the store before they reach the domain.
#[derive(Debug, Clone)]
pub struct IntDomain {
    bits: BitSet,
    lb: usize,
    ub: usize,
    size: usize,
}

impl IntDomain {
    /// Domain `0..capacity`. `capacity` must be positive.
    pub fn range(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            bits: BitSet::full(capacity),
            lb: 0,
            ub: capacity - 1,
            size: capacity,
        }
    }

    #[inline]
    pub fn lb(&self) -> usize {
        self.lb
    }

    #[inline]
    pub fn ub(&self) -> usize {
        self.ub
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn contains(&self, value: usize) -> bool {
        self.bits.contains(value)
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.size == 1
    }

    pub fn values(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter()
    }

    /// Smallest value at or above `from`.
    pub fn next_value(&self, from: usize) -> Option<usize> {
        self.bits.next_from(from)
    }

    /// Largest value at or below `from`.
    pub fn prev_value(&self, from: usize) -> Option<usize> {
        self.bits.prev_from(from)
    }

    /// Removes a present, non-last value and refreshes the cached bounds.
    pub(crate) fn remove(&mut self, value: usize) {
        debug_assert!(self.size > 1 && self.contains(value));
        self.bits.remove(value);
        self.size -= 1;
        if value == self.lb {
            self.lb = self.bits.next_from(value + 1).unwrap_or(self.ub);
        }
        if value == self.ub {
            self.ub = self.bits.prev_from(value.saturating_sub(1)).unwrap_or(self.lb);
        }
    }

    /// Re-inserts a value removed earlier; used when undoing the trail.
    pub(crate) fn restore(&mut self, value: usize) {
        if self.bits.insert(value) {
            self.size += 1;
            self.lb = self.lb.min(value);
            self.ub = self.ub.max(value);
        }
    }
}
