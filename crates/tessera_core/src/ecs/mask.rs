//! # Component Masks
//!
//! A fixed-width bit-set recording which component kinds an entity carries,
//! or which kinds a system requires. Bit `k` belongs to the component kind
//! whose [`Component::ID`](super::Component::ID) is `k`.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

/// Bit-set of component kinds (up to 64 kinds).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ComponentMask(u64);

impl ComponentMask {
    /// Number of distinct component bits a mask can hold.
    pub const CAPACITY: usize = 64;

    /// The empty mask.
    pub const EMPTY: Self = Self(0);

    /// Creates an empty mask.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a mask from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Builds a mask with every listed bit set.
    ///
    /// # Panics
    ///
    /// Panics if any bit is `>= CAPACITY`.
    #[must_use]
    pub fn from_ids(ids: &[u8]) -> Self {
        ids.iter().fold(Self::EMPTY, |mask, &id| mask.with(id))
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns a copy of this mask with `id` set.
    ///
    /// # Panics
    ///
    /// Panics if `id >= CAPACITY`.
    #[inline]
    #[must_use]
    pub fn with(mut self, id: u8) -> Self {
        self.set(id);
        self
    }

    /// Sets bit `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id >= CAPACITY`.
    #[inline]
    pub fn set(&mut self, id: u8) {
        assert!(
            usize::from(id) < Self::CAPACITY,
            "component bit {id} out of range"
        );
        self.0 |= 1 << id;
    }

    /// Clears bit `id`. Out-of-range bits are ignored.
    #[inline]
    pub fn clear(&mut self, id: u8) {
        if usize::from(id) < Self::CAPACITY {
            self.0 &= !(1 << id);
        }
    }

    /// Tests bit `id`. Out-of-range bits are never set.
    #[inline]
    #[must_use]
    pub const fn test(self, id: u8) -> bool {
        (id as usize) < Self::CAPACITY && (self.0 & (1 << id)) != 0
    }

    /// Returns `true` if every bit of `required` is also set here.
    #[inline]
    #[must_use]
    pub const fn contains_all(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// Bits of `required` that are not set here.
    #[inline]
    #[must_use]
    pub const fn missing(self, required: Self) -> Self {
        Self(required.0 & !self.0)
    }

    /// Clears every bit.
    #[inline]
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Returns `true` if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates over the set bits in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        let mut remaining = self.0;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            // trailing_zeros of a non-zero u64 is at most 63
            let bit = remaining.trailing_zeros() as u8;
            remaining &= remaining - 1;
            Some(bit)
        })
    }
}

impl BitOr for ComponentMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for ComponentMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for ComponentMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl FromIterator<u8> for ComponentMask {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, bit) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{bit}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clear_test() {
        let mut mask = ComponentMask::new();
        assert!(mask.is_empty());

        mask.set(5);
        mask.set(63);
        assert!(mask.test(5));
        assert!(mask.test(63));
        assert!(!mask.test(4));
        assert_eq!(mask.count(), 2);

        mask.clear(5);
        assert!(!mask.test(5));
        assert!(!mask.test(200));
    }

    #[test]
    fn test_subset_and_missing() {
        let required = ComponentMask::from_ids(&[1, 2]);
        let has_both = ComponentMask::from_ids(&[0, 1, 2]);
        let has_one = ComponentMask::from_ids(&[1]);

        assert!(has_both.contains_all(required));
        assert!(!has_one.contains_all(required));
        assert_eq!(has_one.missing(required), ComponentMask::from_ids(&[2]));
        assert!(has_both.missing(required).is_empty());
        assert!(has_one.contains_all(ComponentMask::EMPTY));
    }

    #[test]
    fn test_iter_and_display() {
        let mask: ComponentMask = [9u8, 0, 3].into_iter().collect();
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![0, 3, 9]);
        assert_eq!(mask.to_string(), "{0, 3, 9}");
        assert_eq!(ComponentMask::EMPTY.to_string(), "{}");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_out_of_range_panics() {
        let mut mask = ComponentMask::new();
        mask.set(64);
    }
}
