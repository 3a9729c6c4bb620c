//! Backlog rank keys using fractional indexing.
//!
//! A `Rank` is a string over the alphabet `a..=z` that sorts
//! lexicographically to give the backlog its order. Inserting a task between
//! two neighbors only needs a new key for the moved task; every other rank
//! stays untouched, which is what makes the optimistic apply cheap.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

const MIN_DIGIT: u8 = b'a';
const MAX_DIGIT: u8 = b'z';
// One past the top digit, used as a virtual pad when the upper bound runs out.
const HIGH_PAD: u8 = MAX_DIGIT + 1;

/// A sortable backlog ordering key.
///
/// Keys produced by [`Rank::first`], [`Rank::after`], [`Rank::before`] and
/// [`Rank::between`] never end in the lowest digit, which guarantees
/// `between` can always find room. Keys from other sources must satisfy the
/// same invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(String);

impl Rank {
    /// The rank for the first task on an empty backlog
    pub fn first() -> Self {
        Self("n".to_string())
    }

    /// A rank sorting after `prev`
    pub fn after(prev: &Rank) -> Self {
        let mut bytes = prev.0.clone().into_bytes();
        match bytes.last().copied() {
            Some(b) if b < MAX_DIGIT => {
                if let Some(last) = bytes.last_mut() {
                    *last = b + 1;
                }
            }
            _ => bytes.push(b'n'),
        }
        Self::from_bytes(bytes)
    }

    /// A rank sorting before `next`
    pub fn before(next: &Rank) -> Self {
        let mut bytes = next.0.clone().into_bytes();
        match bytes.last().copied() {
            // Decrementing must not produce a key ending in the lowest digit.
            Some(b) if b > MIN_DIGIT + 1 => {
                if let Some(last) = bytes.last_mut() {
                    *last = b - 1;
                }
            }
            _ => {
                bytes.pop();
                bytes.push(MIN_DIGIT);
                bytes.push(b'n');
            }
        }
        Self::from_bytes(bytes)
    }

    /// A rank strictly between `lo` and `hi`.
    ///
    /// Requires `lo < hi`; the neighbors a caller passes here come from the
    /// ordered backlog, so the precondition holds by construction.
    pub fn between(lo: &Rank, hi: &Rank) -> Self {
        debug_assert!(lo < hi, "rank bounds out of order: {lo} >= {hi}");
        let a = lo.0.as_bytes();
        let b = hi.0.as_bytes();
        let mut out: Vec<u8> = Vec::with_capacity(a.len().max(b.len()) + 1);

        let mut i = 0;
        loop {
            let x = a.get(i).copied().unwrap_or(MIN_DIGIT);
            let y = b.get(i).copied().unwrap_or(HIGH_PAD);
            if y.saturating_sub(x) >= 2 {
                // Midpoint is strictly above x, so the result stays below hi
                // and above lo and never ends in the lowest digit.
                out.push(x + (y - x) / 2);
                return Self::from_bytes(out);
            }
            out.push(x);
            i += 1;
        }
    }

    /// The rank as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_bytes(bytes: Vec<u8>) -> Self {
        // The alphabet is ASCII, so this cannot fail for generated keys.
        Self(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for Rank {
    fn default() -> Self {
        Self::first()
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(s: &str) -> Rank {
        Rank(s.to_string())
    }

    #[test]
    fn test_first_and_after() {
        let a = Rank::first();
        let b = Rank::after(&a);
        let c = Rank::after(&b);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_after_rolls_over_at_top_digit() {
        let z = rank("z");
        let next = Rank::after(&z);
        assert!(next > z);
    }

    #[test]
    fn test_before() {
        let n = Rank::first();
        let earlier = Rank::before(&n);
        assert!(earlier < n);

        // Repeated prepends keep producing strictly smaller keys.
        let mut current = n;
        for _ in 0..50 {
            let prev = Rank::before(&current);
            assert!(prev < current, "{prev} !< {current}");
            current = prev;
        }
    }

    #[test]
    fn test_between_adjacent_digits() {
        let lo = rank("b");
        let hi = rank("c");
        let mid = Rank::between(&lo, &hi);
        assert!(lo < mid && mid < hi, "{lo} < {mid} < {hi}");
    }

    #[test]
    fn test_between_is_dense() {
        // Repeatedly split the same gap; every key must stay in bounds.
        let lo = Rank::first();
        let mut hi = Rank::after(&lo);
        for _ in 0..64 {
            let mid = Rank::between(&lo, &hi);
            assert!(lo < mid && mid < hi, "{lo} < {mid} < {hi}");
            hi = mid;
        }
    }

    #[test]
    fn test_generated_keys_never_end_low() {
        let mut current = Rank::first();
        for _ in 0..100 {
            current = Rank::after(&current);
            assert!(!current.as_str().ends_with('a'));
        }
    }
}
