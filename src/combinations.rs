// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information
use std::error::Error;
use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct InvalidCombination {
    pub n: usize,
    pub r: usize,
}

impl fmt::Display for InvalidCombination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cannot choose {} of {} elements", self.r, self.n)
    }
}

impl Error for InvalidCombination {}

/// Returns every `r`-element combination of `items`.
///
/// Each combination preserves the relative order of `items` (elements are
/// never re-sorted by value), and combinations are emitted in ascending
/// index order of their leading elements.
pub fn combinations<T: Clone>(items: &[T], r: usize) -> Result<Vec<Vec<T>>, InvalidCombination> {
    if items.is_empty() || r > items.len() {
        return Err(InvalidCombination { n: items.len(), r });
    }
    Ok(collect(items, r, 0))
}

fn collect<T: Clone>(items: &[T], r: usize, start: usize) -> Vec<Vec<T>> {
    if r == 0 {
        return vec![Vec::new()];
    }
    let mut result = Vec::new();
    for index in start..=items.len() - r {
        for tail in collect(items, r - 1, index + 1) {
            let mut combination = Vec::with_capacity(r);
            combination.push(items[index].clone());
            combination.extend(tail);
            result.push(combination);
        }
    }
    result
}

/// Number of `r`-element combinations of `n` elements.
///
/// Every intermediate product is exact; inputs here stay tiny (polynomial
/// degrees), so the `u128` accumulator never comes close to overflow.
pub fn count(n: u64, r: u64) -> Result<u64, InvalidCombination> {
    if r > n {
        return Err(InvalidCombination {
            n: n as usize,
            r: r as usize,
        });
    }
    let r = r.min(n - r);
    let mut result = 1u128;
    for i in 0..r {
        result = result * u128::from(n - i) / u128::from(i + 1);
    }
    Ok(result as u64)
}
