// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information
use num_integer::Integer;
use num_rational::Ratio;
use num_traits::{One, Zero};
use std::error::Error;
use std::fmt;
use std::ops::{Add, Mul, Neg};

/// An exact rational value.
///
/// Used by the cube-root machinery to bypass floating-point arithmetic when
/// an input turns out to be a nice fraction. The denominator is always
/// positive; the sign lives on the numerator.
///
/// Arithmetic is plain `i64` and intended for the small fractions that
/// [`Fraction::approximate`] produces, not for general rational math.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

/// no fraction with a small enough denominator matches the input
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct NoExactMatch {
    pub value: f64,
}

impl fmt::Display for NoExactMatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "no exact fraction found for {}", self.value)
    }
}

impl Error for NoExactMatch {}

/// numerator or denominator is not a perfect power
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct NotAPerfectRoot {
    pub exponent: u32,
}

impl fmt::Display for NotAPerfectRoot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fraction is not a perfect {}-th power", self.exponent)
    }
}

impl Error for NotAPerfectRoot {}

impl Fraction {
    /// `denominator` must be non-zero; its sign is normalized onto the
    /// numerator.
    pub fn new(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "denominator is zero");
        if denominator < 0 {
            Fraction {
                numerator: -numerator,
                denominator: -denominator,
            }
        } else {
            Fraction {
                numerator,
                denominator,
            }
        }
    }

    pub fn numerator(self) -> i64 {
        self.numerator
    }

    pub fn denominator(self) -> i64 {
        self.denominator
    }

    /// Best-fit fraction for `value`, scanning denominators smallest-first.
    ///
    /// For each candidate denominator `d` the nearest numerator (at least 1)
    /// is tried; the first `d` that lands within `tolerance` of `value`
    /// wins. That biases toward small denominators but is not a
    /// continued-fraction best approximation. Zero is returned exactly.
    pub fn approximate(
        value: f64,
        max_denominator: u64,
        tolerance: f64,
    ) -> Result<Self, NoExactMatch> {
        if value == 0.0 {
            return Ok(Fraction::new(0, 1));
        }
        let magnitude = value.abs();
        for denominator in 1..=max_denominator {
            let step = 1.0 / denominator as f64;
            let nearest = (magnitude / step).round().max(1.0);
            if (magnitude - nearest / denominator as f64).abs() <= tolerance {
                let mut numerator = nearest as i64;
                if value < 0.0 {
                    numerator = -numerator;
                }
                return Ok(Fraction::new(numerator, denominator as i64));
            }
        }
        Err(NoExactMatch { value })
    }

    /// divides out the GCD; the denominator stays positive
    pub fn reduce(self) -> Self {
        let gcd = self.numerator.abs().gcd(&self.denominator);
        if gcd <= 1 {
            return self;
        }
        Fraction::new(self.numerator / gcd, self.denominator / gcd)
    }

    /// Exact `exponent`-th root, if both the numerator magnitude and the
    /// denominator are perfect powers of integers no larger than
    /// `max_attempts`. The numerator sign is preserved.
    pub fn try_root(self, exponent: u32, max_attempts: u32) -> Result<Self, NotAPerfectRoot> {
        if self.numerator == 0 {
            return Ok(Fraction::new(0, 1));
        }
        if self.denominator == self.numerator.abs() {
            return Ok(Fraction::new(self.numerator.signum(), 1));
        }
        let numerator = integer_root(self.numerator.abs(), exponent, max_attempts)
            .ok_or(NotAPerfectRoot { exponent })?;
        let denominator = integer_root(self.denominator, exponent, max_attempts)
            .ok_or(NotAPerfectRoot { exponent })?;
        Ok(Fraction::new(
            numerator * self.numerator.signum(),
            denominator,
        ))
    }

    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn to_ratio(self) -> Ratio<i64> {
        Ratio::new(self.numerator, self.denominator)
    }
}

impl From<Ratio<i64>> for Fraction {
    fn from(ratio: Ratio<i64>) -> Self {
        Fraction::new(*ratio.numer(), *ratio.denom())
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl Neg for Fraction {
    type Output = Fraction;
    fn neg(self) -> Fraction {
        Fraction {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl Add for Fraction {
    type Output = Fraction;
    fn add(self, rhs: Fraction) -> Fraction {
        Fraction::new(
            self.numerator * rhs.denominator + rhs.numerator * self.denominator,
            self.denominator * rhs.denominator,
        )
        .reduce()
    }
}

impl Mul for Fraction {
    type Output = Fraction;
    fn mul(self, rhs: Fraction) -> Fraction {
        Fraction::new(
            self.numerator * rhs.numerator,
            self.denominator * rhs.denominator,
        )
        .reduce()
    }
}

impl Zero for Fraction {
    fn zero() -> Self {
        Fraction::new(0, 1)
    }
    fn is_zero(&self) -> bool {
        self.numerator == 0
    }
}

impl One for Fraction {
    fn one() -> Self {
        Fraction::new(1, 1)
    }
    fn is_one(&self) -> bool {
        self.numerator == self.denominator
    }
}

/// linear scan for a base whose `exponent`-th power equals `value` exactly
fn integer_root(value: i64, exponent: u32, max_attempts: u32) -> Option<i64> {
    for base in 1..=i64::from(max_attempts) {
        let power = base.checked_pow(exponent)?;
        if power == value {
            return Some(base);
        }
        if power > value {
            return None;
        }
    }
    None
}
