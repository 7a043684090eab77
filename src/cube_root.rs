// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information
use crate::fraction::Fraction;
use lazy_static::lazy_static;
use num_complex::Complex64;

const ONE_THIRD: f64 = 1.0 / 3.0;

lazy_static! {
    pub(crate) static ref SQRT_3: f64 = 3f64.sqrt();
    /// non-trivial cube roots of unity, (-1 ± √3 i)/2
    pub(crate) static ref OMEGA_PLUS: Complex64 = Complex64::new(-0.5, *SQRT_3 / 2.0);
    pub(crate) static ref OMEGA_MINUS: Complex64 = Complex64::new(-0.5, -*SQRT_3 / 2.0);
}

/// Cube-root branch selection policy.
///
/// The closed-form cubic and quartic formulas take two cube roots whose
/// branches must be chosen so that their product equals a value fixed by the
/// polynomial's coefficients. A per-value cube root cannot see that
/// constraint, so solvers request both roots at once through
/// [`cube_root_pair`](CubeRootStrategy::cube_root_pair).
pub trait CubeRootStrategy {
    fn cube_root(&self, value: Complex64) -> Complex64;

    /// Cube roots of `plus` and `minus` whose product should equal
    /// `product`.
    ///
    /// The default takes both roots independently and ignores the target.
    /// That reproduces the real-discriminant behavior exactly (the real
    /// branch is odd, so the product sign is preserved) but is a heuristic
    /// for complex discriminants.
    fn cube_root_pair(
        &self,
        plus: Complex64,
        minus: Complex64,
        product: Complex64,
    ) -> (Complex64, Complex64) {
        let _ = product;
        (self.cube_root(plus), self.cube_root(minus))
    }
}

/// Cube root that keeps near-real inputs on the real branch and prefers an
/// exact rational answer when one exists.
///
/// `powf(1/3)` follows the principal branch, which turns the cube root of a
/// negative real into a complex value even though the formulas downstream
/// assume the real branch. Inputs whose imaginary part is within
/// `acceptable_imaginary` are therefore treated as real. The rational
/// attempt removes floating round-off entirely for inputs like `8` or
/// `-1/27`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RationalCubeRoot {
    /// imaginary magnitude up to which an input counts as real
    pub acceptable_imaginary: f64,
    /// denominator cap for the rational attempt
    pub max_denominator: u64,
    /// tolerance for the rational attempt
    pub tolerance: f64,
    /// largest integer base tried by the perfect-cube test
    pub max_attempts: u32,
}

impl Default for RationalCubeRoot {
    fn default() -> Self {
        RationalCubeRoot {
            acceptable_imaginary: 1e-5,
            max_denominator: 48,
            tolerance: 1e-9,
            max_attempts: 1_000,
        }
    }
}

impl CubeRootStrategy for RationalCubeRoot {
    fn cube_root(&self, value: Complex64) -> Complex64 {
        if value.im.abs() <= self.acceptable_imaginary {
            if let Ok(fraction) =
                Fraction::approximate(value.re, self.max_denominator, self.tolerance)
            {
                if let Ok(root) = fraction.reduce().try_root(3, self.max_attempts) {
                    return Complex64::new(root.to_f64(), 0.0);
                }
            }
            return Complex64::new(value.re.cbrt(), 0.0);
        }
        value.powf(ONE_THIRD)
    }
}

/// The float-only heuristic: real branch for near-real inputs, principal
/// branch otherwise. No rational shortcut.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RealBranchCubeRoot {
    pub acceptable_imaginary: f64,
}

impl Default for RealBranchCubeRoot {
    fn default() -> Self {
        RealBranchCubeRoot {
            acceptable_imaginary: 1e-5,
        }
    }
}

impl CubeRootStrategy for RealBranchCubeRoot {
    fn cube_root(&self, value: Complex64) -> Complex64 {
        if value.im.abs() <= self.acceptable_imaginary {
            Complex64::new(value.re.cbrt(), 0.0)
        } else {
            value.powf(ONE_THIRD)
        }
    }
}

/// Wraps another strategy and repairs the pair selection: the second root is
/// rotated through its three candidate branches and the one whose product
/// with the first root lands closest to the required value wins.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct ProductMatched<S>(pub S);

impl<S: CubeRootStrategy> CubeRootStrategy for ProductMatched<S> {
    fn cube_root(&self, value: Complex64) -> Complex64 {
        self.0.cube_root(value)
    }

    fn cube_root_pair(
        &self,
        plus: Complex64,
        minus: Complex64,
        product: Complex64,
    ) -> (Complex64, Complex64) {
        let first = self.0.cube_root(plus);
        let second = self.0.cube_root(minus);
        if first.norm() <= f64::EPSILON {
            return (first, second);
        }
        let mut best = second;
        let mut best_error = (first * second - product).norm();
        for candidate in [second * *OMEGA_PLUS, second * *OMEGA_MINUS].iter().copied() {
            let error = (first * candidate - product).norm();
            if error < best_error {
                best = candidate;
                best_error = error;
            }
        }
        (first, best)
    }
}
