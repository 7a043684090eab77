// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information
use crate::cube_root::{CubeRootStrategy, RationalCubeRoot, OMEGA_MINUS, OMEGA_PLUS};
use crate::format::complex_to_string;
use num_complex::Complex64;
use std::error::Error;
use std::fmt;

/// relative threshold below which the quartic's resolvent square root
/// counts as vanished
const DEGENERATE_QUARTIC_EPSILON: f64 = 1e-8;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SolverError {
    /// wrong coefficient count for the requested degree
    InvalidLength { expected: usize, actual: usize },
    /// the leading coefficient is zero, so the polynomial has lower degree
    ZeroLeadingCoefficient,
    /// quartic whose paired square roots cannot be disambiguated: true
    /// roots α ≥ β ≥ γ ≥ δ with β = γ and α − β = γ − δ
    DegenerateQuartic,
    /// the dispatcher got a coefficient count outside the closed-form range
    UnsupportedDegree { degree: usize },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolverError::InvalidLength { expected, actual } => {
                write!(f, "expected {} coefficients, got {}", expected, actual)
            }
            SolverError::ZeroLeadingCoefficient => write!(f, "leading coefficient is zero"),
            SolverError::DegenerateQuartic => write!(
                f,
                "quartic roots are equally spaced around a double root; the \
                 closed form cannot pair its square roots"
            ),
            SolverError::UnsupportedDegree { degree } => {
                write!(f, "no closed form for degree {}", degree)
            }
        }
    }
}

impl Error for SolverError {}

/// how a solver call should behave; `trace` requests the diagnostic text
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SolveOptions {
    pub trace: bool,
}

impl SolveOptions {
    pub fn with_trace() -> Self {
        SolveOptions { trace: true }
    }
}

/// Solver output: roots in formula order plus the optional trace text.
///
/// Formula order means x1..xn exactly as the closed form produces them; use
/// [`sorted_by_magnitude`](Solution::sorted_by_magnitude) for the canonical
/// reading order.
#[derive(Clone, PartialEq, Debug)]
pub struct Solution {
    pub roots: Vec<Complex64>,
    pub trace: Option<String>,
}

impl Solution {
    /// canonical reading order; ties keep formula order (stable sort)
    pub fn sorted_by_magnitude(mut self) -> Self {
        sort_roots_by_magnitude(&mut self.roots);
        self
    }
}

/// Sorts ascending by |z|. The order carries no mathematical meaning; roots
/// of equal magnitude keep their source order.
pub fn sort_roots_by_magnitude(roots: &mut [Complex64]) {
    roots.sort_by(|lhs, rhs| lhs.norm().total_cmp(&rhs.norm()));
}

fn checked_coefficients(coefficients: &[f64], expected: usize) -> Result<(), SolverError> {
    if coefficients.len() != expected {
        return Err(SolverError::InvalidLength {
            expected,
            actual: coefficients.len(),
        });
    }
    if coefficients[0] == 0.0 {
        return Err(SolverError::ZeroLeadingCoefficient);
    }
    Ok(())
}

/// per-call trace buffer; a disabled trace records nothing
struct Trace {
    text: Option<String>,
}

impl Trace {
    fn new(enabled: bool) -> Self {
        Trace {
            text: if enabled { Some(String::new()) } else { None },
        }
    }

    fn record(&mut self, name: &str, value: Complex64) {
        if let Some(text) = &mut self.text {
            text.push_str(name);
            text.push_str(" = ");
            text.push_str(&complex_to_string(value, None));
            text.push('\n');
        }
    }

    fn into_text(self) -> Option<String> {
        self.text
    }
}

/// `x = (-b ± sqrt(b² - 4ac)) / 2a` over the complex numbers.
///
/// Both signs of the square root are returned, so the branch of the
/// discriminant root is irrelevant here.
pub fn solve_quadratic(
    coefficients: &[f64],
    options: SolveOptions,
) -> Result<Solution, SolverError> {
    checked_coefficients(coefficients, 3)?;
    let (a, b, c) = (coefficients[0], coefficients[1], coefficients[2]);
    let sqrt_discriminant = Complex64::new(b * b - 4.0 * a * c, 0.0).sqrt();
    let mut trace = Trace::new(options.trace);
    trace.record("sqrt_discriminant", sqrt_discriminant);
    let x1 = (-b + sqrt_discriminant) / (2.0 * a);
    let x2 = (-b - sqrt_discriminant) / (2.0 * a);
    Ok(Solution {
        roots: vec![x1, x2],
        trace: trace.into_text(),
    })
}

pub fn solve_cubic(coefficients: &[f64], options: SolveOptions) -> Result<Solution, SolverError> {
    solve_cubic_with(coefficients, options, &RationalCubeRoot::default())
}

/// Cardano's formula.
///
/// The cube-root pair is taken through `strategy` together with the product
/// `(b² - 3ac) / 9a²` that the ω-rotated roots x2 and x3 rely on: u and v
/// on mismatched branches leave x1 plausible but x2/x3 wrong.
pub fn solve_cubic_with<S: CubeRootStrategy>(
    coefficients: &[f64],
    options: SolveOptions,
    strategy: &S,
) -> Result<Solution, SolverError> {
    checked_coefficients(coefficients, 4)?;
    let (a, b, c, d) = (
        coefficients[0],
        coefficients[1],
        coefficients[2],
        coefficients[3],
    );
    let p = (-2.0 * b * b * b + 9.0 * a * b * c - 27.0 * a * a * d) / (54.0 * a * a * a);
    let q_radicand = 3.0
        * (27.0 * a * a * d * d - 18.0 * a * b * c * d
            + 4.0 * a * c * c * c
            + 4.0 * b * b * b * d
            - b * b * c * c);
    let q = Complex64::new(q_radicand, 0.0).sqrt() / (18.0 * a * a);
    let product = Complex64::new((b * b - 3.0 * a * c) / (9.0 * a * a), 0.0);
    let (u, v) = strategy.cube_root_pair(p + q, p - q, product);
    let shift = b / (3.0 * a);
    let x1 = u + v - shift;
    let x2 = *OMEGA_PLUS * u + *OMEGA_MINUS * v - shift;
    let x3 = *OMEGA_MINUS * u + *OMEGA_PLUS * v - shift;
    let mut trace = Trace::new(options.trace);
    trace.record("p", Complex64::new(p, 0.0));
    trace.record("q", q);
    trace.record("u", u);
    trace.record("v", v);
    trace.record("shift", Complex64::new(shift, 0.0));
    trace.record("omega_plus*u", *OMEGA_PLUS * u);
    trace.record("omega_minus*v", *OMEGA_MINUS * v);
    trace.record("omega_minus*u", *OMEGA_MINUS * u);
    trace.record("omega_plus*v", *OMEGA_PLUS * v);
    Ok(Solution {
        roots: vec![x1, x2, x3],
        trace: trace.into_text(),
    })
}

pub fn solve_quartic(coefficients: &[f64], options: SolveOptions) -> Result<Solution, SolverError> {
    solve_quartic_with(coefficients, options, &RationalCubeRoot::default())
}

/// Resolvent-cubic quartic formula.
///
/// With s² = t0 + u + v the four roots are
/// `0.5*(∓s ± sqrt(2*t0 - (u+v) ± t/s)) - b/4a`, where the `t/s` term pairs
/// each inner square root with the matching sign of s. When s vanishes that
/// pairing is unrecoverable and the call reports
/// [`SolverError::DegenerateQuartic`] instead of guessing.
pub fn solve_quartic_with<S: CubeRootStrategy>(
    coefficients: &[f64],
    options: SolveOptions,
    strategy: &S,
) -> Result<Solution, SolverError> {
    checked_coefficients(coefficients, 5)?;
    let (a, b, c, d, e) = (
        coefficients[0],
        coefficients[1],
        coefficients[2],
        coefficients[3],
        coefficients[4],
    );
    let (a2, b2, c2, d2, e2) = (a * a, b * b, c * c, d * d, e * e);
    let t0 = (3.0 * b2 - 8.0 * a * c) / (12.0 * a2);
    let t1 = (2.0 * c2 * c - 72.0 * a * c * e + 27.0 * b2 * e + 27.0 * a * d2 - 9.0 * b * c * d)
        / (54.0 * a2 * a);
    let t2_radicand = 3.0
        * (-256.0 * a2 * a * e2 * e + 192.0 * a2 * b * d * e2 + 128.0 * a2 * c2 * e2
            - 144.0 * a * b2 * c * e2
            + 27.0 * b2 * b2 * e2
            - 144.0 * a2 * c * d2 * e
            + 6.0 * a * b2 * d2 * e
            + 80.0 * a * b * c2 * d * e
            - 18.0 * b2 * b * c * d * e
            - 16.0 * a * c2 * c2 * e
            + 4.0 * b2 * c2 * c * e
            + 27.0 * a2 * d2 * d2
            - 18.0 * a * b * c * d2 * d
            + 4.0 * b2 * b * d2 * d
            + 4.0 * a * c2 * c * d2
            - b2 * c2 * d2);
    let t2 = Complex64::new(t2_radicand, 0.0).sqrt() / (18.0 * a2 * a);
    let product = Complex64::new((c2 - 3.0 * b * d + 12.0 * a * e) / (9.0 * a2), 0.0);
    let (u, v) = strategy.cube_root_pair(t1 + t2, t1 - t2, product);
    let resolvent = u + v;
    let s = (t0 + resolvent).sqrt();
    let mut trace = Trace::new(options.trace);
    trace.record("t0", Complex64::new(t0, 0.0));
    trace.record("t1", Complex64::new(t1, 0.0));
    trace.record("t2", t2);
    trace.record("u", u);
    trace.record("v", v);
    trace.record("resolvent", resolvent);
    trace.record("s", s);
    if s.norm() <= DEGENERATE_QUARTIC_EPSILON * (1.0 + t0.abs().sqrt()) {
        return Err(SolverError::DegenerateQuartic);
    }
    let t = (b2 * b - 4.0 * a * b * c + 8.0 * a2 * d) / (4.0 * a2 * a);
    let shift = b / (4.0 * a);
    trace.record("t", Complex64::new(t, 0.0));
    trace.record("shift", Complex64::new(shift, 0.0));
    let inner_plus = (2.0 * t0 - resolvent + t / s).sqrt();
    let inner_minus = (2.0 * t0 - resolvent - t / s).sqrt();
    let x1 = 0.5 * (-s + inner_plus) - shift;
    let x2 = 0.5 * (-s - inner_plus) - shift;
    let x3 = 0.5 * (s + inner_minus) - shift;
    let x4 = 0.5 * (s - inner_minus) - shift;
    Ok(Solution {
        roots: vec![x1, x2, x3, x4],
        trace: trace.into_text(),
    })
}

/// Picks the solver from the coefficient count; the linear case is solved
/// inline as `-b/a`.
pub fn solve(coefficients: &[f64], options: SolveOptions) -> Result<Solution, SolverError> {
    match coefficients.len() {
        2 => {
            if coefficients[0] == 0.0 {
                return Err(SolverError::ZeroLeadingCoefficient);
            }
            let root = Complex64::new(-coefficients[1] / coefficients[0], 0.0);
            Ok(Solution {
                roots: vec![root],
                trace: Trace::new(options.trace).into_text(),
            })
        }
        3 => solve_quadratic(coefficients, options),
        4 => solve_cubic(coefficients, options),
        5 => solve_quartic(coefficients, options),
        len => Err(SolverError::UnsupportedDegree {
            degree: len.saturating_sub(1),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube_root::{ProductMatched, RealBranchCubeRoot};
    use crate::polynomial::Polynomial;

    fn assert_roots_match(actual: &[Complex64], expected: &[Complex64], tolerance: f64) {
        let mut actual = actual.to_vec();
        let mut expected = expected.to_vec();
        sort_roots_by_magnitude(&mut actual);
        sort_roots_by_magnitude(&mut expected);
        assert_eq!(actual.len(), expected.len());
        for (got, want) in actual.iter().zip(&expected) {
            assert!(
                (*got - *want).norm() <= tolerance,
                "{:?} != {:?}",
                actual,
                expected
            );
        }
    }

    fn assert_real_roots(solution: &Solution, expected: &[f64], tolerance: f64) {
        let expected: Vec<Complex64> = expected
            .iter()
            .map(|root| Complex64::new(*root, 0.0))
            .collect();
        assert_roots_match(&solution.roots, &expected, tolerance);
    }

    #[test]
    fn test_quadratic_distinct_roots() {
        let solution = solve_quadratic(&[1.0, -3.0, 2.0], SolveOptions::default()).unwrap();
        assert_real_roots(&solution, &[1.0, 2.0], 1e-9);
        assert!(solution.trace.is_none());
    }

    #[test]
    fn test_quadratic_complex_pair() {
        let solution = solve_quadratic(&[1.0, 0.0, 1.0], SolveOptions::default()).unwrap();
        assert_roots_match(
            &solution.roots,
            &[Complex64::new(0.0, 1.0), Complex64::new(0.0, -1.0)],
            1e-12,
        );
    }

    #[test]
    fn test_quadratic_double_root() {
        let polynomial = Polynomial::from_roots(&[1.0, 1.0]).unwrap();
        let solution =
            solve_quadratic(polynomial.coefficients(), SolveOptions::default()).unwrap();
        assert_real_roots(&solution, &[1.0, 1.0], 1e-9);
    }

    #[test]
    fn test_input_validation() {
        assert_eq!(
            solve_quadratic(&[0.0, 1.0, 1.0], SolveOptions::default()).unwrap_err(),
            SolverError::ZeroLeadingCoefficient
        );
        assert_eq!(
            solve_quadratic(&[1.0, 1.0], SolveOptions::default()).unwrap_err(),
            SolverError::InvalidLength {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(
            solve_cubic(&[1.0; 5], SolveOptions::default()).unwrap_err(),
            SolverError::InvalidLength {
                expected: 4,
                actual: 5
            }
        );
        assert_eq!(
            solve_cubic(&[0.0, 1.0, 1.0, 1.0], SolveOptions::default()).unwrap_err(),
            SolverError::ZeroLeadingCoefficient
        );
        assert_eq!(
            solve_quartic(&[0.0, 1.0, 1.0, 1.0, 1.0], SolveOptions::default()).unwrap_err(),
            SolverError::ZeroLeadingCoefficient
        );
        assert_eq!(
            solve_quartic(&[1.0; 4], SolveOptions::default()).unwrap_err(),
            SolverError::InvalidLength {
                expected: 5,
                actual: 4
            }
        );
    }

    #[test]
    fn test_cubic_three_real_roots() {
        let solution = solve_cubic(&[1.0, 0.0, -7.0, 6.0], SolveOptions::default()).unwrap();
        assert_real_roots(&solution, &[-3.0, 1.0, 2.0], 1e-6);
    }

    #[test]
    fn test_cubic_exact_real_root() {
        // x³ - 8: the rational cube-root path yields the real root exactly,
        // and the other two are ω-rotations of it
        let solution = solve_cubic(&[1.0, 0.0, 0.0, -8.0], SolveOptions::default()).unwrap();
        assert_eq!(solution.roots[0], Complex64::new(2.0, 0.0));
        assert_roots_match(
            &solution.roots,
            &[
                Complex64::new(2.0, 0.0),
                Complex64::new(-1.0, 3f64.sqrt()),
                Complex64::new(-1.0, -3f64.sqrt()),
            ],
            1e-12,
        );
    }

    #[test]
    fn test_cubic_round_trip() {
        for roots in &[
            vec![1.0, 2.0, 3.0],
            vec![-4.0, 0.5, 3.0],
            vec![-1.0, -1.0, 2.0],
        ] {
            let polynomial = Polynomial::from_roots(roots).unwrap();
            let solution = solve_cubic(polynomial.coefficients(), SolveOptions::default()).unwrap();
            assert_real_roots(&solution, roots, 1e-6);
            for root in &solution.roots {
                assert!(
                    polynomial.eval(*root).norm() <= 1e-8,
                    "residual for {:?}",
                    roots
                );
            }
        }
    }

    #[test]
    fn test_cubic_trace_records_intermediates() {
        let traced = solve_cubic(&[1.0, 0.0, -7.0, 6.0], SolveOptions::with_trace()).unwrap();
        let trace = traced.trace.clone().unwrap();
        for name in &["p = ", "q = ", "u = ", "v = ", "omega_plus*u", "omega_minus*v"] {
            assert!(trace.contains(name), "{:?} missing from {:?}", name, trace);
        }
        // requesting the trace must not change the roots
        let silent = solve_cubic(&[1.0, 0.0, -7.0, 6.0], SolveOptions::default()).unwrap();
        assert_eq!(silent.roots, traced.roots);
        assert!(silent.trace.is_none());
    }

    #[test]
    fn test_quartic_round_trip() {
        for roots in &[
            vec![-1.0, 0.0, 2.0, 3.0],
            vec![0.0, 1.0, 2.0, 4.0],
            vec![1.0, 2.0, 3.0, 4.0],
        ] {
            let polynomial = Polynomial::from_roots(roots).unwrap();
            let solution =
                solve_quartic(polynomial.coefficients(), SolveOptions::default()).unwrap();
            assert_real_roots(&solution, roots, 1e-6);
            for root in &solution.roots {
                assert!(
                    polynomial.eval(*root).norm() <= 1e-7,
                    "residual for {:?}",
                    roots
                );
            }
        }
    }

    #[test]
    fn test_quartic_double_root_with_unequal_spacing() {
        // double root at 2 but unequal spacing: every intermediate happens
        // to be rational, so the roots come out exact
        let polynomial = Polynomial::from_roots(&[1.0, 2.0, 2.0, 3.5]).unwrap();
        let solution = solve_quartic(polynomial.coefficients(), SolveOptions::default()).unwrap();
        assert_real_roots(&solution, &[1.0, 2.0, 2.0, 3.5], 1e-9);
    }

    #[test]
    fn test_quartic_degenerate_pairing_reported() {
        // roots 1,2,2,3: double middle root with equal spacing on each side
        let polynomial = Polynomial::from_roots(&[1.0, 2.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            solve_quartic(polynomial.coefficients(), SolveOptions::default()).unwrap_err(),
            SolverError::DegenerateQuartic
        );
        // a balanced biquadratic lands on the vanished resolvent branch too
        assert_eq!(
            solve_quartic(&[1.0, 0.0, 0.0, 0.0, -1.0], SolveOptions::default()).unwrap_err(),
            SolverError::DegenerateQuartic
        );
    }

    #[test]
    fn test_quartic_trace_records_intermediates() {
        let solution = solve_quartic(
            Polynomial::from_roots(&[0.0, 1.0, 2.0, 4.0])
                .unwrap()
                .coefficients(),
            SolveOptions::with_trace(),
        )
        .unwrap();
        let trace = solution.trace.unwrap();
        for name in &["t0 = ", "t1 = ", "t2 = ", "u = ", "v = ", "resolvent = ", "s = ", "t = "] {
            assert!(trace.contains(name), "{:?} missing from {:?}", name, trace);
        }
    }

    #[test]
    fn test_solve_dispatcher() {
        let linear = solve(&[2.0, -4.0], SolveOptions::default()).unwrap();
        assert_eq!(linear.roots, vec![Complex64::new(2.0, 0.0)]);
        assert_eq!(
            solve(&[1.0, -3.0, 2.0], SolveOptions::default())
                .unwrap()
                .roots
                .len(),
            2
        );
        assert_eq!(
            solve(&[1.0, -6.0, 11.0, -6.0], SolveOptions::default())
                .unwrap()
                .roots
                .len(),
            3
        );
        assert_eq!(
            solve(&[0.0, 1.0], SolveOptions::default()).unwrap_err(),
            SolverError::ZeroLeadingCoefficient
        );
        assert_eq!(
            solve(&[1.0; 6], SolveOptions::default()).unwrap_err(),
            SolverError::UnsupportedDegree { degree: 5 }
        );
        assert_eq!(
            solve(&[], SolveOptions::default()).unwrap_err(),
            SolverError::UnsupportedDegree { degree: 0 }
        );
    }

    #[test]
    fn test_sort_roots_by_magnitude_is_stable() {
        let mut roots = vec![
            Complex64::new(0.0, 2.0),
            Complex64::new(-1.0, 0.0),
            Complex64::new(2.0, 0.0),
        ];
        sort_roots_by_magnitude(&mut roots);
        assert_eq!(roots[0], Complex64::new(-1.0, 0.0));
        // equal magnitudes keep their original order
        assert_eq!(roots[1], Complex64::new(0.0, 2.0));
        assert_eq!(roots[2], Complex64::new(2.0, 0.0));

        let sorted = solve_quadratic(&[1.0, -3.0, 2.0], SolveOptions::default())
            .unwrap()
            .sorted_by_magnitude();
        assert!(sorted.roots[0].norm() <= sorted.roots[1].norm());
    }

    #[test]
    fn test_strategy_substitution() {
        // the product-matched strategy leaves well-conditioned cubics alone
        let coefficients = [1.0, 0.0, -7.0, 6.0];
        let default_roots = solve_cubic(&coefficients, SolveOptions::default())
            .unwrap()
            .roots;
        let matched = solve_cubic_with(
            &coefficients,
            SolveOptions::default(),
            &ProductMatched(RationalCubeRoot::default()),
        )
        .unwrap()
        .roots;
        for (lhs, rhs) in default_roots.iter().zip(&matched) {
            assert!((*lhs - *rhs).norm() < 1e-9);
        }
        // and the float-only heuristic still solves real-root cubics
        let float_only = solve_cubic_with(
            &coefficients,
            SolveOptions::default(),
            &RealBranchCubeRoot::default(),
        )
        .unwrap();
        assert_real_roots(&float_only, &[-3.0, 1.0, 2.0], 1e-6);
    }
}
