// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information
pub use crate::{
    combinations::combinations,
    cube_root::{CubeRootStrategy as _, ProductMatched, RationalCubeRoot, RealBranchCubeRoot},
    format::{complex_slice_to_lines, complex_slice_to_string, complex_to_string},
    fraction::Fraction,
    polynomial::{coefficients_to_string, Polynomial},
    solve::{
        solve, solve_cubic, solve_cubic_with, solve_quadratic, solve_quartic, solve_quartic_with,
        sort_roots_by_magnitude, SolveOptions, Solution, SolverError,
    },
};
pub use num_complex::Complex64;
