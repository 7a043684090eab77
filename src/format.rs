// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information
use num_complex::Complex64;

/// rounds to `digits` decimal places, half away from zero
fn round_to_digits(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// -0 prints as 0
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

fn component(value: f64, round_digits: Option<i32>) -> f64 {
    let value = match round_digits {
        Some(digits) => round_to_digits(value, digits),
        None => value,
    };
    normalize_zero(value)
}

/// Renders `R`, `R+Ii` or `R-Ii`.
///
/// `round_digits` of `None` disables rounding; otherwise both components
/// are rounded half-away-from-zero to that many decimal places first, so an
/// imaginary part that rounds to zero drops the `i` term entirely.
pub fn complex_to_string(value: Complex64, round_digits: Option<i32>) -> String {
    let re = component(value.re, round_digits);
    let im = component(value.im, round_digits);
    if im == 0.0 {
        re.to_string()
    } else if im > 0.0 {
        format!("{}+{}i", re, im)
    } else {
        format!("{}{}i", re, im)
    }
}

/// comma-joined rendering of a root sequence
pub fn complex_slice_to_string(values: &[Complex64], round_digits: Option<i32>) -> String {
    let mut out = String::new();
    for (index, value) in values.iter().enumerate() {
        if index != 0 {
            out.push(',');
        }
        out.push_str(&complex_to_string(*value, round_digits));
    }
    out
}

/// one `[index]:value` line per root
pub fn complex_slice_to_lines(values: &[Complex64], round_digits: Option<i32>) -> String {
    let mut out = String::new();
    for (index, value) in values.iter().enumerate() {
        if index != 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "[{}]:{}",
            index,
            complex_to_string(*value, round_digits)
        ));
    }
    out
}
