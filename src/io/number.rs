//! Compact number formatting for text output.
//!
//! LDraw and ASCII STL files are conventionally written with C's `%g`: six
//! significant digits, trailing zeros dropped, and scientific notation only
//! for very large or very small magnitudes. [`G`] reproduces that layout.

use std::fmt;

/// Significant digits, as with `%g`.
const PRECISION: i32 = 6;

/// Display wrapper that formats an `f64` like C's `%g`.
///
/// Negative zero is written as `0`.
///
/// # Example
/// ```
/// use stl2ldraw::io::G;
///
/// assert_eq!(G(2.5).to_string(), "2.5");
/// assert_eq!(G(-62.5).to_string(), "-62.5");
/// assert_eq!(G(1.0 / 3.0).to_string(), "0.333333");
/// assert_eq!(G(1.0e-5).to_string(), "1e-05");
/// assert_eq!(G(1234567.0).to_string(), "1.23457e+06");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct G(pub f64);

impl fmt::Display for G {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v == 0.0 {
            return f.write_str("0");
        }
        if !v.is_finite() {
            return write!(f, "{}", v);
        }

        // Round to the target precision first; the exponent after rounding
        // decides between fixed and scientific layout.
        let sci = format!("{:.*e}", (PRECISION - 1) as usize, v);
        let (mantissa, exp) = match sci.split_once('e') {
            Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
            None => (sci.as_str(), 0),
        };

        if exp < -4 || exp >= PRECISION {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
        } else {
            let decimals = (PRECISION - 1 - exp) as usize;
            let fixed = format!("{:.*}", decimals, v);
            f.write_str(trim_fraction(&fixed))
        }
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
