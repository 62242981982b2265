//! Rewriting `px` literals inside a value string.

use anyhow::{Result, bail};
use core::num::FpCategory;
use css_values_units::{PixelToken, pixel_tokens};

/// Unit emitted for converted lengths.
pub const REM_UNIT: &str = "rem";

/// Largest accepted `unitPrecision`; beyond this `f64` carries no more digits.
pub const MAX_UNIT_PRECISION: u32 = 15;

/// Converts pixel literals to `rem` for one resolved base size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PxConverter {
    base_size: f64,
    precision: u32,
    min_value: f64,
}

impl PxConverter {
    /// # Errors
    /// Returns an error when `base_size` is not a positive finite number,
    /// `min_value` is negative or not finite, or `precision` exceeds
    /// [`MAX_UNIT_PRECISION`].
    pub fn new(base_size: f64, precision: u32, min_value: f64) -> Result<Self> {
        if !base_size.is_finite() || base_size <= 0.0 {
            bail!("root value must be a positive number, got {base_size}");
        }
        if !min_value.is_finite() || min_value < 0.0 {
            bail!("minimum pixel value must be a non-negative number, got {min_value}");
        }
        if precision > MAX_UNIT_PRECISION {
            bail!("unit precision must be at most {MAX_UNIT_PRECISION}, got {precision}");
        }
        Ok(Self {
            base_size,
            precision,
            min_value,
        })
    }

    /// Rewrite every qualifying pixel literal in `value`; everything else is copied verbatim.
    pub fn convert(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut copied = 0;
        for token in pixel_tokens(value) {
            let Some(replacement) = self.convert_token(&token) else {
                continue;
            };
            out.push_str(&value[copied..token.start]);
            out.push_str(&replacement);
            copied = token.end;
        }
        out.push_str(&value[copied..]);
        out
    }

    /// Replacement text for one literal, or `None` when it stays as written.
    pub fn convert_token(&self, token: &PixelToken) -> Option<String> {
        if token.magnitude < self.min_value {
            return None;
        }
        let rounded = to_fixed(token.magnitude / self.base_size, self.precision);
        if !rounded.is_finite() {
            log::debug!(target: "css_pxtorem", "leaving {}px as written, too large to convert", token.magnitude);
            return None;
        }
        if rounded.classify() == FpCategory::Zero {
            return Some("0".to_owned());
        }
        let sign = token.sign.map_or("", |sign| sign.as_str());
        Some(format!("{sign}{rounded}{REM_UNIT}"))
    }
}

/// Round a non-negative `number` to `precision` decimals.
///
/// The value is truncated at `precision + 1` digits first and the last digit is
/// then rounded half up, which differs from `(number * 10^p).round() / 10^p`
/// for inputs whose binary value sits just below a decimal half, such as
/// `0.001125` at five digits (`0.00113` here, `0.00112` the direct way).
pub fn to_fixed(number: f64, precision: u32) -> f64 {
    let multiplier = 10_f64.powi(precision as i32 + 1);
    let whole_number = (number * multiplier).floor();
    (whole_number / 10.0).round() * 10.0 / multiplier
}

#[cfg(test)]
mod tests {
    use super::{PxConverter, to_fixed};

    fn converter(base: f64, precision: u32, min: f64) -> PxConverter {
        PxConverter::new(base, precision, min).unwrap()
    }

    #[test]
    fn basic_conversions() {
        let px = converter(16.0, 5, 0.0);
        assert_eq!(px.convert("16px"), "1rem");
        assert_eq!(px.convert("6px"), "0.375rem");
        assert_eq!(px.convert("13px"), "0.8125rem");
        assert_eq!(px.convert("0px"), "0");
        assert_eq!(px.convert("0.5px"), "0.03125rem");
    }

    #[test]
    fn repeating_fraction_is_rounded() {
        assert_eq!(converter(3.0, 5, 0.0).convert("10px"), "3.33333rem");
        assert_eq!(converter(75.0, 5, 0.0).convert("50px"), "0.66667rem");
        assert_eq!(converter(16.0, 2, 0.0).convert("15px"), "0.94rem");
    }

    #[test]
    fn scaled_floor_rounding_differs_from_direct_rounding() {
        let px = converter(16.0, 5, 0.0);
        assert_eq!(px.convert("0.018px"), "0.00113rem");
        assert_eq!(px.convert("2.09px"), "0.13062rem");
        assert_eq!(converter(16.0, 2, 0.0).convert("2.32px"), "0.15rem");

        let direct = |number: f64, precision: i32| {
            let scale = 10_f64.powi(precision);
            (number * scale + 0.5).floor() / scale
        };
        assert!((direct(0.018 / 16.0, 5) - 0.00112).abs() < 1e-12);
        assert!((to_fixed(0.018 / 16.0, 5) - 0.00113).abs() < 1e-12);
        assert!((direct(2.09 / 16.0, 5) - 0.13063).abs() < 1e-12);
        assert!((to_fixed(2.09 / 16.0, 5) - 0.13062).abs() < 1e-12);
    }

    #[test]
    fn zero_precision() {
        let px = converter(16.0, 0, 0.0);
        assert_eq!(px.convert("8px"), "1rem");
        assert_eq!(px.convert("7px"), "0");
        assert_eq!(px.convert("32px"), "2rem");
    }

    #[test]
    fn min_value_is_a_floor() {
        let px = converter(16.0, 5, 2.0);
        assert_eq!(px.convert("1px"), "1px");
        assert_eq!(px.convert("1px 2px"), "1px 0.125rem");
        assert_eq!(px.convert("-1px"), "-1px");
    }

    #[test]
    fn shorthand_and_surrounding_text() {
        let px = converter(16.0, 5, 0.0);
        assert_eq!(px.convert("0 auto 12px 24px"), "0 auto 0.75rem 1.5rem");
        assert_eq!(px.convert("calc(100% - 32px)"), "calc(100% - 2rem)");
        assert_eq!(
            px.convert("1px solid rgba(0, 0, 0, .5)"),
            "0.0625rem solid rgba(0, 0, 0, .5)"
        );
    }

    #[test]
    fn signs_are_kept() {
        let px = converter(16.0, 5, 0.0);
        assert_eq!(px.convert("-16px"), "-1rem");
        assert_eq!(px.convert("translate(-8px, +4px)"), "translate(-0.5rem, +0.25rem)");
        assert_eq!(px.convert("-0px"), "0");
    }

    #[test]
    fn untouched_values() {
        let px = converter(16.0, 5, 0.0);
        assert_eq!(px.convert("auto"), "auto");
        assert_eq!(px.convert("1.5rem"), "1.5rem");
        assert_eq!(px.convert("url(a-10px.png)"), "url(a-10px.png)");
        assert_eq!(px.convert("\"16px\""), "\"16px\"");
        assert_eq!(px.convert(""), "");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let px = converter(16.0, 5, 0.0);
        let once = px.convert("10px 20px");
        assert_eq!(px.convert(&once), once);
    }

    #[test]
    fn oversized_literals_stay_as_written() {
        let px = converter(16.0, 5, 0.0);
        let huge = format!("1{}px", "0".repeat(400));
        assert_eq!(px.convert(&huge), huge);
        let large = format!("1{}px 16px", "0".repeat(305));
        assert_eq!(px.convert(&large), format!("1{}px 1rem", "0".repeat(305)));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(PxConverter::new(0.0, 5, 0.0).is_err());
        assert!(PxConverter::new(-16.0, 5, 0.0).is_err());
        assert!(PxConverter::new(f64::NAN, 5, 0.0).is_err());
        assert!(PxConverter::new(16.0, 5, -1.0).is_err());
        assert!(PxConverter::new(16.0, 16, 0.0).is_err());
    }
}
