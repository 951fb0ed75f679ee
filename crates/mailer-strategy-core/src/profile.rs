use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::types::{BrandProfile, Industry, TargetAudience};

/// How free-text revenue and AOV fields become numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    /// Browser `parseFloat` rules: longest numeric prefix, NaN when there is none.
    #[default]
    Lenient,
    /// The whole field must be a finite number.
    Strict,
}

impl FromStr for NumericMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown numeric mode: {other}")),
        }
    }
}

/// Brand form fields exactly as a user typed or picked them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandForm {
    pub revenue: String,
    pub aov: String,
    pub industry: String,
    pub target_audience: String,
    pub budget_constraint: bool,
    pub has_repeat_customers: bool,
}

impl Default for BrandForm {
    fn default() -> Self {
        Self {
            revenue: String::new(),
            aov: String::new(),
            industry: Industry::Ecommerce.code().to_string(),
            target_audience: TargetAudience::General.code().to_string(),
            budget_constraint: false,
            has_repeat_customers: true,
        }
    }
}

impl BrandForm {
    pub fn into_profile(self, mode: NumericMode) -> Result<BrandProfile, ProfileError> {
        Ok(BrandProfile {
            annual_revenue: parse_number("revenue", &self.revenue, mode)?,
            average_order_value: parse_number("aov", &self.aov, mode)?,
            industry: self.industry.parse()?,
            target_audience: self.target_audience.parse()?,
            budget_constrained: self.budget_constraint,
            has_repeat_customers: self.has_repeat_customers,
        })
    }
}

fn parse_number(field: &'static str, raw: &str, mode: NumericMode) -> Result<f64, ProfileError> {
    match mode {
        NumericMode::Lenient => Ok(parse_float_lenient(raw)),
        NumericMode::Strict => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ProfileError::InvalidNumber {
                field,
                value: raw.to_string(),
            }),
    }
}

/// Parses the longest leading decimal literal of `raw`, ignoring leading
/// whitespace. Returns NaN when no digits lead the string.
pub fn parse_float_lenient(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let at = |i: usize| bytes.get(i).copied();

    let mut end = 0;
    if matches!(at(end), Some(b'+' | b'-')) {
        end += 1;
    }
    if s.get(end..).is_some_and(|rest| rest.starts_with("Infinity")) {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut digits = 0;
    while matches!(at(end), Some(b'0'..=b'9')) {
        end += 1;
        digits += 1;
    }
    if at(end) == Some(b'.') {
        let mut frac_end = end + 1;
        while matches!(at(frac_end), Some(b'0'..=b'9')) {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if digits + frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if matches!(at(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(at(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_start = exp_end;
        while matches!(at(exp_end), Some(b'0'..=b'9')) {
            exp_end += 1;
        }
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s.get(..end)
        .and_then(|literal| literal.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
