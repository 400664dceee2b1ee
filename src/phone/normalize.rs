//! Phone number normalization to the `+92XXXXXXXXXX` national format.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use serde::Serialize;
use std::fmt;

/// Country calling code every canonical number starts with.
pub const COUNTRY_PREFIX: &str = "+92";

/// Digits expected after the country prefix.
pub const LOCAL_DIGITS: usize = 10;

/// A phone number in canonical `+92` + 10 digits form.
///
/// Only [`normalize`] creates these, so holding one means it passed
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalNumber(String);

impl CanonicalNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The ten digits after `+92`, as typed into the dial pad.
    pub fn local_digits(&self) -> &str {
        &self.0[COUNTRY_PREFIX.len()..]
    }
}

impl fmt::Display for CanonicalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip whitespace and hyphens from a raw cell value.
pub fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Rewrite a known leading sequence. Only the first matching rule applies.
fn rewrite_prefix(num: &str) -> String {
    if let Some(rest) = num.strip_prefix("0092") {
        format!("{}{}", COUNTRY_PREFIX, rest)
    } else if let Some(rest) = num.strip_prefix('0') {
        format!("{}{}", COUNTRY_PREFIX, rest)
    } else if num.starts_with("92") {
        format!("+{}", num)
    } else if num.starts_with('3') {
        format!("{}{}", COUNTRY_PREFIX, num)
    } else {
        num.to_string()
    }
}

fn is_canonical(num: &str) -> bool {
    num.strip_prefix(COUNTRY_PREFIX)
        .map(|rest| rest.len() == LOCAL_DIGITS && rest.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

/// Normalize a raw cell value.
///
/// Returns the cleaned/rewritten text as the error when the result is not
/// `+92` followed by exactly ten digits.
pub fn normalize(raw: &str) -> Result<CanonicalNumber, String> {
    let rewritten = rewrite_prefix(&clean(raw));
    if is_canonical(&rewritten) {
        Ok(CanonicalNumber(rewritten))
    } else {
        Err(rewritten)
    }
}
