use crate::error::{CheckoutError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Kenyan mobile numbers, with an optional `254`, `+254` or `0` prefix.
///
/// The capture group is the 9-digit subscriber number: `7` followed by a
/// Safaricom/Airtel/Telkom group, or the newer `10x`/`11x` ranges.
static KENYAN_MOBILE: LazyLock<std::result::Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^(?:254|\+254|0)?((?:7(?:[129][0-9]|0[0-8]|4[0-1])|1[01][0-9])[0-9]{6})$")
});

const COUNTRY_CODE: &str = "254";

/// A phone number that passed the mobile-format check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    raw: String,
    subscriber: String,
}

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self> {
        let pattern = KENYAN_MOBILE
            .as_ref()
            .map_err(|e| CheckoutError::ValidationError(e.to_string()))?;
        let captures = pattern
            .captures(raw)
            .ok_or_else(|| CheckoutError::InvalidPhone(raw.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            subscriber: captures[1].to_string(),
        })
    }

    /// The number exactly as the payer typed it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn subscriber(&self) -> &str {
        &self.subscriber
    }

    /// International form expected by the gateway, e.g. `254712345678`.
    pub fn msisdn(&self) -> String {
        format!("{COUNTRY_CODE}{}", self.subscriber)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
