use crate::domain::phone::PhoneNumber;
use crate::error::CheckoutError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A non-negative amount in the checkout currency.
///
/// The value is kept exactly as given: `1500` renders and is sent as `1500`,
/// `1500.50` as `1500.50`. No rounding or fixed scale is applied.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, CheckoutError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(CheckoutError::ValidationError(
                "Amount must not be negative".to_string(),
            ))
        }
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CheckoutError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| CheckoutError::ValidationError(format!("Invalid amount {s:?}: {e}")))?;
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The payment context built when a plan is picked.
///
/// It is handed to the dispatch step explicitly, so a dispatch always sends
/// the amount of the plan it was opened for.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPayment {
    plan: String,
    amount: Amount,
}

impl PendingPayment {
    pub fn new(plan: impl Into<String>, amount: Amount) -> Result<Self, CheckoutError> {
        let plan = plan.into();
        if plan.trim().is_empty() {
            return Err(CheckoutError::ValidationError(
                "Plan name must not be empty".to_string(),
            ));
        }
        Ok(Self { plan, amount })
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Body of a `POST /mpesa/stkpush` call.
#[derive(Debug, Clone, PartialEq)]
pub struct StkPushRequest {
    pub phone_number: PhoneNumber,
    pub amount: Amount,
}

impl StkPushRequest {
    pub fn new(phone_number: PhoneNumber, amount: Amount) -> Self {
        Self {
            phone_number,
            amount,
        }
    }

    /// Multipart field names and values, in the order they are sent.
    pub fn form_fields(&self) -> [(&'static str, String); 2] {
        [
            ("phone_number", self.phone_number.as_str().to_string()),
            ("amount", self.amount.to_string()),
        ]
    }
}

/// What the gateway says after accepting an STK push.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StkPushAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_rejects_negative() {
        assert!(Amount::new(dec!(-1)).is_err());
        assert!(Amount::new(dec!(0)).is_ok());
    }

    #[test]
    fn test_amount_keeps_given_scale() {
        assert_eq!(Amount::new(dec!(1500)).unwrap().to_string(), "1500");
        assert_eq!(Amount::new(dec!(1500.50)).unwrap().to_string(), "1500.50");
        assert_eq!("250".parse::<Amount>().unwrap().to_string(), "250");
        assert!("abc".parse::<Amount>().is_err());
    }

    #[test]
    fn test_pending_payment_requires_plan() {
        let amount = Amount::new(dec!(500)).unwrap();
        assert!(PendingPayment::new("", amount).is_err());
        assert!(PendingPayment::new("   ", amount).is_err());

        let pending = PendingPayment::new("pro", amount).unwrap();
        assert_eq!(pending.plan(), "pro");
        assert_eq!(pending.amount(), amount);
    }

    #[test]
    fn test_form_fields_send_raw_phone() {
        let request = StkPushRequest::new(
            PhoneNumber::parse("+254712345678").unwrap(),
            Amount::new(dec!(500)).unwrap(),
        );
        let fields = request.form_fields();
        assert_eq!(fields[0], ("phone_number", "+254712345678".to_string()));
        assert_eq!(fields[1], ("amount", "500".to_string()));
    }

    #[test]
    fn test_ack_tolerates_missing_fields() {
        let ack: StkPushAck = serde_json::from_str("{}").unwrap();
        assert_eq!(ack, StkPushAck::default());

        let ack: StkPushAck =
            serde_json::from_str(r#"{"message":"Success","detail":"Check phone for PIN."}"#)
                .unwrap();
        assert_eq!(ack.message.as_deref(), Some("Success"));
    }
}
