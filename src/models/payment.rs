use serde::Deserialize;

use crate::utils::error::AppError;

/// Card details submitted with a booking. Pattern-validated only, never
/// persisted; dropped as soon as the simulated payment completes.
#[derive(Debug, Deserialize)]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub name: String,
}

impl PaymentDetails {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "cardholder name is required".to_string(),
            ));
        }
        if !is_digits(&self.card_number, 16) {
            return Err(AppError::ValidationError(
                "card number must be 16 digits".to_string(),
            ));
        }
        if !is_valid_expiry(&self.expiry_date) {
            return Err(AppError::ValidationError(
                "expiry date must be MM/YY".to_string(),
            ));
        }
        if !is_digits(&self.cvv, 3) {
            return Err(AppError::ValidationError(
                "cvv must be 3 digits".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_valid_expiry(value: &str) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };
    if !is_digits(month, 2) || !is_digits(year, 2) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(1..=12))
}
