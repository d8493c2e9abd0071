//! Simulated payment processing. There is no gateway behind this module:
//! card details are pattern-checked, the configured delay elapses, and a
//! reference is minted. Details are dropped afterwards, never stored.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::Serialize;
use tracing::info;

use crate::models::payment::PaymentDetails;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub reference: String,
    pub processed_at: DateTime<Utc>,
}

pub async fn process(
    details: &PaymentDetails,
    delay: Duration,
) -> Result<PaymentReceipt, AppError> {
    details.validate()?;

    tokio::time::sleep(delay).await;

    let mut buf = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut buf);
    let reference = format!("sim-{}", hex::encode(buf));

    info!(reference = %reference, "Simulated payment processed");

    Ok(PaymentReceipt {
        reference,
        processed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> PaymentDetails {
        PaymentDetails {
            card_number: "4242424242424242".to_string(),
            expiry_date: "09/29".to_string(),
            cvv: "123".to_string(),
            name: "Ada Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn process_returns_a_receipt() {
        let receipt = process(&details(), Duration::ZERO).await.unwrap();
        assert!(receipt.reference.starts_with("sim-"));
    }

    #[tokio::test]
    async fn process_rejects_invalid_details() {
        let mut bad = details();
        bad.cvv = "1".to_string();
        assert!(process(&bad, Duration::ZERO).await.is_err());
    }

    #[tokio::test]
    async fn receipts_are_unique() {
        let a = process(&details(), Duration::ZERO).await.unwrap();
        let b = process(&details(), Duration::ZERO).await.unwrap();
        assert_ne!(a.reference, b.reference);
    }
}
