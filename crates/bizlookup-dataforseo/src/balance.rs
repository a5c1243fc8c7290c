//! Account balance check.

use serde::Serialize;

use crate::client::DataForSeoClient;
use crate::error::DataForSeoError;
use crate::types::{ApiResponse, UserDataResult};

pub const USER_DATA_ENDPOINT: &str = "v3/appendix/user_data";

const DEFAULT_CURRENCY: &str = "USD";

/// Remaining API credit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub balance: f64,
    pub currency: String,
}

impl DataForSeoClient {
    /// Reads the remaining account balance.
    ///
    /// Advisory only: a response without a balance reads as zero rather than
    /// failing, so "unknown" and "empty" look the same to the caller.
    ///
    /// # Errors
    ///
    /// Only transport failures: [`DataForSeoError::Status`],
    /// [`DataForSeoError::Http`], or [`DataForSeoError::Deserialize`].
    pub async fn balance(&self) -> Result<Balance, DataForSeoError> {
        let envelope: ApiResponse<UserDataResult> = self.get(USER_DATA_ENDPOINT).await?;

        let money = envelope
            .into_first_task()
            .and_then(|task| task.into_first_result())
            .and_then(|result| result.money);

        let (balance, currency) = match money {
            Some(money) => (money.balance, money.currency),
            None => {
                tracing::warn!("user_data response carried no balance; assuming zero");
                (None, None)
            }
        };

        Ok(Balance {
            balance: balance.unwrap_or(0.0),
            currency: currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        })
    }
}
