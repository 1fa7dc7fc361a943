//! Account routes: creation, listing, funding, transaction history

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{AccountStatus, AccountType, Transaction, TransactionWithAccount, User},
    validation::validate_card_number,
};

/// Request for account creation
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub account_type: AccountType,
}

/// The payment instrument supplying funds in a deposit
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FundingSource {
    Card {
        account_number: String,
        #[serde(default)]
        routing_number: Option<String>,
    },
    Bank {
        account_number: String,
        routing_number: String,
    },
}

impl FundingSource {
    /// Short name used in the transaction description
    pub fn source_type(&self) -> &'static str {
        match self {
            FundingSource::Card { .. } => "card",
            FundingSource::Bank { .. } => "bank",
        }
    }
}

/// Validate a funding source payload
///
/// Cards must carry a valid card number and no routing number; bank sources
/// need a digits-only account number and a 9-digit routing number.
fn validate_funding_source(source: &FundingSource) -> Result<(), String> {
    match source {
        FundingSource::Card {
            account_number,
            routing_number,
        } => {
            if routing_number.is_some() {
                return Err("Card funding cannot include a routing number".to_string());
            }
            validate_card_number(account_number)
        }
        FundingSource::Bank {
            account_number,
            routing_number,
        } => {
            if account_number.is_empty() || !account_number.chars().all(|c| c.is_ascii_digit()) {
                return Err("Account number must contain only digits".to_string());
            }

            let routing = routing_number.trim();
            if routing.len() != 9 || !routing.chars().all(|c| c.is_ascii_digit()) {
                return Err("Routing number must be 9 digits".to_string());
            }

            Ok(())
        }
    }
}

/// Request for funding an account
#[derive(Debug, Deserialize)]
pub struct FundAccountRequest {
    pub amount: f64,
    pub funding_source: FundingSource,
}

/// Response for a completed funding request
#[derive(Debug, Serialize)]
pub struct FundAccountResponse {
    pub transaction: Transaction,
    pub new_balance: f64,
}

/// Create a new account for the authenticated user
pub async fn create_account(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .account_repository
        .find_by_user_and_type(user.id, payload.account_type)
        .await
        .map_err(|e| {
            error!("Failed to look up accounts: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::Conflict(format!(
            "You already have a {} account",
            payload.account_type
        )));
    }

    let account = state
        .account_repository
        .create(user.id, payload.account_type)
        .await
        .map_err(|e| {
            error!("Failed to create account: {}", e);
            ApiError::InternalServerError
        })?;

    info!(
        "Created {} account {} for user {}",
        account.account_type, account.account_number, user.id
    );

    Ok((StatusCode::CREATED, Json(account)))
}

/// List the authenticated user's accounts
pub async fn get_accounts(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<impl IntoResponse> {
    let accounts = state
        .account_repository
        .find_by_user(user.id)
        .await
        .map_err(|e| {
            error!("Failed to list accounts: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(accounts))
}

/// Fund an account from a card or bank funding source
pub async fn fund_account(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<FundAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.amount <= 0.0 {
        return Err(ApiError::BadRequest(
            "Amount must be greater than zero".to_string(),
        ));
    }

    validate_funding_source(&payload.funding_source).map_err(ApiError::BadRequest)?;

    let account = state
        .account_repository
        .find_for_user(account_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to look up account: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    if account.status != AccountStatus::Active {
        return Err(ApiError::BadRequest("Account is not active".to_string()));
    }

    let description = format!("Funding from {}", payload.funding_source.source_type());

    let (transaction, new_balance) = state
        .account_repository
        .fund(account.id, payload.amount, &description)
        .await
        .map_err(|e| {
            error!("Failed to fund account: {}", e);
            ApiError::InternalServerError
        })?;

    info!(
        "Funded account {} with {}; new balance {}",
        account.account_number, payload.amount, new_balance
    );

    Ok(Json(FundAccountResponse {
        transaction,
        new_balance,
    }))
}

/// List an account's transactions, newest first
pub async fn get_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let account = state
        .account_repository
        .find_for_user(account_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to look up account: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let transactions = state
        .account_repository
        .transactions_for_account(account.id)
        .await
        .map_err(|e| {
            error!("Failed to list transactions: {}", e);
            ApiError::InternalServerError
        })?;

    let enriched: Vec<TransactionWithAccount> = transactions
        .into_iter()
        .map(|transaction| TransactionWithAccount {
            transaction,
            account_type: account.account_type,
        })
        .collect();

    Ok(Json(enriched))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_card_funding_with_valid_number() {
        let source = FundingSource::Card {
            account_number: "4111111111111111".to_string(),
            routing_number: None,
        };
        assert_eq!(validate_funding_source(&source), Ok(()));
        assert_eq!(source.source_type(), "card");
    }

    #[test]
    fn rejects_card_funding_with_routing_number() {
        let source = FundingSource::Card {
            account_number: "4111111111111111".to_string(),
            routing_number: Some("021000021".to_string()),
        };
        assert_eq!(
            validate_funding_source(&source),
            Err("Card funding cannot include a routing number".to_string())
        );
    }

    #[test]
    fn rejects_card_funding_with_bad_number() {
        let source = FundingSource::Card {
            account_number: "4111111111111112".to_string(),
            routing_number: None,
        };
        assert_eq!(
            validate_funding_source(&source),
            Err("Invalid card number".to_string())
        );
    }

    #[test]
    fn accepts_bank_funding() {
        let source = FundingSource::Bank {
            account_number: "123456".to_string(),
            routing_number: "021000021".to_string(),
        };
        assert_eq!(validate_funding_source(&source), Ok(()));
        assert_eq!(source.source_type(), "bank");
    }

    #[test]
    fn trims_bank_routing_number() {
        let source = FundingSource::Bank {
            account_number: "123456".to_string(),
            routing_number: " 021000021 ".to_string(),
        };
        assert_eq!(validate_funding_source(&source), Ok(()));
    }

    #[test]
    fn rejects_bad_bank_fields() {
        let source = FundingSource::Bank {
            account_number: "12a456".to_string(),
            routing_number: "021000021".to_string(),
        };
        assert_eq!(
            validate_funding_source(&source),
            Err("Account number must contain only digits".to_string())
        );

        let source = FundingSource::Bank {
            account_number: "123456".to_string(),
            routing_number: "12345".to_string(),
        };
        assert_eq!(
            validate_funding_source(&source),
            Err("Routing number must be 9 digits".to_string())
        );
    }

    #[test]
    fn funding_source_deserializes_from_tagged_json() {
        let card: FundingSource = serde_json::from_str(
            r#"{"type": "card", "account_number": "4111111111111111"}"#,
        )
        .unwrap();
        assert!(matches!(card, FundingSource::Card { .. }));

        let bank: FundingSource = serde_json::from_str(
            r#"{"type": "bank", "account_number": "123456", "routing_number": "021000021"}"#,
        )
        .unwrap();
        assert!(matches!(bank, FundingSource::Bank { .. }));

        assert!(serde_json::from_str::<FundingSource>(r#"{"type": "wire"}"#).is_err());
    }
}
