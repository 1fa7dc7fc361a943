//! Account model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account type, at most one of each per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            other => Err(anyhow::anyhow!("Unknown account type: {}", other)),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            other => Err(anyhow::anyhow!("Unknown account status: {}", other)),
        }
    }
}

/// Account entity
///
/// The balance column is the authoritative running total; it only grows
/// through funding deposits applied in the same database transaction as
/// the ledger insert.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_number: String,
    pub account_type: AccountType,
    pub balance: f64,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_round_trips_through_strings() {
        assert_eq!(AccountType::Checking.as_str(), "checking");
        assert_eq!("savings".parse::<AccountType>().unwrap(), AccountType::Savings);
        assert!("money-market".parse::<AccountType>().is_err());
    }

    #[test]
    fn account_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AccountType::Checking).unwrap(),
            "\"checking\""
        );
        assert_eq!(
            serde_json::from_str::<AccountType>("\"savings\"").unwrap(),
            AccountType::Savings
        );
    }

    #[test]
    fn account_status_round_trips_through_strings() {
        assert_eq!("active".parse::<AccountStatus>().unwrap(), AccountStatus::Active);
        assert_eq!("inactive".parse::<AccountStatus>().unwrap(), AccountStatus::Inactive);
        assert!("frozen".parse::<AccountStatus>().is_err());
    }
}
