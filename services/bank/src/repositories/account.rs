//! Account and transaction repository for database operations
//!
//! The two multi-step writes here, account creation (uniqueness probe +
//! insert) and funding (ledger insert + balance update), each run inside a
//! single database transaction so a failure partway leaves no partial
//! state.

use anyhow::Result;
use rand::Rng;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Account, AccountType, Transaction, TransactionStatus, TransactionType};

const ACCOUNT_COLUMNS: &str =
    "id, user_id, account_number, account_type, balance, status, created_at, updated_at";

const TRANSACTION_COLUMNS: &str =
    "id, account_id, transaction_type, amount, description, status, processed_at, created_at";

fn account_from_row(row: &PgRow) -> Result<Account> {
    let account_type: String = row.get("account_type");
    let status: String = row.get("status");

    Ok(Account {
        id: row.get("id"),
        user_id: row.get("user_id"),
        account_number: row.get("account_number"),
        account_type: account_type.parse()?,
        balance: row.get("balance"),
        status: status.parse()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn transaction_from_row(row: &PgRow) -> Result<Transaction> {
    let transaction_type: String = row.get("transaction_type");
    let status: String = row.get("status");

    Ok(Transaction {
        id: row.get("id"),
        account_id: row.get("account_id"),
        transaction_type: transaction_type.parse()?,
        amount: row.get("amount"),
        description: row.get("description"),
        status: status.parse()?,
        processed_at: row.get("processed_at"),
        created_at: row.get("created_at"),
    })
}

/// Generate a candidate 10-digit account number
fn generate_account_number() -> String {
    let n: u64 = rand::thread_rng().gen_range(0..10_000_000_000);
    format!("{:010}", n)
}

/// Account repository
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the user's account of the given type, if one exists
    pub async fn find_by_user_and_type(
        &self,
        user_id: Uuid,
        account_type: AccountType,
    ) -> Result<Option<Account>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE user_id = $1 AND account_type = $2
            "#
        ))
        .bind(user_id)
        .bind(account_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| account_from_row(&row)).transpose()
    }

    /// Create an account with a fresh unique account number
    ///
    /// Regenerates the candidate number until no collision exists, then
    /// inserts with zero balance and active status. Probe and insert share
    /// one database transaction.
    pub async fn create(&self, user_id: Uuid, account_type: AccountType) -> Result<Account> {
        info!("Creating {} account for user: {}", account_type, user_id);

        let mut tx = self.pool.begin().await?;

        let account_number = loop {
            let candidate = generate_account_number();
            let existing =
                sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM accounts WHERE account_number = $1")
                    .bind(&candidate)
                    .fetch_one(&mut *tx)
                    .await?;

            if existing == 0 {
                break candidate;
            }
        };

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO accounts (user_id, account_number, account_type, balance, status)
            VALUES ($1, $2, $3, 0, 'active')
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&account_number)
        .bind(account_type.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        account_from_row(&row)
    }

    /// List all accounts owned by a user
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Account>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE user_id = $1
            ORDER BY created_at
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(account_from_row).collect()
    }

    /// Find an account by id, scoped to its owner
    pub async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Account>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| account_from_row(&row)).transpose()
    }

    /// Apply a funding deposit to an account
    ///
    /// Inserts the completed deposit transaction and adds the amount to the
    /// account balance in one database transaction; returns the new ledger
    /// entry and the updated balance.
    pub async fn fund(
        &self,
        account_id: Uuid,
        amount: f64,
        description: &str,
    ) -> Result<(Transaction, f64)> {
        info!("Funding account {} with {}", account_id, amount);

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO transactions (account_id, transaction_type, amount, description, status, processed_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(account_id)
        .bind(TransactionType::Deposit.as_str())
        .bind(amount)
        .bind(description)
        .bind(TransactionStatus::Completed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let new_balance: f64 = sqlx::query_scalar(
            r#"
            UPDATE accounts
            SET balance = balance + $1, updated_at = NOW()
            WHERE id = $2
            RETURNING balance
            "#,
        )
        .bind(amount)
        .bind(account_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((transaction_from_row(&row)?, new_balance))
    }

    /// List an account's transactions, newest first
    pub async fn transactions_for_account(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE account_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(transaction_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_numbers_are_ten_digits() {
        for _ in 0..100 {
            let number = generate_account_number();
            assert_eq!(number.len(), 10);
            assert!(number.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
