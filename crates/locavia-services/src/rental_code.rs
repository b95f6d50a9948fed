//! Rental code sequence
//!
//! Every rental carries a human-facing code like `AL0042`: the fixed `AL`
//! prefix plus a zero-padded sequence number, unique and monotonically
//! increasing within a tenant. The sequence state lives in the
//! `rental_code_counters` table and is advanced with a single upsert inside
//! the checkout transaction, so concurrent checkouts serialize on the
//! counter row and can never draw the same number.

use locavia_core::{AppError, AppResult};
use sqlx::{Postgres, Transaction};
use tracing::{debug, error};
use uuid::Uuid;

use crate::constants::{RENTAL_CODE_PAD_WIDTH, RENTAL_CODE_PREFIX};

/// Format a sequence number as a rental code
///
/// Numbers wider than the pad keep all their digits; `AL10000` follows
/// `AL9999`.
pub fn format_code(value: i64) -> String {
    format!(
        "{}{:0width$}",
        RENTAL_CODE_PREFIX,
        value,
        width = RENTAL_CODE_PAD_WIDTH
    )
}

/// Parse a rental code back into its sequence number
pub fn parse_code(code: &str) -> Option<i64> {
    let digits = code.strip_prefix(RENTAL_CODE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Draw the next rental code for a tenant
///
/// Runs on the caller's transaction: the drawn number becomes observable
/// only if the surrounding checkout commits. Rolled-back checkouts leave
/// gaps; the sequence is monotonic, not dense.
pub async fn next_code(tx: &mut Transaction<'_, Postgres>, tenant_id: Uuid) -> AppResult<String> {
    let (value,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO rental_code_counters (tenant_id, last_value)
        VALUES ($1, 1)
        ON CONFLICT (tenant_id)
        DO UPDATE SET last_value = rental_code_counters.last_value + 1,
                      updated_at = NOW()
        RETURNING last_value
        "#,
    )
    .bind(tenant_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        error!("Failed to advance rental code counter: {}", e);
        AppError::Database(format!("Failed to advance rental code counter: {}", e))
    })?;

    let code = format_code(value);
    debug!("Drew rental code {} for tenant {}", code, tenant_id);

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_four_digits() {
        assert_eq!(format_code(1), "AL0001");
        assert_eq!(format_code(42), "AL0042");
        assert_eq!(format_code(9999), "AL9999");
    }

    #[test]
    fn test_format_grows_past_pad() {
        assert_eq!(format_code(10000), "AL10000");
        assert_eq!(format_code(123456), "AL123456");
    }

    #[test]
    fn test_parse_roundtrip() {
        for value in [1, 42, 9999, 10000] {
            assert_eq!(parse_code(&format_code(value)), Some(value));
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_code("AL"), None);
        assert_eq!(parse_code("XX0001"), None);
        assert_eq!(parse_code("AL12a4"), None);
        assert_eq!(parse_code("0042"), None);
    }
}
