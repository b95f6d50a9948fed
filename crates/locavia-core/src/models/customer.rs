//! Customer models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer entity
///
/// Customers are managed by the tenant's CRM surface; the rental engine
/// only reads them to authorize checkouts and to build insight rankings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Display name
    pub name: String,

    /// National document number (digits only)
    pub document: Option<String>,

    /// Contact email
    pub email: Option<String>,

    /// Contact phone
    pub phone: Option<String>,

    /// Blocked customers cannot start new rentals
    pub is_blocked: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Check if the customer may start a new rental
    #[inline]
    pub fn can_rent(&self) -> bool {
        !self.is_blocked
    }
}

/// Strip formatting from a document number, keeping digits only
pub fn normalize_document(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_document() {
        assert_eq!(normalize_document("123.456.789-00"), "12345678900");
        assert_eq!(normalize_document("12.345.678/0001-95"), "12345678000195");
        assert_eq!(normalize_document(""), "");
    }

    #[test]
    fn test_can_rent() {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "Ana Souza".to_string(),
            document: Some("12345678900".to_string()),
            email: None,
            phone: None,
            is_blocked: false,
            created_at: now,
            updated_at: now,
        };

        assert!(customer.can_rent());
    }
}
