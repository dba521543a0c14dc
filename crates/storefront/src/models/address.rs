//! Shipping addresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{AddressId, Email};

use super::lenient_string;

/// A stored shipping address.
///
/// Several addresses may share an email; lookups by email return the
/// earliest submitted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: AddressId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub date: DateTime<Utc>,
}

/// Address payload. Accepted only when `email` belongs to a registered user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    pub email: Email,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub street: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub postal_code: String,
}

impl NewAddress {
    #[must_use]
    pub fn into_address(self, id: AddressId, date: DateTime<Utc>) -> Address {
        Address {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            street: self.street,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            date,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_postal_code_accepts_number() {
        let new_address: NewAddress = serde_json::from_str(
            r#"{
                "name": "Asha Rao",
                "email": "asha@example.com",
                "phone": 9876543210,
                "street": "12 MG Road",
                "city": "Bengaluru",
                "state": "KA",
                "postalCode": 560001
            }"#,
        )
        .unwrap();
        assert_eq!(new_address.postal_code, "560001");
        assert_eq!(new_address.phone, "9876543210");
    }

    #[test]
    fn test_address_serializes_camel_case() {
        let address = NewAddress {
            name: "Asha Rao".to_string(),
            email: bazaar_core::Email::parse("asha@example.com").unwrap(),
            phone: String::new(),
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            postal_code: "560001".to_string(),
        }
        .into_address(AddressId::generate(), Utc::now());

        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["postalCode"], "560001");
        assert!(json.get("postal_code").is_none());
        assert!(json["date"].is_string());
    }
}
