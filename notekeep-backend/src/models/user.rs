use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as clients see it. This is also the payload embedded
/// in access tokens, so it must never carry the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub created_on: DateTime<Utc>,
}

/// Stored user row, including the PHC-format password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        record.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_format() {
        let user = User {
            id: "abc".to_string(),
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            created_on: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"], "abc");
        assert_eq!(json["fullName"], "Ada Lovelace");
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("createdOn").is_some());
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
