//! User account database operations

use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

use super::super::sqlite::map_unique_violation;
use super::super::{Database, DbResult};
use crate::models::{User, UserRecord};

const USER_COLUMNS: &str = "id, full_name, email, password_hash, created_on";

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        user: User {
            id: row.get(0)?,
            full_name: row.get(1)?,
            email: row.get(2)?,
            created_on: row.get(4)?,
        },
        password_hash: row.get(3)?,
    })
}

impl Database {
    /// Insert a new user. Fails with `DbError::Conflict` when the email is taken.
    pub fn create_user(&self, full_name: &str, email: &str, password_hash: &str) -> DbResult<User> {
        let conn = self.conn()?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            created_on: Utc::now(),
        };

        conn.execute(
            "INSERT INTO users (id, full_name, email, password_hash, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user.id, user.full_name, user.email, password_hash, user.created_on],
        )
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    /// Look up a user by login email, including the stored hash.
    pub fn find_user_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                params![email],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    pub fn find_user_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record.map(User::from))
    }
}
