//! Message repository for database operations.
//!
//! One flat table. Reply threading is a content convention (the
//! `"type":"reply"` JSON tag), so the admin listing filters on a content
//! substring rather than a join.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bloomery_core::{Email, MessageId, UserId};

use super::RepositoryError;
use crate::models::message::{Message, ReplyEnvelope};
use crate::models::user::UserSummary;

/// Internal row type for messages joined with sender/receiver info.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i32,
    content: String,
    created_at: DateTime<Utc>,
    sender_id: Option<i32>,
    sender_name: Option<String>,
    sender_email: Option<String>,
    receiver_id: i32,
    receiver_name: String,
    receiver_email: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let parse_email = |raw: &str| {
            Email::parse(raw).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })
        };

        let sender = match (row.sender_id, row.sender_name, row.sender_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary {
                id: UserId::new(id),
                name,
                email: parse_email(&email)?,
            }),
            _ => None,
        };

        Ok(Self {
            id: MessageId::new(row.id),
            sender,
            receiver: UserSummary {
                id: UserId::new(row.receiver_id),
                name: row.receiver_name,
                email: parse_email(&row.receiver_email)?,
            },
            content: row.content,
            created_at: row.created_at,
        })
    }
}

const MESSAGE_SELECT: &str = "SELECT m.id, m.content, m.created_at,
        m.sender_id, s.name AS sender_name, s.email AS sender_email,
        m.receiver_id, r.name AS receiver_name, r.email AS receiver_email
 FROM messages m
 LEFT JOIN users s ON s.id = m.sender_id
 JOIN users r ON r.id = m.receiver_id";

/// Repository for message database operations.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a message. `sender` is absent for anonymous contact-form
    /// submissions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        sender: Option<UserId>,
        receiver: UserId,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO messages (sender_id, receiver_id, content)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(sender.map(|id| id.as_i32()))
        .bind(receiver.as_i32())
        .bind(content)
        .fetch_one(self.pool)
        .await?;

        self.get(MessageId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Get a message by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!("{MESSAGE_SELECT} WHERE m.id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Every message the user sent or received, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "{MESSAGE_SELECT}
             WHERE m.sender_id = $1 OR m.receiver_id = $1
             ORDER BY m.created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// The admin inbox: messages received by the admin plus replies the
    /// admin sent (identified by the reply tag in the content column).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_admin(&self, admin_id: UserId) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "{MESSAGE_SELECT}
             WHERE m.receiver_id = $1
                OR (m.sender_id = $1 AND m.content LIKE $2)
             ORDER BY m.created_at DESC"
        ))
        .bind(admin_id.as_i32())
        .bind(format!("%{}%", ReplyEnvelope::CONTENT_TAG))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Delete a message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message doesn't exist.
    pub async fn delete(&self, id: MessageId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
