//! Messaging domain types.
//!
//! Messages live in one flat table. Contact-form submissions and admin
//! replies are JSON envelopes serialized into the `content` column; a reply
//! is distinguished from an original message purely by its `"type":"reply"`
//! tag and references the original through an embedded id, not a foreign key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bloomery_core::{Email, MessageId};

use super::user::UserSummary;

/// A stored message. `content` is the raw envelope JSON (or free text for
/// direct user-to-user messages); clients decode it themselves.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: MessageId,
    /// Absent for anonymous contact-form submissions.
    pub sender: Option<UserSummary>,
    pub receiver: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Contact-form submission stored in `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactEnvelope {
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Admin reply stored in `content`, tagged `"type":"reply"` and threaded to
/// the original message by embedded id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "reply")]
pub struct ReplyEnvelope {
    pub original_message_id: MessageId,
    pub admin_name: String,
    pub admin_email: Email,
    pub message: String,
}

impl ReplyEnvelope {
    /// Substring that identifies reply envelopes in the content column.
    /// Keep in sync with the serde representation above.
    pub const CONTENT_TAG: &'static str = "\"type\":\"reply\"";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_envelope_carries_type_tag() {
        let envelope = ReplyEnvelope {
            original_message_id: MessageId::new(7),
            admin_name: "Admin".to_string(),
            admin_email: Email::parse("admin@bloomery.test").unwrap(),
            message: "We ship on Mondays.".to_string(),
        };

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(ReplyEnvelope::CONTENT_TAG));

        let parsed: ReplyEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.original_message_id, MessageId::new(7));
        assert_eq!(parsed.message, "We ship on Mondays.");
    }

    #[test]
    fn test_reply_envelope_rejects_wrong_tag() {
        let json = r#"{"type":"note","original_message_id":1,"admin_name":"a","admin_email":"a@b.c","message":"m"}"#;
        assert!(serde_json::from_str::<ReplyEnvelope>(json).is_err());
    }

    #[test]
    fn test_contact_envelope_roundtrip() {
        let json = r#"{"name":"Jane","email":"jane@example.com","subject":"Opening hours","message":"Are you open Sundays?"}"#;
        let parsed: ContactEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.name, "Jane");
        assert!(parsed.phone.is_none());

        let out = serde_json::to_string(&parsed).unwrap();
        // Optional phone is omitted entirely when absent
        assert!(!out.contains("phone"));
    }

    #[test]
    fn test_contact_envelope_is_not_a_reply() {
        let envelope = ContactEnvelope {
            name: "Jane".to_string(),
            email: Email::parse("jane@example.com").unwrap(),
            phone: None,
            subject: "Hello".to_string(),
            message: "Hi".to_string(),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains(ReplyEnvelope::CONTENT_TAG));
    }
}
