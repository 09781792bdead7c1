//! Message envelope and receipt types for the robot webhook.
//!
//! The wire shape is a JSON object discriminated by `msgtype`, with the
//! variant body under a field of the same name and an optional `at` block
//! for mentions.

use serde::{Deserialize, Serialize};

use crate::error::RobotError;

/// Mention block attached to text and markdown messages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct At {
    /// Mention the whole group.
    #[serde(rename = "isAtAll", skip_serializing_if = "is_false")]
    pub is_at_all: bool,

    /// Phone numbers of members to mention.
    #[serde(rename = "atMobiles", skip_serializing_if = "Vec::is_empty")]
    pub at_mobiles: Vec<String>,

    /// DingTalk IDs of members to mention.
    #[serde(rename = "atDingtalkIds", skip_serializing_if = "Vec::is_empty")]
    pub at_dingtalk_ids: Vec<String>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBody {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkdownBody {
    /// Shown in the conversation list preview.
    pub title: String,
    /// Markdown-formatted message content.
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkBody {
    pub title: String,
    /// Truncated automatically by the client if too long.
    pub text: String,
    /// URL opened when the card is tapped.
    #[serde(rename = "messageUrl")]
    pub message_url: String,
    /// Optional card picture; the endpoint accepts an empty string.
    #[serde(rename = "picUrl")]
    pub pic_url: String,
}

/// One webhook message envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum Message {
    Text { text: TextBody, at: At },
    Markdown { markdown: MarkdownBody, at: At },
    Link { link: LinkBody },
}

impl Message {
    /// Plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Message::Text {
            text: TextBody { content: content.into() },
            at: At::default(),
        }
    }

    /// Markdown message with a preview title.
    pub fn markdown(title: impl Into<String>, text: impl Into<String>) -> Self {
        Message::Markdown {
            markdown: MarkdownBody {
                title: title.into(),
                text: text.into(),
            },
            at: At::default(),
        }
    }

    /// Link card message.
    pub fn link(
        title: impl Into<String>,
        text: impl Into<String>,
        message_url: impl Into<String>,
        pic_url: impl Into<String>,
    ) -> Self {
        Message::Link {
            link: LinkBody {
                title: title.into(),
                text: text.into(),
                message_url: message_url.into(),
                pic_url: pic_url.into(),
            },
        }
    }

    /// Mention the whole group. No-op for link cards, which carry no
    /// mention block on the wire.
    pub fn at_all(mut self) -> Self {
        match &mut self {
            Message::Text { at, .. } | Message::Markdown { at, .. } => at.is_at_all = true,
            Message::Link { .. } => {}
        }
        self
    }

    /// Mention specific members by phone number.
    pub fn at_mobiles(mut self, mobiles: Vec<String>) -> Self {
        match &mut self {
            Message::Text { at, .. } | Message::Markdown { at, .. } => at.at_mobiles = mobiles,
            Message::Link { .. } => {}
        }
        self
    }

    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Text { .. } => "text",
            Message::Markdown { .. } => "markdown",
            Message::Link { .. } => "link",
        }
    }

    /// Rejects envelopes the endpoint would refuse anyway, before any
    /// network round trip.
    pub fn validate(&self) -> Result<(), RobotError> {
        match self {
            Message::Text { text, .. } => {
                require(&text.content, "text content")?;
            }
            Message::Markdown { markdown, .. } => {
                require(&markdown.title, "markdown title")?;
                require(&markdown.text, "markdown text")?;
            }
            Message::Link { link } => {
                require(&link.title, "link title")?;
                require(&link.text, "link text")?;
                require(&link.message_url, "link message URL")?;
            }
        }
        Ok(())
    }
}

fn require(value: &str, what: &str) -> Result<(), RobotError> {
    if value.trim().is_empty() {
        return Err(RobotError::InvalidMessage(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Response envelope returned by the webhook for every POST.
#[derive(Debug, Clone, Deserialize)]
pub struct Receipt {
    /// Zero on success; any other value is an application-level rejection.
    pub errcode: i64,

    #[serde(default)]
    pub errmsg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_envelope_shape() {
        let msg = Message::text("hello").at_all();
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            value,
            json!({
                "msgtype": "text",
                "text": { "content": "hello" },
                "at": { "isAtAll": true }
            })
        );
    }

    #[test]
    fn test_text_envelope_without_mentions_has_empty_at() {
        let msg = Message::text("hello");
        let value = serde_json::to_value(&msg).unwrap();

        // The endpoint expects the at block to be present even when empty.
        assert_eq!(value["at"], json!({}));
    }

    #[test]
    fn test_markdown_envelope_shape() {
        let msg = Message::markdown("Deploy", "**done**").at_mobiles(vec!["13800000000".to_string()]);
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            value,
            json!({
                "msgtype": "markdown",
                "markdown": { "title": "Deploy", "text": "**done**" },
                "at": { "atMobiles": ["13800000000"] }
            })
        );
    }

    #[test]
    fn test_link_envelope_shape() {
        let msg = Message::link("Title", "Body", "https://example.com/page", "");
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            value,
            json!({
                "msgtype": "link",
                "link": {
                    "title": "Title",
                    "text": "Body",
                    "messageUrl": "https://example.com/page",
                    "picUrl": ""
                }
            })
        );
    }

    #[test]
    fn test_at_all_is_noop_for_links() {
        let msg = Message::link("Title", "Body", "https://example.com", "").at_all();
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("at").is_none());
    }

    #[test]
    fn test_validate_rejects_blank_text() {
        let err = Message::text("   ").validate().unwrap_err();
        assert!(matches!(err, RobotError::InvalidMessage(_)));
    }

    #[test]
    fn test_validate_rejects_blank_markdown_title() {
        let err = Message::markdown("", "body").validate().unwrap_err();
        assert!(matches!(err, RobotError::InvalidMessage(_)));
    }

    #[test]
    fn test_validate_accepts_complete_messages() {
        assert!(Message::text("hi").validate().is_ok());
        assert!(Message::markdown("t", "b").validate().is_ok());
        assert!(Message::link("t", "b", "https://example.com", "").validate().is_ok());
    }

    #[test]
    fn test_receipt_decodes_success() {
        let receipt: Receipt = serde_json::from_str(r#"{"errcode":0,"errmsg":"ok"}"#).unwrap();
        assert_eq!(receipt.errcode, 0);
        assert_eq!(receipt.errmsg, "ok");
    }

    #[test]
    fn test_receipt_decodes_with_missing_errmsg() {
        let receipt: Receipt = serde_json::from_str(r#"{"errcode":310000}"#).unwrap();
        assert_eq!(receipt.errcode, 310000);
        assert_eq!(receipt.errmsg, "");
    }

    #[test]
    fn test_receipt_requires_errcode() {
        assert!(serde_json::from_str::<Receipt>(r#"{"errmsg":"ok"}"#).is_err());
    }
}
