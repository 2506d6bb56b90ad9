use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;

pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";

/// Outgoing message as handed over by the mail pipeline.
#[derive(Debug, Clone)]
pub struct Message {
    pub to: Vec<SubscriberEmail>,
    pub sender: String,
    pub subject: String,
    pub content_type: String,
    pub body: String,
    pub children: Vec<MimePart>,
}

/// Alternative body attached to a message, e.g. its plain text version.
#[derive(Debug, Clone, Deserialize)]
pub struct MimePart {
    pub content_type: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub campaign: Option<String>,
    pub sender: String,
    pub to: Vec<String>,
    pub subject: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    pub body: String,
    #[serde(default)]
    pub children: Vec<MimePart>,
}

fn default_content_type() -> String {
    TEXT_HTML.to_string()
}

impl Message {
    /// Primary body, only when it is declared as HTML.
    pub fn html_body(&self) -> Option<&str> {
        has_content_type(&self.content_type, TEXT_HTML).then_some(self.body.as_str())
    }

    /// Body of the first alternative part declared as plain text.
    pub fn text_body(&self) -> Option<&str> {
        self.children
            .iter()
            .find(|child| has_content_type(&child.content_type, TEXT_PLAIN))
            .map(|child| child.body.as_str())
    }
}

impl TryFrom<MessageBody> for Message {
    type Error = String;

    fn try_from(body: MessageBody) -> Result<Self, Self::Error> {
        if body.to.is_empty() {
            return Err("A message needs at least one recipient".to_string());
        }

        let to = body
            .to
            .into_iter()
            .map(SubscriberEmail::parse)
            .collect::<Result<Vec<_>, _>>()?;
        // Forwarded as given, display names included
        if body.sender.trim().is_empty() {
            return Err("A message needs a sender".to_string());
        }

        Ok(Message {
            to,
            sender: body.sender,
            subject: body.subject,
            content_type: body.content_type,
            body: body.body,
            children: body.children,
        })
    }
}

/// Compares MIME essences, ignoring parameters such as `charset`.
fn has_content_type(declared: &str, expected: &str) -> bool {
    declared
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}
