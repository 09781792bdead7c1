//! Frame type and the key:value token grammar.

use std::collections::HashMap;

use super::error::ProtocolError;

/// One protocol exchange unit: a parsed header line plus the raw payload
/// block that followed it.
///
/// The payload length declared by the header has always been consumed in
/// full by the time a `Frame` exists, even when the event kind will be
/// ignored; that is what keeps the stream framing intact.
#[derive(Debug, Clone)]
pub struct Frame {
    pub header: HashMap<String, String>,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Event name from the header; empty when the parent omitted it.
    pub fn event_name(&self) -> &str {
        self.header.get("eventname").map(String::as_str).unwrap_or("")
    }

    /// Parses the payload block with the key:value token grammar.
    ///
    /// Only meaningful for event kinds that carry structured payloads.
    /// PROCESS_LOG_* and communication events place raw text here instead,
    /// and those kinds are never structurally parsed.
    pub fn payload_fields(&self) -> Result<HashMap<String, String>, ProtocolError> {
        parse_fields(&String::from_utf8_lossy(&self.payload))
    }
}

/// Parses one line of whitespace-separated `key:value` tokens.
///
/// Every token must split on its first colon; values may themselves
/// contain colons. A duplicate key overwrites the prior value.
pub fn parse_fields(line: &str) -> Result<HashMap<String, String>, ProtocolError> {
    let mut fields = HashMap::new();
    for token in line.split_ascii_whitespace() {
        let (key, value) = token.split_once(':').ok_or_else(|| ProtocolError::MalformedToken {
            token: token.to_string(),
        })?;
        fields.insert(key.to_string(), value.to_string());
    }
    Ok(fields)
}

/// Renders a field mapping back into a single header-style line.
///
/// Keys are emitted in sorted order so the output is deterministic.
pub fn render_fields(fields: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort();
    keys.iter()
        .map(|key| format!("{key}:{}", fields[*key]))
        .collect::<Vec<_>>()
        .join(" ")
}
