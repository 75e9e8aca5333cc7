use serde::{Deserialize, Serialize};

/// Speaker of a [`ChatTurn`]. Unknown roles are kept verbatim and forwarded
/// to the upstream provider untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    System,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            _ => Role::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One entry of a conversation. Order within the enclosing list is the
/// conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

#[cfg(test)]
impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

/// Body of `POST /api/chat`. Unknown fields sent by the client are ignored.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
}

/// Body of the outbound completions call.
#[derive(Debug, Serialize)]
pub struct UpstreamRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatTurn],
    pub stream: bool,
}

// ── Upstream stream payload ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpstreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub content: Option<String>,
}

impl UpstreamChunk {
    /// Text at `choices[0].delta.content`, if any.
    pub fn first_delta(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_round_trip_lowercase() {
        let turn: ChatTurn = serde_json::from_str(r#"{"role":"system","content":"be nice"}"#).unwrap();
        assert_eq!(turn.role, Role::System);
        assert_eq!(
            serde_json::to_string(&turn).unwrap(),
            r#"{"role":"system","content":"be nice"}"#
        );
    }

    #[test]
    fn unknown_role_is_passed_through() {
        let turn: ChatTurn = serde_json::from_str(r#"{"role":"tool","content":"{}"}"#).unwrap();
        assert_eq!(turn.role, Role::Other("tool".to_string()));
        assert!(serde_json::to_string(&turn).unwrap().contains(r#""role":"tool""#));
    }

    #[test]
    fn chat_request_ignores_extra_fields() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"hi"}],"theme":"You are helpful"}"#,
        )
        .unwrap();
        assert_eq!(req.messages, vec![ChatTurn::new(Role::User, "hi")]);
    }

    #[test]
    fn upstream_request_shape() {
        let turns = vec![ChatTurn::new(Role::User, "hi")];
        let body = UpstreamRequest { model: "m", messages: &turns, stream: true };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "m",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": true
            })
        );
    }

    #[test]
    fn first_delta_handles_missing_pieces() {
        let chunk: UpstreamChunk = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(chunk.first_delta(), None);

        let chunk: UpstreamChunk = serde_json::from_str(r#"{"choices":[{"delta":{}}]}"#).unwrap();
        assert_eq!(chunk.first_delta(), None);

        let chunk: UpstreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"a"}},{"delta":{"content":"b"}}]}"#)
                .unwrap();
        assert_eq!(chunk.first_delta().as_deref(), Some("a"));
    }
}
