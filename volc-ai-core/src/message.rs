//! Conversation messages and roles.

use serde::{Deserialize, Serialize};

/// Who authored a message in the conversation.
///
/// The set is fixed by the OpenAI-compatible wire format. History coming from
/// other systems often uses different labels (`ai`, `human`, `function`);
/// [`Role::parse`] normalizes those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
    /// Result of a tool invocation.
    Tool,
}

impl Role {
    /// Normalize a role label from conversation history.
    ///
    /// Accepts the wire names plus the aliases commonly produced by chat
    /// frameworks: `ai` for assistant, `human` for user, `function` for tool.
    pub fn parse(label: &str) -> Result<Self, RoleParseError> {
        match label {
            "system" => Ok(Role::System),
            "user" | "human" => Ok(Role::User),
            "assistant" | "ai" => Ok(Role::Assistant),
            "tool" | "function" => Ok(Role::Tool),
            other => Err(RoleParseError {
                label: other.to_string(),
            }),
        }
    }

    /// The role string sent on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A role label that maps to none of the wire roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized message role: {label}")]
pub struct RoleParseError {
    /// The offending label.
    pub label: String,
}

/// One message in a conversation, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    pub role: Role,
    /// Text content.
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool-result message.
    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(Role::Tool, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("system", Role::System)]
    #[case("user", Role::User)]
    #[case("human", Role::User)]
    #[case("assistant", Role::Assistant)]
    #[case("ai", Role::Assistant)]
    #[case("tool", Role::Tool)]
    #[case("function", Role::Tool)]
    fn parse_accepts_wire_names_and_aliases(#[case] label: &str, #[case] expected: Role) {
        assert_eq!(Role::parse(label).unwrap(), expected);
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        let err = Role::parse("generic").unwrap_err();
        assert_eq!(err.label, "generic");
    }

    #[test]
    fn constructors_set_roles() {
        assert_eq!(Message::system("a").role, Role::System);
        assert_eq!(Message::user("b").role, Role::User);
        assert_eq!(Message::assistant("c").role, Role::Assistant);
        assert_eq!(Message::tool("d").role, Role::Tool);
    }

    #[test]
    fn serializes_lowercase_roles() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }
}
