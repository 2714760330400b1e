use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role value granting access to administrator-only routes.
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Claims describing the requesting principal, as returned by the identity
/// service.
///
/// - The payload is kept opaque (a JSON object); only `role` and `username`
///   are read by the guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Map<String, Value>);

impl Identity {
    pub fn username(&self) -> Option<&str> {
        self.0.get("username").and_then(Value::as_str)
    }

    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(Value::as_str)
    }

    pub fn is_administrator(&self) -> bool {
        self.role() == Some(ADMINISTRATOR_ROLE)
    }
}

impl TryFrom<Value> for Identity {
    type Error = Value;

    /// Only JSON objects are identities; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
