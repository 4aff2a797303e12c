use serde::{Deserialize, Serialize};

/// Collection path shared by the mock server and the HTTP client.
pub const HEROES_PATH: &str = "/api/heroes";

/// Query string accepted by the list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeroQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Opaque acknowledgement returned by a full update.
///
/// The remote resource does not document a shape for it; an empty response
/// body is represented as `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateAck(pub serde_json::Value);

impl UpdateAck {
    pub fn empty() -> Self {
        Self(serde_json::Value::Null)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }
}
