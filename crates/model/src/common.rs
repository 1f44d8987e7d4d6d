use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// HTTP header which the mock access token resolver reads.
pub const ACCESS_TOKEN_HEADER_STR: &str = "x-access-token";

/// User identifier. Profiles are keyed with this.
#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AccountId {
    aid: String,
}

impl AccountId {
    pub fn new(aid: String) -> Self {
        Self { aid }
    }

    pub fn as_str(&self) -> &str {
        &self.aid
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.aid)
    }
}

/// Opaque API access token.
///
/// Token issuing is not part of this server. Tokens are
/// configured together with seed profiles.
#[derive(Deserialize, Serialize, ToSchema, Clone, Eq, Hash, PartialEq)]
#[serde(transparent)]
pub struct AccessToken {
    access_token: String,
}

impl AccessToken {
    pub fn new(access_token: String) -> Self {
        Self { access_token }
    }

    pub fn as_str(&self) -> &str {
        &self.access_token
    }
}

// Keep token values out of logs
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}
