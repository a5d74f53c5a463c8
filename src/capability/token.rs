use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use uuid::Uuid;

/// Opaque, serializable grant of read access to a file outside the
/// bundled root. The bytes identify a grant in the store's table; the
/// file path is never embedded in the token.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(Vec<u8>);

impl AccessToken {
    pub(super) fn for_grant(id: Uuid) -> Self {
        Self(id.as_bytes().to_vec())
    }

    /// The grant id encoded in this token, if the bytes are well-formed.
    pub(super) fn grant_id(&self) -> Option<Uuid> {
        Uuid::from_slice(&self.0).ok()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn from_base64(s: &str) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(s).map(Self)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self.to_base64())
    }
}

impl Serialize for AccessToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for AccessToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base64(&s).map_err(de::Error::custom)
    }
}
