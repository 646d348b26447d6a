//! Records exchanged with the lost & found service

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Whether an item was lost or found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStatus {
    /// Someone lost the item
    #[default]
    Lost,
    /// Someone found the item
    Found,
}

impl ObjectStatus {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectStatus::Lost => "lost",
            ObjectStatus::Found => "found",
        }
    }
}

impl fmt::Display for ObjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lost" => Ok(ObjectStatus::Lost),
            "found" => Ok(ObjectStatus::Found),
            other => Err(format!("unknown status '{other}', expected 'lost' or 'found'")),
        }
    }
}

/// The server sends flags as 0/1; older payloads use JSON booleans.
mod flag {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Int(i64),
        Bool(bool),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match RawFlag::deserialize(deserializer)? {
            RawFlag::Int(n) => n != 0,
            RawFlag::Bool(b) => b,
        })
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(*value))
    }
}

/// Owner summary embedded in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: String,
    /// Profile photo URL
    #[serde(default)]
    pub photo: Option<String>,
}

/// A lost/found listing as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostFoundObject {
    /// Server-assigned identifier
    pub id: i64,
    /// Owner's user id
    #[serde(default)]
    pub user_id: i64,
    /// Short title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Lost or found
    #[serde(default)]
    pub status: ObjectStatus,
    /// Whether the item has been returned/claimed
    #[serde(with = "flag", default)]
    pub is_completed: bool,
    /// Cover image URL
    #[serde(default)]
    pub cover: Option<String>,
    /// Creation timestamp as sent by the server
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp as sent by the server
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Owner summary
    #[serde(default)]
    pub author: Option<Author>,
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Profile photo URL
    #[serde(default)]
    pub photo: Option<String>,
    /// Registration timestamp
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginData {
    /// Bearer token for subsequent requests
    pub token: String,
    /// Account details, when the server includes them
    #[serde(default)]
    pub user: Option<User>,
}

/// Acknowledgement for calls without a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Server's confirmation message
    pub message: String,
}

/// Optional filter for listing objects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectFilter {
    /// Only completed (or only open) items
    pub is_completed: Option<bool>,
    /// Only the caller's own items
    pub is_me: Option<bool>,
    /// Only lost or only found items
    pub status: Option<ObjectStatus>,
}

impl ObjectFilter {
    /// Filter on completion
    pub fn completed(mut self, completed: bool) -> Self {
        self.is_completed = Some(completed);
        self
    }

    /// Only the caller's own items
    pub fn mine(mut self) -> Self {
        self.is_me = Some(true);
        self
    }

    /// Filter on status
    pub fn status(mut self, status: ObjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Query parameters for the listing endpoint
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(completed) = self.is_completed {
            params.push(("is_completed".to_string(), u8::from(completed).to_string()));
        }
        if let Some(me) = self.is_me {
            params.push(("is_me".to_string(), u8::from(me).to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status".to_string(), status.as_str().to_string()));
        }
        params
    }

    /// Whether a record passes this filter, given the caller's user id
    pub fn matches(&self, object: &LostFoundObject, caller_id: Option<i64>) -> bool {
        if let Some(completed) = self.is_completed {
            if object.is_completed != completed {
                return false;
            }
        }
        if self.is_me == Some(true) && Some(object.user_id) != caller_id {
            return false;
        }
        if let Some(status) = self.status {
            if object.status != status {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectsData {
    pub lost_founds: Vec<LostFoundObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectData {
    pub lost_found: LostFoundObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedObject {
    pub lost_found_id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserData {
    pub user: User,
}
