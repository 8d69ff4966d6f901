use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Account roles as the server defines them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Vip,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::Admin, Role::Vip, Role::User];

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "super_admin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "vip" => Some(Role::Vip),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Vip => "vip",
            Role::User => "user",
        }
    }

    /// Display label. VIP accounts show their level, e.g. "VIP3".
    pub fn label(&self, vip_level: Option<u32>) -> String {
        match self {
            Role::SuperAdmin => "Super admin".to_string(),
            Role::Admin => "Admin".to_string(),
            Role::Vip => match vip_level {
                Some(level) if level > 0 => format!("VIP{}", level),
                _ => "VIP".to_string(),
            },
            Role::User => "User".to_string(),
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Admins include super admins.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

/// The signed-in user's profile.
///
/// Only the fields the client reads are typed; everything else the server
/// sends is kept in `extra` and written back unchanged when stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, alias = "_id", deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "vipLevel", default, skip_serializing_if = "Option::is_none")]
    pub vip_level: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Role, falling back to `user` when absent or unrecognized.
    pub fn role(&self) -> Role {
        self.role.as_deref().and_then(Role::parse).unwrap_or_default()
    }

    pub fn vip_level(&self) -> u32 {
        self.vip_level.unwrap_or(0)
    }

    pub fn role_label(&self) -> String {
        self.role().label(self.vip_level)
    }
}

fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Payload carried by login and register responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_defaults_to_user() {
        let profile: UserProfile = serde_json::from_value(json!({ "id": "1", "username": "ann" }))
            .expect("profile should parse");
        assert_eq!(profile.role(), Role::User);
        assert_eq!(profile.vip_level(), 0);

        let profile: UserProfile =
            serde_json::from_value(json!({ "id": "1", "role": "owner" })).expect("parse");
        assert_eq!(profile.role(), Role::User);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::SuperAdmin.label(None), "Super admin");
        assert_eq!(Role::Vip.label(Some(3)), "VIP3");
        assert_eq!(Role::Vip.label(Some(0)), "VIP");
        assert_eq!(Role::User.label(Some(5)), "User");
    }

    #[test]
    fn test_role_admin_checks() {
        assert!(Role::SuperAdmin.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Vip.is_admin());
        assert!(Role::SuperAdmin.is_super_admin());
        assert!(!Role::Admin.is_super_admin());
    }

    #[test]
    fn test_role_parse_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let raw = json!({
            "_id": "65f0",
            "username": "ann",
            "email": "ann@example.com",
            "role": "vip",
            "vipLevel": 2,
            "avatar": "/a.png"
        });
        let profile: UserProfile = serde_json::from_value(raw).expect("parse");
        assert_eq!(profile.id, "65f0");
        assert_eq!(profile.role_label(), "VIP2");
        assert_eq!(profile.extra.get("avatar"), Some(&json!("/a.png")));

        let back = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(back["avatar"], json!("/a.png"));
        assert_eq!(back["vipLevel"], json!(2));
    }

    #[test]
    fn test_numeric_id() {
        let profile: UserProfile = serde_json::from_value(json!({ "id": 42 })).expect("parse");
        assert_eq!(profile.id, "42");
    }
}
