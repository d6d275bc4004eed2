use serde::{Deserialize, Serialize};

/// A storefront account. The wire format uses camelCase keys to match the
/// JSON contract of the API (`isAdmin`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,

    pub username: String,

    /// Argon2id hash in PHC string form. Never serialized.
    #[serde(skip_serializing)]
    pub password: String,

    pub is_admin: bool,
}

/// Registration payload: the caller supplies only credentials. Admin status
/// is assigned server-side (seeding is the only path that sets it).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
}
