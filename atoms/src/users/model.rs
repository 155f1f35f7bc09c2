use serde::{Deserialize, Serialize};

/// One credential record in the users table. The email is the partition key;
/// `token` holds the single active bearer token (a new login overwrites it).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub token: String,
    pub s3_folder: String,
    pub created_at: String,
}

/// Public projection of a record, safe to return to callers.
#[derive(Debug, Serialize, Clone)]
pub struct UserSummary {
    pub user_id: String,
    pub email: String,
    pub username: String,
}

impl UserRecord {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub email: Option<String>,
    // The frontend sends the username under "user"
    #[serde(rename = "user")]
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Result of a successful register or login: the fresh token plus the
/// public view of the record it belongs to.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    pub token: String,
    pub user: UserSummary,
}
