use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

use super::model::{IssuedCredential, UserRecord};
use super::store::CredentialStore;

/// SHA-256 hex digest of the password, matching the records already in the
/// deployed table.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Opaque bearer token: 32 random bytes, URL-safe base64 without padding.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Register a new user. Fails with "email already registered" when the email
/// is taken.
pub async fn register(
    store: &dyn CredentialStore,
    email: &str,
    username: &str,
    password: &str,
) -> Result<IssuedCredential, String> {
    if store.find_by_email(email).await?.is_some() {
        return Err("email already registered".to_string());
    }

    let user_id = uuid::Uuid::new_v4().to_string();
    let token = generate_token();
    let record = UserRecord {
        user_id: user_id.clone(),
        email: email.to_string(),
        username: username.to_string(),
        password_hash: hash_password(password),
        token: token.clone(),
        s3_folder: format!("users/{}/", user_id),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    store.put(&record).await?;

    Ok(IssuedCredential {
        token,
        user: record.summary(),
    })
}

/// Verify email/password and rotate the stored token. Unknown email and wrong
/// password are indistinguishable to the caller.
pub async fn login(
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
) -> Result<IssuedCredential, String> {
    let record = store
        .find_by_email(email)
        .await?
        .ok_or_else(|| "invalid credentials".to_string())?;

    if record.password_hash != hash_password(password) {
        return Err("invalid credentials".to_string());
    }

    let token = generate_token();
    store.update_token(email, &token).await?;

    Ok(IssuedCredential {
        token,
        user: record.summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::store::MemoryCredentialStore;

    #[test]
    fn password_hash_is_deterministic_sha256_hex() {
        let a = hash_password("hunter2");
        let b = hash_password("hunter2");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, hash_password("hunter3"));
    }

    #[test]
    fn tokens_are_distinct_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(!a.is_empty());
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let store = MemoryCredentialStore::new();
        register(&store, "a@example.com", "alex", "pw").await.unwrap();

        let err = register(&store, "a@example.com", "alex", "pw")
            .await
            .unwrap_err();
        assert_eq!(err, "email already registered");
    }

    #[tokio::test]
    async fn register_scopes_storage_folder_to_user() {
        let store = MemoryCredentialStore::new();
        let issued = register(&store, "a@example.com", "alex", "pw")
            .await
            .unwrap();

        let record = store
            .find_by_email("a@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.s3_folder, format!("users/{}/", issued.user.user_id));
        assert_eq!(record.token, issued.token);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email_alike() {
        let store = MemoryCredentialStore::new();
        register(&store, "a@example.com", "alex", "pw").await.unwrap();

        let wrong_pw = login(&store, "a@example.com", "nope").await.unwrap_err();
        let unknown = login(&store, "b@example.com", "pw").await.unwrap_err();
        assert_eq!(wrong_pw, "invalid credentials");
        assert_eq!(unknown, "invalid credentials");
    }

    #[tokio::test]
    async fn login_rotates_the_stored_token() {
        let store = MemoryCredentialStore::new();
        let registered = register(&store, "a@example.com", "alex", "pw")
            .await
            .unwrap();
        let old_token = registered.token;

        let logged_in = login(&store, "a@example.com", "pw").await.unwrap();
        assert_ne!(logged_in.token, old_token);

        // The prior token no longer resolves; the new one does
        assert!(store.find_by_token(&old_token).await.unwrap().is_none());
        let found = store
            .find_by_token(&logged_in.token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, registered.user.user_id);
    }
}
