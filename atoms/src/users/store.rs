use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::UserRecord;

/// Keyed lookup over credential records.
///
/// Handlers and the authorizer only depend on this contract, so tests can
/// substitute an in-memory store for the DynamoDB-backed one.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve a bearer token to its record. Anything other than exactly one
    /// underlying match resolves to `None`.
    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, String>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, String>;

    async fn put(&self, record: &UserRecord) -> Result<(), String>;

    /// Overwrite the stored token for `email`, invalidating the prior one.
    async fn update_token(&self, email: &str, token: &str) -> Result<(), String>;
}

/// DynamoDB-backed store. The table uses `email` as its partition key; token
/// lookup scans with a filter expression, matching the deployed table.
pub struct DynamoCredentialStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoCredentialStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

fn record_from_item(item: &HashMap<String, AttributeValue>) -> Option<UserRecord> {
    let get_s = |name: &str| {
        item.get(name)
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
    };

    Some(UserRecord {
        user_id: get_s("user_id")?,
        email: get_s("email")?,
        username: get_s("username").unwrap_or_default(),
        password_hash: get_s("password_hash").unwrap_or_default(),
        token: get_s("token").unwrap_or_default(),
        s3_folder: get_s("s3_folder").unwrap_or_default(),
        created_at: get_s("created_at").unwrap_or_default(),
    })
}

#[async_trait]
impl CredentialStore for DynamoCredentialStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, String> {
        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#token = :token")
            .expression_attribute_names("#token", "token")
            .expression_attribute_values(":token", AttributeValue::S(token.to_string()))
            .send()
            .await
            .map_err(|e| format!("DynamoDB scan error: {}", e))?;

        let items = result.items();
        if items.len() != 1 {
            return Ok(None);
        }
        Ok(record_from_item(&items[0]))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, String> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("email", AttributeValue::S(email.to_string()))
            .send()
            .await
            .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

        Ok(result.item().and_then(record_from_item))
    }

    async fn put(&self, record: &UserRecord) -> Result<(), String> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("email", AttributeValue::S(record.email.clone()))
            .item("user_id", AttributeValue::S(record.user_id.clone()))
            .item("username", AttributeValue::S(record.username.clone()))
            .item(
                "password_hash",
                AttributeValue::S(record.password_hash.clone()),
            )
            .item("token", AttributeValue::S(record.token.clone()))
            .item("s3_folder", AttributeValue::S(record.s3_folder.clone()))
            .item("created_at", AttributeValue::S(record.created_at.clone()))
            .send()
            .await
            .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

        Ok(())
    }

    async fn update_token(&self, email: &str, token: &str) -> Result<(), String> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("email", AttributeValue::S(email.to_string()))
            .update_expression("SET #token = :token")
            .expression_attribute_names("#token", "token")
            .expression_attribute_values(":token", AttributeValue::S(token.to_string()))
            .send()
            .await
            .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

        Ok(())
    }
}

/// In-memory store keyed by email. Test double for the DynamoDB store; also
/// handy for local runs without AWS credentials.
#[derive(Default)]
pub struct MemoryCredentialStore {
    records: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, String> {
        let records = self.records.lock().unwrap();
        let matches: Vec<&UserRecord> =
            records.values().filter(|r| r.token == token).collect();
        if matches.len() != 1 {
            return Ok(None);
        }
        Ok(Some(matches[0].clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, String> {
        Ok(self.records.lock().unwrap().get(email).cloned())
    }

    async fn put(&self, record: &UserRecord) -> Result<(), String> {
        self.records
            .lock()
            .unwrap()
            .insert(record.email.clone(), record.clone());
        Ok(())
    }

    async fn update_token(&self, email: &str, token: &str) -> Result<(), String> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(email) {
            Some(record) => {
                record.token = token.to_string();
                Ok(())
            }
            None => Err(format!("no record for {}", email)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str, token: &str) -> UserRecord {
        UserRecord {
            user_id: format!("id-{}", email),
            email: email.to_string(),
            username: "someone".to_string(),
            password_hash: "hash".to_string(),
            token: token.to_string(),
            s3_folder: "users/id/".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn token_lookup_requires_exactly_one_match() {
        let store = MemoryCredentialStore::new();
        store.put(&record("a@example.com", "tok-a")).await.unwrap();
        store.put(&record("b@example.com", "tok-a")).await.unwrap();
        store.put(&record("c@example.com", "tok-c")).await.unwrap();

        // Duplicated token resolves to no record rather than an arbitrary one
        assert!(store.find_by_token("tok-a").await.unwrap().is_none());
        assert_eq!(
            store
                .find_by_token("tok-c")
                .await
                .unwrap()
                .unwrap()
                .email,
            "c@example.com"
        );
        assert!(store.find_by_token("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_token_overwrites_prior_value() {
        let store = MemoryCredentialStore::new();
        store.put(&record("a@example.com", "old")).await.unwrap();

        store.update_token("a@example.com", "new").await.unwrap();

        assert!(store.find_by_token("old").await.unwrap().is_none());
        let found = store.find_by_token("new").await.unwrap().unwrap();
        assert_eq!(found.email, "a@example.com");
    }

    #[tokio::test]
    async fn update_token_for_unknown_email_errors() {
        let store = MemoryCredentialStore::new();
        assert!(store.update_token("ghost@example.com", "t").await.is_err());
    }
}
