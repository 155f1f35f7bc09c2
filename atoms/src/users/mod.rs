pub mod http;
pub mod model;
pub mod service;
pub mod store;

pub use model::{IssuedCredential, LoginPayload, RegisterPayload, UserRecord, UserSummary};
pub use store::{CredentialStore, DynamoCredentialStore, MemoryCredentialStore};
