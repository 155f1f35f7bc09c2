pub mod error;
pub mod http;
pub mod leonardo;
pub mod poll;
pub mod prompt;
pub mod provider;
pub mod replicate;
pub mod secrets;
pub mod service;
pub mod types;

pub use error::{GenerateError, ProviderError, SecretUnavailable};
pub use poll::PollSchedule;
pub use provider::GenerationProvider;
pub use types::{DeliveryMode, GenerationConfig, GenerationParams, JobStatus, ProviderKind};
