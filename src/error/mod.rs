mod bytecc;
mod oauth;
mod outbox;
mod relay;
mod workspace;

pub use bytecc::{ApiErrorBody, ApiErrorObject, ByteccError};
pub use oauth::OauthError;
pub use outbox::OutboxError;
pub use relay::RelayError;
pub use workspace::{ErrorBanner, WorkspaceError};

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
