pub mod oauth;
pub mod workspace;

pub use oauth::GoogleOauthEndpoints;
pub use workspace::{OutgoingMail, WorkspaceClient};
