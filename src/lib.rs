pub mod config;
pub mod error;
pub mod google;
pub mod model_catalog;
pub mod monitor;
pub mod outbox;
pub mod relay;
pub mod server;
pub mod session;
mod utils;

pub use error::ByteccError;
pub use server::router::{ByteccState, bytecc_router};
