pub mod console;
pub mod google;
pub mod monitor;
pub mod outbox;
pub mod session;
