use crate::outbox::OutboxStatus;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum OutboxError {
    #[error("No outbox item with id {0}")]
    UnknownItem(u32),

    #[error("Outbox item {id} is already {status:?}")]
    AlreadyDecided { id: u32, status: OutboxStatus },
}
