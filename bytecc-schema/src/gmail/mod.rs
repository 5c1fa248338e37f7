mod labels;
mod mail_message;
mod message;
mod send;

pub use labels::{GmailLabel, GmailLabelList, ModifyLabelsRequest};
pub use mail_message::MailMessage;
pub use message::{GmailHeader, GmailMessage, GmailMessageList, GmailMessageRef, GmailPayload};
pub use send::{SendMessageRequest, SentMessage};
