pub mod docs;
pub mod drive;
pub mod gmail;
pub mod openrouter;
pub mod sheets;

pub use docs::DocsDocument;
pub use drive::{DriveFile, DriveFileList};
pub use gmail::{
    GmailLabel, GmailLabelList, GmailMessage, GmailMessageList, MailMessage, ModifyLabelsRequest,
    SendMessageRequest,
};
pub use openrouter::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use sheets::{Spreadsheet, ValueRange};
