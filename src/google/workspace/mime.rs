use super::OutgoingMail;
use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};

const CRLF: &str = "\r\n";

/// Header values cannot carry line breaks; anything after one would become a new header.
fn header_value(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

/// RFC 2047 `B` encoding for non-ASCII header text.
fn encode_word(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value))
    }
}

/// RFC 822 message for Gmail's `messages.send`, base64url-encoded without padding.
pub fn compose_raw_message(mail: &OutgoingMail) -> String {
    let to = header_value(&mail.to);
    let subject = encode_word(&header_value(&mail.subject));
    let message = [
        format!("To: {to}"),
        format!("Subject: {subject}"),
        "Content-Type: text/html; charset=utf-8".to_string(),
        String::new(),
        mail.body.clone(),
    ]
    .join(CRLF);

    URL_SAFE_NO_PAD.encode(message)
}
