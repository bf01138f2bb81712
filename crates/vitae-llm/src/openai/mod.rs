mod client;
pub mod responses;

pub use client::OpenAICompatClient;
pub use responses::{error_message, extract_reply, parse_completion};
