pub mod builder;
pub mod context;
pub mod error;
pub mod identity;
pub mod session;
pub mod templates;

pub use builder::ChatSessionBuilder;
pub use error::SessionError;
pub use session::{ChatSession, SendOutcome};
pub use templates::{
    CONFIG_MISSING_NOTICE, FALLBACK_REPLY, LOAD_FAILED_NOTICE, REQUIRED_FIELDS_NOTICE,
    RESUME_ASSISTANT_PROMPT,
};
