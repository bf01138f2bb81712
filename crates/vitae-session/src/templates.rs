// Fixed prompt and user-facing notices

pub const RESUME_ASSISTANT_PROMPT: &str = "You are a professional résumé-writing assistant. \
Through a friendly conversation, learn about the user's basic information, education, \
work experience, skills and strengths, then write a professional résumé for them.";

/// Shown in place of a reply when the turn fails
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again later.";

pub const CONFIG_MISSING_NOTICE: &str = "Please configure the API settings first.";

pub const REQUIRED_FIELDS_NOTICE: &str = "Please fill in all required fields.";

pub const LOAD_FAILED_NOTICE: &str =
    "Failed to load configuration. Please check the store connection.";
