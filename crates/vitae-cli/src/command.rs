/// A line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Send(String),
    SaveSettings {
        api_url: String,
        api_key: String,
        model_name: String,
    },
    ToggleSettings,
    Quit,
    /// Malformed slash command; carries the usage line to show
    Invalid(&'static str),
}

pub const SETTINGS_USAGE: &str = "usage: /settings <api_url> <api_key> <model_name>";
pub const UNKNOWN_USAGE: &str =
    "commands: /settings <api_url> <api_key> <model_name>, /toggle, /quit";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if line.eq_ignore_ascii_case("exit") {
            return Self::Quit;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Self::Send(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match parts.next() {
            Some("quit") => Self::Quit,
            Some("toggle") => Self::ToggleSettings,
            Some("settings") => match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(url), Some(key), Some(model), None) => Self::SaveSettings {
                    api_url: url.to_string(),
                    api_key: key.to_string(),
                    model_name: model.to_string(),
                },
                _ => Self::Invalid(SETTINGS_USAGE),
            },
            _ => Self::Invalid(UNKNOWN_USAGE),
        }
    }
}
