use tokio::sync::mpsc;
use vitae_types::{paragraphs, ChatEvent, Speaker};

/// Terminal text for an event, `None` for events with nothing to show
pub fn render_event(event: &ChatEvent) -> Option<String> {
    match event {
        ChatEvent::MessageAdded { text, speaker } => {
            let prefix = match speaker {
                Speaker::User => "you> ",
                Speaker::Assistant => "bot> ",
            };
            let lines: Vec<String> = paragraphs(text)
                .into_iter()
                .enumerate()
                .map(|(i, line)| {
                    let line = line.trim();
                    if i == 0 {
                        format!("{}{}", prefix, line)
                    } else {
                        format!("     {}", line)
                    }
                })
                .collect();
            if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            }
        }
        ChatEvent::TypingStarted => Some("bot is typing...".to_string()),
        ChatEvent::TypingStopped | ChatEvent::SettingsClosed => None,
        ChatEvent::ConfigLoaded { config: Some(summary) } => Some(format!(
            "Using {} at {}",
            summary.model_name, summary.api_url
        )),
        ChatEvent::ConfigLoaded { config: None } => None,
        ChatEvent::ConfigSaved => Some("Settings saved.".to_string()),
        ChatEvent::SettingsOpened { form } => Some(format!(
            "Settings\n  api_url:    {}\n  model_name: {}\n  api_key:    {}\n\
             Save with /settings <api_url> <api_key> <model_name>",
            form.api_url,
            form.model_name,
            if form.api_key.is_empty() { "(not set)" } else { "(set)" }
        )),
        ChatEvent::Error { message } => Some(format!("! {}", message)),
    }
}

/// Print events until every sender is gone
pub async fn render_events(mut events: mpsc::Receiver<ChatEvent>) {
    while let Some(event) = events.recv().await {
        if let Some(text) = render_event(&event) {
            println!("{}", text);
        }
    }
    tracing::debug!("Event stream closed");
}
