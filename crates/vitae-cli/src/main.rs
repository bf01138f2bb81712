use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitae_cli::{command::Command, config::Config, render::render_events};
use vitae_persist::PersistClientBuilder;
use vitae_session::{ChatSession, SendOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!(backend = ?config.store.backend, "Starting Vitae");

    let store = PersistClientBuilder::new()
        .backend(config.store_backend()?)
        .build()
        .await?;

    let (session, events) = ChatSession::builder()
        .store(store)
        .config(config.session_config())
        .build()?;

    let renderer = tokio::spawn(render_events(events));

    session.start().await;
    run(&session).await?;

    // Last sender goes with the session; the renderer then drains and exits
    drop(session);
    renderer.await?;

    Ok(())
}

async fn run(session: &ChatSession) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Invalid(usage) => println!("{}", usage),
            Command::ToggleSettings => {
                session.toggle_settings().await;
            }
            Command::SaveSettings {
                api_url,
                api_key,
                model_name,
            } => {
                // Failures are already reported as events
                if let Err(e) = session.save_config(&api_url, &api_key, &model_name).await {
                    tracing::debug!(error = %e, "Settings not saved");
                }
            }
            Command::Send(text) => {
                if let SendOutcome::Failed(e) = session.send_message(&text).await {
                    tracing::debug!(error = %e, "Turn failed");
                }
            }
        }
    }

    tracing::info!("Goodbye");
    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // stderr keeps logs out of the chat transcript
    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
