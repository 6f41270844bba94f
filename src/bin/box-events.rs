//! box-events CLI: operator interface to the Box event stream.

use std::path::PathBuf;

use box_v2::BoxClient;
use box_v2::config::{BoxConfig, DEFAULT_STREAM_LIMIT};
use box_v2::managers::EventsQuery;
use box_v2::model::{EventFilter, EventPage};
use box_v2::telemetry::{TelemetryConfig, init_telemetry};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "box-events", about = "Poll the Box events stream")]
struct Cli {
    /// TOML config file; environment variables are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Act on behalf of this user id (admin tokens only)
    #[arg(long, global = true)]
    as_user: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current stream position
    Position,
    /// List events since a stream position
    Since {
        /// Position to read from (0 = beginning of the log)
        #[arg(long, default_value_t = 0)]
        stream_position: i64,
        /// Event categories: all, changes, sync
        #[arg(long, default_value_t = EventFilter::All)]
        filter: EventFilter,
        /// Maximum events to return
        #[arg(long, default_value_t = DEFAULT_STREAM_LIMIT)]
        limit: u32,
        /// Print the raw page as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => BoxConfig::from_file(path)?,
        None => BoxConfig::from_env()?,
    };

    let _guard = init_telemetry(TelemetryConfig::from_box_config(&config, "box-events"))?;

    let mut client = BoxClient::new(config)?;
    if let Some(user) = cli.as_user {
        client = client.as_user(user);
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        on_signal.cancel();
    });

    match cli.command {
        Command::Position => {
            let position = client.events().get_current_stream_position(&cancel).await?;
            println!("{position}");
        }
        Command::Since {
            stream_position,
            filter,
            limit,
            json,
        } => {
            let query = EventsQuery::since(stream_position)
                .filter(filter)
                .limit(limit);
            let page = client.events().get_events_since(query, &cancel).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print_page(&page);
            }
        }
    }

    Ok(())
}

fn print_page(page: &EventPage) {
    if page.is_empty() {
        println!("No events.");
    } else {
        println!(
            "{:<40}  {:<28}  {:<20}  {:<24}  SOURCE",
            "EVENT_ID", "TYPE", "CREATED", "BY"
        );
        println!("{}", "-".repeat(130));

        for event in page {
            let by = event
                .created_by
                .as_ref()
                .and_then(|u| u.login.as_deref().or(u.name.as_deref()))
                .unwrap_or("-");
            let source = event
                .source
                .as_ref()
                .map(|s| {
                    format!(
                        "{} {}",
                        s.kind().unwrap_or("?"),
                        s.id().unwrap_or("-")
                    )
                })
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<40}  {:<28}  {:<20}  {:<24}  {}",
                event.event_id,
                event.event_type,
                event.created_at.format("%Y-%m-%d %H:%M:%S"),
                by,
                source
            );
        }
    }

    println!(
        "\n{} event(s), next stream position: {}",
        page.len(),
        page.next_stream_position
    );
}
