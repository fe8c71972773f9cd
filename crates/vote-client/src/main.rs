use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use vote_client::panel::{ToggleEvent, VotePanel};
use vote_client::transport::HttpTransport;
use vote_client::{ClientIdentity, VoteCache};

const USAGE: &str = "usage: vote-client [--api-url URL] [--state-dir DIR] <show|toggle> <project>...";

struct Args {
    api_url: String,
    state_dir: PathBuf,
    command: String,
    projects: Vec<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = match parse_args() {
        Some(args) => args,
        None => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let identity = match ClientIdentity::load_or_generate(&args.state_dir.join("identity")) {
        Ok(identity) => identity,
        Err(e) => {
            eprintln!("Failed to resolve client identity: {e}");
            std::process::exit(1);
        }
    };

    let cache = match VoteCache::load(args.state_dir.join("votes.json")) {
        Ok(cache) => cache,
        Err(e) => {
            eprintln!("Failed to load vote cache: {e}");
            std::process::exit(1);
        }
    };

    let transport = HttpTransport::new(args.api_url);
    let panel = VotePanel::new(identity, cache, args.projects.iter().cloned());
    panel.init(&transport).await;

    match args.command.as_str() {
        "show" => {
            for project in &args.projects {
                if let Some(state) = panel.button(project) {
                    let marker = if state.voted { " [voted]" } else { "" };
                    println!("{project}: {}{marker}", state.count);
                }
            }
        }
        "toggle" => {
            for project in &args.projects {
                match panel.toggle(&transport, project).await {
                    ToggleEvent::Applied { voted, count } => {
                        let verb = if voted { "voted for" } else { "removed vote from" };
                        println!("{verb} {project} ({count} total)");
                    }
                    ToggleEvent::InFlight => {
                        println!("{project}: toggle already in flight");
                    }
                    ToggleEvent::Failed(notice) => {
                        eprintln!("{project}: {notice}");
                        std::process::exit(1);
                    }
                }
            }
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

/// Parse `[--api-url URL] [--state-dir DIR] <command> <project>...` by hand.
///
/// Defaults come from `VOTE_API_URL` and `VOTE_CLIENT_STATE_DIR`, falling
/// back to localhost and the current directory.
fn parse_args() -> Option<Args> {
    let mut api_url = std::env::var("VOTE_API_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    let mut state_dir = PathBuf::from(
        std::env::var("VOTE_CLIENT_STATE_DIR").unwrap_or_else(|_| ".".to_string()),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut iter = args.iter();
    let mut command = None;
    let mut projects = Vec::new();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--api-url" => api_url = iter.next()?.clone(),
            "--state-dir" => state_dir = PathBuf::from(iter.next()?),
            _ if command.is_none() => command = Some(arg.clone()),
            _ => projects.push(arg.clone()),
        }
    }

    let command = command?;
    if projects.is_empty() {
        return None;
    }

    Some(Args {
        api_url,
        state_dir,
        command,
        projects,
    })
}
