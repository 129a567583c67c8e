//! YouGile bot CLI - run one request from the terminal or serve webhooks.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::disallowed_macros)]
#![allow(clippy::uninlined_format_args)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use yougile_bot::config::ENV_PROMPTS_PATH;
use yougile_bot::{server, ui, BotConfig, Dispatcher, PromptStore, Request, RequestType};

/// Environment variable selecting the log format (`json` or plain text).
const ENV_LOG_FORMAT: &str = "BOT_LOG_FORMAT";

/// Turn a request into YouGile tasks or a report via Yandex GPT.
///
/// With one argument it is the request text (type `analysis`). With two,
/// the first is the type (analysis, calendar, governance, sprint) and the
/// second the text. Without arguments the request is asked for interactively.
#[derive(Parser)]
#[command(name = "yougile-bot")]
#[command(version)]
struct Cli {
    /// `[TYPE] TEXT`
    #[arg(value_name = "ARGS", num_args = 0..=2)]
    args: Vec<String>,

    /// Prompt templates file
    #[arg(long, env = ENV_PROMPTS_PATH)]
    prompts: Option<PathBuf>,

    /// Serve webhooks on this address instead of running one request
    #[arg(long, value_name = "ADDR")]
    serve: Option<SocketAddr>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("yougile_bot=debug,info")
        } else {
            EnvFilter::new("yougile_bot=info,warn")
        }
    });

    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let (plain, structured) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .init();
}

fn request_from_args(args: &[String]) -> Option<Request> {
    match args {
        [] => None,
        [text] => Some(Request::new(RequestType::Analysis, text.clone())),
        [tag, text, ..] => Some(Request::new(RequestType::from_tag(tag), text.clone())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = BotConfig::from_env();
    if let Some(path) = cli.prompts {
        config.prompts_path = path;
    }

    let prompts = PromptStore::load(&config.prompts_path).context("Failed to load prompts")?;
    let dispatcher = Arc::new(
        Dispatcher::from_config(&config, Arc::new(prompts))
            .context("Failed to initialize clients")?,
    );

    if let Some(addr) = cli.serve {
        ui::print_info(&format!("Serving webhooks on http://{addr}"));
        return server::serve(dispatcher, addr).await;
    }

    let request = match request_from_args(&cli.args) {
        Some(request) => request,
        None => ui::prompt_request().context("Failed to read request")?,
    };

    let envelope = dispatcher.run(&request).await;
    println!("{}", envelope.to_json());
    ui::print_outcome(&envelope);

    Ok(())
}
