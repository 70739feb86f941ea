use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use wazn::banner;
use wazn::config::AppConfig;
use wazn::errors::Result;
use wazn::panel::AnalyzerPanel;
use wazn::runner;
use wazn::service::{AnalysisService, HttpAnalysisService};

#[derive(Parser)]
#[command(name = "wazn", version, about = "Submit Arabic verse to a prosody analysis service")]
struct Cli {
    /// Base URL of the analysis service (overrides config and WAZN_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Give up on a request after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one line and print the result
    Analyze {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Analyze every non-blank line of a file concurrently
    Batch {
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Requests kept open at once
        #[arg(long, default_value_t = runner::DEFAULT_BATCH_CONCURRENCY)]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Err(e) = dotenv {
        log::debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?
        .with_overrides(cli.api_base, cli.timeout_secs)?;
    let service = HttpAnalysisService::from_config(&config)?;

    match cli.command {
        Some(Command::Analyze { text }) => {
            let panel = AnalyzerPanel::new(service);
            panel.set_input(&text.join(" "));
            let view = panel.analyze().await?;
            print!("{}", view);
        }
        Some(Command::Batch { file, json, concurrency }) => {
            let contents = tokio::fs::read(&file).await?;
            let lines = runner::decode_lines(&contents);
            let report = runner::run_batch(&service, &lines, concurrency).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }
        None => interactive(service).await?,
    }

    Ok(())
}

/// Reads lines from stdin: each line is analyzed, `:clear` clears the
/// panel and `:quit` ends the session.
async fn interactive(service: HttpAnalysisService) -> Result<()> {
    banner::print_banner();
    println!("🔗 Analysis endpoint: {}", service.endpoint());
    println!("✍️  Type a line and press Enter · :clear to reset · :quit to exit\n");

    let panel = AnalyzerPanel::new(service);
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();

    prompt(&panel);
    loop {
        buf.clear();
        match stdin.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!("Could not read from stdin: {}", e);
                break;
            }
        }
        let line = runner::decode_lines(&buf).concat();
        match line.trim() {
            ":quit" | ":q" => break,
            ":clear" => {
                panel.clear();
                println!("🧹 Cleared");
            }
            _ => {
                panel.set_input(&line);
                if let Err(e) = panel.analyze().await {
                    log::warn!("Analyze skipped: {}", e);
                }
                print_panel(&panel);
            }
        }
        prompt(&panel);
    }

    Ok(())
}

fn print_panel<S: AnalysisService>(panel: &AnalyzerPanel<S>) {
    let result = panel.result();
    if let (true, Some(view)) = (result.visible, result.view) {
        println!("\n{}", view);
    }
}

fn prompt<S: AnalysisService>(panel: &AnalyzerPanel<S>) {
    print!("[{}] › ", panel.trigger().label);
    if let Err(e) = std::io::stdout().flush() {
        log::debug!("Could not flush prompt: {}", e);
    }
}
