use anyhow::Result;
use clap::{Parser, Subcommand};
use linkscope::cli::{self, analyze_cmd, prompt, serve_cmd};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "linkscope",
    about = "linkscope — fetch a page, classify its links, and derive risk insights",
    version,
    after_help = "Run 'linkscope <command> --help' for details on each command.\nRun 'linkscope' with no command for an interactive prompt."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Directory holding the classifier artifacts
    #[arg(long, global = true, default_value = "models")]
    models: PathBuf,

    /// Risk taxonomy override (JSON file)
    #[arg(long, global = true)]
    taxonomy: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one domain, IP, or URL
    Analyze {
        /// Domain, IP, or URL to analyze (e.g. "example.com")
        target: String,
        /// Compute extended statistics (URL lengths, domain breakdown)
        #[arg(long)]
        extended: bool,
        /// Write charts and CSV into this directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Start the HTTP JSON API
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "linkscope=debug"
    } else {
        "linkscope=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let analyzer = cli::build_analyzer(&cli.models, cli.taxonomy.as_deref())?;

    match cli.command {
        Some(Commands::Analyze {
            target,
            extended,
            out,
        }) => {
            let opts = analyze_cmd::AnalyzeOptions {
                extended,
                json: cli.json,
                quiet: cli.quiet,
                out_dir: out.as_deref(),
            };
            let ok = analyze_cmd::run_one(&analyzer, &target, &opts).await?;
            if !ok {
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { port }) => serve_cmd::run(port, analyzer).await?,
        // No subcommand → interactive prompt.
        None => {
            let opts = analyze_cmd::AnalyzeOptions {
                extended: false,
                json: cli.json,
                quiet: cli.quiet,
                out_dir: None,
            };
            prompt::run(analyzer, opts).await?;
        }
    }

    Ok(())
}
