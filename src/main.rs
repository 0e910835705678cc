use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use gitvtree_core::{
    ConsoleStatus, GitHistory, Renderer, Repository, RunLog, Settings, SystemRunner,
};
use graph::{build_graph, generate, RenderStatus};
use tracing::Level;

#[derive(Parser)]
#[command(name = "gitvtree")]
#[command(about = "Draw the branch and merge history of a git repository with graphviz", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct QueryArgs {
    /// Path to the repository
    #[arg(default_value = ".")]
    path: PathBuf,
    /// git executable
    #[arg(long)]
    git: Option<String>,
    /// Ignore history before this date (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS")
    #[arg(long)]
    since: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write <repo>.dot and render it to <repo>.pdf and <repo>.ps
    Generate {
        #[command(flatten)]
        query: QueryArgs,
        /// Directory for the .dot, .pdf, .ps and .log files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// graphviz dot executable
        #[arg(long)]
        dot: Option<String>,
        /// Only write the graph description
        #[arg(long)]
        no_render: bool,
    },
    /// Print the reduced chains without writing any file
    Chains {
        #[command(flatten)]
        query: QueryArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Generate {
            query,
            output_dir,
            dot,
            no_render,
        } => {
            apply_query_args(&mut settings, &query);
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            if let Some(dot) = dot {
                settings.dot = dot;
            }
            if no_render {
                settings.render = false;
            }

            let repo = Repository::open(&query.path)?;
            let history = GitHistory::new(SystemRunner, settings.git.clone(), repo.git_dir(), settings.cutoff()?);
            let renderer = settings
                .render
                .then(|| Renderer::new(SystemRunner, settings.dot.clone(), settings.page_size.clone()));
            let paths = settings.output_paths(repo.name());

            let mut status = ConsoleStatus::new(io::stdout());
            let report = generate(repo.name(), &paths, &history, renderer.as_ref(), &mut status)
                .with_context(|| format!("Failed to generate version tree for {}", repo.name()))?;

            println!(
                "{} chain(s), {} commit(s), {} decoration(s) -> {}",
                report.stats.chains,
                report.stats.commits,
                report.stats.decorations,
                report.paths.dot.display()
            );
            match report.render {
                RenderStatus::Rendered => {
                    println!("Rendered {} and {}", report.paths.pdf.display(), report.paths.ps.display());
                }
                RenderStatus::Failed(outcome) => {
                    eprintln!(
                        "Rendering incomplete (pdf: {}, ps: {}); {} is kept for inspection",
                        outcome.pdf,
                        outcome.ps,
                        report.paths.dot.display()
                    );
                }
                RenderStatus::Skipped => {}
            }
        }
        Commands::Chains { query, json } => {
            apply_query_args(&mut settings, &query);

            let repo = Repository::open(&query.path)?;
            let history = GitHistory::new(SystemRunner, settings.git.clone(), repo.git_dir(), settings.cutoff()?);

            let mut status = ConsoleStatus::new(io::stderr());
            let reduced = build_graph(&history, &mut RunLog::new(io::sink()), &mut status)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&reduced.chains)?);
            } else {
                for (i, chain) in reduced.chains.iter().enumerate() {
                    let path: Vec<&str> = chain.path().map(String::as_str).collect();
                    println!("{:>4}  {}  [{}]", i + 1, path.join(" -> "), chain.origin);
                }
            }
        }
    }

    Ok(())
}

fn apply_query_args(settings: &mut Settings, query: &QueryArgs) {
    if let Some(git) = &query.git {
        settings.git = git.clone();
    }
    if let Some(since) = &query.since {
        settings.since = since.clone();
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}
