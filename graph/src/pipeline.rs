//! End-to-end run: history queries, decoration parsing, chain collection,
//! reduction, graph text, rendering.
//!
//! Each stage takes its inputs by value or reference and returns its output;
//! nothing is shared between stages except what is passed along.

use std::fs;
use std::io::Write;
use std::path::Path;

use gitvtree_core::{
    CommandRunner, HistorySource, OutputPaths, RenderOutcome, Renderer, RunLog, StatusSink,
};
use tracing::{debug, info, warn};

use crate::core::{Chain, Graph, GraphStats};
use crate::decor::DecorationMap;
use crate::error::{GraphError, Result};
use crate::git_backend::collector::EMPTY_BLOCK;
use crate::git_backend::ChainCollector;
use crate::parse::{parse_decorations, Section};
use crate::reduce::reduce;
use crate::render::DotGraphBuilder;

/// Decorations and raw chains, before reduction
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub decorations: DecorationMap,
    pub chains: Vec<Chain>,
}

impl Collected {
    pub fn reduce(self, status: &mut dyn StatusSink) -> Graph {
        let chains = reduce(self.chains, &self.decorations);
        status.report(&format!("Reduced to {} chain(s) ...", chains.len()));
        Graph::new(chains, self.decorations)
    }
}

/// Run the three history queries and collect decorations and raw chains
pub fn collect<H, W>(history: &H, log: &mut RunLog<W>, status: &mut dyn StatusSink) -> Result<Collected>
where
    H: HistorySource + ?Sized,
    W: Write,
{
    status.report("Getting git commit(s) ...");
    let raw = history.decorated_log();
    let decorations = if raw.trim().is_empty() {
        info!("decorated log returned nothing");
        status.report(EMPTY_BLOCK);
        DecorationMap::new()
    } else {
        log.append_section(Section::Commits.label(), &raw)?;
        let decorations = parse_decorations(&raw)?;
        status.report(&format!("Processed {} decorate(s) ...", decorations.len()));
        decorations
    };

    let chains = ChainCollector::new(history).collect(log, status)?;
    status.report(&format!("Processed {} branch(es) ...", chains.len()));

    Ok(Collected { decorations, chains })
}

/// [`collect`] followed by reduction
pub fn build_graph<H, W>(history: &H, log: &mut RunLog<W>, status: &mut dyn StatusSink) -> Result<Graph>
where
    H: HistorySource + ?Sized,
    W: Write,
{
    Ok(collect(history, log, status)?.reduce(status))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Skipped,
    Rendered,
    /// The graph description is still on disk; some outputs are missing
    Failed(RenderOutcome),
}

/// What one [`generate`] run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub paths: OutputPaths,
    pub raw_chains: usize,
    pub stats: GraphStats,
    pub render: RenderStatus,
}

impl RunReport {
    pub fn is_degraded(&self) -> bool {
        matches!(self.render, RenderStatus::Failed(_))
    }
}

/// Produce `paths.dot` (and, given a renderer, the PDF and PostScript
/// images) for the repository called `name`.
///
/// Empty query results and renderer failures are reported through `status`
/// and do not fail the run; malformed records and I/O errors do.
pub fn generate<H, R>(
    name: &str,
    paths: &OutputPaths,
    history: &H,
    renderer: Option<&Renderer<R>>,
    status: &mut dyn StatusSink,
) -> Result<RunReport>
where
    H: HistorySource + ?Sized,
    R: CommandRunner,
{
    if let Some(dir) = paths.dot.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    }

    let mut log = RunLog::create(&paths.log)?;
    let collected = collect(history, &mut log, status)?;
    let raw_chains = collected.chains.len();
    let graph = collected.reduce(status);
    let stats = graph.stats();
    debug!(?stats, "graph ready");

    status.report("Generating dot file ...");
    let text = DotGraphBuilder::from_graph(name, &graph).build();
    fs::write(&paths.dot, text).map_err(|e| io_error(&paths.dot, e))?;
    info!(path = %paths.dot.display(), "wrote graph description");

    let render = match renderer {
        None => RenderStatus::Skipped,
        Some(renderer) => {
            status.report("Generating version tree ...");
            let outcome = renderer.render(&paths.dot, &paths.pdf, &paths.ps);
            if outcome.is_complete() {
                RenderStatus::Rendered
            } else {
                warn!(?outcome, "version tree generation failed");
                status.report("Version tree generation failed ...");
                RenderStatus::Failed(outcome)
            }
        }
    };

    status.report("Done! ...");
    Ok(RunReport {
        paths: paths.clone(),
        raw_chains,
        stats,
        render,
    })
}

fn io_error(path: &Path, source: std::io::Error) -> GraphError {
    GraphError::Io {
        path: path.to_path_buf(),
        source,
    }
}
