use std::path::Path;

use tracing::{info, warn};

use crate::exec::CommandRunner;

/// Which renderer outputs were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutcome {
    pub pdf: bool,
    pub ps: bool,
}

impl RenderOutcome {
    pub fn is_complete(&self) -> bool {
        self.pdf && self.ps
    }
}

/// Invokes graphviz `dot` on a written graph description
pub struct Renderer<R> {
    runner: R,
    dot: String,
    page_size: String,
}

impl<R: CommandRunner> Renderer<R> {
    pub fn new(runner: R, dot: impl Into<String>, page_size: impl Into<String>) -> Self {
        Self {
            runner,
            dot: dot.into(),
            page_size: page_size.into(),
        }
    }

    /// Render `dot_file` to a size-constrained PDF and to PostScript
    pub fn render(&self, dot_file: &Path, pdf_file: &Path, ps_file: &Path) -> RenderOutcome {
        let source = dot_file.to_string_lossy().into_owned();

        let pdf = self.invoke(vec![
            source.clone(),
            "-Tpdf".to_string(),
            format!("-Gsize={}", self.page_size),
            format!("-o{}", pdf_file.to_string_lossy()),
        ]);
        let ps = self.invoke(vec![
            source,
            "-Tps".to_string(),
            format!("-o{}", ps_file.to_string_lossy()),
        ]);

        RenderOutcome { pdf, ps }
    }

    fn invoke(&self, args: Vec<String>) -> bool {
        let output = self.runner.run(&self.dot, &args);
        if output.success() {
            info!(format = %args[1], "rendered");
        } else {
            warn!(format = %args[1], code = ?output.code, "renderer failed");
        }
        output.success()
    }
}
