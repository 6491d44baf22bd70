//! End-to-end `generate` pipeline: CSV → validate → per row {path, front matter, body}.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use mdgen_shared::{GenerateConfig, Header, MdGenError, Result, Row};

use crate::body::BodyConverter;
use crate::frontmatter;
use crate::loader;
use crate::paths::{self, PagePath};
use crate::schema::ColumnSchema;

/// Result of the `generate` pipeline.
#[derive(Debug)]
pub struct GenerateResult {
    /// Root the pages were written under.
    pub output_root: PathBuf,
    /// Every document written, in row order.
    pub pages: Vec<PathBuf>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl GenerateResult {
    pub fn rows_written(&self) -> usize {
        self.pages.len()
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a row's document is complete.
    fn row_written(&self, path: &Path, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn row_written(&self, _path: &Path, _current: usize, _total: usize) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Everything the per-row stages need, built once per run.
struct RunContext<'a> {
    config: &'a GenerateConfig,
    header: &'a Header,
    schema: ColumnSchema,
    converter: BodyConverter,
}

/// One row on its way through the stages.
struct RowContext<'a> {
    /// 1-based data row number (the header is not counted).
    number: usize,
    row: &'a Row,
}

/// Run the full `generate` pipeline.
///
/// 1. Load the CSV
/// 2. Validate required columns
/// 3. Refuse an empty data set
/// 4. For each row: prepare the page file, write front matter, append body
///
/// Any failure aborts the run; pages already written are left in place.
#[instrument(skip_all, fields(source = %config.source.display(), output = %config.output_root.display()))]
pub fn generate(config: &GenerateConfig, progress: &dyn ProgressReporter) -> Result<GenerateResult> {
    let start = Instant::now();

    info!(delimiter = %config.delimiter, create_header = config.create_header, "starting generate pipeline");

    // --- Phase 1: Load ---
    progress.phase("Reading CSV");
    let table = loader::load(&config.source, config.delimiter)?;

    // --- Phase 2: Validate ---
    progress.phase("Validating columns");
    let schema = ColumnSchema::from_header(&table.header)?;

    if table.rows.is_empty() {
        return Err(MdGenError::EmptyData);
    }

    // --- Phase 3: Write pages ---
    progress.phase("Writing pages");
    let run = RunContext {
        config,
        header: &table.header,
        schema,
        converter: BodyConverter::new(config.keep_inline_html, config.textile_marker.clone()),
    };

    let total = table.rows.len();
    let mut pages = Vec::with_capacity(total);

    for (i, row) in table.rows.iter().enumerate() {
        let ctx = RowContext { number: i + 1, row };
        let page = process_row(&run, &ctx)?;

        progress.row_written(&page.file, ctx.number, total);
        pages.push(page.file);
    }

    let result = GenerateResult {
        output_root: config.output_root.clone(),
        pages,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        rows = result.rows_written(),
        elapsed_ms = result.elapsed.as_millis(),
        "generate pipeline complete"
    );

    Ok(result)
}

/// Path builder → front-matter writer → body converter for one row.
fn process_row(run: &RunContext<'_>, ctx: &RowContext<'_>) -> Result<PagePath> {
    let url = ctx.row.get(run.schema.url).ok_or_else(|| {
        MdGenError::validation(format!("row {} has no url value", ctx.number))
    })?;

    if run.config.reject_unsafe_paths {
        paths::check_safe(url)
            .map_err(|e| MdGenError::validation(format!("row {}: {e}", ctx.number)))?;
    }

    let page = paths::prepare(&run.config.output_root, url, &run.config.file_name)?;

    frontmatter::write(
        &page.file,
        run.header,
        ctx.row,
        &run.schema,
        run.config.create_header,
    )?;

    let body = ctx.row.get(run.schema.body).unwrap_or_default();
    let textile = run
        .converter
        .is_textile(run.schema.textile.and_then(|i| ctx.row.get(i)));

    run.converter.append(&page.file, body, textile)?;

    debug!(row = ctx.number, url, textile, path = %page.file.display(), "row written");
    Ok(page)
}
