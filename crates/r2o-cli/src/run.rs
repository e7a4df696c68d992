//! The convert command: read an export, run the three passes, write pages

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use r2o_core::{parse_export_reader, ConvertError, Converter, Document, PageId};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::CliConfig;
use crate::output::{FailedPage, OutputLayout, PageWriter};

/// Counts gathered over one run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub uid_count: usize,
    pub referenced_count: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: Vec<FailedPage>,
}

/// Pass messages and progress bars, silenced by `--quiet`
struct Reporter {
    quiet: bool,
}

impl Reporter {
    fn say(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    fn bar(&self, len: usize) -> Result<ProgressBar> {
        if self.quiet {
            return Ok(ProgressBar::hidden());
        }
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
                .progress_chars("##-"),
        );
        Ok(pb)
    }
}

/// Parse the export at `input`
pub fn read_export(input: &Path) -> Result<Document> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open export: {}", input.display()))?;
    let pages = parse_export_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse export: {}", input.display()))?;
    info!(pages = pages.len(), "Loaded export");
    Ok(Document::ingest(pages))
}

/// Convert `input` and write every page under the configured directories.
///
/// Only an unreadable or malformed export is fatal. Pages that cannot be
/// written are reported at the end and the run still succeeds.
pub fn execute(input: &Path, config: &CliConfig, quiet: bool) -> Result<RunSummary> {
    let reporter = Reporter { quiet };
    let document = read_export(input)?;
    let page_ids: Vec<PageId> = document.page_ids().collect();
    let writer = PageWriter::new(OutputLayout::from(&config.output));
    let mut summary = RunSummary::default();

    reporter.say("Pass 1: scan all pages");
    let pb = reporter.bar(page_ids.len())?;
    let mut converter = Converter::new(document, config.render);
    for page in &page_ids {
        converter.index_page(*page);
        pb.inc(1);
    }
    pb.finish_and_clear();
    let mut indexed = converter.finish_indexing();
    summary.uid_count = indexed.index().len();
    reporter.say(format!("found {} UIDs", summary.uid_count));

    reporter.say("Pass 2: track blockrefs");
    let pb = reporter.bar(page_ids.len())?;
    for page in &page_ids {
        indexed.scan_page(*page);
        pb.inc(1);
    }
    pb.finish_and_clear();
    let mut scanned = indexed.finish_scanning();
    summary.referenced_count = scanned.references().len();
    reporter.say(format!("found {} referenced UIDs", summary.referenced_count));

    reporter.say("Pass 3: generate");
    let pb = reporter.bar(page_ids.len())?;
    for page in &page_ids {
        pb.inc(1);
        let rendered = match scanned.render_page(*page) {
            Ok(rendered) => rendered,
            Err(ConvertError::EmptyTitle) => {
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                warn!(page = page.0, error = %e, "Failed to render page");
                summary.skipped += 1;
                continue;
            }
        };

        pb.set_message(rendered.title.clone());
        match writer.write(&rendered) {
            Ok(_) => summary.written += 1,
            Err(e) => {
                warn!(title = %rendered.title, error = %e, "Failed to write page");
                summary.failed.push(FailedPage::new(rendered, e));
            }
        }
    }
    pb.finish_and_clear();

    // Failures are always shown, even in quiet mode
    if !summary.failed.is_empty() {
        println!("The following pages had errors:");
        for failed in &summary.failed {
            print!("{}", failed);
        }
    }

    debug!(
        written = summary.written,
        skipped = summary.skipped,
        failed = summary.failed.len(),
        "Conversion finished"
    );
    reporter.say("Done!");

    Ok(summary)
}
