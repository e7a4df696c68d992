//! Writing rendered pages to disk

use r2o_core::{ConvertError, ConvertResult, RenderedPage};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::OutputConfig;

/// Where pages land on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub dir: PathBuf,
    pub daily_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>, daily_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            daily_dir: daily_dir.into(),
        }
    }

    /// Target file for a page. A `/` in the title nests the file in
    /// subdirectories.
    ///
    /// The result is always inside the base directory: empty, `.` and `..`
    /// segments are dropped, so `/tmp/x` lands at `<base>/tmp/x.md`.
    pub fn path_for(&self, page: &RenderedPage) -> PathBuf {
        let base = if page.is_daily {
            &self.daily_dir
        } else {
            &self.dir
        };

        let mut segments: Vec<&str> = page
            .title
            .split('/')
            .filter(|segment| !matches!(*segment, "" | "." | ".."))
            .collect();

        // Nothing nameable left (`/`, `..`): flatten the title into one file name
        let flattened;
        let file_stem = match segments.pop() {
            Some(last) => last,
            None => {
                flattened = page.title.replace('/', "_");
                flattened.as_str()
            }
        };

        let mut path = base.clone();
        path.extend(segments);
        path.push(format!("{}.md", file_stem));
        path
    }
}

impl From<&OutputConfig> for OutputLayout {
    fn from(config: &OutputConfig) -> Self {
        Self::new(config.dir.clone(), config.daily_dir().to_path_buf())
    }
}

/// Writes pages according to an `OutputLayout`
pub struct PageWriter {
    layout: OutputLayout,
}

impl PageWriter {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    /// Write one page, creating parent directories as needed
    pub fn write(&self, page: &RenderedPage) -> ConvertResult<PathBuf> {
        let path = self.layout.path_for(page);
        write_file(&path, &page.contents()).map_err(|source| ConvertError::Persistence {
            title: page.title.clone(),
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Wrote page");
        Ok(path)
    }
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// A page that could not be written, kept for the end-of-run report
#[derive(Debug)]
pub struct FailedPage {
    pub title: String,
    pub lines: Vec<String>,
    pub error: ConvertError,
}

impl FailedPage {
    pub fn new(page: RenderedPage, error: ConvertError) -> Self {
        Self {
            title: page.title,
            lines: page.lines,
            error,
        }
    }
}

impl fmt::Display for FailedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: >{}<", self.title)?;
        writeln!(f, "Content:")?;
        for line in &self.lines {
            writeln!(f, "    {}", line)?;
        }
        Ok(())
    }
}
