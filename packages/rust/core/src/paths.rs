//! Output location for a row: `<output_root>/<url>/<file_name>`.

use std::fs::OpenOptions;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use mdgen_shared::{MdGenError, Result};

/// Directory and file a row's document is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePath {
    pub dir: PathBuf,
    pub file: PathBuf,
}

impl PagePath {
    /// Compute the location without touching the filesystem.
    ///
    /// The url value is used verbatim as a relative path. Leading separators
    /// are dropped so that `/about` still lands under `output_root`.
    pub fn resolve(output_root: &Path, url: &str, file_name: &str) -> Self {
        let relative = url.trim_start_matches(['/', '\\']);
        let dir = output_root.join(relative);
        let file = dir.join(file_name);
        Self { dir, file }
    }
}

/// Create the page directory (and ancestors) plus an empty file if absent.
///
/// Existing directories and files are left as they are; truncation is the
/// front-matter writer's job.
pub fn prepare(output_root: &Path, url: &str, file_name: &str) -> Result<PagePath> {
    let page = PagePath::resolve(output_root, url, file_name);

    std::fs::create_dir_all(&page.dir).map_err(|e| MdGenError::io(&page.dir, e))?;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&page.file)
        .map_err(|e| MdGenError::io(&page.file, e))?;

    debug!(path = %page.file.display(), "page file ready");
    Ok(page)
}

/// Reject url values that would escape the output root.
pub fn check_safe(url: &str) -> Result<()> {
    let path = Path::new(url);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes {
        return Err(MdGenError::validation(format!(
            "url {url:?} is absolute or contains '..'"
        )));
    }
    Ok(())
}
