/*!
 * Loading of recognized OCR text.
 *
 * Three on-disk layouts are accepted:
 * - a directory with one `.txt` file per image, taken in natural filename order
 * - a single `.txt` file whose images are separated by form feeds (`\x0c`)
 * - a `.json` file holding `[["line", ...], ...]` or `{"images": [[...], ...]}`
 *
 * Page files are read concurrently but always handed back in document order.
 */

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::app_config::InputConfig;
use crate::errors::InputError;
use crate::file_utils::{natural_cmp, FileManager, InputKind};

/// Tesseract's page separator
pub const PAGE_SEPARATOR: char = '\x0c';

#[derive(Deserialize)]
#[serde(untagged)]
enum PageList {
    Images(Vec<Vec<String>>),
    Wrapped { images: Vec<Vec<String>> },
}

/// Split one page of text into lines, keeping blank lines
pub fn split_lines(text: &str) -> Vec<String> {
    text.trim_end_matches(PAGE_SEPARATOR)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Split form-feed separated text into pages. Trailing blank pages are dropped.
pub fn split_pages(content: &str) -> Vec<Vec<String>> {
    let mut pages: Vec<Vec<String>> = content.split(PAGE_SEPARATOR).map(split_lines).collect();

    while pages
        .last()
        .is_some_and(|page| page.iter().all(|line| line.trim().is_empty()))
    {
        pages.pop();
    }

    pages
}

/// Parse a JSON page list. Entries holding newlines are split into lines.
pub fn parse_page_list(path: &Path, content: &str) -> Result<Vec<Vec<String>>, InputError> {
    let list: PageList = serde_json::from_str(content).map_err(|e| InputError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let images = match list {
        PageList::Images(images) | PageList::Wrapped { images } => images,
    };

    Ok(images
        .into_iter()
        .map(|page| {
            page.iter()
                .flat_map(|entry| entry.split('\n'))
                .map(|line| line.trim_end_matches('\r').to_string())
                .collect()
        })
        .collect())
}

/// Read every page file of a directory, `concurrency` files at a time
pub async fn load_page_directory(dir: &Path, concurrency: usize) -> Result<Vec<Vec<String>>> {
    let files = FileManager::find_page_files(dir, "txt")?;
    debug!("Found {} page files in {:?}", files.len(), dir);

    // `buffered` yields in submission order whatever order the reads finish in
    let pages: Vec<Vec<String>> = stream::iter(files)
        .map(|path| async move {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| InputError::Read { path, source })?;
            Ok::<_, InputError>(split_lines(&text))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(pages)
}

/// Load a form-feed separated text file
pub async fn load_text_file(path: &Path) -> Result<Vec<Vec<String>>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Read { path: path.to_path_buf(), source })?;
    Ok(split_pages(&content))
}

/// Load a JSON page list
pub async fn load_json_file(path: &Path) -> Result<Vec<Vec<String>>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Read { path: path.to_path_buf(), source })?;
    Ok(parse_page_list(path, &content)?)
}

/// Load one document, whatever its layout
pub async fn load_document(path: &Path, config: &InputConfig) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()).into());
    }

    let images = match FileManager::detect_input_kind(path) {
        InputKind::PageDirectory => load_page_directory(path, config.read_concurrency).await?,
        InputKind::TextFile => load_text_file(path).await?,
        InputKind::JsonFile => load_json_file(path).await?,
        InputKind::Unknown => return Err(InputError::Unsupported(path.to_path_buf()).into()),
    };

    if images.is_empty() {
        return Err(InputError::NoPages(path.to_path_buf()).into());
    }

    info!(
        "Loaded {} images ({} lines) from {:?}",
        images.len(),
        images.iter().map(Vec::len).sum::<usize>(),
        path
    );
    Ok(images)
}

/// Documents inside a batch directory: `.txt` and `.json` files, and
/// subdirectories holding page files. Files ending in one of
/// `report_extensions` are earlier reports and are left out.
pub fn discover_documents(dir: &Path, report_extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(InputError::NotFound(dir.to_path_buf()).into());
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to read batch directory: {:?}", dir))?;
        let path = entry.into_path();

        if path.is_file() && is_report(&path, report_extensions) {
            debug!("Skipping earlier report {:?}", path);
            continue;
        }

        let is_document = match FileManager::detect_input_kind(&path) {
            InputKind::PageDirectory => !FileManager::find_page_files(&path, "txt")?.is_empty(),
            InputKind::TextFile | InputKind::JsonFile => true,
            InputKind::Unknown => false,
        };

        if is_document {
            documents.push(path);
        }
    }

    documents.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    Ok(documents)
}

fn is_report(path: &Path, report_extensions: &[&str]) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    report_extensions.iter().any(|extension| {
        let extension = extension.trim_start_matches('.').to_lowercase();
        // A bare input extension cannot tell reports from documents
        let ambiguous = extension.is_empty() || extension == "txt" || extension == "json";
        !ambiguous && name.ends_with(&format!(".{}", extension))
    })
}
