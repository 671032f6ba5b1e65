// src/pipeline.rs
use std::path::PathBuf;
use scraper::Html;
use crate::config::RunConfig;
use crate::extractors::{extract_districts, ColumnHeader, ResultRow};
use crate::storage::StorageManager;
use crate::utils::error::FetchError;
use crate::utils::html_debug::{CapturingSource, DebugCapture};
use crate::utils::AppError;
use crate::volby::PageSource;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub rows: usize,
}

/// Downloads the district list at `config.source_url`, then every district's
/// results page, and writes one results row per district.
///
/// The party columns come from the first district's page; every other page
/// must list the same parties. Any failure aborts the run. A results file
/// that was already opened stays on disk as written so far.
pub async fn run<P: PageSource>(
    config: &RunConfig,
    source: &P,
    storage: &StorageManager,
) -> Result<RunSummary, AppError> {
    // 1. District list
    tracing::info!("Fetching district list: {}", config.source_url);
    let index = source.fetch(&config.source_url).await?;
    let districts = extract_districts(&index)?;
    tracing::info!("Found {} districts", districts.len());

    let Some(first) = districts.first() else {
        return Err(AppError::EmptyResult(config.source_url.clone()));
    };

    let capture = if config.debug {
        let capture = DebugCapture::new(config.debug_dir())?;
        let index_html = index.html();
        capture.save_page("index", &index_html)?;
        capture.save_annotated("index", &index_html)?;
        capture.write_manifest(&config.source_url, &districts)?;
        Some(capture)
    } else {
        None
    };
    drop(index);

    // 2. Columns, from the first district's page. That page also supplies the
    // first row, so it is fetched once.
    let first_url = first.detail_url(&config.base_url)?;
    let first_page = load(source, &first_url, &format!("district_{}", first.code), capture.as_ref()).await?;
    let header = ColumnHeader::derive(&first_page)?;
    tracing::debug!("Party columns: {:?}", header.parties());

    // 3. Rows
    let mut writer = storage.create_results(&config.output_name, &header)?;
    tracing::info!("Processing district {} ({})", first.name, first.code);
    writer.write_row(&ResultRow::extract(first, &first_page, &header)?)?;
    drop(first_page);

    for district in &districts[1..] {
        tracing::info!("Processing district {} ({})", district.name, district.code);
        let url = district.detail_url(&config.base_url)?;
        let page = load(source, &url, &format!("district_{}", district.code), capture.as_ref()).await?;
        let row = ResultRow::extract(district, &page, &header)?;
        writer.write_row(&row)?;
    }

    let rows = writer.finish()?;
    let output_path = storage.results_path(&config.output_name);
    tracing::info!("Wrote {} rows to {}", rows, output_path.display());

    Ok(RunSummary { output_path, rows })
}

async fn load<P: PageSource>(
    source: &P,
    url: &str,
    label: &str,
    capture: Option<&DebugCapture>,
) -> Result<Html, FetchError> {
    match capture {
        Some(capture) => CapturingSource { inner: source, capture, label }.fetch(url).await,
        None => source.fetch(url).await,
    }
}
