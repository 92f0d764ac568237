use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pagesift_lib::{
    analyze_page, AnalyzerConfig, Diagnostics, Fetcher, PageData, PagesiftError, Result,
    SiteReport,
};

use crate::cli::OutputFormat;

pub async fn run_analyze(
    config: Option<PathBuf>,
    verbose: bool,
    url: String,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let result = analyze_url(config, verbose, &url, format, output.as_deref()).await;
    finish(result)
}

pub async fn run_local(
    config: Option<PathBuf>,
    verbose: bool,
    html: PathBuf,
    css: Vec<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let result = analyze_local(config, verbose, &html, &css, format, output.as_deref()).await;
    finish(result)
}

async fn analyze_url(
    config: Option<PathBuf>,
    verbose: bool,
    url: &str,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_config(config).await?;
    let mut diag = Diagnostics::new();

    let fetcher = Fetcher::new()?;
    let page = fetcher.fetch_page(url, &mut diag).await?;
    let analysis = analyze_page(&page, &config, &mut diag)?;
    let report = SiteReport::new(url, analysis, &diag);

    emit_diagnostics(verbose, &diag);
    write_output(&render(&report, format)?, output)
}

async fn analyze_local(
    config: Option<PathBuf>,
    verbose: bool,
    html: &Path,
    css: &[PathBuf],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_config(config).await?;
    let mut diag = Diagnostics::new();

    let mut css_files = BTreeMap::new();
    for path in css {
        let body = tokio::fs::read_to_string(path).await?;
        css_files.insert(path.display().to_string(), body);
    }
    let page = PageData {
        html: tokio::fs::read_to_string(html).await?,
        base_url: String::new(),
        css_files,
    };

    let analysis = analyze_page(&page, &config, &mut diag)?;
    let report = SiteReport::new(html.display().to_string(), analysis, &diag);

    emit_diagnostics(verbose, &diag);
    write_output(&render(&report, format)?, output)
}

async fn load_config(path: Option<PathBuf>) -> Result<AnalyzerConfig> {
    let Some(path) = path else {
        return Ok(AnalyzerConfig::default());
    };
    let text = tokio::fs::read_to_string(&path).await?;
    toml::from_str(&text)
        .map_err(|err| PagesiftError::config(format!("{}: {}", path.display(), err)))
}

fn render(report: &SiteReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => report.to_json(),
        OutputFormat::Yaml => report.to_yaml(),
        OutputFormat::Markdown => Ok(report.to_markdown()),
    }
}

fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn emit_diagnostics(verbose: bool, diag: &Diagnostics) {
    if !verbose {
        return;
    }
    for entry in diag.entries() {
        eprintln!("{entry}");
    }
}

fn finish(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error ({:?}): {}", err.category(), err);
            // Exit code 2 marks fatal errors.
            ExitCode::from(2)
        }
    }
}
