use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pagesift_lib::{ComponentKind, SiteReport, PAGESIFT_OUTPUT_VERSION};
use tempfile::tempdir;

const PAGE: &str = r#"<html><head>
<title>Gadget Store</title>
<meta name="description" content="Gadgets and more">
<link rel="icon" href="/favicon.ico">
</head><body>
<header class="top-header"><nav class="main-nav"><ul><li>Home</li><li>Shop</li><li>Contact</li></ul></nav></header>
<main class="container">
  <div class="row"><div>a</div><div>b</div><div>c</div></div>
  <div class="product-card"><h3>Widget</h3><p>Price 10</p><button class="btn">Buy</button></div>
  <div class="product-card"><h3>Gizmo</h3><p>Price 20</p><button class="btn">Buy</button></div>
  <div class="product-card"><h3>Doodad</h3><p>Price 30</p><button class="btn">Buy</button></div>
  <div class="product-card"><h3>Thing</h3><p>Price 40</p><button class="btn">Buy</button></div>
</main>
<footer class="site-footer">All rights reserved 2024</footer>
<script>fetch('/api/cart', { method: 'POST' });</script>
</body></html>"#;

const CSS: &str = r#"
.container { display: flex; }
.product-card { border: 1px solid #ddd; color: #ff0000; }
.btn { background: #ff0000; color: #ffffff; }
.site-footer { background: #222222; }
"#;

fn bin_path() -> PathBuf {
    std::env::var("CARGO_BIN_EXE_pagesift")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("target")
                .join("debug")
                .join(if cfg!(windows) {
                    "pagesift.exe"
                } else {
                    "pagesift"
                })
        })
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .expect("run pagesift command")
}

fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let html = dir.join("index.html");
    let css = dir.join("main.css");
    std::fs::write(&html, PAGE).expect("write html fixture");
    std::fs::write(&css, CSS).expect("write css fixture");
    (html, css)
}

fn run_local_json(html: &Path, css: &Path, extra: &[&str]) -> SiteReport {
    let mut args = vec![
        "local",
        html.to_str().expect("utf8 path"),
        "--css",
        css.to_str().expect("utf8 path"),
        "--format",
        "json",
    ];
    args.extend_from_slice(extra);
    let output = run(&args);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("report should be valid JSON")
}

#[test]
fn local_analysis_produces_a_full_report() {
    let dir = tempdir().expect("tempdir");
    let (html, css) = write_fixture(dir.path());
    let report = run_local_json(&html, &css, &[]);

    assert_eq!(report.version, PAGESIFT_OUTPUT_VERSION);
    assert_eq!(report.structure.layout.kind, "standard-layout_flex");
    assert!(report.structure.layout.header.is_some());
    assert!(report.structure.layout.footer.is_some());
    assert!(report.structure.layout.main_content.is_some());

    let card = report
        .structure
        .components
        .iter()
        .find(|c| c.kind == ComponentKind::Card)
        .expect("card component detected");
    assert_eq!(card.count, 4);

    let nav = report
        .structure
        .components
        .iter()
        .find(|c| c.kind == ComponentKind::Navigation)
        .expect("navigation detected");
    assert_eq!(nav.nav_items, Some(3));

    assert_eq!(report.structure.interactive.buttons.len(), 4);
    assert_eq!(report.structure.meta.title.as_deref(), Some("Gadget Store"));
    assert!(report
        .structure
        .meta
        .api_endpoints
        .iter()
        .any(|e| e.method == "POST" && e.url == "/api/cart"));

    assert!(report.style.component_rules.contains_key("card"));
    assert!(report.style.component_rules.contains_key("button"));
    assert_eq!(report.style.layout_rules.len(), 1);
    assert_eq!(report.style.file_stats.len(), 1);

    let colors = &report.style.palette.colors;
    assert_eq!(colors[0].value, "#ff0000");
    assert_eq!(colors[0].count, 2);
}

#[test]
fn yaml_and_json_reports_are_field_for_field_equal() {
    let dir = tempdir().expect("tempdir");
    let (html, css) = write_fixture(dir.path());
    let from_json = run_local_json(&html, &css, &[]);

    let output = run(&[
        "local",
        html.to_str().unwrap(),
        "--css",
        css.to_str().unwrap(),
        "--format",
        "yaml",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let from_yaml: SiteReport =
        serde_yaml::from_slice(&output.stdout).expect("report should be valid YAML");
    // Deterministic pipeline: the two runs must describe the same models,
    // whichever serialization carried them.
    assert_eq!(from_yaml, from_json);
    assert_eq!(from_yaml.structure.layout.kind, "standard-layout_flex");
}

#[test]
fn markdown_format_renders_a_design_document() {
    let dir = tempdir().expect("tempdir");
    let (html, css) = write_fixture(dir.path());

    let output = run(&[
        "local",
        html.to_str().unwrap(),
        "--css",
        css.to_str().unwrap(),
        "--format",
        "markdown",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let markdown = String::from_utf8_lossy(&output.stdout);
    assert!(markdown.starts_with("# Design Document: Gadget Store"));
    assert!(markdown.contains("## Layout"));
    assert!(markdown.contains("## Components"));
    assert!(markdown.contains("## Palette"));
    assert!(markdown.contains("`POST /api/cart`"));
}

#[test]
fn config_file_raises_the_card_threshold() {
    let dir = tempdir().expect("tempdir");
    let (html, css) = write_fixture(dir.path());
    let config = dir.path().join("pagesift.toml");
    std::fs::write(&config, "card-threshold = 5\n").expect("write config");

    let report = run_local_json(&html, &css, &["--config", config.to_str().unwrap()]);
    assert!(report
        .structure
        .components
        .iter()
        .all(|c| c.kind != ComponentKind::Card));
}

#[test]
fn output_flag_writes_the_report_to_a_file() {
    let dir = tempdir().expect("tempdir");
    let (html, css) = write_fixture(dir.path());
    let out_path = dir.path().join("report.json");

    let output = run(&[
        "local",
        html.to_str().unwrap(),
        "--css",
        css.to_str().unwrap(),
        "--output",
        out_path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    let body = std::fs::read_to_string(&out_path).expect("report file written");
    let report: SiteReport = serde_json::from_str(&body).expect("valid JSON report");
    assert_eq!(report.version, PAGESIFT_OUTPUT_VERSION);
}

#[test]
fn verbose_flag_emits_diagnostics_on_stderr() {
    let dir = tempdir().expect("tempdir");
    let (html, css) = write_fixture(dir.path());

    let output = run(&[
        "local",
        html.to_str().unwrap(),
        "--css",
        css.to_str().unwrap(),
        "--verbose",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[info] pipeline"));
}

#[test]
fn missing_input_file_exits_with_fatal_code() {
    let output = run(&["local", "/nonexistent/page.html"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error"));
}

#[test]
fn empty_document_is_reported_as_a_parse_error() {
    let dir = tempdir().expect("tempdir");
    let html = dir.path().join("empty.html");
    std::fs::write(&html, "   \n").expect("write empty fixture");

    let output = run(&["local", html.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Parse error"));
}
