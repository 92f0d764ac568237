use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pagesift")]
#[command(
    version,
    about = "Infer page structure and style models from HTML and CSS",
    long_about = "Pagesift\n\nModes:\n- analyze: fetch a URL (and its stylesheets) and infer layout regions, components, interactive elements, and a classified style model.\n- local: run the same inference over a local HTML file and optional CSS files.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Print diagnostics to stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) overriding analyzer thresholds and caps"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a URL and analyze the page
    Analyze {
        #[arg(help = "Page URL (http or https)")]
        url: String,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Analyze a local HTML file
    Local {
        #[arg(help = "Path to the HTML file")]
        html: PathBuf,

        #[arg(
            long,
            value_delimiter = ',',
            help = "CSS files to analyze alongside the document (comma-separated)"
        )]
        css: Vec<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
}

pub fn parse() -> Cli {
    Cli::parse()
}
