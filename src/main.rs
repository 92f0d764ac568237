mod cli;
mod commands;

use std::process::ExitCode;

use cli::Commands;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    match args.command {
        Commands::Analyze {
            url,
            format,
            output,
        } => commands::run_analyze(args.config, args.verbose, url, format, output).await,
        Commands::Local {
            html,
            css,
            format,
            output,
        } => commands::run_local(args.config, args.verbose, html, css, format, output).await,
    }
}
