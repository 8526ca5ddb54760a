use clap::Parser;
use isgpt_cli::{read_input, Cli, IsgptClient};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(&cli).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<String> {
    let text = read_input(&cli.file)?;
    let client = IsgptClient::new(&cli.server)?;
    client.analyze(&text, cli.verbose).await
}

/// Logs go to stderr so stdout carries only the server's answer
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("isgpt=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
