use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "isgpt")]
#[command(author, version, about = "Check whether a text file was written by AI")]
pub struct Cli {
    /// isgpt server URL
    #[arg(long, env = "ISGPT_SERVER", default_value = "http://localhost:9081")]
    pub server: String,

    /// Show the full JSON result instead of the plain-text summary
    #[arg(short, long)]
    pub verbose: bool,

    /// Text file to analyze
    pub file: PathBuf,
}
