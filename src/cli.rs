use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdfsort")]
#[command(about = "Count PDF pages by paper format and regroup them into one file per format")]
#[command(
    long_about = "Recursively collects every PDF file under DIRECTORY, determines the \
                  paper format of each page and counts pages per format. It can also \
                  write new PDF files, each holding pages of only one format."
)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Directory to scan, including subdirectories
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Draw a table with page formats and their counts
    #[arg(short, long)]
    pub table: bool,

    /// Print page formats and counts as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Write PDF files with pages of only one format to the output directory
    #[arg(short, long)]
    pub write: bool,

    /// Maximum number of pages per written file
    #[arg(short, long, value_name = "N", allow_hyphen_values = true)]
    pub limit: Option<String>,

    /// Print version
    #[arg(short = 'v', long)]
    pub version: bool,
}

impl Cli {
    /// Page limit for written files. Anything but plain digits means no limit.
    pub fn page_limit(&self) -> usize {
        self.limit.as_deref().map_or(0, parse_limit)
    }
}

fn parse_limit(value: &str) -> usize {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    value.parse().unwrap_or(0)
}
