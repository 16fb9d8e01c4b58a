use crate::pdf::group::{write_group, OutputDir};
use crate::pdf::Collection;
use crate::tally::tally;
use anyhow::Result;

pub struct WriteOptions {
    /// Maximum pages per output file, 0 for no limit.
    pub limit: usize,
}

pub fn run(collection: &Collection, options: &WriteOptions, output: &mut OutputDir) -> Result<()> {
    let formats = tally(collection.dimensions());

    if formats.is_empty() {
        println!("No PDF pages found.");
        return Ok(());
    }

    for format in formats.keys() {
        for file in write_group(collection, format, options.limit, output)? {
            println!("Wrote {} page(s) to {}", file.pages, file.path.display());
        }
    }

    Ok(())
}
