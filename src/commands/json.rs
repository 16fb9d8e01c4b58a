use crate::pdf::collect::SkippedFile;
use crate::pdf::Collection;
use crate::tally::{tally, FormatTally};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub source: &'a Path,
    pub files: usize,
    pub skipped: &'a [SkippedFile],
    pub pages: usize,
    pub formats: FormatTally,
}

impl<'a> Report<'a> {
    pub fn new(source: &'a Path, collection: &'a Collection) -> Self {
        Report {
            source,
            files: collection.documents.len(),
            skipped: &collection.skipped,
            pages: collection.pages.len(),
            formats: tally(collection.dimensions()),
        }
    }
}

pub fn run<P: AsRef<Path>>(source: P, collection: &Collection) -> Result<()> {
    let report = Report::new(source.as_ref(), collection);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
