use crate::paper::PageDimension;
use crate::pdf::PdfDocument;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A page of one of the loaded documents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageEntry {
    /// Index into [`Collection::documents`].
    pub source: usize,
    /// 1-based page number within the source.
    pub number: u32,
    pub dimension: PageDimension,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Every page of every readable input file, in input order.
#[derive(Default)]
pub struct Collection {
    pub documents: Vec<PdfDocument>,
    pub pages: Vec<PageEntry>,
    pub skipped: Vec<SkippedFile>,
}

impl Collection {
    pub fn dimensions(&self) -> impl Iterator<Item = &PageDimension> {
        self.pages.iter().map(|page| &page.dimension)
    }

    /// Pages whose orientation-free format label is `format`.
    pub fn pages_with_format<'a>(
        &'a self,
        format: &'a str,
    ) -> impl Iterator<Item = &'a PageEntry> + 'a {
        self.pages
            .iter()
            .filter(move |page| page.dimension.format(false) == format)
    }

    fn push(&mut self, pdf: PdfDocument) -> Result<()> {
        let source = self.documents.len();
        for (number, dimension) in pdf.page_dimensions()? {
            self.pages.push(PageEntry {
                source,
                number,
                dimension,
            });
        }
        self.documents.push(pdf);
        Ok(())
    }
}

enum Loaded {
    Document(PdfDocument),
    Skipped(SkippedFile),
}

// A file that cannot be read is skipped; one that reads but does not parse
// is an error.
fn load(path: &Path) -> Result<Loaded> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            return Ok(Loaded::Skipped(SkippedFile {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }))
        }
    };
    Ok(Loaded::Document(PdfDocument::from_bytes(path, &bytes)?))
}

/// Load all `paths`, skipping files that cannot be read.
pub fn collect<P: AsRef<Path>>(paths: &[P]) -> Result<Collection> {
    let mut collection = Collection::default();

    for path in paths {
        match load(path.as_ref())? {
            Loaded::Document(pdf) => {
                log::debug!("{}: {} page(s)", pdf.path.display(), pdf.page_count());
                collection.push(pdf)?;
            }
            Loaded::Skipped(skipped) => {
                log::warn!(
                    "{}: {}; file ignored",
                    skipped.path.display(),
                    skipped.reason
                );
                collection.skipped.push(skipped);
            }
        }
    }

    log::info!(
        "Loaded {} page(s) from {} file(s), {} skipped",
        collection.pages.len(),
        collection.documents.len(),
        collection.skipped.len()
    );

    Ok(collection)
}
