use crate::pdf::collect::{Collection, PageEntry};
use crate::pdf::document::{inherited_attribute, INHERITABLE_KEYS};
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use lopdf::{dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Creator and Producer of every written file.
pub const TOOL_NAME: &str = "PDFSort";

const OUTPUT_DIR_SUFFIX: &str = "-PDFs";

/// Where grouped files go: `{source}/{name}-PDFs/{name}_{format}_pdf[-N].pdf`,
/// `name` being the source directory's base name.
pub struct OutputDir {
    dir: PathBuf,
    base_name: String,
    created: bool,
}

impl OutputDir {
    pub fn for_source(source: &Path) -> Self {
        let base_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        OutputDir {
            dir: source.join(format!("{}{}", base_name, OUTPUT_DIR_SUFFIX)),
            base_name,
            created: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self, format: &str, chunk: Option<usize>) -> PathBuf {
        let name = match chunk {
            Some(index) => format!("{}_{}_pdf-{}.pdf", self.base_name, format, index),
            None => format!("{}_{}_pdf.pdf", self.base_name, format),
        };
        self.dir.join(name)
    }

    fn ensure(&mut self) -> Result<()> {
        if !self.created {
            std::fs::create_dir_all(&self.dir)
                .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;
            self.created = true;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub pages: usize,
}

/// Split `total` pages into consecutive runs of at most `limit` pages.
/// A `limit` of 0 means a single run. Never yields an empty run.
pub fn plan_chunks(total: usize, limit: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return Vec::new();
    }
    if limit == 0 || limit >= total {
        return vec![0..total];
    }
    (0..total.div_ceil(limit))
        .map(|i| i * limit..((i + 1) * limit).min(total))
        .collect()
}

/// Write every page of `format` to one file, or to numbered files of at most
/// `limit` pages each.
pub fn write_group(
    collection: &Collection,
    format: &str,
    limit: usize,
    output: &mut OutputDir,
) -> Result<Vec<WrittenFile>> {
    let pages: Vec<&PageEntry> = collection.pages_with_format(format).collect();
    let chunks = plan_chunks(pages.len(), limit);
    let numbered = chunks.len() > 1;

    let mut written = Vec::with_capacity(chunks.len());
    for (index, range) in chunks.into_iter().enumerate() {
        let chunk = &pages[range];
        let path = output.file_path(format, numbered.then_some(index));

        output.ensure()?;
        let mut doc = assemble(&collection.documents, chunk)
            .with_context(|| format!("Failed to assemble {}", path.display()))?;
        PdfDocument::save(&mut doc, &path)?;
        log::debug!("{}: {} page(s)", path.display(), chunk.len());

        written.push(WrittenFile {
            path,
            pages: chunk.len(),
        });
    }
    Ok(written)
}

/// Build a new document from pages of the loaded sources, in the given order.
/// Only objects reachable from the selected pages are copied.
pub fn assemble(documents: &[PdfDocument], pages: &[&PageEntry]) -> Result<Document> {
    let mut out = Document::with_version("1.4");
    let pages_id = out.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());

    for run in pages.chunk_by(|a, b| a.source == b.source) {
        let source = &documents[run[0].source];
        if source.doc.version > out.version {
            out.version = source.doc.version.clone();
        }

        let page_ids = run
            .iter()
            .map(|entry| {
                source.page_id(entry.number).with_context(|| {
                    format!(
                        "Page {} not found in {}",
                        entry.number,
                        source.path.display()
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut copier = PageCopier::new(source);
        // Reserve ids up front so links between selected pages survive.
        copier.reserve(&mut out, &page_ids);
        for page_id in page_ids {
            let new_id = copier.copy_page(&mut out, page_id, pages_id)?;
            kids.push(Object::Reference(new_id));
        }
        copier.copy_pending(&mut out);
    }

    let count = kids.len() as i64;
    out.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => Object::Array(kids),
            "Count" => Object::Integer(count),
        }),
    );

    let catalog_id = out.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    });
    let info_id = out.add_object(dictionary! {
        "Creator" => Object::string_literal(TOOL_NAME),
        "Producer" => Object::string_literal(TOOL_NAME),
    });
    out.trailer.set("Root", Object::Reference(catalog_id));
    out.trailer.set("Info", Object::Reference(info_id));
    out.compress();

    Ok(out)
}

/// Copies pages of one source into another document together with the
/// objects they reference, renumbering as it goes.
struct PageCopier<'a> {
    source: &'a PdfDocument,
    ids: BTreeMap<ObjectId, ObjectId>,
    // (source id, new id) of referenced objects not yet copied.
    pending: Vec<(ObjectId, ObjectId)>,
}

impl<'a> PageCopier<'a> {
    fn new(source: &'a PdfDocument) -> Self {
        PageCopier {
            source,
            ids: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    fn reserve(&mut self, out: &mut Document, page_ids: &[ObjectId]) {
        for &page_id in page_ids {
            self.ids.insert(page_id, out.new_object_id());
        }
    }

    /// Copy one page, flattening inherited attributes onto it and hanging it
    /// under `parent`.
    fn copy_page(
        &mut self,
        out: &mut Document,
        page_id: ObjectId,
        parent: ObjectId,
    ) -> Result<ObjectId> {
        let source = self.source;
        let doc = &source.doc;
        let mut page = doc.get_dictionary(page_id)?.clone();
        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Some(value) = inherited_attribute(doc, page_id, key) {
                    page.set(*key, value.clone());
                }
            }
        }
        page.remove(b"Parent");
        for (_, value) in page.iter_mut() {
            self.remap(out, value);
        }
        page.set("Parent", Object::Reference(parent));

        let new_id = *self
            .ids
            .entry(page_id)
            .or_insert_with(|| out.new_object_id());
        out.objects.insert(new_id, Object::Dictionary(page));
        Ok(new_id)
    }

    /// Copy everything the copied pages reference, transitively.
    fn copy_pending(&mut self, out: &mut Document) {
        let source = self.source;
        while let Some((id, new_id)) = self.pending.pop() {
            let mut object = match source.doc.get_object(id) {
                Ok(object) => object.clone(),
                Err(_) => {
                    log::debug!("{}: dangling reference {:?}", source.path.display(), id);
                    Object::Null
                }
            };
            self.remap(out, &mut object);
            out.objects.insert(new_id, object);
        }
    }

    fn remap(&mut self, out: &mut Document, object: &mut Object) {
        match object {
            Object::Reference(id) => {
                let mapped = self.map_reference(out, *id);
                *object = mapped;
            }
            Object::Array(items) => {
                for item in items {
                    self.remap(out, item);
                }
            }
            Object::Dictionary(dict) => {
                for (_, value) in dict.iter_mut() {
                    self.remap(out, value);
                }
            }
            Object::Stream(stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    self.remap(out, value);
                }
            }
            _ => {}
        }
    }

    fn map_reference(&mut self, out: &mut Document, id: ObjectId) -> Object {
        if let Some(&new_id) = self.ids.get(&id) {
            return Object::Reference(new_id);
        }
        // Pages left out of this file, and the source's own page tree.
        if self.source.in_page_tree(id) {
            return Object::Null;
        }
        let new_id = out.new_object_id();
        self.ids.insert(id, new_id);
        self.pending.push((id, new_id));
        Object::Reference(new_id)
    }
}
