use crate::paper::PageDimension;
use anyhow::{bail, Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Page attributes that may be inherited from an ancestor `Pages` node.
pub const INHERITABLE_KEYS: &[&[u8]] = &[b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

// Guards against cyclic Parent links in damaged files.
const MAX_TREE_DEPTH: usize = 64;

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
    pages: BTreeMap<u32, ObjectId>,
    // Every page and Pages node reachable from a page through Parent links.
    tree: BTreeSet<ObjectId>,
}

impl PdfDocument {
    pub fn new<P: AsRef<Path>>(path: P, doc: Document) -> Self {
        let pages = doc.get_pages();
        let mut tree = BTreeSet::new();
        for &page_id in pages.values() {
            let mut id = page_id;
            for _ in 0..MAX_TREE_DEPTH {
                if !tree.insert(id) {
                    break;
                }
                match doc
                    .get_dictionary(id)
                    .and_then(|node| node.get(b"Parent"))
                    .and_then(Object::as_reference)
                {
                    Ok(parent) => id = parent,
                    Err(_) => break,
                }
            }
        }
        PdfDocument {
            doc,
            path: path.as_ref().to_path_buf(),
            pages,
            tree,
        }
    }

    #[cfg(test)]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_bytes(path, &bytes)
    }

    /// Parse an already-read file.
    pub fn from_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes)
            .with_context(|| format!("Failed to open PDF: {}", path.as_ref().display()))?;
        Ok(Self::new(path, doc))
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        self.pages.iter().map(|(&num, &id)| (num, id)).collect()
    }

    pub fn page_id(&self, number: u32) -> Option<ObjectId> {
        self.pages.get(&number).copied()
    }

    /// Whether `id` is a page or an intermediate node of the page tree.
    pub fn in_page_tree(&self, id: ObjectId) -> bool {
        self.tree.contains(&id)
    }

    /// Media box size of every page, in page order.
    pub fn page_dimensions(&self) -> Result<Vec<(u32, PageDimension)>> {
        self.page_ids()
            .into_iter()
            .map(|(num, id)| {
                let dimension = media_box(&self.doc, id).with_context(|| {
                    format!("Page {} of {}", num, self.path.display())
                })?;
                Ok((num, dimension))
            })
            .collect()
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}

/// Find `key` on a page or the nearest ancestor that defines it. The value is
/// returned as stored, so it may be an indirect reference.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Width and height of a page's media box.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Result<PageDimension> {
    let Some(value) = inherited_attribute(doc, page_id, b"MediaBox") else {
        bail!("no MediaBox defined");
    };

    let values = resolve(doc, value)
        .as_array()
        .context("MediaBox is not an array")?;
    if values.len() != 4 {
        bail!("MediaBox has {} entries, expected 4", values.len());
    }

    let mut corners = [0.0; 4];
    for (corner, value) in corners.iter_mut().zip(values) {
        *corner = number(resolve(doc, value))?;
    }

    Ok(PageDimension::new(
        (corners[2] - corners[0]).abs(),
        (corners[3] - corners[1]).abs(),
    ))
}

fn resolve<'a>(doc: &'a Document, value: &'a Object) -> &'a Object {
    match value {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(value),
        _ => value,
    }
}

fn number(value: &Object) -> Result<f64> {
    match value {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(r) => Ok(f64::from(*r)),
        other => bail!("expected a number in MediaBox, found {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{build_pdf, write_pdf, PageSpec};
    use lopdf::dictionary;

    #[test]
    fn test_page_dimensions_in_order() {
        let doc = build_pdf(&[
            PageSpec::sized(595.0, 842.0),
            PageSpec::sized(842.0, 595.0),
            PageSpec::sized(612.0, 792.0),
        ]);
        let pdf = PdfDocument::new("memory.pdf", doc);

        let dims = pdf.page_dimensions().unwrap();
        assert_eq!(pdf.page_count(), 3);
        assert_eq!(dims[0], (1, PageDimension::new(595.0, 842.0)));
        assert_eq!(dims[1], (2, PageDimension::new(842.0, 595.0)));
        assert_eq!(dims[2], (3, PageDimension::new(612.0, 792.0)));
    }

    #[test]
    fn test_media_box_inherited_from_parent() {
        let doc = build_pdf(&[PageSpec::inherited(), PageSpec::sized(420.0, 595.0)]);
        let pages = doc.get_pages();

        let first = media_box(&doc, pages[&1]).unwrap();
        let second = media_box(&doc, pages[&2]).unwrap();

        // Fixture parent node is Letter.
        assert_eq!(first, PageDimension::new(612.0, 792.0));
        assert_eq!(second, PageDimension::new(420.0, 595.0));
    }

    #[test]
    fn test_media_box_with_offset_origin() {
        let mut doc = build_pdf(&[PageSpec::sized(1.0, 1.0)]);
        let page_id = doc.get_pages()[&1];
        doc.get_dictionary_mut(page_id).unwrap().set(
            "MediaBox",
            vec![100.into(), 50.into(), Object::Real(695.0), 892.into()],
        );

        let dim = media_box(&doc, page_id).unwrap();
        assert_eq!(dim, PageDimension::new(595.0, 842.0));
    }

    #[test]
    fn test_media_box_through_reference() {
        let mut doc = build_pdf(&[PageSpec::sized(1.0, 1.0)]);
        let box_id = doc.add_object(Object::Array(vec![
            0.into(),
            0.into(),
            595.into(),
            842.into(),
        ]));
        let page_id = doc.get_pages()[&1];
        doc.get_dictionary_mut(page_id)
            .unwrap()
            .set("MediaBox", Object::Reference(box_id));

        assert_eq!(
            media_box(&doc, page_id).unwrap(),
            PageDimension::new(595.0, 842.0)
        );
    }

    #[test]
    fn test_media_box_missing() {
        let mut doc = build_pdf(&[PageSpec::inherited()]);
        let pages_id = doc.catalog().unwrap().get(b"Pages").unwrap().as_reference().unwrap();
        doc.get_dictionary_mut(pages_id).unwrap().remove(b"MediaBox");
        let page_id = doc.get_pages()[&1];

        assert!(media_box(&doc, page_id).is_err());
    }

    #[test]
    fn test_media_box_malformed() {
        let mut doc = build_pdf(&[PageSpec::sized(1.0, 1.0)]);
        let page_id = doc.get_pages()[&1];
        doc.get_dictionary_mut(page_id)
            .unwrap()
            .set("MediaBox", dictionary! { "Width" => 595 });

        assert!(media_box(&doc, page_id).is_err());
    }

    #[test]
    fn test_page_tree_membership() {
        let doc = build_pdf(&[PageSpec::sized(595.0, 842.0); 2]);
        let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
        let pages_id = doc
            .get_dictionary(catalog_id)
            .unwrap()
            .get(b"Pages")
            .unwrap()
            .as_reference()
            .unwrap();
        let pdf = PdfDocument::new("memory.pdf", doc);

        for (_, page_id) in pdf.page_ids() {
            assert!(pdf.in_page_tree(page_id));
        }
        assert!(pdf.in_page_tree(pages_id));
        assert!(!pdf.in_page_tree(catalog_id));
        assert_eq!(pdf.page_id(3), None);
    }

    #[test]
    fn test_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two.pdf");
        write_pdf(&path, &[PageSpec::sized(595.0, 842.0); 2]);

        let pdf = PdfDocument::open(&path).unwrap();
        assert_eq!(pdf.page_count(), 2);
        assert_eq!(pdf.path, path);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(PdfDocument::from_bytes("junk.pdf", b"not a pdf").is_err());
    }
}
