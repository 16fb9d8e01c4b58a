//! Minimal PDFs built with lopdf for tests.

use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

/// Media box of the root `Pages` node in generated documents (US Letter).
pub const PARENT_MEDIA_BOX: (f32, f32) = (612.0, 792.0);

#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    pub size: Option<(f32, f32)>,
    pub tag: i64,
}

impl PageSpec {
    pub fn sized(width: f32, height: f32) -> Self {
        PageSpec {
            size: Some((width, height)),
            tag: 0,
        }
    }

    /// A page without its own MediaBox.
    pub fn inherited() -> Self {
        PageSpec { size: None, tag: 0 }
    }

    /// Stored as `/Tag` on the page so tests can follow it through a rewrite.
    pub fn tagged(mut self, tag: i64) -> Self {
        self.tag = tag;
        self
    }
}

fn rect(width: f32, height: f32) -> Object {
    Object::Array(vec![
        0.into(),
        0.into(),
        Object::Real(width),
        Object::Real(height),
    ])
}

pub fn build_pdf(pages: &[PageSpec]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let resources_id = doc.add_object(dictionary! {
        "ProcSet" => Object::Array(vec![
            Object::Name(b"PDF".to_vec()),
            Object::Name(b"Text".to_vec()),
        ]),
    });

    let mut kids = Vec::with_capacity(pages.len());
    for spec in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"q Q".to_vec()));
        let mut page = dictionary! {
            "Type" => Object::Name(b"Page".to_vec()),
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
            "Tag" => Object::Integer(spec.tag),
        };
        if let Some((width, height)) = spec.size {
            page.set("MediaBox", rect(width, height));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let (width, height) = PARENT_MEDIA_BOX;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => Object::Array(kids),
            "Count" => Object::Integer(pages.len() as i64),
            "MediaBox" => rect(width, height),
            "Resources" => Object::Reference(resources_id),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

pub fn write_pdf(path: &Path, pages: &[PageSpec]) {
    let mut doc = build_pdf(pages);
    doc.save(path).unwrap();
}

/// `/Tag` of every page, in page order.
pub fn page_tags(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .values()
        .map(|id| page_dict(doc, *id).get(b"Tag").unwrap().as_i64().unwrap())
        .collect()
}

pub fn page_dict(doc: &Document, id: ObjectId) -> &lopdf::Dictionary {
    doc.get_dictionary(id).unwrap()
}

/// A text entry of the trailer's Info dictionary.
pub fn info_entry(doc: &Document, key: &[u8]) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_dictionary(info_id).ok()?;
    match info.get(key).ok()? {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}
