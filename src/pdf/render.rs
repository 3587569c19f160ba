//! Turning one page of a source document into a standalone single-page PDF.
//!
//! Two strategies exist. [`PruneRenderer`] clones the whole document and
//! deletes every other page, which keeps the page byte-for-byte as the source
//! drew it. [`RebuildRenderer`] starts from an empty document and copies in
//! only what the page references; it is used when the source cannot be saved
//! back as-is (encrypted trailers, broken page trees).

use crate::pdf::document::save_to_vec;
use crate::pdf::PdfDocument;
use anyhow::{anyhow, bail, Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Limit on page tree depth when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 32;

pub trait PageRenderer {
    fn name(&self) -> &'static str;

    fn render(&self, doc: &PdfDocument, page: u32) -> Result<Vec<u8>>;
}

/// Which renderer to use. `Auto` asks [`probe_strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RendererChoice {
    #[default]
    Auto,
    Prune,
    Rebuild,
}

pub struct PruneRenderer;

impl PageRenderer for PruneRenderer {
    fn name(&self) -> &'static str {
        "prune"
    }

    fn render(&self, doc: &PdfDocument, page: u32) -> Result<Vec<u8>> {
        let mut single = extract_single_page(doc, page)?;
        save_to_vec(&mut single)
    }
}

pub struct RebuildRenderer;

impl PageRenderer for RebuildRenderer {
    fn name(&self) -> &'static str {
        "rebuild"
    }

    fn render(&self, doc: &PdfDocument, page: u32) -> Result<Vec<u8>> {
        let mut single = rebuild_single_page(doc, page)?;
        save_to_vec(&mut single)
    }
}

pub fn renderer_for(choice: RendererChoice, doc: &PdfDocument) -> Box<dyn PageRenderer> {
    let renderer: Box<dyn PageRenderer> = match choice {
        RendererChoice::Auto => probe_strategy(doc),
        RendererChoice::Prune => Box::new(PruneRenderer),
        RendererChoice::Rebuild => Box::new(RebuildRenderer),
    };
    info!(renderer = renderer.name(), "selected page renderer");
    renderer
}

/// Pick the renderer a document can support.
pub fn probe_strategy(doc: &PdfDocument) -> Box<dyn PageRenderer> {
    if doc.is_encrypted() {
        debug!("document has an /Encrypt entry, rebuilding pages");
        return Box::new(RebuildRenderer);
    }
    if let Err(e) = pages_root(&doc.doc) {
        debug!(error = %e, "page tree root unusable, rebuilding pages");
        return Box::new(RebuildRenderer);
    }
    if let Err(e) = extract_single_page(doc, 1) {
        debug!(error = %e, "trial prune failed, rebuilding pages");
        return Box::new(RebuildRenderer);
    }
    Box::new(PruneRenderer)
}

fn pages_root(doc: &Document) -> Result<ObjectId> {
    let catalog = doc.catalog().context("Document has no catalog")?;
    let pages_id = catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .context("Catalog has no /Pages reference")?;
    doc.get_dictionary(pages_id)
        .context("/Pages is not a dictionary")?;
    Ok(pages_id)
}

/// Clone the document and delete every page except `page`.
fn extract_single_page(doc: &PdfDocument, page: u32) -> Result<Document> {
    doc.page_id(page)?;

    let mut new_doc = doc.doc.clone();
    let pages_to_delete: Vec<u32> = doc
        .page_ids()
        .iter()
        .map(|(num, _)| *num)
        .filter(|num| *num != page)
        .collect();

    if !pages_to_delete.is_empty() {
        new_doc.delete_pages(&pages_to_delete);
    }
    new_doc.prune_objects();

    if new_doc.get_pages().len() != 1 {
        bail!(
            "Page tree still has {} pages after pruning",
            new_doc.get_pages().len()
        );
    }
    Ok(new_doc)
}

/// Build a fresh document holding only `page` and what it references.
fn rebuild_single_page(doc: &PdfDocument, page: u32) -> Result<Document> {
    let source = &doc.doc;
    let page_id = doc.page_id(page)?;
    let page_dict = source
        .get_dictionary(page_id)
        .with_context(|| format!("Page {} is not a dictionary", page))?;

    let mut page_dict = page_dict.clone();
    for key in INHERITABLE {
        if page_dict.get(key).is_err() {
            if let Some(value) = inherited_attribute(source, page_id, key) {
                page_dict.set(key.to_vec(), value);
            }
        }
    }

    let mut out = Document::with_version(source.version.clone());
    let mut copier = ObjectCopier {
        source,
        page_id,
        mapped: BTreeMap::new(),
    };

    let new_page_id = out.new_object_id();
    copier.mapped.insert(page_id, new_page_id);

    let mut copied = Dictionary::new();
    for (key, value) in page_dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        copied.set(key.clone(), copier.copy(&mut out, value)?);
    }

    let pages_id = out.new_object_id();
    copied.set("Parent", Object::Reference(pages_id));
    out.objects.insert(new_page_id, Object::Dictionary(copied));

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Kids", Object::Array(vec![Object::Reference(new_page_id)]));
    pages.set("Count", Object::Integer(1));
    out.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = out.add_object(Object::Dictionary(catalog));
    out.trailer.set("Root", Object::Reference(catalog_id));

    debug!(page, objects = out.objects.len(), "rebuilt page");
    Ok(out)
}

fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        let parent = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value.clone());
        }
        current = parent;
    }
    None
}

/// Deep copy of objects from `source` into a new document, renumbering
/// references as it goes.
struct ObjectCopier<'a> {
    source: &'a Document,
    page_id: ObjectId,
    mapped: BTreeMap<ObjectId, ObjectId>,
}

impl ObjectCopier<'_> {
    fn copy(&mut self, out: &mut Document, object: &Object) -> Result<Object> {
        Ok(match object {
            Object::Reference(id) => self.copy_reference(out, *id)?,
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy(out, item))
                    .collect::<Result<_>>()?,
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dict(out, dict)?),
            Object::Stream(stream) => {
                let mut stream = stream.clone();
                stream.dict = self.copy_dict(out, &stream.dict)?;
                Object::Stream(stream)
            }
            other => other.clone(),
        })
    }

    fn copy_dict(&mut self, out: &mut Document, dict: &Dictionary) -> Result<Dictionary> {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            // Back-links into the source page tree would drag it along.
            if key.as_slice() == b"Parent" && is_page_tree_node(self.source, value) {
                continue;
            }
            copied.set(key.clone(), self.copy(out, value)?);
        }
        Ok(copied)
    }

    fn copy_reference(&mut self, out: &mut Document, id: ObjectId) -> Result<Object> {
        if let Some(new_id) = self.mapped.get(&id) {
            return Ok(Object::Reference(*new_id));
        }

        let target = match self.source.get_object(id) {
            Ok(target) => target,
            // Dangling references are legal and read as null.
            Err(_) => return Ok(Object::Null),
        };

        if id != self.page_id && is_page_tree_node(self.source, &Object::Reference(id)) {
            // Link destinations to other pages.
            return Ok(Object::Null);
        }

        let new_id = out.new_object_id();
        self.mapped.insert(id, new_id);
        let copied = self
            .copy(out, target)
            .map_err(|e| anyhow!("Failed to copy object {:?}: {}", id, e))?;
        out.objects.insert(new_id, copied);
        Ok(Object::Reference(new_id))
    }
}

fn is_page_tree_node(doc: &Document, object: &Object) -> bool {
    let dict = match object {
        Object::Reference(id) => match doc.get_dictionary(*id) {
            Ok(dict) => dict,
            Err(_) => return false,
        },
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}
