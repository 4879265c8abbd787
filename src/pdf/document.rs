use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use std::path::Path;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards walks up `/Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        Ok(Self::from_document(doc, path_str))
    }

    pub fn from_document(doc: Document, path: impl Into<String>) -> Self {
        PdfDocument {
            doc,
            path: path.into(),
        }
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// `/Title` from the document info dictionary, if set and non-blank
    pub fn title(&self) -> Option<String> {
        let info = match self.doc.trailer.get(b"Info") {
            Ok(Object::Reference(info_ref)) => self.doc.get_dictionary(*info_ref).ok()?,
            Ok(Object::Dictionary(dict)) => dict,
            _ => return None,
        };

        match info.get(b"Title") {
            Ok(Object::String(bytes, _)) => {
                let title = decode_pdf_string(bytes);
                let title = title.trim();
                (!title.is_empty()).then(|| title.to_string())
            }
            _ => None,
        }
    }

    /// Build a new document holding exactly `pages` (1-based), in that order.
    ///
    /// A page listed more than once is cloned into a fresh page object for
    /// every repeat. The page tree is flattened to a single level, so
    /// inherited attributes are copied onto each page. The source outline
    /// and page labels no longer describe the result and are dropped.
    pub fn extract_pages(&self, pages: &[u32]) -> Result<Document> {
        let all_pages = self.page_ids();
        let total = all_pages.len() as u32;

        for &page in pages {
            if page == 0 || page > total {
                anyhow::bail!("Page {} is out of range (1-{})", page, total);
            }
        }

        let mut new_doc = self.doc.clone();
        let catalog_id = new_doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .context("Document has no catalog")?;
        let pages_id = new_doc
            .get_dictionary(catalog_id)
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .context("Document catalog has no page tree")?;

        let mut placed = HashSet::new();
        let mut kids = Vec::with_capacity(pages.len());

        for &page in pages {
            let source_id = all_pages[(page - 1) as usize].1;
            let mut page_dict = self
                .doc
                .get_dictionary(source_id)
                .with_context(|| format!("Page {} is not a dictionary", page))?
                .clone();

            for key in INHERITABLE {
                if !page_dict.has(key) {
                    if let Some(value) = inherited_attribute(&self.doc, &page_dict, key) {
                        page_dict.set(key, value);
                    }
                }
            }
            page_dict.set("Parent", Object::Reference(pages_id));

            let id = if placed.insert(source_id) {
                new_doc
                    .objects
                    .insert(source_id, Object::Dictionary(page_dict));
                source_id
            } else {
                new_doc.add_object(page_dict)
            };
            kids.push(Object::Reference(id));
        }

        let pages_dict = new_doc.get_dictionary_mut(pages_id)?;
        pages_dict.set("Count", kids.len() as i64);
        pages_dict.set("Kids", kids);

        let catalog = new_doc.get_dictionary_mut(catalog_id)?;
        catalog.remove(b"Outlines");
        catalog.remove(b"PageLabels");

        new_doc.prune_objects();

        Ok(new_doc)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}

fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut node = page;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }
    None
}

/// Decode a PDF text string (UTF-16BE with BOM, otherwise PDFDocEncoding)
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16_lossy(&u16_chars)
    } else {
        // PDFDocEncoding / Latin-1 (simplified)
        bytes.iter().map(|&b| b as char).collect()
    }
}
