use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;

use super::document::{decode_pdf_string, PdfDocument};
use crate::outline::{OutlineEntry, OutlineItem, OutlineSource};

/// Guards recursion through references, name trees and nested outlines.
const MAX_DEPTH: u32 = 32;

impl OutlineSource for PdfDocument {
    fn page_count(&self) -> u32 {
        PdfDocument::page_count(self)
    }

    fn outline(&self) -> Vec<OutlineItem> {
        read_outline(&self.doc)
    }

    fn destination_page_index(&self, entry: &OutlineEntry) -> Option<u32> {
        let destination = entry.destination.as_ref()?;
        let page_ids: Vec<ObjectId> = self.page_ids().into_iter().map(|(_, id)| id).collect();
        resolve_destination(&self.doc, destination, &page_ids, 0)
    }
}

/// Read the document outline. The children of an entry follow it as a
/// single [`OutlineItem::Nested`] item. Empty if the document has none.
pub fn read_outline(doc: &Document) -> Vec<OutlineItem> {
    let Ok(catalog) = doc.catalog() else {
        return Vec::new();
    };

    let outlines = match catalog.get(b"Outlines") {
        Ok(obj) => match as_dictionary(doc, obj) {
            Some(d) => d,
            None => return Vec::new(),
        },
        Err(_) => return Vec::new(), // No outlines/bookmarks
    };

    let first_ref = match outlines.get(b"First") {
        Ok(Object::Reference(r)) => *r,
        _ => return Vec::new(),
    };

    let mut visited = HashSet::new();
    parse_outline_items(doc, first_ref, &mut visited, 0)
}

fn parse_outline_items(
    doc: &Document,
    first_id: ObjectId,
    visited: &mut HashSet<ObjectId>,
    depth: u32,
) -> Vec<OutlineItem> {
    let mut items = Vec::new();
    if depth > MAX_DEPTH {
        return items;
    }

    let mut current_id = Some(first_id);
    while let Some(id) = current_id {
        if !visited.insert(id) {
            break;
        }
        let dict = match doc.get_dictionary(id) {
            Ok(d) => d,
            Err(_) => break,
        };

        let title = match dict.get(b"Title") {
            Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
            _ => "Untitled".to_string(),
        };

        items.push(OutlineItem::Entry(OutlineEntry {
            title,
            destination: entry_destination(doc, dict),
        }));

        if let Ok(Object::Reference(child_ref)) = dict.get(b"First") {
            let children = parse_outline_items(doc, *child_ref, visited, depth + 1);
            if !children.is_empty() {
                items.push(OutlineItem::Nested(children));
            }
        }

        current_id = match dict.get(b"Next") {
            Ok(Object::Reference(r)) => Some(*r),
            _ => None,
        };
    }

    items
}

/// The raw destination of an outline item: `/Dest`, or the `/D` of a
/// `/GoTo` action.
fn entry_destination(doc: &Document, dict: &Dictionary) -> Option<Object> {
    if let Ok(dest) = dict.get(b"Dest") {
        return Some(dest.clone());
    }

    let action = as_dictionary(doc, dict.get(b"A").ok()?)?;
    match action.get(b"S") {
        Ok(Object::Name(action_type)) if action_type == b"GoTo" => {
            action.get(b"D").ok().cloned()
        }
        _ => None,
    }
}

/// Resolve a destination to a 0-based page index
fn resolve_destination(
    doc: &Document,
    dest: &Object,
    page_ids: &[ObjectId],
    depth: u32,
) -> Option<u32> {
    if depth > MAX_DEPTH {
        return None;
    }

    match dest {
        Object::String(name, _) | Object::Name(name) => {
            let target = resolve_named_destination(doc, name, depth)?;
            resolve_destination(doc, &target, page_ids, depth + 1)
        }
        Object::Array(arr) => page_from_dest_array(arr, page_ids),
        Object::Reference(r) => {
            let obj = doc.get_object(*r).ok()?;
            resolve_destination(doc, obj, page_ids, depth + 1)
        }
        // Named destination values may be wrapped as << /D [...] >>
        Object::Dictionary(dict) => {
            let inner = dict.get(b"D").ok()?;
            resolve_destination(doc, inner, page_ids, depth + 1)
        }
        _ => None,
    }
}

fn resolve_named_destination(doc: &Document, name: &[u8], depth: u32) -> Option<Object> {
    let catalog = doc.catalog().ok()?;

    // Names/Dests name tree
    let from_tree = catalog
        .get(b"Names")
        .ok()
        .and_then(|names| as_dictionary(doc, names))
        .and_then(|names| names.get(b"Dests").ok())
        .and_then(|dests| search_name_tree(doc, dests, name, depth));
    if from_tree.is_some() {
        return from_tree;
    }

    // Dests dictionary (older style)
    let dests = as_dictionary(doc, catalog.get(b"Dests").ok()?)?;
    dests.get(name).ok().cloned()
}

fn search_name_tree(doc: &Document, node: &Object, name: &[u8], depth: u32) -> Option<Object> {
    if depth > MAX_DEPTH {
        return None;
    }
    let dict = as_dictionary(doc, node)?;

    if let Ok(Object::Array(names)) = dict.get(b"Names") {
        for pair in names.chunks_exact(2) {
            if let Object::String(key, _) = &pair[0] {
                if key == name {
                    return Some(pair[1].clone());
                }
            }
        }
    }

    if let Ok(Object::Array(kids)) = dict.get(b"Kids") {
        return kids
            .iter()
            .find_map(|kid| search_name_tree(doc, kid, name, depth + 1));
    }

    None
}

/// `[page_ref /XYZ left top zoom]` and friends. Some producers write the
/// page as an integer index instead of a reference.
fn page_from_dest_array(arr: &[Object], page_ids: &[ObjectId]) -> Option<u32> {
    match arr.first()? {
        Object::Reference(page_ref) => page_ids
            .iter()
            .position(|id| id == page_ref)
            .map(|index| index as u32),
        Object::Integer(index) => {
            let index = u32::try_from(*index).ok()?;
            ((index as usize) < page_ids.len()).then_some(index)
        }
        _ => None,
    }
}

fn as_dictionary<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(r) => doc.get_dictionary(*r).ok(),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}
