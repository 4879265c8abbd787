//! In-memory PDFs for tests.

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Custom page key recording the page's position in the fixture document.
pub const PAGE_TAG: &[u8] = b"FixturePage";

pub struct Bookmark {
    pub title: String,
    pub target: Target,
    pub children: Vec<Bookmark>,
}

pub enum Target {
    /// 1-based page, written as an explicit `/Dest` array
    Page(u32),
    /// 1-based page, written as a `/GoTo` action
    GoTo(u32),
    /// Named destination registered in the `/Names` tree
    Named(String, u32),
    /// Named destination that is not registered anywhere
    Dangling,
}

pub fn bookmark(title: &str, page: u32) -> Bookmark {
    Bookmark {
        title: title.to_string(),
        target: Target::Page(page),
        children: Vec::new(),
    }
}

impl Bookmark {
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_children(mut self, children: Vec<Bookmark>) -> Self {
        self.children = children;
        self
    }
}

/// A document with `count` letter-sized pages, each tagged with [`PAGE_TAG`].
/// `MediaBox` lives on the page tree root so pages inherit it.
pub fn document_with_pages(count: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for n in 1..=count {
        let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", n);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            PAGE_TAG => n as i64,
        });
        kids.push(Object::Reference(page_id));
    }

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

pub fn set_title(doc: &mut Document, title: &str) {
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
    });
    doc.trailer.set("Info", info_id);
}

/// Install `bookmarks` as the document outline.
pub fn add_outline(doc: &mut Document, bookmarks: &[Bookmark]) {
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let outlines_id = doc.new_object_id();
    let mut named = Vec::new();

    let (first, last) = add_siblings(doc, outlines_id, bookmarks, &page_ids, &mut named);
    let mut outlines = dictionary! {
        "Type" => "Outlines",
        "Count" => bookmarks.len() as i64,
    };
    if let (Some(first), Some(last)) = (first, last) {
        outlines.set("First", first);
        outlines.set("Last", last);
    }
    doc.objects
        .insert(outlines_id, Object::Dictionary(outlines));

    let catalog_id = catalog_id(doc);
    if !named.is_empty() {
        let dests_id = doc.add_object(dictionary! { "Names" => named });
        let names_id = doc.add_object(dictionary! { "Dests" => dests_id });
        doc.get_dictionary_mut(catalog_id)
            .unwrap()
            .set("Names", names_id);
    }
    doc.get_dictionary_mut(catalog_id)
        .unwrap()
        .set("Outlines", outlines_id);
}

fn add_siblings(
    doc: &mut Document,
    parent: ObjectId,
    bookmarks: &[Bookmark],
    page_ids: &[ObjectId],
    named: &mut Vec<Object>,
) -> (Option<ObjectId>, Option<ObjectId>) {
    let ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();

    for (i, mark) in bookmarks.iter().enumerate() {
        let mut item = dictionary! {
            "Title" => Object::string_literal(mark.title.as_str()),
            "Parent" => parent,
        };
        if i > 0 {
            item.set("Prev", ids[i - 1]);
        }
        if let Some(next) = ids.get(i + 1) {
            item.set("Next", *next);
        }

        let explicit = |page: u32| -> Object {
            vec![
                Object::Reference(page_ids[(page - 1) as usize]),
                Object::Name(b"Fit".to_vec()),
            ]
            .into()
        };
        match &mark.target {
            Target::Page(page) => item.set("Dest", explicit(*page)),
            Target::GoTo(page) => item.set(
                "A",
                dictionary! {
                    "S" => "GoTo",
                    "D" => explicit(*page),
                },
            ),
            Target::Named(name, page) => {
                named.push(Object::string_literal(name.as_str()));
                named.push(explicit(*page));
                item.set("Dest", Object::string_literal(name.as_str()));
            }
            Target::Dangling => item.set("Dest", Object::string_literal("nowhere")),
        }

        let (first, last) = add_siblings(doc, ids[i], &mark.children, page_ids, named);
        if let (Some(first), Some(last)) = (first, last) {
            item.set("First", first);
            item.set("Last", last);
            item.set("Count", mark.children.len() as i64);
        }

        doc.objects.insert(ids[i], Object::Dictionary(item));
    }

    (ids.first().copied(), ids.last().copied())
}

fn catalog_id(doc: &Document) -> ObjectId {
    doc.trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .unwrap()
}

/// [`PAGE_TAG`] of every page, in page order
pub fn page_tags(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .into_values()
        .map(|id| {
            doc.get_dictionary(id)
                .and_then(|page| page.get(PAGE_TAG))
                .and_then(Object::as_i64)
                .unwrap()
        })
        .collect()
}
