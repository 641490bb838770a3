// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-tree helpers shared by the PDF manipulator: copying pages between
// lopdf documents, attaching them to a page tree, and resolving inherited
// page attributes.

use std::collections::HashMap;

use docweave_core::error::{DocweaveError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::warn;

/// Page attributes a page may inherit from its ancestors in the page tree.
pub(crate) const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed page trees whose /Parent links loop.
const MAX_TREE_DEPTH: usize = 64;

/// Copies pages (and everything they reference) out of one source document.
///
/// Each source object is copied at most once per copier, so resources shared
/// between pages stay shared in the target and reference cycles terminate.
pub(crate) struct PageCopier<'s> {
    source: &'s Document,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'s> PageCopier<'s> {
    pub(crate) fn new(source: &'s Document) -> Self {
        Self {
            source,
            copied: HashMap::new(),
        }
    }

    /// Copy a page into `target` as a detached page object (no /Parent) and
    /// return its new ID. Inherited attributes are written onto the copy so
    /// it renders the same under any parent.
    pub(crate) fn copy_page(&mut self, target: &mut Document, page_id: ObjectId) -> Result<ObjectId> {
        let source = self.source;
        let page = source
            .get_object(page_id)
            .and_then(|object| object.as_dict())
            .map_err(|err| {
                DocweaveError::Pdf(format!("cannot read page object {:?}: {}", page_id, err))
            })?;

        // A page already reached through a reference (a link /Dest, an
        // outline entry) keeps its ID, and the full copy replaces the one
        // made then. Otherwise reserve the ID first so annotations pointing
        // back at the page (/P entries) resolve to the copy.
        let new_id = match self.copied.get(&page_id) {
            Some(&existing) => existing,
            None => {
                let id = target.new_object_id();
                self.copied.insert(page_id, id);
                id
            }
        };

        let mut copy = self.copy_dictionary(target, page)?;
        for key in INHERITABLE {
            if copy.has(key) {
                continue;
            }
            match inherited_attribute(source, page_id, key) {
                Some(value) => {
                    let value = self.copy_object(target, value)?;
                    copy.set(key.to_vec(), value);
                }
                None if key == b"Rotate" => copy.set("Rotate", Object::Integer(0)),
                None => {}
            }
        }

        target.objects.insert(new_id, Object::Dictionary(copy));
        Ok(new_id)
    }

    /// Deep-copy a value, following references into the source document.
    pub(crate) fn copy_object(&mut self, target: &mut Document, object: &Object) -> Result<Object> {
        match object {
            Object::Reference(id) => Ok(Object::Reference(self.copy_reference(target, *id)?)),
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.copy_dictionary(target, dict)?)),
            Object::Array(items) => {
                let mut copied = Vec::with_capacity(items.len());
                for item in items {
                    copied.push(self.copy_object(target, item)?);
                }
                Ok(Object::Array(copied))
            }
            Object::Stream(stream) => {
                let dict = self.copy_dictionary(target, &stream.dict)?;
                Ok(Object::Stream(Stream::new(dict, stream.content.clone())))
            }
            other => Ok(other.clone()),
        }
    }

    fn copy_reference(&mut self, target: &mut Document, id: ObjectId) -> Result<ObjectId> {
        if let Some(&existing) = self.copied.get(&id) {
            return Ok(existing);
        }

        let new_id = target.new_object_id();
        self.copied.insert(id, new_id);

        let source = self.source;
        let copy = match source.get_object(id) {
            Ok(referenced) => self.copy_object(target, referenced)?,
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using Null");
                Object::Null
            }
        };
        target.objects.insert(new_id, copy);
        Ok(new_id)
    }

    /// /Parent is dropped: page-tree links are rebuilt by [`attach_page`].
    fn copy_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Result<Dictionary> {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            if key == b"Parent" {
                continue;
            }
            copy.set(key.clone(), self.copy_object(target, value)?);
        }
        Ok(copy)
    }
}

/// ID of the document's page-tree root (/Root → /Pages).
pub(crate) fn pages_root(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .map_err(|err| DocweaveError::Pdf(format!("no catalog: {}", err)))?
        .get(b"Pages")
        .and_then(|pages| pages.as_reference())
        .map_err(|err| DocweaveError::Pdf(format!("no /Pages reference: {}", err)))
}

/// Append `page_id` as the last kid of the page-tree root `root`.
pub(crate) fn attach_page(doc: &mut Document, root: ObjectId, page_id: ObjectId) -> Result<()> {
    match doc.get_object_mut(root) {
        Ok(Object::Dictionary(pages)) => {
            match pages.get_mut(b"Kids") {
                Ok(Object::Array(kids)) => kids.push(Object::Reference(page_id)),
                _ => {
                    return Err(DocweaveError::Pdf(
                        "page tree /Kids is not an inline array".into(),
                    ));
                }
            }
            if let Ok(Object::Integer(count)) = pages.get_mut(b"Count") {
                *count += 1;
            }
        }
        _ => return Err(DocweaveError::Pdf(format!("page tree root {:?} is not a dictionary", root))),
    }

    if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
        page.set("Parent", Object::Reference(root));
    }
    Ok(())
}

/// Look up `key` on a page, walking up /Parent links until found.
pub(crate) fn inherited_attribute<'d>(
    doc: &'d Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'d Object> {
    let mut node = doc.get_object(page_id).ok()?.as_dict().ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_object(parent).ok()?.as_dict().ok()?;
    }
    None
}

/// Resolve an inline-or-referenced dictionary into an owned copy.
pub(crate) fn owned_dictionary(doc: &Document, object: &Object) -> Result<Dictionary> {
    match object {
        Object::Dictionary(dict) => Ok(dict.clone()),
        Object::Reference(id) => doc
            .get_object(*id)
            .and_then(|resolved| resolved.as_dict())
            .cloned()
            .map_err(|err| DocweaveError::Pdf(format!("cannot resolve dictionary {:?}: {}", id, err))),
        other => Err(DocweaveError::Pdf(format!(
            "expected a dictionary, found {:?}",
            other
        ))),
    }
}
