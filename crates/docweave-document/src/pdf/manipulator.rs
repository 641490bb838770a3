// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Built-in PDF manipulator: page concatenation and background layering using
// the `lopdf` crate.

use docweave_core::config::PdfSettings;
use docweave_core::error::{DocweaveError, Result};
use docweave_core::types::{DocumentFormat, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument};

use super::pages::{PageCopier, attach_page, inherited_attribute, owned_dictionary, pages_root};
use crate::file::File;
use crate::manipulator::Manipulator;

/// US Letter, used as the form bounding box when a background page has no
/// MediaBox anywhere in its tree.
const FALLBACK_MEDIA_BOX: [i64; 4] = [0, 0, 612, 792];

/// Concatenates and layers PDF documents.
///
/// Supports `append`, `appendMultiple` and `layer` on PDF documents only.
#[derive(Debug, Clone, Default)]
pub struct PdfManipulator {
    settings: PdfSettings,
}

impl PdfManipulator {
    pub fn new(settings: PdfSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PdfSettings {
        &self.settings
    }

    /// Pages of `base`, then the pages of each of `others` in order.
    #[instrument(skip_all, fields(additional_count = others.len()))]
    fn concatenate(&self, base: &File, others: &[&File]) -> Result<File> {
        let mut merged = load(base, "base PDF")?;
        let root = pages_root(&merged)?;

        info!(
            base_pages = merged.get_pages().len(),
            additional_documents = others.len(),
            "Concatenating PDFs"
        );

        for (index, other) in others.iter().enumerate() {
            let other_doc = load(other, &format!("additional PDF #{}", index + 1))?;
            let mut copier = PageCopier::new(&other_doc);

            // get_pages() is keyed by 1-indexed page number, so values come
            // out in reading order.
            for page_id in other_doc.get_pages().into_values() {
                let copied = copier.copy_page(&mut merged, page_id)?;
                attach_page(&mut merged, root, copied)?;
            }
        }

        self.finish(merged)
    }

    /// Foreground pages with the background's first page drawn beneath each.
    #[instrument(skip_all)]
    fn overlay(&self, foreground: &File, background: &File) -> Result<File> {
        let mut doc = load(foreground, "foreground PDF")?;
        let backdrop = load(background, "background PDF")?;

        let backdrop_page = backdrop
            .get_pages()
            .values()
            .next()
            .copied()
            .ok_or_else(|| DocweaveError::Pdf("background PDF has no pages".into()))?;

        let form_id = background_form(&mut doc, &backdrop, backdrop_page)?;

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        info!(pages = pages.len(), "Layering PDF over background");

        for page_id in pages {
            place_beneath(&mut doc, page_id, form_id)?;
        }

        self.finish(doc)
    }

    fn finish(&self, mut doc: Document) -> Result<File> {
        doc.version = self.settings.version.clone();
        if self.settings.compress {
            doc.compress();
        }

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(|err| {
            DocweaveError::Pdf(format!("failed to serialise PDF: {}", err))
        })?;

        debug!(output_bytes = output.len(), "PDF serialised");
        Ok(File::from_bytes(output))
    }
}

impl Manipulator for PdfManipulator {
    fn name(&self) -> &str {
        "pdf"
    }

    fn supports(&self, format: DocumentFormat, operation: Operation) -> bool {
        format == DocumentFormat::Pdf
            && matches!(
                operation,
                Operation::Append | Operation::AppendMultiple | Operation::Layer
            )
    }

    fn append(&self, first: &File, second: &File) -> Result<File> {
        self.concatenate(first, &[second])
    }

    fn append_multiple(&self, file: &File, others: &[&File]) -> Result<File> {
        self.concatenate(file, others)
    }

    fn layer(&self, foreground: &File, background: &File) -> Result<File> {
        self.overlay(foreground, background)
    }
}

fn load(file: &File, what: &str) -> Result<Document> {
    Document::load_mem(file.bytes())
        .map_err(|err| DocweaveError::Pdf(format!("failed to load {}: {}", what, err)))
}

/// Turn `page_id` of `source` into a Form XObject inside `target`.
fn background_form(target: &mut Document, source: &Document, page_id: ObjectId) -> Result<ObjectId> {
    let content = source.get_page_content(page_id).map_err(|err| {
        DocweaveError::Pdf(format!("cannot read background page content: {}", err))
    })?;

    let mut copier = PageCopier::new(source);
    let resources = match inherited_attribute(source, page_id, b"Resources") {
        Some(resources) => copier.copy_object(target, resources)?,
        None => Object::Dictionary(Dictionary::new()),
    };
    let bbox = match inherited_attribute(source, page_id, b"CropBox")
        .or_else(|| inherited_attribute(source, page_id, b"MediaBox"))
    {
        Some(bbox) => copier.copy_object(target, bbox)?,
        None => Object::Array(FALLBACK_MEDIA_BOX.iter().map(|&v| Object::Integer(v)).collect()),
    };

    let form = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => bbox,
            "Resources" => resources,
        },
        content,
    );
    Ok(target.add_object(form))
}

/// Register `form_id` in the page's resources and draw it before the page's
/// own content streams.
fn place_beneath(doc: &mut Document, page_id: ObjectId, form_id: ObjectId) -> Result<()> {
    let mut resources = match inherited_attribute(doc, page_id, b"Resources") {
        Some(object) => owned_dictionary(doc, object)?,
        None => Dictionary::new(),
    };
    let mut xobjects = match resources.get(b"XObject") {
        Ok(object) => owned_dictionary(doc, object)?,
        Err(_) => Dictionary::new(),
    };
    let name = unused_name(&xobjects);
    xobjects.set(name.as_bytes().to_vec(), Object::Reference(form_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    let page = doc
        .get_object(page_id)
        .and_then(|object| object.as_dict())
        .map_err(|err| DocweaveError::Pdf(format!("cannot read page {:?}: {}", page_id, err)))?;
    let mut contents = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        Ok(other) => vec![other.clone()],
        Err(_) => Vec::new(),
    };

    let draw = format!("q /{} Do Q\n", name);
    let draw_id = doc.add_object(Stream::new(Dictionary::new(), draw.into_bytes()));
    contents.insert(0, Object::Reference(draw_id));

    match doc.get_object_mut(page_id) {
        Ok(Object::Dictionary(page)) => {
            page.set("Resources", Object::Dictionary(resources));
            page.set("Contents", Object::Array(contents));
            Ok(())
        }
        _ => Err(DocweaveError::Pdf(format!("page {:?} is not a dictionary", page_id))),
    }
}

fn unused_name(xobjects: &Dictionary) -> String {
    let mut index = 0usize;
    loop {
        let name = format!("DwBg{}", index);
        if !xobjects.has(name.as_bytes()) {
            return name;
        }
        index += 1;
    }
}
