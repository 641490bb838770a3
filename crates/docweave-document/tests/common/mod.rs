// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for the docweave-document integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use docweave_document::{
    DocumentFormat, DocweaveError, File, Manipulator, MergeData, MergeField, Operation, Result,
};
use lopdf::{Document as PdfDocument, Object, Stream, dictionary};

/// One recorded manipulator invocation: the operation and the raw input
/// files in the order the chain passed them.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: Operation,
    pub inputs: Vec<Vec<u8>>,
}

/// A manipulator with a fixed capability set that records every call and
/// returns `<name>:<operation>` as its output bytes.
pub struct Recorder {
    name: &'static str,
    caps: Vec<(DocumentFormat, Operation)>,
    calls: Mutex<Vec<Call>>,
    supports_calls: AtomicUsize,
}

impl Recorder {
    pub fn new(name: &'static str, caps: &[(DocumentFormat, Operation)]) -> Arc<Self> {
        Arc::new(Self {
            name,
            caps: caps.to_vec(),
            calls: Mutex::new(Vec::new()),
            supports_calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn supports_calls(&self) -> usize {
        self.supports_calls.load(Ordering::SeqCst)
    }

    pub fn output(&self, operation: Operation) -> Vec<u8> {
        format!("{}:{}", self.name, operation).into_bytes()
    }

    fn record(&self, operation: Operation, inputs: &[&File]) -> File {
        self.calls.lock().unwrap().push(Call {
            operation,
            inputs: inputs.iter().map(|f| f.bytes().to_vec()).collect(),
        });
        File::from_bytes(self.output(operation))
    }
}

impl Manipulator for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn supports(&self, format: DocumentFormat, operation: Operation) -> bool {
        self.supports_calls.fetch_add(1, Ordering::SeqCst);
        self.caps.contains(&(format, operation))
    }

    fn merge(&self, file: &File, data: &MergeData) -> Result<Vec<u8>> {
        let mut inputs = vec![file.bytes().to_vec()];
        inputs.extend(data.fields.iter().map(|(k, v)| format!("{k}={v}").into_bytes()));
        self.calls.lock().unwrap().push(Call {
            operation: Operation::Merge,
            inputs,
        });
        Ok(self.output(Operation::Merge))
    }

    fn append(&self, first: &File, second: &File) -> Result<File> {
        Ok(self.record(Operation::Append, &[first, second]))
    }

    fn append_multiple(&self, file: &File, others: &[&File]) -> Result<File> {
        let mut inputs = vec![file];
        inputs.extend_from_slice(others);
        Ok(self.record(Operation::AppendMultiple, &inputs))
    }

    fn layer(&self, foreground: &File, background: &File) -> Result<File> {
        Ok(self.record(Operation::Layer, &[foreground, background]))
    }

    fn merge_fields(&self, file: &File) -> Result<Vec<MergeField>> {
        self.record(Operation::GetMergeFields, &[file]);
        Ok(vec![
            MergeField::field("name"),
            MergeField::block("lines", vec![MergeField::field("sku")]),
        ])
    }
}

/// Claims every operation on one format and fails all of them.
pub struct Broken {
    pub format: DocumentFormat,
    pub attempts: AtomicUsize,
}

impl Broken {
    pub fn new(format: DocumentFormat) -> Arc<Self> {
        Arc::new(Self {
            format,
            attempts: AtomicUsize::new(0),
        })
    }

    fn fail<T>(&self) -> Result<T> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DocweaveError::backend("converter exited with status 1"))
    }
}

impl Manipulator for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn supports(&self, format: DocumentFormat, _operation: Operation) -> bool {
        format == self.format
    }

    fn merge(&self, _file: &File, _data: &MergeData) -> Result<Vec<u8>> {
        self.fail()
    }

    fn append(&self, _first: &File, _second: &File) -> Result<File> {
        self.fail()
    }

    fn layer(&self, _foreground: &File, _background: &File) -> Result<File> {
        self.fail()
    }
}

/// Minimal bytes that sniff as `format`, tagged so inputs can be told apart.
pub fn bytes_for(format: DocumentFormat, tag: &str) -> Vec<u8> {
    let magic: &[u8] = match format {
        DocumentFormat::Pdf => b"%PDF-1.5\n",
        DocumentFormat::Rtf => b"{\\rtf1 ",
        DocumentFormat::Docx => b"PK\x03\x04",
        DocumentFormat::Doc => &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
    };
    let mut bytes = magic.to_vec();
    bytes.extend_from_slice(tag.as_bytes());
    bytes
}

/// A real PDF with one page per label, each drawing its label as text.
pub fn sample_pdf(labels: &[&str]) -> Vec<u8> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for label in labels {
        let content = format!("BT /F1 18 Tf 72 720 Td ({}) Tj ET", label);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Decoded content of every page, in page order.
pub fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = PdfDocument::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| String::from_utf8_lossy(&doc.get_page_content(id).unwrap()).into_owned())
        .collect()
}

/// A two-page PDF whose first page links to its second through a /Dest.
pub fn linked_pdf() -> Vec<u8> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();
    let second_id = doc.new_object_id();

    let link_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![72.into(), 700.into(), 200.into(), 720.into()],
        "Dest" => vec![Object::Reference(second_id), "Fit".into()],
    });
    let first_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Annots" => vec![Object::Reference(link_id)],
    });
    doc.objects.insert(
        second_id,
        Object::Dictionary(dictionary! { "Type" => "Page", "Parent" => pages_id }),
    );
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![first_id.into(), second_id.into()],
            "Count" => 2,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
