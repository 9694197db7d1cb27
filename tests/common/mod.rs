//! Synthetic PDF builder shared by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// One line of text placed on a page.
pub struct Line {
    pub text: &'static str,
    pub bold: bool,
    pub size: f32,
    /// Baseline in PDF user space (bottom-left origin)
    pub y: f32,
}

pub fn line(text: &'static str, bold: bool, size: f32, y: f32) -> Line {
    Line {
        text,
        bold,
        size,
        y,
    }
}

/// `count` body lines of 11pt regular text, top to bottom from `start_y`.
pub fn body_lines(count: usize, start_y: f32) -> Vec<Line> {
    (0..count)
        .map(|i| line("Body text for this paragraph.", false, 11.0, start_y - i as f32 * 14.0))
        .collect()
}

/// Page content plus optional JPEG images.
#[derive(Default)]
pub struct PageContent {
    pub lines: Vec<Line>,
    pub images: Vec<Vec<u8>>,
}

impl PageContent {
    pub fn text(lines: Vec<Line>) -> Self {
        Self {
            lines,
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, jpeg: Vec<u8>) -> Self {
        self.images.push(jpeg);
        self
    }
}

/// Build a PDF with A4 pages. Regular text uses `regular_font`, bold text
/// uses `bold_font`.
pub fn build_pdf_with_fonts(pages: Vec<PageContent>, regular_font: &str, bold_font: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => regular_font,
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => bold_font,
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let page_id = add_page(&mut doc, pages_id, regular, bold, page);
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Build a PDF using Helvetica and Helvetica-Bold.
pub fn build_pdf(pages: Vec<PageContent>) -> Vec<u8> {
    build_pdf_with_fonts(pages, "Helvetica", "Helvetica-Bold")
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    regular: ObjectId,
    bold: ObjectId,
    page: PageContent,
) -> ObjectId {
    let mut operations = Vec::new();
    for line in &page.lines {
        let font = if line.bold { "F2" } else { "F1" };
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![font.into(), Object::Real(line.size)]));
        operations.push(Operation::new("Td", vec![72.into(), Object::Real(line.y)]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(line.text)]));
        operations.push(Operation::new("ET", vec![]));
    }

    let mut xobjects = lopdf::Dictionary::new();
    for (i, jpeg) in page.images.into_iter().enumerate() {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 100,
                "Height" => 40,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));
        let name = format!("Im{}", i);
        xobjects.set(name.as_bytes().to_vec(), image_id);
        operations.push(Operation::new("q", vec![]));
        operations.push(Operation::new(
            "cm",
            vec![100.into(), 0.into(), 0.into(), 40.into(), 72.into(), 100.into()],
        ));
        operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        operations.push(Operation::new("Q", vec![]));
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => regular, "F2" => bold },
            "XObject" => xobjects,
        },
    })
}

/// A two-page report: 24pt bold title, 16pt bold section headings, 11pt body.
pub fn sample_report() -> Vec<u8> {
    let mut page1 = vec![
        line("Quarterly Report", true, 24.0, 780.0),
        line("Overview", true, 16.0, 740.0),
    ];
    page1.extend(body_lines(12, 715.0));

    let mut page2 = vec![line("Results", true, 16.0, 780.0)];
    page2.extend(body_lines(12, 755.0));

    build_pdf(vec![PageContent::text(page1), PageContent::text(page2)])
}
