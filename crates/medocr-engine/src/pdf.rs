//! Local PDF assembly.
//!
//! Renders plain text onto A4 pages in Helvetica. Every paragraph starts on
//! a fresh page; a paragraph that does not fit continues on the next one.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

use crate::error::ScanError;
use crate::layout::paragraphs;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 72;
const FONT_SIZE: i64 = 12;
const LEADING: i64 = 14;

/// Characters per line, assuming an average glyph width of half an em.
pub const COLUMNS: usize = ((PAGE_WIDTH - 2 * MARGIN) / (FONT_SIZE / 2)) as usize;

/// Lines that fit between the top and bottom margins.
pub const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// A finished PDF document.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: u32,
}

/// Render `text` to a PDF, one paragraph per page.
///
/// Empty text still produces a single blank page.
pub fn render_text_pdf(text: &str) -> Result<RenderedPdf, ScanError> {
    let pages = layout_pages(text);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in &pages {
        let content = page_content(lines);
        let encoded = content.encode().map_err(|e| ScanError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ScanError::Pdf(e.to_string()))?;

    debug!("Rendered PDF: {} pages, {} bytes", page_count, bytes.len());

    Ok(RenderedPdf {
        bytes,
        pages: page_count as u32,
    })
}

/// Lay text out as pages of lines.
pub fn layout_pages(text: &str) -> Vec<Vec<String>> {
    let mut pages = Vec::new();

    for paragraph in paragraphs(text) {
        let lines: Vec<String> = paragraph
            .lines()
            .flat_map(|line| wrap_line(line, COLUMNS))
            .collect();

        for chunk in lines.chunks(LINES_PER_PAGE) {
            pages.push(chunk.to_vec());
        }
    }

    if pages.is_empty() {
        pages.push(Vec::new());
    }

    pages
}

/// Greedy word wrap to at most `columns` characters per line.
///
/// Words longer than a line are split.
pub fn wrap_line(line: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > columns {
            if current_len > 0 {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(columns);
            out.push(word.into_iter().collect());
            word = rest;
        }

        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > columns {
            out.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || out.is_empty() {
        out.push(current);
    }

    out
}

fn page_content(lines: &[String]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(FONT_SIZE)]),
        Operation::new("TL", vec![Object::Integer(LEADING)]),
        Operation::new(
            "Td",
            vec![Object::Integer(MARGIN), Object::Integer(PAGE_HEIGHT - MARGIN)],
        ),
    ];

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_latin1(line))],
        ));
    }

    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// WinAnsi covers printable Latin-1; anything else becomes `?`.
///
/// 0x7F-0x9F are not control codes in WinAnsi (0x80 is the euro sign), so
/// they are replaced too.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0..=0x1F => b' ',
            code @ 0x20..=0x7E => code as u8,
            0x7F..=0x9F => b'?',
            code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}
