//! PDF writer
//!
//! Lays the article out on US Letter pages with one-inch margins: the
//! title as a centered bold heading, then one body block per `\n\n`
//! delimited paragraph. Text is set in the standard Helvetica fonts with
//! WinAnsi encoding, so no font files are embedded.

use crate::error::WriteError;
use crate::types::{ArticleData, OutputFormat};
use crate::writers::DocumentWriter;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::Path;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Width used for characters outside the table
const DEFAULT_WIDTH: u16 = 556;

/// A laid-out unit of the document, holding markup-escaped text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Centered title heading
    Heading(String),
    /// Left-aligned body paragraph
    Body(String),
}

/// Page geometry and typography, in PDF points
#[derive(Debug, Clone)]
pub struct PdfWriter {
    pub page_width: i64,
    pub page_height: i64,
    pub margin: i64,
    pub title_size: i64,
    pub title_leading: i64,
    /// Space between the title and the first paragraph
    pub title_space_after: i64,
    pub body_size: i64,
    pub body_leading: i64,
    pub paragraph_space_after: i64,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self {
            page_width: 612,
            page_height: 792,
            margin: 72,
            title_size: 18,
            title_leading: 22,
            title_space_after: 42,
            body_size: 11,
            body_leading: 16,
            paragraph_space_after: 12,
        }
    }
}

impl DocumentWriter for PdfWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    fn write(&self, article: &ArticleData, path: &Path) -> Result<(), WriteError> {
        if article.text.is_empty() {
            return Err(WriteError::MissingText);
        }

        let blocks = build_blocks(article);
        let pages = self.layout(&blocks);
        let mut doc = self.build_document(&article.title, &pages)?;
        doc.save(path)
            .map_err(|e| WriteError::Pdf(e.to_string()))?;
        Ok(())
    }
}

/// One line of text placed on a page
#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    font: &'static str,
    size: i64,
    x: i64,
    y: i64,
    text: String,
}

impl PdfWriter {
    fn content_width(&self) -> i64 {
        self.page_width - 2 * self.margin
    }

    /// Wrap and paginate blocks into lines per page
    fn layout(&self, blocks: &[Block]) -> Vec<Vec<PlacedLine>> {
        let top = self.page_height - self.margin;
        let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
        let mut y = top;

        for block in blocks {
            let (font, size, leading, space_after, centered, markup) = match block {
                Block::Heading(text) => (
                    BOLD_FONT,
                    self.title_size,
                    self.title_leading,
                    self.title_space_after,
                    true,
                    text,
                ),
                Block::Body(text) => (
                    REGULAR_FONT,
                    self.body_size,
                    self.body_leading,
                    self.paragraph_space_after,
                    false,
                    text,
                ),
            };

            let plain = unescape_markup(markup);
            for line in wrap_text(&plain, size, font == BOLD_FONT, self.content_width()) {
                if y - leading < self.margin {
                    pages.push(Vec::new());
                    y = top;
                }
                y -= leading;
                let x = if centered {
                    let width = text_width(&line, size, font == BOLD_FONT);
                    self.margin + ((self.content_width() - width) / 2).max(0)
                } else {
                    self.margin
                };
                if let Some(page) = pages.last_mut() {
                    page.push(PlacedLine {
                        font,
                        size,
                        x,
                        y,
                        text: line,
                    });
                }
            }
            y -= space_after;
        }

        pages
    }

    fn build_document(
        &self,
        title: &str,
        pages: &[Vec<PlacedLine>],
    ) -> Result<Document, WriteError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        });

        let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
        for lines in pages {
            let content = Content {
                operations: page_operations(lines),
            };
            let encoded = content
                .encode()
                .map_err(|e| WriteError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_ids.len() as i64),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(self.page_width),
                Object::Integer(self.page_height),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
            "Producer" => Object::string_literal("ArticleKit"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        Ok(doc)
    }
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_operations(lines: &[PlacedLine]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![line.font.into(), Object::Integer(line.size)],
        ));
        ops.push(Operation::new(
            "Td",
            vec![Object::Integer(line.x), Object::Integer(line.y)],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(&line.text),
                StringFormat::Literal,
            )],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

/// Split the article into a heading and one body block per paragraph
pub fn build_blocks(article: &ArticleData) -> Vec<Block> {
    let mut blocks = vec![Block::Heading(escape_markup(&article.title))];
    blocks.extend(
        article
            .text
            .split("\n\n")
            .map(str::trim)
            .filter(|para| !para.is_empty())
            .map(|para| Block::Body(escape_markup(para))),
    );
    blocks
}

/// Escape `&`, `<` and `>` to their entity forms
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Reverse of [`escape_markup`]
pub fn unescape_markup(markup: &str) -> String {
    markup
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Width of `text` in points at `size`
fn text_width(text: &str, size: i64, bold: bool) -> i64 {
    let units: u64 = text.chars().map(|c| u64::from(char_width(c))).sum();
    // Bold glyphs run roughly 6% wider than regular ones
    let units = if bold { units * 106 / 100 } else { units };
    (units as i64 * size + 999) / 1000
}

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Greedy word wrap; single newlines force a break, overlong words are split
fn wrap_text(text: &str, size: i64, bold: bool, max_width: i64) -> Vec<String> {
    let mut lines = Vec::new();

    for source_line in text.lines() {
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width(&candidate, size, bold) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            for ch in word.chars() {
                current.push(ch);
                if text_width(&current, size, bold) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Encode text for a WinAnsi font; unmappable characters become `?`
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}
