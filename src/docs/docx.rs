//! Minimal WordprocessingML to HTML conversion
//!
//! Handles what the legal documents use: headings (Title, Heading1..6),
//! plain paragraphs, bullet paragraphs, bold/italic runs, tabs and line
//! breaks. Everything else in `word/document.xml` is ignored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read};

#[derive(thiserror::Error, Debug)]
pub enum DocxError {
    #[error("not a docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to read document body: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document xml: {0}")]
    Xml(#[from] quick_xml::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(u8, Vec<Run>),
    Paragraph(Vec<Run>),
    ListItem(Vec<Run>),
}

/// Convert a `.docx` archive to an HTML fragment
pub fn docx_to_html(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;
    Ok(render_html(&parse_document(&xml)?))
}

#[derive(Default)]
struct ParagraphBuilder {
    style: Option<String>,
    numbered: bool,
    runs: Vec<Run>,
}

impl ParagraphBuilder {
    fn finish(self) -> Option<Block> {
        if self.runs.iter().all(|r| r.text.trim().is_empty()) {
            return None;
        }
        if let Some(level) = self.style.as_deref().and_then(heading_level) {
            return Some(Block::Heading(level, self.runs));
        }
        if self.numbered || self.style.as_deref().is_some_and(is_list_style) {
            return Some(Block::ListItem(self.runs));
        }
        Some(Block::Paragraph(self.runs))
    }
}

#[derive(Default)]
struct Parser {
    blocks: Vec<Block>,
    paragraph: Option<ParagraphBuilder>,
    run: Option<Run>,
    in_run_props: bool,
    in_text: bool,
}

impl Parser {
    fn start(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<(), DocxError> {
        match e.local_name().as_ref() {
            b"p" if !empty => self.paragraph = Some(ParagraphBuilder::default()),
            b"pStyle" => {
                let style = attr(e, b"val")?;
                if let Some(p) = self.paragraph.as_mut() {
                    p.style = style;
                }
            }
            b"numPr" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.numbered = true;
                }
            }
            b"r" if !empty => self.run = Some(Run::default()),
            b"rPr" if !empty => self.in_run_props = true,
            b"b" | b"i" if self.in_run_props => {
                let on = toggle_on(attr(e, b"val")?.as_deref());
                if let Some(run) = self.run.as_mut() {
                    if e.local_name().as_ref() == b"b" {
                        run.bold = on;
                    } else {
                        run.italic = on;
                    }
                }
            }
            b"t" if !empty => self.in_text = true,
            b"tab" => self.push_text(" "),
            b"br" | b"cr" => self.push_text("\n"),
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"rPr" => self.in_run_props = false,
            b"r" => {
                if let (Some(run), Some(p)) = (self.run.take(), self.paragraph.as_mut()) {
                    p.runs.push(run);
                }
            }
            b"p" => {
                if let Some(block) = self.paragraph.take().and_then(ParagraphBuilder::finish) {
                    self.blocks.push(block);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }
}

fn attr(e: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>, DocxError> {
    for a in e.attributes() {
        let a = a.map_err(quick_xml::Error::from)?;
        if a.key.local_name().as_ref() == local {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn toggle_on(val: Option<&str>) -> bool {
    !matches!(val, Some("0" | "false" | "off"))
}

fn heading_level(style: &str) -> Option<u8> {
    let style: String = style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match style.as_str() {
        "title" => Some(1),
        "subtitle" => Some(2),
        s => s
            .strip_prefix("heading")
            .and_then(|n| n.parse::<u8>().ok())
            .map(|n| n.clamp(1, 6)),
    }
}

fn is_list_style(style: &str) -> bool {
    style.to_ascii_lowercase().starts_with("listparagraph")
        || style.to_ascii_lowercase().starts_with("listbullet")
}

pub fn parse_document(xml: &str) -> Result<Vec<Block>, DocxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut parser = Parser::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => parser.start(&e, false)?,
            Event::Empty(e) => parser.start(&e, true)?,
            Event::End(e) => parser.end(e.local_name().as_ref()),
            Event::Text(t) if parser.in_text => {
                let text = t.unescape()?;
                parser.push_text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(parser.blocks)
}

fn render_runs(out: &mut String, runs: &[Run]) {
    for run in runs {
        let text = quick_xml::escape::escape(run.text.as_str()).replace('\n', "<br/>");
        match (run.bold, run.italic) {
            (true, true) => out.push_str(&format!("<strong><em>{}</em></strong>", text)),
            (true, false) => out.push_str(&format!("<strong>{}</strong>", text)),
            (false, true) => out.push_str(&format!("<em>{}</em>", text)),
            (false, false) => out.push_str(&text),
        }
    }
}

/// Consecutive list items share one `<ul>`
pub fn render_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut in_list = false;

    for block in blocks {
        let is_item = matches!(block, Block::ListItem(_));
        if in_list && !is_item {
            out.push_str("</ul>\n");
            in_list = false;
        }
        match block {
            Block::Heading(level, runs) => {
                out.push_str(&format!("<h{}>", level));
                render_runs(&mut out, runs);
                out.push_str(&format!("</h{}>\n", level));
            }
            Block::Paragraph(runs) => {
                out.push_str("<p>");
                render_runs(&mut out, runs);
                out.push_str("</p>\n");
            }
            Block::ListItem(runs) => {
                if !in_list {
                    out.push_str("<ul>\n");
                    in_list = true;
                }
                out.push_str("<li>");
                render_runs(&mut out, runs);
                out.push_str("</li>\n");
            }
        }
    }
    if in_list {
        out.push_str("</ul>\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="{NS}"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn archive(xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let xml = document(concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Terms</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Scope</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t xml:space="preserve">Plain </w:t></w:r><w:r><w:t>text</w:t></w:r></w:p>"#,
        ));
        let html = docx_to_html(&archive(&xml)).unwrap();
        assert_eq!(html, "<h1>Terms</h1>\n<h2>Scope</h2>\n<p>Plain text</p>\n");
    }

    #[test]
    fn test_run_formatting_and_breaks() {
        let xml = document(concat!(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Bold</w:t></w:r>"#,
            r#"<w:r><w:rPr><w:b w:val="0"/><w:i/></w:rPr><w:t>Ital</w:t></w:r>"#,
            r#"<w:r><w:br/><w:t>next</w:t></w:r></w:p>"#,
        ));
        let blocks = parse_document(&xml).unwrap();
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![
                Run { text: "Bold".into(), bold: true, italic: false },
                Run { text: "Ital".into(), bold: false, italic: true },
                Run { text: "\nnext".into(), bold: false, italic: false },
            ])]
        );
        assert_eq!(
            render_html(&blocks),
            "<p><strong>Bold</strong><em>Ital</em><br/>next</p>\n"
        );
    }

    #[test]
    fn test_list_items_grouped() {
        let item = |t: &str| {
            format!(
                r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>{t}</w:t></w:r></w:p>"#
            )
        };
        let xml = document(&format!(
            "{}{}<w:p><w:r><w:t>after</w:t></w:r></w:p>{}",
            item("one"),
            item("two"),
            item("three")
        ));
        let html = render_html(&parse_document(&xml).unwrap());
        assert_eq!(
            html,
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n<p>after</p>\n<ul>\n<li>three</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_escapes_markup_and_skips_empty() {
        let xml = document(concat!(
            r#"<w:p><w:r><w:t>Q&amp;A &lt;script&gt;</w:t></w:r></w:p>"#,
            r#"<w:p/><w:p><w:r><w:t xml:space="preserve">   </w:t></w:r></w:p>"#,
        ));
        let html = render_html(&parse_document(&xml).unwrap());
        assert_eq!(html, "<p>Q&amp;A &lt;script&gt;</p>\n");
    }

    #[test]
    fn test_not_an_archive() {
        assert!(matches!(
            docx_to_html(b"plain text"),
            Err(DocxError::Archive(_))
        ));
    }

    #[test]
    fn test_heading_level_names() {
        assert_eq!(heading_level("Title"), Some(1));
        assert_eq!(heading_level("heading 3"), Some(3));
        assert_eq!(heading_level("Heading9"), Some(6));
        assert_eq!(heading_level("Normal"), None);
    }
}
