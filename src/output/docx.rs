//! DOCX Emitter
//!
//! docx-rsを使用してWord文書を生成します。

use docx_rs::{BreakType, Docx, Paragraph, Run, Style, StyleType};
use std::io::Cursor;

use crate::error::HandbookError;
use crate::types::RenderRow;

/// 本文のフォントサイズ（半ポイント単位、22 = 11pt）
const BODY_SIZE_HALF_POINTS: usize = 22;

/// 見出しの色（HTML出力の見出し色と揃える）
const HEADING_COLOR: &str = "2C3E50";

/// Word文書の出力器
///
/// 段落を順に蓄積し、`finish()`でまとめてパッケージ化します。
#[derive(Debug, Default)]
pub(crate) struct DocxEmitter {
    paragraphs: Vec<Paragraph>,
}

impl DocxEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 見出し段落と、本文があれば本文段落を追加
    pub fn push(&mut self, row: &RenderRow) {
        let heading = Paragraph::new()
            .add_run(Run::new().add_text(&row.header_text))
            .style(&heading_style_id(row.level));
        self.paragraphs.push(heading);

        if row.has_body() {
            self.paragraphs.push(body_paragraph(&row.body_text));
        }
    }

    /// 文書をDOCX（ZIP）バイト列として出力
    pub fn finish(self) -> Result<Vec<u8>, HandbookError> {
        let mut docx = Docx::new();
        for level in 1..=3 {
            docx = docx.add_style(heading_style(level));
        }
        for paragraph in self.paragraphs {
            docx = docx.add_paragraph(paragraph);
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| HandbookError::Docx(format!("Failed to pack DOCX: {}", e)))?;

        Ok(buf.into_inner())
    }
}

fn heading_style_id(level: u8) -> String {
    format!("Heading{}", level)
}

/// 見出しスタイル（Heading1〜3）
///
/// サイズは半ポイント単位（32 = 16pt）
fn heading_style(level: u8) -> Style {
    let size = match level {
        1 => 32,
        2 => 26,
        _ => 24,
    };
    Style::new(heading_style_id(level), StyleType::Paragraph)
        .name(format!("Heading {}", level))
        .size(size)
        .bold()
        .color(HEADING_COLOR)
}

/// 本文段落（改行は段落内の改行として保持）
fn body_paragraph(body: &str) -> Paragraph {
    let mut run = Run::new().size(BODY_SIZE_HALF_POINTS);
    for (i, line) in body.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(header: &str, body: &str, level: u8) -> RenderRow {
        RenderRow {
            header_text: header.to_string(),
            body_text: body.to_string(),
            heading_tag: "h1",
            anchor_id: header.to_lowercase(),
            level,
        }
    }

    #[test]
    fn test_heading_and_body_paragraphs() {
        let mut emitter = DocxEmitter::new();
        emitter.push(&row("Intro", "Hello", 1));
        emitter.push(&row("Rules", "", 3));
        // 見出し2つ + 本文1つ
        assert_eq!(emitter.paragraphs.len(), 3);
    }

    #[test]
    fn test_finish_produces_zip() {
        let mut emitter = DocxEmitter::new();
        emitter.push(&row("Intro", "Line one\nLine two", 1));
        let bytes = emitter.finish().unwrap();
        // DOCXはZIPファイル（PKマジックバイト）
        assert_eq!(&bytes[0..2], b"PK");
        assert!(bytes.len() > 100);
    }

    #[test]
    fn test_finish_empty_document() {
        let bytes = DocxEmitter::new().finish().unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn test_heading_style_ids() {
        assert_eq!(heading_style_id(1), "Heading1");
        assert_eq!(heading_style_id(3), "Heading3");
    }
}
