//! PDF Emitter
//!
//! 行データをA4ページ上にレイアウトし、printpdfの組み込みフォントで描画します。
//!
//! レイアウトは描画から分離されています。`PdfLayout`はページごとの配置済み行
//! （座標は用紙上端からの距離、mm）だけを保持し、`finish()`でPDFに変換されます。

use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::BufWriter;

use super::wrap::{text_width_mm, wrap_text, PT_TO_MM};
use crate::error::HandbookError;
use crate::types::RenderRow;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
/// 自動改ページの下余白
const BOTTOM_MARGIN_MM: f32 = 15.0;
const PRINTABLE_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

const BANNER_SIZE_PT: f32 = 12.0;
const BANNER_HEIGHT_MM: f32 = 10.0;
/// バナー直後の空き
const BANNER_GAP_MM: f32 = 10.0;

/// 見出しサイズの基準値（`14 - 2 * level`）
const HEADING_BASE_PT: f32 = 14.0;
const HEADING_STEP_PT: f32 = 2.0;
const HEADING_GAP_MM: f32 = 2.0;

const BODY_SIZE_PT: f32 = 11.0;
const LINE_HEIGHT_MM: f32 = 8.0;
const BODY_GAP_MM: f32 = 8.0;

/// 配置済みの1行
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacedLine {
    pub text: String,
    pub x_mm: f32,
    /// 行の上端（用紙上端からの距離）
    pub top_mm: f32,
    pub size_pt: f32,
    pub bold: bool,
}

impl PlacedLine {
    /// ベースライン位置（用紙下端からの距離、printpdfの座標系）
    fn baseline_from_bottom(&self, line_height_mm: f32) -> f32 {
        let cap_height_mm = self.size_pt * PT_TO_MM * 0.7;
        PAGE_HEIGHT_MM - (self.top_mm + (line_height_mm + cap_height_mm) / 2.0)
    }
}

/// ページレイアウト
///
/// 現在位置（カーソル）を保持し、下余白を越える行は自動的に次ページへ送ります。
#[derive(Debug)]
pub(crate) struct PdfLayout {
    title: String,
    pages: Vec<Vec<PlacedLine>>,
    cursor_mm: f32,
}

impl PdfLayout {
    pub fn new(title: &str) -> Self {
        let mut layout = Self {
            title: title.to_string(),
            pages: Vec::new(),
            cursor_mm: 0.0,
        };
        layout.start_page();
        layout
    }

    /// 新しいページを開始し、タイトルバナーを配置
    fn start_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor_mm = MARGIN_MM;

        let banner_width = text_width_mm(&self.title, BANNER_SIZE_PT, true);
        let x_mm = MARGIN_MM + ((PRINTABLE_WIDTH_MM - banner_width) / 2.0).max(0.0);
        let banner = PlacedLine {
            text: self.title.clone(),
            x_mm,
            top_mm: self.cursor_mm,
            size_pt: BANNER_SIZE_PT,
            bold: true,
        };
        self.current_page().push(banner);
        self.cursor_mm += BANNER_HEIGHT_MM + BANNER_GAP_MM;

        log::debug!("PDF page {} started", self.pages.len());
    }

    fn current_page(&mut self) -> &mut Vec<PlacedLine> {
        let idx = self.pages.len() - 1;
        &mut self.pages[idx]
    }

    /// 折り返した段落を配置
    fn place_block(&mut self, text: &str, size_pt: f32, bold: bool) {
        for line in wrap_text(text, size_pt, PRINTABLE_WIDTH_MM, bold) {
            if self.cursor_mm + LINE_HEIGHT_MM > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
                self.start_page();
            }
            let placed = PlacedLine {
                text: line,
                x_mm: MARGIN_MM,
                top_mm: self.cursor_mm,
                size_pt,
                bold,
            };
            self.current_page().push(placed);
            self.cursor_mm += LINE_HEIGHT_MM;
        }
    }

    /// 1行分（見出し + 本文）を配置
    pub fn push(&mut self, row: &RenderRow) {
        let heading_size = HEADING_BASE_PT - HEADING_STEP_PT * f32::from(row.level);
        self.place_block(&row.header_text, heading_size, true);
        self.cursor_mm += HEADING_GAP_MM;

        if row.has_body() {
            self.place_block(&row.body_text, BODY_SIZE_PT, false);
            self.cursor_mm += BODY_GAP_MM;
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// バナー以外の配置済みテキスト（出力順）
    #[cfg(test)]
    fn content_lines(&self) -> Vec<&PlacedLine> {
        self.pages
            .iter()
            .flat_map(|page| page.iter().skip(1))
            .collect()
    }
}

/// PDF文書の出力器
#[derive(Debug)]
pub(crate) struct PdfEmitter {
    layout: PdfLayout,
}

impl PdfEmitter {
    pub fn new(title: &str) -> Self {
        Self {
            layout: PdfLayout::new(title),
        }
    }

    pub fn push(&mut self, row: &RenderRow) {
        self.layout.push(row);
    }

    /// レイアウトをPDFバイト列に描画
    pub fn finish(self) -> Result<Vec<u8>, HandbookError> {
        let layout = self.layout;
        log::debug!("Rendering PDF with {} pages", layout.page_count());

        let (doc, first_page, first_layer) = PdfDocument::new(
            &layout.title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| HandbookError::Pdf(format!("font error: {}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| HandbookError::Pdf(format!("font error: {}", e)))?;

        for (idx, page) in layout.pages.iter().enumerate() {
            let (page_idx, layer_idx) = if idx == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
            };
            let layer = doc.get_page(page_idx).get_layer(layer_idx);

            for (line_idx, line) in page.iter().enumerate() {
                if line.text.is_empty() {
                    continue;
                }
                let line_height = if line_idx == 0 {
                    BANNER_HEIGHT_MM
                } else {
                    LINE_HEIGHT_MM
                };
                let font = if line.bold { &bold } else { &regular };
                layer.use_text(
                    line.text.as_str(),
                    line.size_pt,
                    Mm(line.x_mm),
                    Mm(line.baseline_from_bottom(line_height)),
                    font,
                );
            }
        }

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| HandbookError::Pdf(format!("save error: {}", e)))?;
        buf.into_inner()
            .map_err(|e| HandbookError::Pdf(format!("buffer error: {}", e)))
    }
}
