//! Output Module
//!
//! 3種類の出力器（DOCX / PDF / HTML）をenumとして表現し（Strategy Pattern）、
//! それぞれの成果物をまとめて保持・書き込みする`Artifacts`を提供するモジュール。

mod docx;
mod html;
mod pdf;
mod wrap;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::api::{HtmlOptions, OutputKind};
use crate::error::HandbookError;
use crate::security::validate_output_stem;
use crate::types::RenderRow;

pub(crate) use html::template_engine;

use docx::DocxEmitter;
use html::HtmlEmitter;
use pdf::PdfEmitter;

/// 出力器の共通設定
#[derive(Debug, Clone)]
pub(crate) struct OutputSettings {
    /// 文書タイトル（PDFバナー、HTMLの`<title>`と`<h1>`）
    pub title: String,

    /// HTML出力のオプション
    pub html_options: HtmlOptions,

    /// カスタムHTMLテンプレート（Noneの場合は組み込みテンプレート）
    pub html_template: Option<String>,
}

/// 出力器（Strategy Pattern）
///
/// 各出力器は自分専用のバッファ／カーソルを持ち、互いに依存しません。
#[derive(Debug)]
pub(crate) enum Emitter {
    Docx(DocxEmitter),
    Pdf(PdfEmitter),
    Html(HtmlEmitter),
}

impl Emitter {
    /// 出力形式から出力器を生成
    pub fn for_kind(kind: OutputKind, settings: &OutputSettings) -> Self {
        match kind {
            OutputKind::Docx => Emitter::Docx(DocxEmitter::new()),
            OutputKind::Pdf => Emitter::Pdf(PdfEmitter::new(&settings.title)),
            OutputKind::Html => Emitter::Html(HtmlEmitter::new(
                &settings.title,
                settings.html_options,
                settings.html_template.as_deref(),
            )),
        }
    }

    pub fn kind(&self) -> OutputKind {
        match self {
            Emitter::Docx(_) => OutputKind::Docx,
            Emitter::Pdf(_) => OutputKind::Pdf,
            Emitter::Html(_) => OutputKind::Html,
        }
    }

    /// 1行を出力器のバッファに追加
    pub fn push(&mut self, row: &RenderRow) {
        match self {
            Emitter::Docx(emitter) => emitter.push(row),
            Emitter::Pdf(emitter) => emitter.push(row),
            Emitter::Html(emitter) => emitter.push(row),
        }
    }

    /// 成果物を確定し、`artifacts`に格納
    pub fn finish(self, artifacts: &mut Artifacts) -> Result<(), HandbookError> {
        match self {
            Emitter::Docx(emitter) => artifacts.docx = Some(emitter.finish()?),
            Emitter::Pdf(emitter) => artifacts.pdf = Some(emitter.finish()?),
            Emitter::Html(emitter) => artifacts.html = Some(emitter.finish()?),
        }
        Ok(())
    }
}

/// レンダリング結果（メモリ上の成果物）
///
/// 選択されなかった出力形式は`None`です。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    /// Word文書（DOCX）
    pub docx: Option<Vec<u8>>,

    /// PDF文書
    pub pdf: Option<Vec<u8>>,

    /// HTMLページ
    pub html: Option<String>,
}

impl Artifacts {
    /// 指定形式の成果物をバイト列として取得
    pub fn get(&self, kind: OutputKind) -> Option<&[u8]> {
        match kind {
            OutputKind::Docx => self.docx.as_deref(),
            OutputKind::Pdf => self.pdf.as_deref(),
            OutputKind::Html => self.html.as_deref().map(str::as_bytes),
        }
    }

    /// 成果物を`<dir>/<stem>.<拡張子>`に書き込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<PathBuf>)` - 書き込んだファイルのパス（DOCX, PDF, HTMLの順）
    /// * `Err(HandbookError)` - 書き込みに失敗した場合（作成済みのファイルは削除しない）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxbook::{HandbookRow, PublisherBuilder};
    ///
    /// # fn main() -> Result<(), xlsxbook::HandbookError> {
    /// let publisher = PublisherBuilder::new().build()?;
    /// let rows = vec![HandbookRow::new(1, true, 0, "Intro", Some("Hello"))];
    /// let artifacts = publisher.render(&rows)?;
    /// artifacts.write_to("out", "handbook")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn write_to<P: AsRef<Path>>(
        &self,
        dir: P,
        stem: &str,
    ) -> Result<Vec<PathBuf>, HandbookError> {
        validate_output_stem(stem).map_err(HandbookError::SecurityViolation)?;

        let mut written = Vec::new();
        for kind in OutputKind::ALL {
            let Some(bytes) = self.get(kind) else {
                continue;
            };

            let path = dir.as_ref().join(format!("{}.{}", stem, kind.extension()));
            let mut writer = BufWriter::new(File::create(&path)?);
            writer.write_all(bytes)?;
            writer.flush()?;

            log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
            written.push(path);
        }

        Ok(written)
    }
}
