//! Builder Module
//!
//! Fluent Builder APIを提供し、`Publisher`インスタンスを段階的に構築する。

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::api::{HtmlOptions, OutputKind, SheetSelector};
use crate::classifier::classify;
use crate::error::HandbookError;
use crate::formatter::{slugify, AnchorRegistry, TextNormalizer};
use crate::output::{template_engine, Artifacts, Emitter, OutputSettings};
use crate::parser::WorkbookParser;
use crate::security::{validate_output_stem, SecurityConfig};
use crate::types::{FieldValue, HandbookRow, RenderRow};

/// 出版処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct PublishConfig {
    /// 文書タイトル
    pub title: String,

    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 出力形式（重複なし、DOCX / PDF / HTMLの順）
    pub outputs: Vec<OutputKind>,

    /// HTML出力のオプション
    pub html_options: HtmlOptions,

    /// カスタムHTMLテンプレートのパス
    pub html_template_path: Option<PathBuf>,

    /// 出力ファイル名の語幹
    pub output_stem: String,

    /// アンカーIDの重複を解消するか
    pub unique_anchors: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            title: "Handbook".to_string(),
            sheet_selector: SheetSelector::First,
            outputs: OutputKind::ALL.to_vec(),
            html_options: HtmlOptions::default(),
            html_template_path: None,
            output_stem: "handbook".to_string(),
            unique_anchors: true,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxbook::{HtmlOptions, OutputKind, PublisherBuilder, SheetSelector};
///
/// # fn main() -> Result<(), xlsxbook::HandbookError> {
/// let publisher = PublisherBuilder::new()
///     .with_title("TEW IX Player's Handbook")
///     .with_sheet_selector(SheetSelector::Name("tblHandbook".to_string()))
///     .with_outputs(&[OutputKind::Pdf, OutputKind::Html])
///     .with_html_options(HtmlOptions::plain())
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PublisherBuilder {
    config: PublishConfig,
}

impl PublisherBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - タイトル: `Handbook`
    /// - シート選択: 最初のシート
    /// - 出力形式: DOCX, PDF, HTML
    /// - HTML: 検索ボックスとテーマ切り替えあり、組み込みテンプレート
    /// - 出力ファイル名: `handbook.*`
    /// - アンカーIDの重複解消: 有効
    pub fn new() -> Self {
        Self::default()
    }

    /// 文書タイトルを指定する
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// 読み込むシートを指定する
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 出力形式を指定する
    ///
    /// 重複は除去され、出力順は常にDOCX / PDF / HTMLになります。
    pub fn with_outputs(mut self, outputs: &[OutputKind]) -> Self {
        let mut outputs = outputs.to_vec();
        outputs.sort();
        outputs.dedup();
        self.config.outputs = outputs;
        self
    }

    /// HTML出力のオプションを指定する
    pub fn with_html_options(mut self, options: HtmlOptions) -> Self {
        self.config.html_options = options;
        self
    }

    /// カスタムHTMLテンプレート（Handlebars）を指定する
    ///
    /// テンプレートには`title`, `rows`, `toc`, `options`が渡されます。
    /// ファイルの読み込みと構文チェックは`build()`時に行われます。
    pub fn with_html_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.html_template_path = Some(path.into());
        self
    }

    /// 出力ファイル名の語幹（拡張子なし）を指定する
    pub fn with_output_stem(mut self, stem: impl Into<String>) -> Self {
        self.config.output_stem = stem.into();
        self
    }

    /// アンカーIDの重複を解消するかを指定する
    ///
    /// * `true`: 2回目以降の重複に`-2`, `-3`…を付加（デフォルト）
    /// * `false`: スラッグをそのまま使う（重複したIDがページ内に残る）
    pub fn with_unique_anchors(mut self, unique: bool) -> Self {
        self.config.unique_anchors = unique;
        self
    }

    /// 設定を検証し、`Publisher`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `HandbookError::Config` - 出力形式が空、タイトルが空
    /// * `HandbookError::SecurityViolation` - 出力ファイル名が不正
    /// * `HandbookError::Io` - テンプレートファイルが読めない
    /// * `HandbookError::Template` - テンプレートの構文エラー
    pub fn build(self) -> Result<Publisher, HandbookError> {
        // 1. 出力形式
        if self.config.outputs.is_empty() {
            return Err(HandbookError::Config(
                "At least one output format must be selected".to_string(),
            ));
        }

        // 2. タイトル
        if self.config.title.trim().is_empty() {
            return Err(HandbookError::Config("Title must not be empty".to_string()));
        }

        // 3. 出力ファイル名
        validate_output_stem(&self.config.output_stem)
            .map_err(HandbookError::SecurityViolation)?;

        // 4. カスタムテンプレートの読み込みと構文チェック
        let html_template = match &self.config.html_template_path {
            Some(path) => {
                let template = fs::read_to_string(path)?;
                template_engine(&template)?;
                log::debug!("Using HTML template {}", path.display());
                Some(template)
            }
            None => None,
        };

        let settings = OutputSettings {
            title: self.config.title.clone(),
            html_options: self.config.html_options,
            html_template,
        };

        Ok(Publisher {
            config: self.config,
            settings,
            normalizer: TextNormalizer::new(),
            security: SecurityConfig::default(),
        })
    }
}

/// 出版処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// 読み込んだシート名
    pub sheet: String,

    /// 処理した行数
    pub rows: usize,

    /// 書き込んだファイル
    pub written: Vec<PathBuf>,
}

/// 変換処理のファサード
///
/// 入力テーブルを読み込み、`OrderID`順に並べ替え、各行を分類・正規化して
/// 3つの出力器に順に流し込みます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxbook::PublisherBuilder;
///
/// # fn main() -> Result<(), xlsxbook::HandbookError> {
/// let publisher = PublisherBuilder::new().with_title("TEW IX Handbook").build()?;
/// let report = publisher.publish("tblHandbook.xlsx", ".")?;
/// println!("{} rows -> {:?}", report.rows, report.written);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Publisher {
    config: PublishConfig,
    settings: OutputSettings,
    normalizer: TextNormalizer,
    security: SecurityConfig,
}

impl Publisher {
    /// 出力ファイル名の語幹
    pub fn output_stem(&self) -> &str {
        &self.config.output_stem
    }

    /// 選択されている出力形式
    pub fn outputs(&self) -> &[OutputKind] {
        &self.config.outputs
    }

    /// ワークブックを読み込み、入力順の行データを返す
    ///
    /// 出力は一切行いません。列の欠落などはここでエラーになります。
    pub fn load<R: Read>(&self, input: R) -> Result<Vec<HandbookRow>, HandbookError> {
        self.load_with_sheet(input).map(|(_, rows)| rows)
    }

    /// ファイルパスからワークブックを読み込む
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<HandbookRow>, HandbookError> {
        self.load(File::open(path)?)
    }

    fn load_with_sheet<R: Read>(
        &self,
        input: R,
    ) -> Result<(String, Vec<HandbookRow>), HandbookError> {
        let mut parser = WorkbookParser::open(input, self.security.clone())?;
        let sheet = parser.select_sheet(&self.config.sheet_selector)?;
        let rows = parser.read_rows(&sheet)?;
        Ok((sheet, rows))
    }

    /// 行データを出力順に並べ、分類・正規化・アンカー付与を行う
    ///
    /// `OrderID`の昇順（安定ソート）。`OrderID`のない行は末尾に入力順で並びます。
    pub fn prepare(&self, rows: &[HandbookRow]) -> Vec<RenderRow> {
        let mut ordered: Vec<&HandbookRow> = rows.iter().collect();
        ordered.sort_by_key(|row| row.sort_key());

        let mut anchors = AnchorRegistry::new();
        ordered
            .into_iter()
            .map(|row| self.to_render_row(row, &mut anchors))
            .collect()
    }

    fn to_render_row(&self, row: &HandbookRow, anchors: &mut AnchorRegistry) -> RenderRow {
        let level = classify(row.section_header, row.section_id);

        let header_text = self.normalized_text(&row.header_text);
        let body_text = self.normalized_text(&row.body_text);
        let body_text = if body_text.trim().is_empty() {
            String::new()
        } else {
            body_text
        };

        let slug = slugify(&header_text);
        let anchor_id = if self.config.unique_anchors {
            anchors.claim(&slug)
        } else {
            slug
        };

        log::debug!(
            "Row {:?}: level {} '{}' -> #{}",
            row.order_id,
            level.number(),
            header_text,
            anchor_id
        );

        RenderRow {
            header_text,
            body_text,
            heading_tag: level.tag(),
            anchor_id,
            level: level.number(),
        }
    }

    fn normalized_text(&self, value: &FieldValue) -> String {
        self.normalizer.normalize(value.clone()).to_display_string()
    }

    /// 行データをメモリ上の成果物にレンダリングする
    ///
    /// ファイルシステムには触れません。各出力器は同じ行の列を1回ずつ受け取り、
    /// 全行の処理後にそれぞれ独立して確定されます。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxbook::{HandbookRow, OutputKind, PublisherBuilder};
    ///
    /// # fn main() -> Result<(), xlsxbook::HandbookError> {
    /// let publisher = PublisherBuilder::new()
    ///     .with_outputs(&[OutputKind::Html])
    ///     .build()?;
    /// let rows = vec![
    ///     HandbookRow::new(2, false, 0, "Rules", None),
    ///     HandbookRow::new(1, true, 0, "Intro", Some("Hello\r\n")),
    /// ];
    /// let artifacts = publisher.render(&rows)?;
    /// let html = artifacts.html.unwrap();
    /// assert!(html.find("Intro").unwrap() < html.find("Rules").unwrap());
    /// # Ok(())
    /// # }
    /// ```
    pub fn render(&self, rows: &[HandbookRow]) -> Result<Artifacts, HandbookError> {
        let mut emitters: Vec<Emitter> = self
            .config
            .outputs
            .iter()
            .map(|kind| Emitter::for_kind(*kind, &self.settings))
            .collect();

        let render_rows = self.prepare(rows);
        for row in &render_rows {
            for emitter in emitters.iter_mut() {
                emitter.push(row);
            }
        }

        let mut artifacts = Artifacts::default();
        for emitter in emitters {
            let kind = emitter.kind();
            emitter.finish(&mut artifacts)?;
            log::debug!("Finished {} output", kind);
        }

        log::info!(
            "Rendered {} rows into {} output(s)",
            render_rows.len(),
            self.config.outputs.len()
        );
        Ok(artifacts)
    }

    /// 入力ファイルを読み込み、全出力を`out_dir`に書き込む
    ///
    /// 入力の読み込みに失敗した場合、出力ファイルは一切作成されません。
    /// `out_dir`が存在しない場合は作成します。
    pub fn publish<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        out_dir: Q,
    ) -> Result<PublishReport, HandbookError> {
        let input = input.as_ref();
        log::info!("Loading {}", input.display());

        let (sheet, rows) = self.load_with_sheet(File::open(input)?)?;
        let artifacts = self.render(&rows)?;

        fs::create_dir_all(out_dir.as_ref())?;
        let written = artifacts.write_to(out_dir, &self.config.output_stem)?;

        Ok(PublishReport {
            sheet,
            rows: rows.len(),
            written,
        })
    }
}
