//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxbookクレート全体で使用するエラー型
///
/// 入力ワークブックの読み込み、行データの変換、3種類の出力（DOCX / PDF / HTML）の
/// 生成と書き込みの各段階で発生するエラーを統一的に扱います。
///
/// # エラーの種類
///
/// - 入力の読み込み失敗（`Io`, `Parse`, `SheetNotFound`, `EmptySheet`, `MissingColumn`）:
///   いずれも出力を書き込む前に発生し、処理全体を中断します。
/// - 出力の生成失敗（`Docx`, `Pdf`, `Template`, `Render`）
/// - 設定の検証失敗（`Config`）
/// - 入力制限の違反（`SecurityViolation`）
///
/// フラグ列の不正な値はエラーではなく、偽値/0として扱われます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxbook::HandbookError;
/// use std::fs::File;
///
/// fn open_export(path: &str) -> Result<File, HandbookError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum HandbookError {
    /// I/O操作中に発生したエラー
    ///
    /// 入力ファイルの読み込み失敗、出力ファイルの書き込み失敗（権限不足、
    /// ディスク容量不足など）で使用されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// 指定されたシートが存在しない
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// シートにヘッダー行が存在しない
    #[error("Sheet '{0}' has no header row")]
    EmptySheet(String),

    /// 必須列がヘッダー行に存在しない
    ///
    /// # 例
    ///
    /// ```rust
    /// use xlsxbook::HandbookError;
    ///
    /// let error = HandbookError::MissingColumn {
    ///     sheet: "tblHandbook".to_string(),
    ///     column: "OrderID".to_string(),
    /// };
    /// assert_eq!(
    ///     error.to_string(),
    ///     "Required column 'OrderID' is missing in sheet 'tblHandbook'"
    /// );
    /// ```
    #[error("Required column '{column}' is missing in sheet '{sheet}'")]
    MissingColumn {
        /// 対象シート名
        sheet: String,
        /// 見つからなかった列名
        column: String,
    },

    /// DOCX文書の生成に失敗した
    #[error("DOCX generation error: {0}")]
    Docx(String),

    /// PDF文書の生成に失敗した
    #[error("PDF generation error: {0}")]
    Pdf(String),

    /// HTMLテンプレートの登録（構文解析）に失敗した
    #[error("HTML template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// HTMLテンプレートのレンダリングに失敗した
    #[error("HTML render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// 設定の検証に失敗したエラー
    ///
    /// `PublisherBuilder::build()`時に検出されます。例えば、出力形式が1つも
    /// 選択されていない場合や、タイトルが空の場合などです。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限超過や、出力ファイル名にパス区切り文字が
    /// 含まれる場合などに発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
