//! Public API Types
//!
//! 公開APIで使用する列挙型・オプションを定義するモジュール。

use std::fmt;
use std::str::FromStr;

/// シート選択方式
///
/// 読み込み対象のシートを選択する方法を指定します。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SheetSelector {
    /// 最初のシート（デフォルト）
    #[default]
    First,

    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(1)` は2番目のシートを選択
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("tblHandbook".to_string())`
    Name(String),
}

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputKind {
    /// Word文書（`.docx`）
    Docx,

    /// PDF文書（`.pdf`）
    Pdf,

    /// 単一ファイルのHTMLページ（`.html`）
    Html,
}

impl OutputKind {
    /// すべての出力形式（出力順）
    pub const ALL: [OutputKind; 3] = [OutputKind::Docx, OutputKind::Pdf, OutputKind::Html];

    /// ファイル拡張子
    pub fn extension(self) -> &'static str {
        match self {
            OutputKind::Docx => "docx",
            OutputKind::Pdf => "pdf",
            OutputKind::Html => "html",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" | "word" => Ok(OutputKind::Docx),
            "pdf" => Ok(OutputKind::Pdf),
            "html" | "htm" => Ok(OutputKind::Html),
            other => Err(format!("Unknown output format: '{}'", other)),
        }
    }
}

/// HTML出力のオプション
///
/// 目次の検索ボックスとライト/ダークテーマ切り替えボタンの有無を指定します。
/// どちらもクライアントサイドのみで動作し、状態は保存されません。
///
/// # 使用例
///
/// ```rust
/// use xlsxbook::HtmlOptions;
///
/// // 検索ボックスのみ
/// let options = HtmlOptions {
///     include_search_box: true,
///     include_theme_toggle: false,
/// };
/// assert_ne!(options, HtmlOptions::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOptions {
    /// 目次の検索ボックスを含めるか
    pub include_search_box: bool,

    /// テーマ切り替えボタンを含めるか
    pub include_theme_toggle: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            include_search_box: true,
            include_theme_toggle: true,
        }
    }
}

impl HtmlOptions {
    /// 検索ボックスもテーマ切り替えもない、最小構成のページ
    pub fn plain() -> Self {
        Self {
            include_search_box: false,
            include_theme_toggle: false,
        }
    }
}
