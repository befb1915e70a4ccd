//! xlsxbook - Pure-Rust handbook publisher
//!
//! ハンドブックのExcelエクスポート（`OrderID`, `SectionHeader`, `SectionID`,
//! `HeaderText`, `BodyText`の5列）を読み込み、以下の3形式に変換するクレートです。
//!
//! - Word文書（`.docx`）
//! - PDF文書（`.pdf`）
//! - 目次・検索・テーマ切り替え付きの単一ファイルHTML（`.html`）
//!
//! 各行は`OrderID`順に並べ替えられ、見出しレベル（1〜3）に分類され、
//! Excel由来の復帰文字を除去されたうえで、3つの出力器に順に渡されます。
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsxbook::PublisherBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // デフォルト設定（3形式すべて、handbook.*）
//!     let publisher = PublisherBuilder::new()
//!         .with_title("TEW IX Handbook")
//!         .build()?;
//!
//!     // tblHandbook.xlsx → ./handbook.docx, ./handbook.pdf, ./handbook.html
//!     let report = publisher.publish("tblHandbook.xlsx", ".")?;
//!     println!("{} rows written to {:?}", report.rows, report.written);
//!
//!     Ok(())
//! }
//! ```
//!
//! # In-memory Rendering
//!
//! 行データを直接渡せば、ファイルシステムに触れずに成果物を得られます。
//!
//! ```rust
//! use xlsxbook::{HandbookRow, PublisherBuilder};
//!
//! # fn main() -> Result<(), xlsxbook::HandbookError> {
//! let publisher = PublisherBuilder::new().build()?;
//! let rows = vec![
//!     HandbookRow::new(1, true, 0, "Intro", Some("Hello\r\n")),
//!     HandbookRow::new(2, false, 0, "Rules", None),
//! ];
//! let artifacts = publisher.render(&rows)?;
//! assert!(artifacts.docx.is_some());
//! assert!(artifacts.pdf.is_some());
//! assert!(artifacts.html.unwrap().contains("id=\"rules\""));
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use xlsxbook::{HtmlOptions, OutputKind, PublisherBuilder, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let publisher = PublisherBuilder::new()
//!         .with_sheet_selector(SheetSelector::Name("tblHandbook".to_string()))
//!         .with_outputs(&[OutputKind::Html])
//!         .with_html_options(HtmlOptions::plain())  // 検索・テーマ切り替えなし
//!         .with_html_template("templates/custom.html.hbs")
//!         .build()?;
//!
//!     publisher.publish("export.xlsx", "site")?;
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod classifier;
mod error;
mod formatter;
mod output;
mod parser;
mod security;
mod types;

// 公開API
pub use api::{HtmlOptions, OutputKind, SheetSelector};
pub use builder::{PublishReport, Publisher, PublisherBuilder};
pub use classifier::classify;
pub use error::HandbookError;
pub use formatter::{slugify, AnchorRegistry, TextNormalizer};
pub use output::Artifacts;
pub use types::{FieldValue, HandbookRow, HeadingLevel, RenderRow, TocEntry};
