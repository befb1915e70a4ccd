//! Parser Module
//!
//! calamineを使用したハンドブック・エクスポートの読み込み。
//! ヘッダー行から必須列を特定し、各行を`HandbookRow`に変換します。

mod workbook;

pub(crate) use workbook::WorkbookParser;
