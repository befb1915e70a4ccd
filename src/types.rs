//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::NaiveDateTime;
use serde::Serialize;

/// セルの値を表す列挙型
///
/// ワークブックから読み込んだ値を型付きのまま保持します。
/// テキスト正規化は`Text`のみに作用し、それ以外の値はそのまま通過します。
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 文字列
    Text(String),

    /// 数値（f64）
    Number(f64),

    /// 論理値
    Bool(bool),

    /// 日時（Excelシリアル値から変換済み）
    DateTime(NaiveDateTime),

    /// 空セル
    Empty,
}

impl FieldValue {
    /// 値が空かどうかを判定
    ///
    /// 空白のみの文字列も空として扱います。
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 表示用の文字列に変換
    ///
    /// 整数値の数値は小数点なしで出力します（例: `3.0` → `"3"`）。
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            FieldValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            FieldValue::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            FieldValue::Empty => String::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// 入力テーブルの1レコード
#[derive(Debug, Clone, PartialEq)]
pub struct HandbookRow {
    /// ソートキー（数値として解釈できない場合は`None`、末尾に並ぶ）
    pub order_id: Option<i64>,

    /// 最上位見出しフラグ
    pub section_header: bool,

    /// サブセクションID（0はサブセクションなし）
    pub section_id: i64,

    /// 見出しテキスト
    pub header_text: FieldValue,

    /// 本文テキスト（空の場合あり）
    pub body_text: FieldValue,
}

impl HandbookRow {
    /// テスト・組み込み用途向けの簡易コンストラクタ
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxbook::HandbookRow;
    ///
    /// let row = HandbookRow::new(1, true, 0, "Intro", Some("Hello\r\n"));
    /// assert_eq!(row.order_id, Some(1));
    /// ```
    pub fn new(
        order_id: i64,
        section_header: bool,
        section_id: i64,
        header_text: &str,
        body_text: Option<&str>,
    ) -> Self {
        Self {
            order_id: Some(order_id),
            section_header,
            section_id,
            header_text: FieldValue::from(header_text),
            body_text: body_text.map(FieldValue::from).unwrap_or(FieldValue::Empty),
        }
    }

    /// 並び替え用のキー（`OrderID`なしの行は末尾）
    pub(crate) fn sort_key(&self) -> (bool, i64) {
        (self.order_id.is_none(), self.order_id.unwrap_or(0))
    }
}

/// 見出しレベル（1〜3）
///
/// 入力には保存されず、`SectionHeader`と`SectionID`から導出されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HeadingLevel {
    /// 最上位見出し（h1）
    Section,
    /// サブセクション見出し（h2）
    SubSection,
    /// 項目見出し（h3）
    Item,
}

impl HeadingLevel {
    /// 数値レベル（1, 2, 3）
    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::Section => 1,
            HeadingLevel::SubSection => 2,
            HeadingLevel::Item => 3,
        }
    }

    /// HTML見出しタグ名
    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::Section => "h1",
            HeadingLevel::SubSection => "h2",
            HeadingLevel::Item => "h3",
        }
    }
}

/// 出力器に渡す正規化済みの行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRow {
    /// 見出しテキスト（正規化済み）
    pub header_text: String,

    /// 本文テキスト（正規化済み、本文なしの場合は空文字列）
    pub body_text: String,

    /// 見出しタグ（h1/h2/h3）
    pub heading_tag: &'static str,

    /// アンカーID
    pub anchor_id: String,

    /// 見出しレベル（1〜3）
    pub level: u8,
}

impl RenderRow {
    /// 本文段落を持つかどうか
    pub fn has_body(&self) -> bool {
        !self.body_text.is_empty()
    }
}

/// 目次エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// リンク先のアンカーID
    pub anchor_id: String,

    /// 表示テキスト
    pub display_text: String,

    /// 見出しレベル（1〜3）
    pub level: u8,

    /// インデント幅（px、`(level - 1) * 20`）
    pub indent_px: u32,

    /// 検索フィルタ用のキー（小文字化した表示テキスト）
    pub search_key: String,
}

impl TocEntry {
    /// 1インデントレベルあたりの幅（px）
    pub const INDENT_STEP_PX: u32 = 20;

    /// `RenderRow`から目次エントリを生成
    pub fn from_row(row: &RenderRow) -> Self {
        Self {
            anchor_id: row.anchor_id.clone(),
            display_text: row.header_text.clone(),
            level: row.level,
            indent_px: u32::from(row.level.saturating_sub(1)) * Self::INDENT_STEP_PX,
            search_key: row.header_text.to_lowercase(),
        }
    }

    /// 検索クエリに一致するかを判定
    ///
    /// 生成されるHTMLのフィルタスクリプトと同じ規則（大文字小文字を区別しない
    /// 部分一致、空クエリはすべてに一致）です。
    pub fn matches(&self, query: &str) -> bool {
        self.search_key.contains(&query.to_lowercase())
    }
}
