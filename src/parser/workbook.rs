//! Workbook Parser
//!
//! calamineのラッパーとして、シート選択と行データの抽出を提供します。

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::io::{Cursor, Read};

use crate::api::SheetSelector;
use crate::classifier::{coerce_flag, coerce_int};
use crate::error::HandbookError;
use crate::security::SecurityConfig;
use crate::types::{FieldValue, HandbookRow};

/// 必須列名（ヘッダー行で完全一致、前後の空白は無視）
pub(crate) const COL_ORDER_ID: &str = "OrderID";
pub(crate) const COL_SECTION_HEADER: &str = "SectionHeader";
pub(crate) const COL_SECTION_ID: &str = "SectionID";
pub(crate) const COL_HEADER_TEXT: &str = "HeaderText";
pub(crate) const COL_BODY_TEXT: &str = "BodyText";

/// Excelシリアル値の上限（9999-12-31）
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// ワークブックパーサー
///
/// xlsx / xlsm / xlsb / xls / ods のいずれの形式も受け付けます。
pub(crate) struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
    security: SecurityConfig,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// 入力をサイズ上限 + 1バイトまでメモリに読み込み、制限を確認してから
    /// calamineに渡します。上限を超える入力は全体を読み込む前に拒否されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(HandbookError::SecurityViolation)` - サイズ制限を超えた場合
    /// * `Err(HandbookError::Parse)` - ワークブックとして解釈できない場合
    pub fn open<R: Read>(reader: R, security: SecurityConfig) -> Result<Self, HandbookError> {
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(security.max_input_file_size.saturating_add(1))
            .read_to_end(&mut buffer)?;

        security
            .check_input_size(bytes_read as u64)
            .map_err(HandbookError::SecurityViolation)?;

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        log::debug!("Opened workbook ({} bytes)", bytes_read);

        Ok(Self { workbook, security })
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シート選択方式に基づいて1つのシートを選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 選択されたシート名
    /// * `Err(HandbookError::SheetNotFound)` - シートが存在しない場合
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String, HandbookError> {
        let names = self.sheet_names();

        match selector {
            SheetSelector::First => names
                .first()
                .cloned()
                .ok_or_else(|| HandbookError::SheetNotFound("(workbook has no sheets)".to_string())),

            SheetSelector::Index(index) => names.get(*index).cloned().ok_or_else(|| {
                HandbookError::SheetNotFound(format!(
                    "index {} is out of range (total: {})",
                    index,
                    names.len()
                ))
            }),

            SheetSelector::Name(name) => {
                if names.contains(name) {
                    Ok(name.clone())
                } else {
                    Err(HandbookError::SheetNotFound(name.clone()))
                }
            }
        }
    }

    /// シートを読み込み、ハンドブック行に変換
    ///
    /// 最初の空でない行をヘッダー行とみなします。完全に空の行は読み飛ばします。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<HandbookRow>)` - 入力順（未ソート）の行データ
    /// * `Err(HandbookError::EmptySheet)` - ヘッダー行が存在しない場合
    /// * `Err(HandbookError::MissingColumn)` - 必須列が欠けている場合
    pub fn read_rows(&mut self, sheet_name: &str) -> Result<Vec<HandbookRow>, HandbookError> {
        let range = self.workbook.worksheet_range(sheet_name)?;
        let mut rows = range.rows().filter(|row| !is_blank_row(row));

        let header = rows
            .next()
            .ok_or_else(|| HandbookError::EmptySheet(sheet_name.to_string()))?;
        let columns = ColumnMap::locate(header, sheet_name)?;

        let mut result = Vec::new();
        for (line, row) in rows.enumerate() {
            if result.len() >= self.security.max_rows {
                return Err(HandbookError::SecurityViolation(format!(
                    "Sheet '{}' exceeds the maximum of {} rows",
                    sheet_name, self.security.max_rows
                )));
            }

            let handbook_row = columns.extract(row);
            if handbook_row.order_id.is_none() {
                log::warn!(
                    "Row {} of sheet '{}' has no numeric {}; it will be placed last",
                    line + 2,
                    sheet_name,
                    COL_ORDER_ID
                );
            }
            result.push(handbook_row);
        }

        log::info!("Read {} rows from sheet '{}'", result.len(), sheet_name);
        Ok(result)
    }
}

/// 必須列のインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    order_id: usize,
    section_header: usize,
    section_id: usize,
    header_text: usize,
    body_text: usize,
}

impl ColumnMap {
    /// ヘッダー行から必須列の位置を特定
    fn locate(header: &[Data], sheet_name: &str) -> Result<Self, HandbookError> {
        let names: Vec<String> = header
            .iter()
            .map(|cell| to_field_value(cell).to_display_string().trim().to_string())
            .collect();

        let find = |column: &str| {
            names
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| HandbookError::MissingColumn {
                    sheet: sheet_name.to_string(),
                    column: column.to_string(),
                })
        };

        Ok(Self {
            order_id: find(COL_ORDER_ID)?,
            section_header: find(COL_SECTION_HEADER)?,
            section_id: find(COL_SECTION_ID)?,
            header_text: find(COL_HEADER_TEXT)?,
            body_text: find(COL_BODY_TEXT)?,
        })
    }

    /// データ行から`HandbookRow`を生成
    fn extract(&self, row: &[Data]) -> HandbookRow {
        let cell = |idx: usize| row.get(idx).map(to_field_value).unwrap_or(FieldValue::Empty);

        HandbookRow {
            order_id: coerce_int(&cell(self.order_id)),
            section_header: coerce_flag(&cell(self.section_header)),
            section_id: coerce_int(&cell(self.section_id)).unwrap_or(0),
            header_text: cell(self.header_text),
            body_text: cell(self.body_text),
        }
    }
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

/// calamineのセル値を`FieldValue`に変換
pub(crate) fn to_field_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Int(i) => FieldValue::Number(*i as f64),
        Data::Float(f) => FieldValue::Number(*f),
        Data::String(s) => FieldValue::Text(s.clone()),
        Data::Bool(b) => FieldValue::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            serial_to_datetime(serial)
                .map(FieldValue::DateTime)
                .unwrap_or(FieldValue::Number(serial))
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => FieldValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => FieldValue::Empty,
    }
}

/// Excelのシリアル日付値（1900年システム）を日時に変換
///
/// 1899年12月30日起算です（Excelの1900年うるう年バグにより、1900年3月1日以降の
/// シリアル値がこの起算日で正しく変換されます）。
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}


// ワークブック全体を対象とするテストは統合テスト（tests/）で実装します。
