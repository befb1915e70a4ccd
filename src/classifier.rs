//! Classifier Module
//!
//! 行の見出しレベル判定と、フラグ列の値の型強制を提供するモジュール。

use crate::types::{FieldValue, HeadingLevel};

/// 見出しレベルを判定する
///
/// - `section_header`が真ならレベル1
/// - そうでなく`section_id`が0以外ならレベル2
/// - それ以外はレベル3
///
/// # 使用例
///
/// ```rust
/// use xlsxbook::{classify, HeadingLevel};
///
/// assert_eq!(classify(true, 7), HeadingLevel::Section);
/// assert_eq!(classify(false, 7), HeadingLevel::SubSection);
/// assert_eq!(classify(false, 0), HeadingLevel::Item);
/// ```
pub fn classify(section_header: bool, section_id: i64) -> HeadingLevel {
    if section_header {
        HeadingLevel::Section
    } else if section_id != 0 {
        HeadingLevel::SubSection
    } else {
        HeadingLevel::Item
    }
}

/// `SectionHeader`列の値を論理値に変換する
///
/// 解釈できない値は偽として扱います（エラーにはしません）。
pub(crate) fn coerce_flag(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(b) => *b,
        FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
        FieldValue::Text(s) => {
            let s = s.trim().to_ascii_lowercase();
            match s.as_str() {
                "true" | "yes" | "y" | "1" => true,
                "false" | "no" | "n" | "0" | "" => false,
                _ => {
                    log::warn!("Unrecognized SectionHeader value {:?}, treating as false", s);
                    false
                }
            }
        }
        FieldValue::DateTime(_) | FieldValue::Empty => false,
    }
}

/// `SectionID`・`OrderID`列の値を整数に変換する
///
/// 数値は小数点以下を切り捨てます。解釈できない値は`None`を返します。
pub(crate) fn coerce_int(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        FieldValue::Bool(b) => Some(i64::from(*b)),
        FieldValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}
