//! Formatter Module
//!
//! テキスト正規化とアンカーID（スラッグ）生成を提供するモジュール。

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::FieldValue;

/// Excelが改行コードを書き出す際のエスケープ表記
const CR_MARKER: &str = "_x000d_";

/// テキストノーマライザー
///
/// Excel由来の復帰文字（`\r`）と`_x000d_`表記を取り除きます。
/// 改行文字（`\n`）はそのまま保持します。
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// 新しいTextNormalizerインスタンスを生成
    pub fn new() -> Self {
        Self
    }

    /// セル値を正規化
    ///
    /// `Text`以外の値は変更せずに返します。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxbook::{FieldValue, TextNormalizer};
    ///
    /// let normalizer = TextNormalizer::new();
    /// assert_eq!(
    ///     normalizer.normalize(FieldValue::from("Hello_x000d_\r\n")),
    ///     FieldValue::from("Hello\n"),
    /// );
    /// assert_eq!(normalizer.normalize(FieldValue::Number(1.5)), FieldValue::Number(1.5));
    /// ```
    pub fn normalize(&self, value: FieldValue) -> FieldValue {
        match value {
            FieldValue::Text(s) => FieldValue::Text(self.normalize_str(&s)),
            other => other,
        }
    }

    /// 文字列を正規化
    ///
    /// 除去によって新たなマーカーが連結される場合があるため、変化がなくなるまで
    /// 繰り返します（冪等性の保証）。
    pub fn normalize_str(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = remove_markers(&current).replace('\r', "");
            if next == current {
                return next;
            }
            current = next;
        }
    }
}

/// `_x000d_`表記を大文字小文字を区別せずに除去
fn remove_markers(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    if !lower.contains(CR_MARKER) {
        return text.to_string();
    }

    // ASCII小文字化はバイト位置を変えないため、同じインデックスで元の文字列を切り出せる
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(CR_MARKER) {
        result.push_str(&text[last..start]);
        last = start + CR_MARKER.len();
    }
    result.push_str(&text[last..]);
    result
}

fn non_slug_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\-]+").expect("slug pattern is valid"))
}

/// 見出しテキストからURLセーフなアンカーIDを生成する
///
/// 前後の空白を除去し、`[A-Za-z0-9_-]`以外の文字の連続を1つのハイフンに置き換え、
/// 小文字化します。空文字列からは空文字列を返します。
///
/// # 使用例
///
/// ```rust
/// use xlsxbook::slugify;
///
/// assert_eq!(slugify(" A/B Test "), "a-b-test");
/// assert_eq!(slugify(""), "");
/// ```
pub fn slugify(text: &str) -> String {
    non_slug_chars()
        .replace_all(text.trim(), "-")
        .to_ascii_lowercase()
}

/// アンカーIDの重複を解消するレジストリ
///
/// 最初の出現はスラッグをそのまま使い、2回目以降は`-2`, `-3`…を付加します。
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    seen: HashMap<String, usize>,
}

impl AnchorRegistry {
    /// 空のスラッグの代わりに使うID
    pub const FALLBACK_ID: &'static str = "section";

    /// 新しいレジストリを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 重複しないアンカーIDを払い出す
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxbook::AnchorRegistry;
    ///
    /// let mut anchors = AnchorRegistry::new();
    /// assert_eq!(anchors.claim("rules"), "rules");
    /// assert_eq!(anchors.claim("rules"), "rules-2");
    /// assert_eq!(anchors.claim(""), "section");
    /// ```
    pub fn claim(&mut self, slug: &str) -> String {
        let base = if slug.is_empty() {
            Self::FALLBACK_ID
        } else {
            slug
        };

        let mut candidate = base.to_string();
        let mut n = self.seen.get(base).copied().unwrap_or(0);
        while self.seen.contains_key(&candidate) {
            n += 1;
            candidate = format!("{}-{}", base, n + 1);
        }

        if candidate != base {
            log::warn!("Duplicate anchor '{}' renamed to '{}'", base, candidate);
        }
        self.seen.insert(base.to_string(), n);
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}
