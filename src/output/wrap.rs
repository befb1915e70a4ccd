//! Text Wrapping
//!
//! PDF出力用の行折り返し。組み込みフォント（Helvetica / Helvetica-Bold）の
//! AFM文字幅から行の幅を見積もり、単語単位で折り返します。

use unicode_width::UnicodeWidthChar;

/// 1ポイントあたりのミリメートル
pub(crate) const PT_TO_MM: f32 = 25.4 / 72.0;

/// 表にない文字の幅（em単位、半角1桁あたり）
const FALLBACK_CHAR_EM: f32 = 0.6;

/// Helvetica の文字幅（1/1000 em、U+0020〜U+007E）
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold の文字幅（1/1000 em、U+0020〜U+007E）
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// 1文字の幅（em単位）
fn char_width_em(c: char, bold: bool) -> f32 {
    let table = if bold {
        &HELVETICA_BOLD_WIDTHS
    } else {
        &HELVETICA_WIDTHS
    };
    match (c as u32).checked_sub(0x20) {
        Some(idx) if (idx as usize) < table.len() => f32::from(table[idx as usize]) / 1000.0,
        _ => c.width().unwrap_or(0) as f32 * FALLBACK_CHAR_EM,
    }
}

/// テキストの表示幅（mm）を見積もる
pub(crate) fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
    let em: f32 = text.chars().map(|c| char_width_em(c, bold)).sum();
    em * size_pt * PT_TO_MM
}

/// テキストを指定幅で折り返す
///
/// 改行文字（`\n`）では必ず改行し、空の段落は空行として残します。
/// 1行に収まらない長い単語は文字単位で分割します。
/// 戻り値は常に1行以上です。
pub(crate) fn wrap_text(text: &str, size_pt: f32, max_width_mm: f32, bold: bool) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, size_pt, bold) <= max_width_mm;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();

        for word in paragraph.split_whitespace() {
            for piece in split_long_word(word, &fits) {
                if line.is_empty() {
                    line = piece;
                    continue;
                }

                let candidate = format!("{} {}", line, piece);
                if fits(&candidate) {
                    line = candidate;
                } else {
                    lines.push(std::mem::replace(&mut line, piece));
                }
            }
        }

        lines.push(line);
    }

    lines
}

/// 1行に収まらない単語を分割
///
/// 1文字でも収まらない場合はその文字だけで1片とします。
fn split_long_word(word: &str, fits: &impl Fn(&str) -> bool) -> Vec<String> {
    if fits(word) {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if !fits(&piece) && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
