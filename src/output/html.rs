//! HTML Emitter
//!
//! 本文ブロックと目次エントリの2つの列を組み立て、Handlebarsテンプレートで
//! 単一ファイルのHTMLページにレンダリングします。

use handlebars::Handlebars;
use serde::Serialize;

use crate::api::HtmlOptions;
use crate::error::HandbookError;
use crate::types::{RenderRow, TocEntry};

/// 組み込みテンプレート
pub(crate) const DEFAULT_TEMPLATE: &str = include_str!("../../templates/handbook.html.hbs");

const TEMPLATE_NAME: &str = "handbook";

/// テンプレートに渡すコンテキスト
///
/// カスタムテンプレートはこの構造（`title`, `rows`, `toc`, `options`）を前提に記述します。
#[derive(Debug, Serialize)]
struct PageContext<'a> {
    title: &'a str,
    rows: &'a [RenderRow],
    toc: &'a [TocEntry],
    options: OptionsContext,
}

#[derive(Debug, Serialize)]
struct OptionsContext {
    include_search_box: bool,
    include_theme_toggle: bool,
}

impl From<HtmlOptions> for OptionsContext {
    fn from(options: HtmlOptions) -> Self {
        Self {
            include_search_box: options.include_search_box,
            include_theme_toggle: options.include_theme_toggle,
        }
    }
}

/// テンプレートエンジンを構築
///
/// テンプレートの構文エラーはここで検出されます。
pub(crate) fn template_engine(template: &str) -> Result<Handlebars<'static>, HandbookError> {
    let mut engine = Handlebars::new();
    engine.set_strict_mode(false);
    engine.register_template_string(TEMPLATE_NAME, template)?;
    Ok(engine)
}

/// HTMLページの出力器
#[derive(Debug)]
pub(crate) struct HtmlEmitter {
    title: String,
    options: HtmlOptions,
    template: String,
    rows: Vec<RenderRow>,
    toc: Vec<TocEntry>,
}

impl HtmlEmitter {
    pub fn new(title: &str, options: HtmlOptions, template: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            options,
            template: template.unwrap_or(DEFAULT_TEMPLATE).to_string(),
            rows: Vec::new(),
            toc: Vec::new(),
        }
    }

    pub fn push(&mut self, row: &RenderRow) {
        self.toc.push(TocEntry::from_row(row));
        self.rows.push(row.clone());
    }

    /// ページ全体をレンダリング
    pub fn finish(self) -> Result<String, HandbookError> {
        let engine = template_engine(&self.template)?;
        let context = PageContext {
            title: &self.title,
            rows: &self.rows,
            toc: &self.toc,
            options: self.options.into(),
        };
        let html = engine.render(TEMPLATE_NAME, &context)?;
        log::debug!(
            "Rendered HTML page: {} sections, {} bytes",
            self.rows.len(),
            html.len()
        );
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(header: &str, body: &str, level: u8, tag: &'static str) -> RenderRow {
        RenderRow {
            header_text: header.to_string(),
            body_text: body.to_string(),
            heading_tag: tag,
            anchor_id: header.to_lowercase(),
            level,
        }
    }

    fn render(options: HtmlOptions, rows: &[RenderRow]) -> String {
        let mut emitter = HtmlEmitter::new("Player's Handbook", options, None);
        for r in rows {
            emitter.push(r);
        }
        emitter.finish().unwrap()
    }

    #[test]
    fn test_sections_and_toc() {
        let html = render(
            HtmlOptions::default(),
            &[row("Intro", "Hello", 1, "h1"), row("Rules", "", 3, "h3")],
        );

        assert_eq!(html.matches("<div class=\"section\">").count(), 2);
        assert!(html.contains("<h1 id=\"intro\">Intro</h1>"));
        assert!(html.contains("<h3 id=\"rules\">Rules</h3>"));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains("margin-left: 0px;"));
        assert!(html.contains("margin-left: 40px;"));
        assert!(html.contains("href=\"#rules\""));
        assert!(html.contains("data-search=\"rules\""));
    }

    #[test]
    fn test_second_section_without_body_has_no_paragraph() {
        let html = render(
            HtmlOptions::plain(),
            &[row("Intro", "Hello", 1, "h1"), row("Rules", "", 3, "h3")],
        );
        let second = html.split("<div class=\"section\">").nth(2).unwrap();
        let second = &second[..second.find("</div>").unwrap()];
        assert!(second.contains("Rules"));
        assert!(!second.contains("<p>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render(
            HtmlOptions::plain(),
            &[row("A <b> & C", "x < y", 1, "h1")],
        );
        assert!(html.contains("A &lt;b&gt; &amp; C"));
        assert!(html.contains("x &lt; y"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_options_toggle_controls() {
        let full = render(HtmlOptions::default(), &[row("Intro", "", 1, "h1")]);
        assert!(full.contains("id=\"toc-search\""));
        assert!(full.contains("id=\"theme-toggle\""));

        let plain = render(HtmlOptions::plain(), &[row("Intro", "", 1, "h1")]);
        assert!(!plain.contains("id=\"toc-search\""));
        assert!(!plain.contains("id=\"theme-toggle\""));
        // 使わない部品のCSSも出力しない
        assert!(!plain.contains("toc-search"));
        assert!(!plain.contains("theme-toggle"));
        assert!(!plain.contains("body.dark"));
        assert!(full.contains("body.dark #toc-search"));

        let search_only = render(
            HtmlOptions {
                include_search_box: true,
                include_theme_toggle: false,
            },
            &[row("Intro", "", 1, "h1")],
        );
        assert!(search_only.contains("#toc-search {"));
        assert!(!search_only.contains("body.dark"));
        // トップへ戻るボタンは常に含まれる
        assert!(plain.contains("id=\"top-button\""));
    }

    #[test]
    fn test_custom_template() {
        let mut emitter = HtmlEmitter::new(
            "T",
            HtmlOptions::default(),
            Some("{{#each toc}}[{{anchor_id}}:{{level}}]{{/each}}"),
        );
        emitter.push(&row("Intro", "", 1, "h1"));
        emitter.push(&row("Rules", "", 3, "h3"));
        assert_eq!(emitter.finish().unwrap(), "[intro:1][rules:3]");
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        assert!(matches!(
            template_engine("{{#each toc}}"),
            Err(HandbookError::Template(_))
        ));
    }
}
