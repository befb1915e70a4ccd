//! Integration Tests for xlsxbook
//!
//! Workbooks are generated in memory with rust_xlsxwriter, loaded through the
//! public API and rendered to all three formats.

use rust_xlsxwriter::*;
use std::io::{Cursor, Read};
use xlsxbook::{HandbookRow, HtmlOptions, OutputKind, PublisherBuilder, SheetSelector, TocEntry};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// One handbook row: (OrderID, SectionHeader, SectionID, HeaderText, BodyText)
    pub type Row<'a> = (i64, bool, i64, &'a str, Option<&'a str>);

    pub const HEADER: [&str; 5] = ["OrderID", "SectionHeader", "SectionID", "HeaderText", "BodyText"];

    /// Generate a handbook export with the standard five columns
    pub fn generate_handbook(rows: &[Row]) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("tblHandbook")?;
        write_rows(worksheet, rows)?;
        Ok(workbook.save_to_buffer()?)
    }

    pub fn write_rows(worksheet: &mut Worksheet, rows: &[Row]) -> Result<(), XlsxError> {
        for (col, name) in HEADER.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name)?;
        }

        for (idx, (order_id, section_header, section_id, header, body)) in rows.iter().enumerate() {
            let row = idx as u32 + 1;
            worksheet.write_number(row, 0, *order_id as f64)?;
            worksheet.write_boolean(row, 1, *section_header)?;
            worksheet.write_number(row, 2, *section_id as f64)?;
            worksheet.write_string(row, 3, *header)?;
            if let Some(body) = body {
                worksheet.write_string(row, 4, *body)?;
            }
        }
        Ok(())
    }

    /// The two-row example: Intro (level 1 with body) and Rules (level 3, no body)
    pub fn generate_intro_rules() -> Result<Vec<u8>, XlsxError> {
        generate_handbook(&[
            (1, true, 0, "Intro", Some("Hello\r\n")),
            (2, false, 0, "Rules", None),
        ])
    }

    /// Rows stored out of order (OrderID 3, 1, 2)
    pub fn generate_unsorted() -> Result<Vec<u8>, XlsxError> {
        generate_handbook(&[
            (3, false, 0, "Third", Some("body three")),
            (1, true, 0, "First", Some("body one")),
            (2, false, 7, "Second", Some("body two")),
        ])
    }

    /// A workbook whose handbook table is on the second sheet
    pub fn generate_second_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let notes = workbook.add_worksheet();
        notes.set_name("Notes")?;
        notes.write_string(0, 0, "Not a handbook")?;

        let table = workbook.add_worksheet();
        table.set_name("tblHandbook")?;
        write_rows(table, &[(1, true, 0, "Welcome", Some("From the second sheet"))])?;

        Ok(workbook.save_to_buffer()?)
    }
}

/// Read `word/document.xml` out of a DOCX package
fn document_xml(docx: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut file = archive.by_name("word/document.xml").unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{}' not found", needle))
}

#[test]
fn test_intro_rules_end_to_end() {
    let publisher = PublisherBuilder::new().build().unwrap();
    let data = fixtures::generate_intro_rules().unwrap();
    let rows = publisher.load(Cursor::new(data)).unwrap();
    assert_eq!(rows.len(), 2);

    let artifacts = publisher.render(&rows).unwrap();

    // Word: level-1 "Intro" with body "Hello", level-3 "Rules" without body
    let xml = document_xml(artifacts.docx.as_ref().unwrap());
    assert_eq!(xml.matches("w:val=\"Heading").count(), 2);
    assert!(xml.contains("w:val=\"Heading1\""));
    assert!(xml.contains("w:val=\"Heading3\""));
    assert!(xml.contains(">Hello<"));
    assert!(!xml.contains('\r'));
    let after_rules = &xml[position(&xml, ">Rules<")..];
    assert_eq!(after_rules.matches("<w:t").count(), 0);

    // HTML: two TOC entries indented 0px and 40px, two sections, no <p> in the second
    let html = artifacts.html.as_ref().unwrap();
    assert_eq!(html.matches("<li data-search=").count(), 2);
    assert!(html.contains("margin-left: 0px;"));
    assert!(html.contains("margin-left: 40px;"));
    let sections: Vec<&str> = html.split("<div class=\"section\">").skip(1).collect();
    assert_eq!(sections.len(), 2);
    assert!(sections[0].contains("<p>Hello\n</p>"));
    let second = &sections[1][..position(sections[1], "</div>")];
    assert!(second.contains("<h3 id=\"rules\">Rules</h3>"));
    assert!(!second.contains("<p>"));

    // PDF
    assert!(artifacts.pdf.as_ref().unwrap().starts_with(b"%PDF"));
}

#[test]
fn test_rows_are_processed_in_order_id_order() {
    let publisher = PublisherBuilder::new().build().unwrap();
    let data = fixtures::generate_unsorted().unwrap();
    let rows = publisher.load(Cursor::new(data)).unwrap();

    // load keeps input order; sorting happens during rendering
    let loaded: Vec<Option<i64>> = rows.iter().map(|r| r.order_id).collect();
    assert_eq!(loaded, vec![Some(3), Some(1), Some(2)]);

    let prepared: Vec<String> = publisher
        .prepare(&rows)
        .into_iter()
        .map(|r| r.header_text)
        .collect();
    assert_eq!(prepared, vec!["First", "Second", "Third"]);

    let artifacts = publisher.render(&rows).unwrap();

    let xml = document_xml(artifacts.docx.as_ref().unwrap());
    assert!(position(&xml, ">First<") < position(&xml, ">Second<"));
    assert!(position(&xml, ">Second<") < position(&xml, ">Third<"));

    let html = artifacts.html.unwrap();
    let content = &html[position(&html, "<div class=\"section\">")..];
    assert!(position(content, "id=\"first\"") < position(content, "id=\"second\""));
    assert!(position(content, "id=\"second\"") < position(content, "id=\"third\""));
    assert!(content.contains("<h2 id=\"second\">Second</h2>"));
}

#[test]
fn test_toc_search_filter() {
    let publisher = PublisherBuilder::new().build().unwrap();
    let rows = vec![
        HandbookRow::new(1, true, 0, "Intro", None),
        HandbookRow::new(2, false, 0, "Rules", None),
    ];
    let toc: Vec<TocEntry> = publisher.prepare(&rows).iter().map(TocEntry::from_row).collect();

    let visible: Vec<&str> = toc
        .iter()
        .filter(|entry| entry.matches("rul"))
        .map(|entry| entry.display_text.as_str())
        .collect();
    assert_eq!(visible, vec!["Rules"]);

    let html = publisher.render(&rows).unwrap().html.unwrap();
    assert!(html.contains("data-search=\"intro\""));
    assert!(html.contains("data-search=\"rules\""));
    assert!(html.contains("toLowerCase()"));
    assert!(html.contains("id=\"toc-search\""));
}

#[test]
fn test_theme_toggle_and_scroll_button() {
    let publisher = PublisherBuilder::new().build().unwrap();
    let html = publisher
        .render(&[HandbookRow::new(1, true, 0, "Intro", None)])
        .unwrap()
        .html
        .unwrap();

    assert!(html.contains("id=\"theme-toggle\""));
    assert!(html.contains("let darkTheme = false;"));
    assert!(!html.contains("localStorage"));
    assert!(html.contains("id=\"top-button\""));
    assert!(html.contains("scrollTop > 400"));
}

#[test]
fn test_plain_html_variant() {
    let publisher = PublisherBuilder::new()
        .with_outputs(&[OutputKind::Html])
        .with_html_options(HtmlOptions::plain())
        .build()
        .unwrap();
    let html = publisher
        .render(&[HandbookRow::new(1, true, 0, "Intro", None)])
        .unwrap()
        .html
        .unwrap();

    assert!(!html.contains("toc-search"));
    assert!(!html.contains("theme-toggle"));
    assert!(html.contains("Table of Contents"));
}

#[test]
fn test_select_sheet_by_name() {
    let data = fixtures::generate_second_sheet().unwrap();

    let publisher = PublisherBuilder::new()
        .with_sheet_selector(SheetSelector::Name("tblHandbook".to_string()))
        .build()
        .unwrap();
    let rows = publisher.load(Cursor::new(data.clone())).unwrap();
    assert_eq!(rows.len(), 1);

    let publisher = PublisherBuilder::new()
        .with_sheet_selector(SheetSelector::Index(1))
        .build()
        .unwrap();
    assert_eq!(publisher.load(Cursor::new(data)).unwrap().len(), 1);
}

#[test]
fn test_publish_writes_three_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tblHandbook.xlsx");
    std::fs::write(&input, fixtures::generate_intro_rules().unwrap()).unwrap();

    let out_dir = dir.path().join("out");
    let publisher = PublisherBuilder::new()
        .with_title("TEW IX Handbook")
        .build()
        .unwrap();
    let report = publisher.publish(&input, &out_dir).unwrap();

    assert_eq!(report.sheet, "tblHandbook");
    assert_eq!(report.rows, 2);
    assert_eq!(
        report.written,
        vec![
            out_dir.join("handbook.docx"),
            out_dir.join("handbook.pdf"),
            out_dir.join("handbook.html"),
        ]
    );

    let html = std::fs::read_to_string(out_dir.join("handbook.html")).unwrap();
    assert!(html.contains("<title>TEW IX Handbook</title>"));
    assert!(std::fs::read(out_dir.join("handbook.pdf"))
        .unwrap()
        .starts_with(b"%PDF"));
    assert!(std::fs::read(out_dir.join("handbook.docx"))
        .unwrap()
        .starts_with(b"PK"));
}

#[test]
fn test_publish_custom_stem_and_subset() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("export.xlsx");
    std::fs::write(&input, fixtures::generate_intro_rules().unwrap()).unwrap();

    let publisher = PublisherBuilder::new()
        .with_outputs(&[OutputKind::Pdf])
        .with_output_stem("players-guide")
        .build()
        .unwrap();
    let report = publisher.publish(&input, dir.path()).unwrap();

    assert_eq!(report.written, vec![dir.path().join("players-guide.pdf")]);
    assert!(!dir.path().join("players-guide.html").exists());
    assert!(!dir.path().join("players-guide.docx").exists());
}

#[test]
fn test_custom_template_file() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("list.hbs");
    std::fs::write(
        &template,
        "<ol>{{#each rows}}<li id=\"{{anchor_id}}\">{{header_text}}</li>{{/each}}</ol>",
    )
    .unwrap();

    let publisher = PublisherBuilder::new()
        .with_outputs(&[OutputKind::Html])
        .with_html_template(&template)
        .build()
        .unwrap();
    let html = publisher
        .render(&[
            HandbookRow::new(2, false, 0, "Rules", None),
            HandbookRow::new(1, true, 0, "Intro", None),
        ])
        .unwrap()
        .html
        .unwrap();

    assert_eq!(
        html,
        "<ol><li id=\"intro\">Intro</li><li id=\"rules\">Rules</li></ol>"
    );
}

#[test]
fn test_multiline_body_keeps_line_feeds() {
    let publisher = PublisherBuilder::new()
        .with_outputs(&[OutputKind::Docx, OutputKind::Html])
        .build()
        .unwrap();
    let rows = vec![HandbookRow::new(
        1,
        true,
        0,
        "Notes",
        Some("First line\r\nSecond line"),
    )];
    let artifacts = publisher.render(&rows).unwrap();

    let html = artifacts.html.unwrap();
    assert!(html.contains("<p>First line\nSecond line</p>"));

    let xml = document_xml(artifacts.docx.as_ref().unwrap());
    assert!(xml.contains(">First line<"));
    assert!(xml.contains(">Second line<"));
    assert!(xml.contains("w:br"));
}
