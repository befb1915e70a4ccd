//! xlsxbook command-line tool
//!
//! ハンドブックのExcelエクスポートをDOCX / PDF / HTMLに変換します。
//!
//! ```text
//! xlsxbook tblHandbook.xlsx -o out --title "TEW IX Handbook"
//! xlsxbook tblHandbook.xlsx --only html --no-theme-toggle
//! RUST_LOG=debug xlsxbook tblHandbook.xlsx
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use xlsxbook::{HandbookError, HtmlOptions, OutputKind, PublishReport, PublisherBuilder, SheetSelector};

#[derive(Parser, Debug)]
#[command(
    name = "xlsxbook",
    version,
    about = "Render a handbook spreadsheet export to DOCX, PDF and searchable HTML"
)]
struct Cli {
    /// Input workbook (xlsx, xlsm, xlsb, xls or ods)
    input: PathBuf,

    /// Directory the output files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Document title (PDF banner, HTML title and heading)
    #[arg(long, default_value = "Handbook")]
    title: String,

    /// Sheet to read, by name
    #[arg(long, conflicts_with = "sheet_index")]
    sheet: Option<String>,

    /// Sheet to read, by 0-based index
    #[arg(long)]
    sheet_index: Option<usize>,

    /// Output file name without extension
    #[arg(long, default_value = "handbook")]
    stem: String,

    /// Only produce these formats (comma separated: docx,pdf,html)
    #[arg(long, value_delimiter = ',')]
    only: Vec<OutputKind>,

    /// Leave the table-of-contents search box out of the HTML page
    #[arg(long)]
    no_search: bool,

    /// Leave the light/dark theme toggle out of the HTML page
    #[arg(long)]
    no_theme_toggle: bool,

    /// Handlebars template used instead of the built-in HTML page
    #[arg(long)]
    template: Option<PathBuf>,

    /// Keep duplicate heading anchors instead of numbering them
    #[arg(long)]
    keep_duplicate_anchors: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(report) => {
            for path in &report.written {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<PublishReport, HandbookError> {
    let sheet_selector = match (cli.sheet, cli.sheet_index) {
        (Some(name), _) => SheetSelector::Name(name),
        (None, Some(index)) => SheetSelector::Index(index),
        (None, None) => SheetSelector::First,
    };

    let outputs = if cli.only.is_empty() {
        OutputKind::ALL.to_vec()
    } else {
        cli.only
    };

    let mut builder = PublisherBuilder::new()
        .with_title(cli.title)
        .with_sheet_selector(sheet_selector)
        .with_outputs(&outputs)
        .with_output_stem(cli.stem)
        .with_html_options(HtmlOptions {
            include_search_box: !cli.no_search,
            include_theme_toggle: !cli.no_theme_toggle,
        })
        .with_unique_anchors(!cli.keep_duplicate_anchors);

    if let Some(template) = cli.template {
        builder = builder.with_html_template(template);
    }

    let report = builder.build()?.publish(&cli.input, &cli.out_dir)?;
    log::info!(
        "Published {} rows from sheet '{}' ({} files)",
        report.rows,
        report.sheet,
        report.written.len()
    );
    Ok(report)
}
