//! md2pdf – command-line Markdown → PDF converter.
//!
//! Usage:
//!   md2pdf [input.md] [output.pdf] [--title "My Report"] [--landscape]
//!
//! The input defaults to `document.md` in the working directory and the
//! output to the input path with a `.pdf` extension.
//!
//! Exit status: 0 success, 2 input missing, 3 renderer or font unavailable,
//! 4 conversion failed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use md2pdf::fonts::FontChoice;
use md2pdf::pipeline::{self, PageOrientation, PipelineConfig, DEFAULT_INPUT};
use md2pdf::style::{parse_points, ParagraphStyle};
use md2pdf::Md2PdfError;

#[derive(Parser, Debug)]
#[command(name = "md2pdf", version, about = "Convert a Markdown file to PDF")]
struct Cli {
    /// Markdown file to convert
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output path (default: input path with a .pdf extension)
    output: Option<PathBuf>,

    /// Document title in PDF metadata (default: input filename stem)
    #[arg(short, long)]
    title: Option<String>,

    /// Use landscape page orientation
    #[arg(short, long)]
    landscape: bool,

    /// TrueType font to embed; failing to load it is fatal
    #[arg(long, env = "MD2PDF_FONT")]
    font: Option<PathBuf>,

    /// Use the built-in Helvetica (overrides --font)
    #[arg(long)]
    builtin_font: bool,

    /// Body font size in points
    #[arg(long, value_name = "PT", value_parser = parse_points)]
    font_size: Option<f32>,

    /// Line height in points
    #[arg(long, value_name = "PT", value_parser = parse_points)]
    leading: Option<f32>,

    /// Also write the page layout as JSON
    #[arg(long, value_name = "PATH")]
    layout_json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        // Default title: stem of the input filename.
        let title = self.title.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("md2pdf output")
                .to_string()
        });

        let font = match (&self.font, self.builtin_font) {
            (_, true) => FontChoice::Builtin,
            (Some(path), false) => FontChoice::File(path.clone()),
            (None, false) => FontChoice::Discover,
        };

        let style = match self.font_size {
            Some(size) => ParagraphStyle::with_size(size, self.leading),
            None => ParagraphStyle {
                leading: self.leading.unwrap_or(ParagraphStyle::default().leading),
                ..ParagraphStyle::default()
            },
        };

        PipelineConfig {
            title,
            orientation: if self.landscape {
                PageOrientation::Landscape
            } else {
                PageOrientation::Portrait
            },
            style,
            font,
            ..PipelineConfig::default()
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> Result<PathBuf, Md2PdfError> {
    // Read first: a missing input is reported before any font problem.
    let markdown = pipeline::read_input(&cli.input)?;

    let config = cli.pipeline_config();
    let fonts = pipeline::prepare_fonts(&config)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| pipeline::default_output_path(&cli.input));
    let (bytes, layout) = pipeline::convert(&markdown, &config, &fonts)?;
    pipeline::write_output(&output, &bytes)?;
    log::info!(
        "Wrote '{}' ({} bytes, {} page(s))",
        output.display(),
        bytes.len(),
        layout.pages.len()
    );

    if let Some(json_path) = &cli.layout_json {
        pipeline::write_output(json_path, layout.to_json()?.as_bytes())?;
    }
    Ok(output)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            println!("SUCCESS: PDF written to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
