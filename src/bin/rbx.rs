//! richblocks CLI - Inspect and edit block-aware Markdown documents

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use richblocks::{
    diagnostics::{check_document, format_diagnostics},
    embed_html, normalize_table, segment_document,
    table::{apply_to_html, ColumnEdge, RowEdge, TableOp},
    EditorOptions,
};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read};
#[cfg(feature = "cli")]
use tracing::debug;

/// Longest preview shown per segment in the listing
#[cfg(feature = "cli")]
const PREVIEW_LEN: usize = 48;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "rbx")]
#[command(version)]
#[command(about = "richblocks - Block-aware editing for Markdown with HTML tables and embeds", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct InputArg {
    /// Input file path (reads from stdin if not provided)
    input: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// List the segments of a document
    Segments {
        #[command(flatten)]
        file: InputArg,

        /// Print segments as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report markup that will render as plain text
    Check {
        #[command(flatten)]
        file: InputArg,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Edit a table fragment and print the new HTML
    Table {
        #[command(subcommand)]
        op: TableCommand,
    },

    /// Print the embed HTML for a pasted YouTube or Google Drive URL
    Embed {
        /// Share URL
        url: String,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum TableCommand {
    /// Add an empty row
    AddRow {
        #[arg(long, value_enum, default_value_t = RowEdgeArg::Bottom)]
        edge: RowEdgeArg,
        #[command(flatten)]
        file: InputArg,
    },
    /// Add an empty column
    AddCol {
        #[arg(long, value_enum, default_value_t = ColumnEdgeArg::Right)]
        edge: ColumnEdgeArg,
        #[command(flatten)]
        file: InputArg,
    },
    /// Delete row N
    DelRow {
        index: usize,
        #[command(flatten)]
        file: InputArg,
    },
    /// Delete column N
    DelCol {
        index: usize,
        #[command(flatten)]
        file: InputArg,
    },
    /// Move a row so it ends up at TO
    MoveRow {
        from: usize,
        to: usize,
        #[command(flatten)]
        file: InputArg,
    },
    /// Grow or shrink a column by DX pixels
    Resize {
        column: usize,
        #[arg(allow_negative_numbers = true)]
        dx: f64,
        #[command(flatten)]
        file: InputArg,
    },
    /// Replace one cell's content
    SetCell {
        row: usize,
        column: usize,
        text: String,
        #[command(flatten)]
        file: InputArg,
    },
    /// Rewrite the table in canonical form
    Normalize {
        #[command(flatten)]
        file: InputArg,
    },
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum RowEdgeArg {
    Top,
    Bottom,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum ColumnEdgeArg {
    Left,
    Right,
}

#[cfg(feature = "cli")]
impl TableCommand {
    /// The op to apply, or `None` for a plain normalization
    fn into_op(self) -> (Option<TableOp>, InputArg) {
        match self {
            TableCommand::AddRow { edge, file } => {
                let edge = match edge {
                    RowEdgeArg::Top => RowEdge::Top,
                    RowEdgeArg::Bottom => RowEdge::Bottom,
                };
                (Some(TableOp::AddRow { edge }), file)
            }
            TableCommand::AddCol { edge, file } => {
                let edge = match edge {
                    ColumnEdgeArg::Left => ColumnEdge::Left,
                    ColumnEdgeArg::Right => ColumnEdge::Right,
                };
                (Some(TableOp::AddColumn { edge }), file)
            }
            TableCommand::DelRow { index, file } => (Some(TableOp::DeleteRow { index }), file),
            TableCommand::DelCol { index, file } => (Some(TableOp::DeleteColumn { index }), file),
            TableCommand::MoveRow { from, to, file } => (Some(TableOp::MoveRow { from, to }), file),
            TableCommand::Resize { column, dx, file } => (
                Some(TableOp::ResizeColumn { column, delta: dx }),
                file,
            ),
            TableCommand::SetCell {
                row,
                column,
                text,
                file,
            } => (
                Some(TableOp::SetCell {
                    row,
                    column,
                    content: text,
                }),
                file,
            ),
            TableCommand::Normalize { file } => (None, file),
        }
    }
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = EditorOptions::default();
    let output = cli.output.as_deref();

    match cli.command {
        Commands::Segments { file, json } => {
            let input = read_input(&file)?;
            let segments = segment_document(&input);
            let text = if json {
                serde_json::to_string_pretty(segments.segments()).map_err(io::Error::other)?
            } else {
                segments
                    .iter()
                    .map(|s| {
                        format!(
                            "{:>3}  {:<8} {:>6}..{:<6} {}",
                            s.index,
                            s.kind.as_str(),
                            s.span.start,
                            s.span.end,
                            preview(&s.raw)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            write_output(output, &text)?;
        }

        Commands::Check { file, no_color } => {
            let input = read_input(&file)?;
            let result = check_document(&input);
            let report = format_diagnostics(&result, !no_color && output.is_none());
            write_output(output, &report)?;
            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Table { op } => {
            let (op, file) = op.into_op();
            let input = read_input(&file)?;
            let html = match &op {
                Some(op) => {
                    debug!(?op, "applying table op");
                    apply_to_html(&input, op, &options).map_err(|e| e.to_string())
                }
                None => normalize_table(&input, &options).ok_or_else(|| "No table found in input".to_string()),
            };
            match html {
                Ok(html) => write_output(output, &html)?,
                Err(message) => {
                    eprintln!("Error: {}", message);
                    std::process::exit(1);
                }
            }
        }

        Commands::Embed { url } => match embed_html(&url) {
            Ok(html) => write_output(output, &html)?,
            Err(e) => {
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        },

        Commands::Info => {
            println!("richblocks - Block-aware editing for Markdown with HTML tables and embeds");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Recognized blocks:");
            println!("  ✓ HTML tables (thead/tbody, th/td, column widths)");
            println!("  ✓ YouTube embeds (youtube.com/embed/ID)");
            println!("  ✓ PDF embeds (drive.google.com/file/d/ID/preview)");
            println!();
            println!("Table ops:");
            println!("  add-row, add-col, del-row, del-col, move-row, resize, set-cell, normalize");
            println!();
            println!("Defaults:");
            println!("  table class:   {}", options.table_class);
            println!("  column width:  {}px (minimum {}px)", options.default_column_width, options.min_column_width);
            println!();
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "richblocks=debug",
        _ => "richblocks=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn read_input(file: &InputArg) -> io::Result<String> {
    match file.input {
        Some(ref path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn write_output(output: Option<&str>, text: &str) -> io::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            eprintln!("✓ Output written to: {}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// One-line preview of a segment's raw text
#[cfg(feature = "cli")]
fn preview(raw: &str) -> String {
    let flat = raw.replace('\n', "\\n");
    match flat.char_indices().nth(PREVIEW_LEN) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install richblocks --features cli");
    eprintln!("  rbx <COMMAND> [OPTIONS] [INPUT_FILE]");
}
