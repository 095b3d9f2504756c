//! doc2pdf CLI - Word to PDF converter

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use doc2pdf::convert::plan_bytes;
use doc2pdf::{
    classify_path, convert_file, ConvertOptions, LayoutOptions, PageGeometry, StandardFont,
};

#[derive(Parser)]
#[command(name = "doc2pdf")]
#[command(version)]
#[command(about = "Convert Word documents (DOC and DOCX) to PDF", long_about = None)]
struct Cli {
    /// Input DOC or DOCX file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to PDF
    Convert {
        /// Input DOC or DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file (input name with .pdf if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: Settings,
    },

    /// Show the container format of a document
    Detect {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the placement commands for a document as JSON
    Layout {
        /// Input DOC or DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        settings: Settings,
    },

    /// Show version information
    Version,
}

/// Conversion settings shared by every command that converts.
#[derive(Args, Clone, Default)]
struct Settings {
    /// Page size
    #[arg(long, value_enum)]
    page_size: Option<PageSize>,

    /// Page margin in points
    #[arg(long)]
    margin: Option<f32>,

    /// Distance between text baselines in points
    #[arg(long)]
    leading: Option<f32>,

    /// Font size in points
    #[arg(long)]
    font_size: Option<f32>,

    /// First baseline, in points from the bottom of the page
    #[arg(long)]
    top: Option<f32>,

    /// Space above and below each image in points
    #[arg(long)]
    image_spacing: Option<f32>,

    /// Start a new page when text reaches the bottom margin
    #[arg(long)]
    paginate_text: bool,

    /// Text only (skip pictures)
    #[arg(long)]
    text_only: bool,

    /// Skip pictures that cannot be decoded instead of failing
    #[arg(long)]
    lenient: bool,

    /// Font for all text (helvetica, times, courier)
    #[arg(long, value_name = "NAME")]
    font: Option<StandardFont>,

    /// JSON file with layout options; flags override its values
    #[arg(long, value_name = "FILE", env = "DOC2PDF_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSize {
    /// US Letter, 612x792 points
    Letter,
    /// A4, 595x842 points
    A4,
}

impl From<PageSize> for PageGeometry {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::Letter => PageGeometry::letter(),
            PageSize::A4 => PageGeometry::a4(),
        }
    }
}

impl Settings {
    /// Merge the config file and flags into conversion options.
    fn to_options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let mut layout = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
                serde_json::from_str::<LayoutOptions>(&json)
                    .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?
            }
            None => LayoutOptions::default(),
        };

        if let Some(margin) = self.margin {
            layout = layout.with_margin(margin);
        }
        if let Some(leading) = self.leading {
            layout = layout.with_leading(leading);
        }
        if let Some(font_size) = self.font_size {
            layout = layout.with_font_size(font_size);
        }
        if let Some(top) = self.top {
            layout = layout.with_top_offset(top);
        }
        if let Some(spacing) = self.image_spacing {
            layout = layout.with_image_spacing(spacing);
        }
        if self.paginate_text {
            layout = layout.paginate_text();
        }

        let mut options = ConvertOptions::new()
            .with_layout(layout)
            .with_creation_date(chrono::Utc::now());
        if let Some(size) = self.page_size {
            options = options.with_geometry(size.into());
        }
        if let Some(font) = self.font {
            options = options.with_font(font);
        }
        if self.text_only {
            options = options.text_only();
        }
        if self.lenient {
            options = options.lenient();
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            settings,
        }) => cmd_convert(&input, output.as_deref(), &settings),
        Some(Commands::Detect { input }) => cmd_detect(&input),
        Some(Commands::Layout {
            input,
            compact,
            settings,
        }) => cmd_layout(&input, compact, &settings),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &cli.settings)
            } else {
                println!("{}", "Usage: doc2pdf <FILE> [OUTPUT]".yellow());
                println!("       doc2pdf --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Input path with its extension replaced by `pdf`.
fn default_output(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = settings.to_options()?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));
    if output == input {
        return Err(format!("Output would overwrite the input {}", input.display()).into());
    }

    let result = convert_file(input, &options)?;
    fs::write(&output, &result.pdf)?;

    println!(
        "{} {} {} {}",
        "Converted".green().bold(),
        result.kind.to_string().cyan(),
        "to".dimmed(),
        output.display()
    );
    println!(
        "  {} {} pages, {} lines, {} images",
        "├─".dimmed(),
        result.stats.pages,
        result.stats.text_lines,
        result.stats.images
    );
    if result.stats.images_skipped > 0 {
        println!(
            "  {} {}",
            "├─".dimmed(),
            format!("{} pictures skipped", result.stats.images_skipped).yellow()
        );
    }
    if result.stats.replaced_chars > 0 {
        println!(
            "  {} {}",
            "├─".dimmed(),
            format!(
                "{} characters not available in the font",
                result.stats.replaced_chars
            )
            .yellow()
        );
    }
    println!("  {} {} bytes", "└─".dimmed(), result.pdf_len());

    Ok(())
}

fn cmd_detect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let kind = classify_path(input)?;
    println!("{}: {}", "File".bold(), input.display());
    println!(
        "{}: {} ({}, .{})",
        "Format".bold(),
        kind,
        kind.description(),
        kind.extension()
    );
    Ok(())
}

fn cmd_layout(
    input: &Path,
    compact: bool,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = settings.to_options()?;
    let data = fs::read(input)?;
    let (kind, commands) = plan_bytes(&data, &options)?;
    log::info!("{} commands for {}", commands.len(), kind);

    let json = if compact {
        serde_json::to_string(&commands)?
    } else {
        serde_json::to_string_pretty(&commands)?
    };
    println!("{}", json);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "doc2pdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word (DOC/DOCX) to PDF converter");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc2pdf::TextOverflow;
    use std::io::Write;

    #[test]
    fn test_default_output() {
        assert_eq!(
            default_output(Path::new("dir/report.docx")),
            PathBuf::from("dir/report.pdf")
        );
        assert_eq!(default_output(Path::new("notes")), PathBuf::from("notes.pdf"));
    }

    #[test]
    fn test_flags_override_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"margin": 40, "leading": 14}}"#).unwrap();

        let settings = Settings {
            config: Some(file.path().to_path_buf()),
            leading: Some(16.0),
            page_size: Some(PageSize::A4),
            paginate_text: true,
            ..Default::default()
        };
        let options = settings.to_options().unwrap();

        assert_eq!(options.layout.margin, 40.0);
        assert_eq!(options.layout.leading, 16.0);
        assert_eq!(options.layout.font_size, 10.0);
        assert_eq!(options.layout.text_overflow, TextOverflow::Paginate);
        assert_eq!(options.geometry, PageGeometry::a4());
        assert!(options.creation_date.is_some());
    }

    #[test]
    fn test_bad_config_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let settings = Settings {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let err = settings.to_options().unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "doc2pdf", "layout", "in.docx", "--compact", "--page-size", "a4", "--font", "courier",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Layout {
                compact, settings, ..
            }) => {
                assert!(compact);
                assert!(settings.page_size == Some(PageSize::A4));
                assert_eq!(settings.font, Some(StandardFont::Courier));
            }
            _ => panic!("expected layout command"),
        }
    }
}
