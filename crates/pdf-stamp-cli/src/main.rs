use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use pdf_stamp::{PageDirective, RawOptions, Rotation};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfs", about = "Stamp, reorder and split PDF pages", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add page numbers
    Number {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Option bag: inline JSON or a path to a JSON file
        #[arg(long)]
        options: Option<String>,

        /// Number format
        #[arg(long, value_parser = ["1", "01", "i", "I"])]
        format: Option<String>,

        /// Label template
        #[arg(long, value_enum)]
        template: Option<TemplateArg>,

        /// Page layout
        #[arg(long, value_enum)]
        page_mode: Option<PageModeArg>,

        /// Treat the first page as a cover
        #[arg(long)]
        cover: bool,

        /// Number given to the first numbered page
        #[arg(long)]
        start_at: Option<i64>,

        /// Pages to number, e.g. "1-3,8-10"
        #[arg(long)]
        range: Option<String>,

        /// Anchor such as "bottom-center" or "top-right"
        #[arg(long)]
        position: Option<String>,

        /// Margin from the page edge in points
        #[arg(long)]
        margin: Option<f64>,

        #[command(flatten)]
        text: TextArgs,
    },

    /// Add a text or image watermark
    Watermark {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Option bag: inline JSON or a path to a JSON file
        #[arg(long)]
        options: Option<String>,

        /// Watermark text
        #[arg(long)]
        text: Option<String>,

        /// PNG or JPEG image; switches to image mode
        #[arg(long)]
        image: Option<PathBuf>,

        /// Opacity in percent
        #[arg(long)]
        opacity: Option<f64>,

        /// Rotation in degrees, counter-clockwise
        #[arg(long, allow_hyphen_values = true)]
        rotation: Option<f64>,

        /// Anchor such as "mid-center" or "bottom-right"
        #[arg(long)]
        position: Option<String>,

        /// Draw over or under the page content
        #[arg(long, value_enum)]
        layer: Option<LayerArg>,

        /// First page to watermark
        #[arg(long)]
        from: Option<i64>,

        /// Last page to watermark
        #[arg(long)]
        to: Option<i64>,

        #[command(flatten)]
        style: TextArgs,
    },

    /// Reorder, repeat, rotate and insert blank pages
    Organize {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Page sequence, e.g. "1,2@90,blank,3@180" (pages are 1-based)
        #[arg(long, required_unless_present = "directives")]
        pages: Option<String>,

        /// Directive array as inline JSON or a JSON file, e.g.
        /// [{"type": "original", "sourceIndex": 0, "rotation": 90}]
        #[arg(long, conflicts_with = "pages")]
        directives: Option<String>,
    },

    /// Split into several documents
    Split {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Option bag: inline JSON or a path to a JSON file
        #[arg(long)]
        options: Option<String>,

        /// Split mode
        #[arg(long, value_enum)]
        mode: Option<SplitModeArg>,

        /// Custom ranges, e.g. "1-3,4-10"
        #[arg(long)]
        ranges: Option<String>,

        /// Fixed chunk size; implies fixed ranges
        #[arg(long)]
        chunk_size: Option<i64>,
    },
}

/// Text style flags shared by numbering and watermarking
#[derive(clap::Args)]
struct TextArgs {
    /// Font size in points
    #[arg(long)]
    font_size: Option<f64>,

    /// Hex color such as "#336699"
    #[arg(long)]
    color: Option<String>,

    /// Font family: sans, serif or mono
    #[arg(long)]
    font_family: Option<String>,

    #[arg(long)]
    bold: bool,

    #[arg(long)]
    italic: bool,

    #[arg(long)]
    underline: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateArg {
    Number,
    PageN,
    PageNOfTotal,
}

#[derive(Clone, Copy, ValueEnum)]
enum PageModeArg {
    Single,
    Facing,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayerArg {
    Over,
    Under,
}

#[derive(Clone, Copy, ValueEnum)]
enum SplitModeArg {
    Range,
    Each,
    Half,
}

impl TemplateArg {
    fn key(self) -> &'static str {
        match self {
            TemplateArg::Number => "number",
            TemplateArg::PageN => "page_n",
            TemplateArg::PageNOfTotal => "page_n_of_total",
        }
    }
}

impl PageModeArg {
    fn key(self) -> &'static str {
        match self {
            PageModeArg::Single => "single",
            PageModeArg::Facing => "facing",
        }
    }
}

impl LayerArg {
    fn key(self) -> &'static str {
        match self {
            LayerArg::Over => "over",
            LayerArg::Under => "under",
        }
    }
}

impl SplitModeArg {
    fn key(self) -> &'static str {
        match self {
            SplitModeArg::Range => "range",
            SplitModeArg::Each => "each",
            SplitModeArg::Half => "half",
        }
    }
}

impl TextArgs {
    fn apply(&self, raw: &mut RawOptions) {
        set_opt(raw, "fontSize", self.font_size);
        set_opt(raw, "color", self.color.clone());
        set_opt(raw, "fontFamily", self.font_family.clone());
        set_flag(raw, "bold", self.bold);
        set_flag(raw, "italic", self.italic);
        set_flag(raw, "underline", self.underline);
    }
}

fn set_opt(raw: &mut RawOptions, key: &str, value: Option<impl Into<serde_json::Value>>) {
    if let Some(value) = value {
        raw.set(key, value);
    }
}

fn set_flag(raw: &mut RawOptions, key: &str, enabled: bool) {
    if enabled {
        raw.set(key, true);
    }
}

/// Inline JSON is used as is; anything else is read as a file path.
async fn read_json_arg(arg: &str) -> Result<String> {
    let trimmed = arg.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(arg.to_string());
    }
    tokio::fs::read_to_string(arg)
        .await
        .with_context(|| format!("Failed to read {}", arg))
}

/// Option bag from `--options`; typed flags are layered on top by the caller.
async fn base_options(options: Option<&str>) -> Result<RawOptions> {
    match options {
        Some(arg) => Ok(RawOptions::from_json_str(&read_json_arg(arg).await?)?),
        None => Ok(RawOptions::new()),
    }
}

/// Parse an organize sequence such as `"1,2@90,blank,3@180"`.
fn parse_page_spec(spec: &str) -> Result<Vec<PageDirective>> {
    let mut directives = Vec::new();

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (page, rotation) = match token.split_once('@') {
            Some((page, degrees)) => {
                let degrees: i64 = degrees
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid rotation in '{}'", token))?;
                let Some(rotation) = Rotation::from_degrees(degrees) else {
                    bail!("Rotation must be a multiple of 90 in '{}'", token);
                };
                (page.trim(), rotation)
            }
            None => (token, Rotation::None),
        };

        let directive = if page.eq_ignore_ascii_case("blank") {
            PageDirective::blank()
        } else {
            let number: usize = page
                .parse()
                .with_context(|| format!("Invalid page '{}'", page))?;
            if number == 0 {
                bail!("Pages are numbered from 1");
            }
            PageDirective::original(number - 1)
        };
        directives.push(directive.rotated(rotation));
    }

    Ok(directives)
}

fn split_file_name(input: &Path, interval: pdf_stamp::Interval) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    format!("{}_{}-{}.pdf", stem, interval.from, interval.to)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Number {
            input,
            output,
            options,
            format,
            template,
            page_mode,
            cover,
            start_at,
            range,
            position,
            margin,
            text,
        } => {
            let mut raw = base_options(options.as_deref()).await?;
            set_opt(&mut raw, "format", format);
            set_opt(&mut raw, "template", template.map(TemplateArg::key));
            set_opt(&mut raw, "pageMode", page_mode.map(PageModeArg::key));
            set_flag(&mut raw, "coverIsFirstPage", cover);
            set_opt(&mut raw, "startAt", start_at);
            set_opt(&mut raw, "range", range);
            set_opt(&mut raw, "position", position);
            set_opt(&mut raw, "margin", margin);
            text.apply(&mut raw);

            let options = pdf_stamp::PageNumberOptions::resolve(&raw);
            let mut doc = pdf_stamp::load_pdf(&input).await?;
            let report = pdf_stamp::add_page_numbers(&mut doc, &options)?;
            pdf_stamp::save_pdf(doc, &output).await?;
            println!(
                "Numbered {} pages → {}",
                report.stamped_pages.len(),
                output.display()
            );
        }

        Commands::Watermark {
            input,
            output,
            options,
            text,
            image,
            opacity,
            rotation,
            position,
            layer,
            from,
            to,
            style,
        } => {
            let mut raw = base_options(options.as_deref()).await?;
            set_opt(&mut raw, "text", text);
            set_opt(&mut raw, "opacity", opacity);
            set_opt(&mut raw, "rotation", rotation);
            set_opt(&mut raw, "position", position);
            set_opt(&mut raw, "layer", layer.map(LayerArg::key));
            set_opt(&mut raw, "rangeFrom", from);
            set_opt(&mut raw, "rangeTo", to);
            style.apply(&mut raw);

            let image_bytes = match &image {
                Some(path) => {
                    raw.set("mode", "image");
                    Some(
                        tokio::fs::read(path)
                            .await
                            .with_context(|| format!("Failed to read image {}", path.display()))?,
                    )
                }
                None => None,
            };

            let options = pdf_stamp::WatermarkOptions::resolve(&raw);
            let mut doc = pdf_stamp::load_pdf(&input).await?;
            let report = pdf_stamp::add_watermark(&mut doc, &options, image_bytes.as_deref())?;
            pdf_stamp::save_pdf(doc, &output).await?;
            println!(
                "Watermarked {} pages → {}",
                report.stamped_pages.len(),
                output.display()
            );
        }

        Commands::Organize {
            input,
            output,
            pages,
            directives,
        } => {
            let directives = match (pages, directives) {
                (Some(pages), _) => parse_page_spec(&pages)?,
                (None, Some(arg)) => {
                    let json = read_json_arg(&arg).await?;
                    serde_json::from_str::<Vec<PageDirective>>(&json)
                        .context("Invalid page directives")?
                }
                (None, None) => bail!("Either --pages or --directives is required"),
            };
            let source = pdf_stamp::load_pdf(&input).await?;
            let doc = pdf_stamp::build_page_sequence(&source, &directives)?;
            let count = doc.get_pages().len();
            pdf_stamp::save_pdf(doc, &output).await?;
            println!("Wrote {} pages → {}", count, output.display());
        }

        Commands::Split {
            input,
            output,
            options,
            mode,
            ranges,
            chunk_size,
        } => {
            let mut raw = base_options(options.as_deref()).await?;
            set_opt(&mut raw, "mode", mode.map(SplitModeArg::key));
            set_opt(&mut raw, "ranges", ranges);
            if let Some(chunk_size) = chunk_size {
                raw.set("rangeMode", "fixed");
                raw.set("chunkSize", chunk_size);
            }

            let options = pdf_stamp::SplitOptions::resolve(&raw);
            let doc = pdf_stamp::load_pdf(&input).await?;
            let parts = pdf_stamp::split_document(&doc, &options)?;

            tokio::fs::create_dir_all(&output)
                .await
                .with_context(|| format!("Failed to create {}", output.display()))?;
            for (interval, part) in parts {
                let path = output.join(split_file_name(&input, interval));
                pdf_stamp::save_pdf(part, &path).await?;
                println!("Pages {}-{} → {}", interval.from, interval.to, path.display());
            }
        }
    }

    Ok(())
}
