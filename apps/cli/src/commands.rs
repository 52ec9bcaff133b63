//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use paperform_core::pipeline::{
    format_document, FormatConfig, FormatResult, InputSource, ProgressReporter,
};
use paperform_model::{OpenAiClient, StubModelClient};
use paperform_shared::{
    config_file_path, expand_tilde, init_config, load_config, validate_api_key, CitationStyle,
    DocumentMetadata,
};
use paperform_styles::style_rule;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Paperform — format draft documents into academic citation styles.
#[derive(Parser)]
#[command(
    name = "paperform",
    version,
    about = "Format a draft document into MLA, APA, Chicago, Harvard, or IEEE style.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Format a document into the requested citation style.
    Format {
        /// Input document (.txt, .md, .docx, .pdf, or .rtf), or `-` for stdin.
        input: PathBuf,

        /// Citation style: mla, apa, chicago, harvard, or ieee.
        #[arg(short, long)]
        style: Option<String>,

        /// Document author for the title page.
        #[arg(long)]
        author: Option<String>,

        /// Document title for the title page.
        #[arg(long)]
        title: Option<String>,

        /// Course name for the title page.
        #[arg(long)]
        course: Option<String>,

        /// Instructor name for the title page.
        #[arg(long)]
        instructor: Option<String>,

        /// Due date for the title page.
        #[arg(long)]
        due_date: Option<String>,

        /// Output directory (defaults to the configured output_dir).
        #[arg(short, long)]
        out: Option<String>,

        /// Skip the model call and keep the body as written.
        #[arg(long)]
        offline: bool,
    },

    /// List the supported citation styles and their rules.
    Styles,

    /// Show word, sentence, and paragraph statistics for a document.
    Report {
        /// Input document (.txt, .md, .docx, .pdf, or .rtf).
        input: PathBuf,

        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "paperform=info",
        1 => "paperform=debug",
        _ => "paperform=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Format {
            input,
            style,
            author,
            title,
            course,
            instructor,
            due_date,
            out,
            offline,
        } => {
            let metadata = DocumentMetadata {
                author,
                title,
                course,
                instructor,
                due_date,
            };
            cmd_format(input, style.as_deref(), metadata, out.as_deref(), offline).await
        }
        Command::Styles => cmd_styles(),
        Command::Report { input, json } => cmd_report(&input, json),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_format(
    input: PathBuf,
    style: Option<&str>,
    metadata: DocumentMetadata,
    out: Option<&str>,
    offline: bool,
) -> Result<()> {
    let config = load_config()?;

    let style: CitationStyle = style.unwrap_or(&config.defaults.style).parse()?;

    let output_dir = match out {
        Some(p) => expand_tilde(p)?,
        None => expand_tilde(&config.defaults.output_dir)?,
    };

    let source = if input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
        InputSource::Text(buffer)
    } else {
        InputSource::Path(input.clone())
    };

    let format_config = FormatConfig {
        input: source,
        style,
        metadata,
        output_dir: Some(output_dir),
    };

    info!(input = %input.display(), %style, offline, "formatting document");

    let reporter = CliProgress::new();

    let result = if offline {
        format_document(&format_config, &StubModelClient, &reporter).await?
    } else {
        validate_api_key(&config)?;
        let client = OpenAiClient::new(&config.model)?;
        format_document(&format_config, &client, &reporter).await?
    };

    print_format_summary(&result, style);
    Ok(())
}

fn print_format_summary(result: &FormatResult, style: CitationStyle) {
    let rule = style_rule(style);

    println!();
    println!("  Document formatted successfully!");
    println!("  Style:     {}", rule.display_name);
    println!("  Citations: {}", result.citation_count);
    println!("  Words:     {}", result.word_count);
    if let Some(path) = &result.artifact_path {
        println!("  Path:      {}", path.display());
    }
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());

    if !result.document.missing.is_empty() {
        println!();
        println!("  Missing information:");
        for flag in &result.document.missing {
            println!("    - {}", flag.label);
        }
    }
    println!();
}

fn cmd_styles() -> Result<()> {
    for style in CitationStyle::ALL {
        let rule = style_rule(style);
        println!("{} ({})", rule.display_name, style);
        println!("  Margins:  {}", rule.margins);
        println!("  Spacing:  {}", rule.spacing);
        println!("  Font:     {}", rule.font);
        println!("  Header:   {}", rule.header);
        println!("  Quotes:   {}", rule.quote_rule);
        println!("  Sources:  {}", rule.works_cited_heading);
        println!();
    }
    Ok(())
}

fn cmd_report(input: &PathBuf, json: bool) -> Result<()> {
    let content = paperform_extract::load_document(input)?;
    let report = paperform_core::document_report(&content);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("  Report for {}", input.display());
    println!("  Words:        {}", report.word_count);
    println!("  Sentences:    {}", report.sentence_count);
    println!("  Paragraphs:   {}", report.paragraph_count);
    println!("  Characters:   {}", report.character_count);
    println!(
        "  Avg words/sentence: {:.1}",
        report.average_words_per_sentence
    );
    println!(
        "  Reading time: {:.1} min",
        report.reading_time_minutes
    );
    println!();
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created config file at {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let path = config_file_path()?;
    let config = load_config()?;

    println!("# resolved from {}", path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &FormatResult) {
        self.spinner.finish_and_clear();
    }
}
