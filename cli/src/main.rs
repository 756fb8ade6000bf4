//! mdstudio CLI - markdown export and writing assistant

mod assistant;
#[cfg(test)]
mod test_server;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use mdstudio::settings::validate_api_key;
use mdstudio::{
    insert_at_cursor, AdvancePolicy, DrawInstruction, ExportOptions, ExporterRegistry, FontFamily,
    LayoutOptions, LayoutStats, PageSize, RecordingSurface, Settings, SettingsStore,
};

use assistant::{conversation, extract_article, AssistantClient, AssistantError, Message, API_URL};

#[derive(Parser)]
#[command(name = "mdstudio")]
#[command(author = "mdstudio contributors")]
#[command(version)]
#[command(about = "Export markdown to PDF and HTML, with a writing assistant", long_about = None)]
struct Cli {
    /// Settings file
    #[arg(long, global = true, value_name = "PATH", env = "MDSTUDIO_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export markdown to PDF
    Pdf {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <stem>.pdf in the current directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Export markdown to a standalone HTML page
    Html {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page title (defaults to the file stem)
        #[arg(long)]
        title: Option<String>,
    },

    /// Copy markdown source to a .md file
    #[command(alias = "md")]
    Markdown {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export markdown to all formats (PDF, HTML, Markdown)
    Convert {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Print the draw instructions of the PDF layout as JSON
    Layout {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Ask the writing assistant
    Ask {
        /// Question or instruction
        #[arg(value_name = "PROMPT")]
        prompt: String,

        /// Markdown file to insert the reply into
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Byte offset in FILE to insert at (appends after a blank line if omitted)
        #[arg(long, value_name = "OFFSET", requires = "file")]
        insert_at: Option<usize>,

        /// Send FILE's content along with the prompt
        #[arg(long, requires = "file")]
        with_context: bool,

        /// JSON file of earlier messages; the new turn is appended to it
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show current settings
    Show,

    /// Store and validate the assistant API key
    SetKey {
        /// API key
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Remove the stored API key
    ClearKey,

    /// Set the editor font
    SetFont {
        /// Font family name
        #[arg(value_name = "FAMILY")]
        family: String,

        /// Font size in pixels
        #[arg(long)]
        size: Option<u32>,
    },
}

#[derive(clap::Args, Clone)]
struct LayoutArgs {
    /// Font family for PDF output
    #[arg(long, value_enum, default_value = "helvetica")]
    font: FontChoice,

    /// Page size
    #[arg(long, value_enum, default_value = "a4")]
    page_size: PageChoice,

    /// Advance bold lines by the trailing gap only, as earlier releases did
    #[arg(long)]
    compatible: bool,
}

impl LayoutArgs {
    fn export_options(&self, stem: &str) -> ExportOptions {
        let policy = if self.compatible {
            AdvancePolicy::Compatible
        } else {
            AdvancePolicy::Uniform
        };
        let layout = LayoutOptions::new()
            .with_page_size(self.page_size.into())
            .with_advance_policy(policy);

        ExportOptions::new()
            .with_filename(stem)
            .with_font_family(self.font.into())
            .with_layout(layout)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FontChoice {
    /// Proportional sans-serif
    Helvetica,
    /// Monospaced
    Courier,
}

impl From<FontChoice> for FontFamily {
    fn from(choice: FontChoice) -> Self {
        match choice {
            FontChoice::Helvetica => FontFamily::Helvetica,
            FontChoice::Courier => FontFamily::Courier,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageChoice {
    /// ISO A4
    A4,
    /// US Letter
    Letter,
}

impl From<PageChoice> for PageSize {
    fn from(choice: PageChoice) -> Self {
        match choice {
            PageChoice::A4 => PageSize::A4,
            PageChoice::Letter => PageSize::Letter,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Arguments of one `ask` invocation.
struct AskRequest<'a> {
    prompt: &'a str,
    file: Option<&'a Path>,
    insert_at: Option<usize>,
    with_context: bool,
    history: Option<&'a Path>,
}

#[derive(Serialize)]
struct LayoutDump<'a> {
    stats: LayoutStats,
    instructions: &'a [DrawInstruction],
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let settings_path = cli.settings;

    let result = match cli.command {
        Some(Commands::Pdf {
            input,
            output,
            layout,
        }) => cmd_pdf(&input, output.as_deref(), &layout),
        Some(Commands::Html {
            input,
            output,
            title,
        }) => cmd_html(&input, output.as_deref(), title),
        Some(Commands::Markdown { input, output }) => cmd_markdown(&input, output.as_deref()),
        Some(Commands::Convert {
            input,
            output,
            layout,
        }) => cmd_convert(&input, output.as_deref(), &layout),
        Some(Commands::Layout {
            input,
            output,
            compact,
            layout,
        }) => cmd_layout(&input, output.as_deref(), compact, &layout),
        Some(Commands::Ask {
            prompt,
            file,
            insert_at,
            with_context,
            history,
        }) => settings_store(settings_path).and_then(|store| {
            let request = AskRequest {
                prompt: &prompt,
                file: file.as_deref(),
                insert_at,
                with_context,
                history: history.as_deref(),
            };
            cmd_ask(&store, &request, API_URL)
        }),
        Some(Commands::Settings { action }) => settings_store(settings_path)
            .and_then(|store| cmd_settings(&store, action, API_URL)),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: mdstudio <COMMAND> <FILE>".yellow());
            println!("       mdstudio --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn settings_store(path: Option<PathBuf>) -> Result<SettingsStore, Box<dyn std::error::Error>> {
    let path = match path {
        Some(path) => path,
        None => dirs::config_dir()
            .ok_or("could not determine the user config directory; pass --settings")?
            .join("mdstudio")
            .join("settings.json"),
    };
    Ok(SettingsStore::new(path))
}

fn read_input(input: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(input)
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e).into())
}

fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| mdstudio::export::DEFAULT_FILENAME.to_string())
}

fn write_or_print(output: Option<&Path>, text: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn cmd_pdf(input: &Path, output: Option<&Path>, layout: &LayoutArgs) -> CliResult {
    let content = read_input(input)?;
    let options = layout.export_options(&input_stem(input));

    let registry = ExporterRegistry::with_defaults();
    let result = registry.export(&content, "pdf", &options)?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&result.filename));
    fs::write(&path, &result.bytes)?;

    let pages = result.stats.map(|s| s.page_count).unwrap_or(1);
    println!(
        "{} {} ({} page{})",
        "Saved to".green(),
        path.display(),
        pages,
        if pages == 1 { "" } else { "s" }
    );
    Ok(())
}

fn cmd_html(input: &Path, output: Option<&Path>, title: Option<String>) -> CliResult {
    let content = read_input(input)?;
    let title = title.unwrap_or_else(|| input_stem(input));
    let html = mdstudio::to_html(&content, &title);
    write_or_print(output, &html)
}

fn cmd_markdown(input: &Path, output: Option<&Path>) -> CliResult {
    let content = read_input(input)?;
    write_or_print(output, &content)
}

fn cmd_convert(input: &Path, output: Option<&Path>, layout: &LayoutArgs) -> CliResult {
    let stem = input_stem(input);
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}_export", stem)));
    fs::create_dir_all(&output_dir)?;

    let content = read_input(input)?;
    let options = layout.export_options(&stem);
    let registry = ExporterRegistry::with_defaults();
    let formats = ["pdf", "html", "md"];

    let pb = ProgressBar::new(formats.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    let mut written = Vec::with_capacity(formats.len());
    for ext in formats {
        pb.set_message(format!("Generating {}...", ext.to_uppercase()));
        let result = registry.export(&content, ext, &options)?;
        result.save_to_dir(&output_dir)?;
        written.push(result.filename);
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, name) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    Ok(())
}

fn cmd_layout(input: &Path, output: Option<&Path>, compact: bool, layout: &LayoutArgs) -> CliResult {
    let content = read_input(input)?;
    let options = layout.export_options(&input_stem(input));

    let mut surface = RecordingSurface::with_family(options.font_family);
    let stats = mdstudio::layout_document(&content, &mut surface, &options.layout)?;

    let dump = LayoutDump {
        stats,
        instructions: surface.instructions(),
    };
    let json = if compact {
        serde_json::to_string(&dump)?
    } else {
        serde_json::to_string_pretty(&dump)?
    };
    write_or_print(output, &json)
}

fn read_history(path: &Path) -> Result<Vec<Message>, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json)
        .map_err(|e| format!("Failed to parse history {}: {}", path.display(), e).into())
}

fn start_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

fn cmd_ask(store: &SettingsStore, request: &AskRequest<'_>, api_url: &str) -> CliResult {
    let settings = store.load();
    if !settings.has_api_key() {
        return Err(AssistantError::MissingApiKey.into());
    }

    let document = request.file.map(read_input).transpose()?;
    let message = match (&document, request.with_context) {
        (Some(doc), true) => format!("{}\n\n---\n{}", request.prompt, doc),
        _ => request.prompt.to_string(),
    };
    let mut history = request
        .history
        .map(read_history)
        .transpose()?
        .unwrap_or_default();

    let client = AssistantClient::new(settings.api_key.as_str())?.with_url(api_url);
    let messages = conversation(&history, message.as_str());

    let spinner = start_spinner("Thinking...");
    let rt = tokio::runtime::Runtime::new()?;
    let reply = rt.block_on(client.send(&messages));
    spinner.finish_and_clear();
    let reply = reply?;

    if let Some(path) = request.history {
        history.push(Message::user(message));
        history.push(Message::assistant(reply.as_str()));
        fs::write(path, serde_json::to_string_pretty(&history)?)?;
        log::debug!("History now holds {} message(s)", history.len());
    }

    match (request.file, document) {
        (Some(path), Some(doc)) => match extract_article(&reply) {
            Some(article) => {
                let edit = insert_at_cursor(&doc, request.insert_at, &article);
                fs::write(path, &edit.content)?;
                println!(
                    "{} {} (cursor at {})",
                    "Inserted article into".green(),
                    path.display(),
                    edit.cursor()
                );
            }
            None => {
                println!("{}", reply);
                println!(
                    "{} {} left unchanged",
                    "No article in the reply;".yellow(),
                    path.display()
                );
            }
        },
        _ => println!("{}", reply),
    }

    Ok(())
}

fn cmd_settings(store: &SettingsStore, action: SettingsAction, api_url: &str) -> CliResult {
    match action {
        SettingsAction::Show => {
            let settings = store.load();
            print_settings(store, &settings);
        }
        SettingsAction::SetKey { key } => {
            validate_api_key(&key)?;
            let client = AssistantClient::new(key.trim())?.with_url(api_url);

            let spinner = start_spinner("Validating API key...");
            let rt = tokio::runtime::Runtime::new()?;
            let checked = rt.block_on(client.validate_key());
            spinner.finish_and_clear();
            checked?;

            let mut settings = store.load();
            settings.set_api_key(&key)?;
            settings.mark_api_key_validated();
            store.save(&settings)?;
            println!("{}", "API key validated and saved".green());
        }
        SettingsAction::ClearKey => {
            let mut settings = store.load();
            settings.clear_api_key();
            store.save(&settings)?;
            println!("{}", "API key removed".green());
        }
        SettingsAction::SetFont { family, size } => {
            let family = family.trim();
            if family.is_empty() {
                return Err("font family must not be empty".into());
            }
            let mut settings = store.load();
            settings.font_family = family.to_string();
            if let Some(size) = size {
                settings.font_size = size;
            }
            store.save(&settings)?;
            println!(
                "{} {} {}px",
                "Font set to".green(),
                settings.font_family,
                settings.font_size
            );
        }
    }
    Ok(())
}

fn print_settings(store: &SettingsStore, settings: &Settings) {
    println!("{}", "Settings".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), store.path().display());

    let key = if settings.api_key.is_empty() {
        "(not set)".dimmed().to_string()
    } else {
        settings.masked_api_key()
    };
    println!("{}: {}", "API key".bold(), key);
    println!(
        "{}: {}",
        "Validated".bold(),
        if settings.api_key_validated { "Yes" } else { "No" }
    );
    println!("{}: {}", "Font family".bold(), settings.font_family);
    println!("{}: {}px", "Font size".bold(), settings.font_size);
}

fn cmd_version() {
    println!("{} {}", "mdstudio".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown export and writing assistant");
    println!();
    println!("License: MIT");
}
