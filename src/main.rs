use anyhow::Context;
use clap::{Parser, Subcommand};
use docdex::format::FormatError;
use docdex::io::{EntityType, Envelope, ExitCode, OutputFormat, ResultCode};
use docdex::{
    Encoding, Entry, PackageIndex, ResolveResult, Settings, logging, query, read_index,
    to_js_string, to_json_string, validate, write_index,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docdex")]
#[command(version)]
#[command(about = "Inspect, validate, and convert documentation package indexes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Check an index against the shape rules
    Validate {
        /// Index file (defaults to index_file from settings)
        file: Option<PathBuf>,

        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,

        /// Output the unified JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// List packages with entry counts
    Packages {
        /// Index file (defaults to index_file from settings)
        file: Option<PathBuf>,

        /// Output the unified JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate counts and the role histogram
    Stats {
        /// Index file (defaults to index_file from settings)
        file: Option<PathBuf>,

        /// Output the unified JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Look up a package or a symbol
    Lookup {
        #[command(subcommand)]
        query: LookupQuery,
    },

    /// Case-insensitive substring search over symbol names
    Search {
        /// Substring to look for
        query: String,

        /// Index file (defaults to index_file from settings)
        file: Option<PathBuf>,

        /// Maximum hits to print (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output the unified JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Re-encode an index file
    Convert {
        /// Index file to read
        input: PathBuf,

        /// Target encoding (defaults from the output extension)
        #[arg(long, value_enum)]
        to: Option<Encoding>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum LookupQuery {
    /// Entries of one package
    Package {
        /// Dotted package name
        name: String,

        /// Index file (defaults to index_file from settings)
        file: Option<PathBuf>,

        /// Output the unified JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Resolve a symbol by fully qualified or bare name
    Symbol {
        /// Symbol name
        name: String,

        /// Index file (defaults to index_file from settings)
        file: Option<PathBuf>,

        /// Output the unified JSON envelope
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // For non-init commands, check if the workspace is initialized
    if !matches!(cli.command, Commands::Init { .. }) {
        if let Err(warning) = Settings::check_init() {
            eprintln!("Warning: {warning}");
            eprintln!("Using default configuration for now.");
        }
    }

    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        Settings::default()
    });

    logging::init_with_config(&settings.logging);

    let exit = match cli.command {
        Commands::Init { force } => run_init(force),
        Commands::Validate { file, strict, json } => {
            let strict = strict || settings.validation.strict;
            run_validate(&index_file(file, &settings), strict, OutputFormat::from_json_flag(json))
        }
        Commands::Packages { file, json } => {
            run_packages(&index_file(file, &settings), OutputFormat::from_json_flag(json))
        }
        Commands::Stats { file, json } => {
            run_stats(&index_file(file, &settings), OutputFormat::from_json_flag(json))
        }
        Commands::Lookup { query } => match query {
            LookupQuery::Package { name, file, json } => run_lookup_package(
                &index_file(file, &settings),
                &name,
                OutputFormat::from_json_flag(json),
            ),
            LookupQuery::Symbol { name, file, json } => run_lookup_symbol(
                &index_file(file, &settings),
                &name,
                OutputFormat::from_json_flag(json),
            ),
        },
        Commands::Search { query, file, limit, json } => run_search(
            &index_file(file, &settings),
            &query,
            limit.unwrap_or(settings.output.search_limit),
            OutputFormat::from_json_flag(json),
        ),
        Commands::Convert { input, to, output } => run_convert(&input, to, output.as_deref()),
        Commands::Config => run_config(&settings),
    };

    std::process::exit(exit.code());
}

/// Pick the index file: explicit argument over configuration.
fn index_file(file: Option<PathBuf>, settings: &Settings) -> PathBuf {
    file.unwrap_or_else(|| settings.index_file.clone())
}

/// Result/exit code pairing for a format error.
fn format_error_codes(error: &FormatError) -> (ResultCode, ExitCode) {
    match error {
        FormatError::FileRead { .. } | FormatError::FileWrite { .. } => {
            (ResultCode::IndexError, ExitCode::GeneralError)
        }
        FormatError::Empty
        | FormatError::UnexpectedInput { .. }
        | FormatError::MissingEquals
        | FormatError::Json(_) => (ResultCode::ParseError, ExitCode::ParseError),
    }
}

/// Load an index, reporting failures in the requested output format.
fn load_index(path: &Path, format: OutputFormat) -> Result<PackageIndex, ExitCode> {
    read_index(path).map_err(|e| {
        let (code, exit) = format_error_codes(&e);
        if format.is_json() {
            let mut envelope: Envelope<()> = Envelope::error(code, e.to_string());
            if let Some(suggestion) = e.suggestion() {
                envelope = envelope.with_error_details(docdex::io::ErrorDetails {
                    suggestions: vec![suggestion.to_string()],
                    context: None,
                });
            }
            println!("{}", envelope.to_json().expect("envelope serialization"));
        } else {
            eprintln!("Error: {e}");
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {suggestion}");
            }
        }
        exit
    })
}

fn run_init(force: bool) -> ExitCode {
    match Settings::init_config_file(force) {
        Ok(path) => {
            println!("Edit {} to point index_file at your generated index.", path.display());
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::GeneralError
        }
    }
}

fn run_validate(path: &Path, strict: bool, format: OutputFormat) -> ExitCode {
    let index = match load_index(path, format) {
        Ok(index) => index,
        Err(exit) => return exit,
    };

    let report = validate::validate(&index);
    let passed = report.passed(strict);
    let summary = format!(
        "Checked {} packages, {} entries: {} errors, {} warnings",
        index.package_count(),
        index.entry_count(),
        report.error_count(),
        report.warning_count(),
    );

    if format.is_json() {
        let count = report.diagnostics.len();
        let envelope = if passed {
            Envelope::success(report).with_message(summary)
        } else {
            Envelope::error(ResultCode::ValidationError, summary).with_data(report)
        };
        let envelope = envelope
            .with_entity_type(EntityType::ValidationReport)
            .with_count(count);
        println!("{}", envelope.to_json().expect("envelope serialization"));
    } else {
        for diagnostic in &report.diagnostics {
            eprintln!("{diagnostic}");
        }
        println!("{summary}");
    }

    if passed {
        ExitCode::Success
    } else {
        ExitCode::ValidationFailed
    }
}

#[derive(Serialize)]
struct PackageSummary<'a> {
    name: &'a str,
    entries: usize,
}

fn run_packages(path: &Path, format: OutputFormat) -> ExitCode {
    let index = match load_index(path, format) {
        Ok(index) => index,
        Err(exit) => return exit,
    };

    let summaries: Vec<PackageSummary<'_>> = index
        .packages()
        .map(|(name, entries)| PackageSummary {
            name,
            entries: entries.len(),
        })
        .collect();

    if format.is_json() {
        let envelope = Envelope::success(&summaries)
            .with_entity_type(EntityType::Package)
            .with_count(summaries.len())
            .with_message(format!("Found {} packages", summaries.len()));
        println!("{}", envelope.to_json().expect("envelope serialization"));
    } else {
        let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for summary in &summaries {
            println!("{:width$}  {}", summary.name, summary.entries);
        }
        println!(
            "{} packages, {} entries",
            index.package_count(),
            index.entry_count()
        );
    }
    ExitCode::Success
}

fn run_stats(path: &Path, format: OutputFormat) -> ExitCode {
    let index = match load_index(path, format) {
        Ok(index) => index,
        Err(exit) => return exit,
    };

    let stats = index.stats();
    if format.is_json() {
        let envelope = Envelope::success(&stats)
            .with_entity_type(EntityType::Stats)
            .with_message(format!(
                "{} packages, {} entries, {} pages",
                stats.packages, stats.entries, stats.pages
            ));
        println!("{}", envelope.to_json().expect("envelope serialization"));
    } else {
        println!("Packages: {}", stats.packages);
        println!("Entries:  {}", stats.entries);
        println!("Pages:    {}", stats.pages);
        for (role, count) in &stats.roles {
            println!("  {role:10}  {count}");
        }
    }
    ExitCode::Success
}

fn run_lookup_package(path: &Path, name: &str, format: OutputFormat) -> ExitCode {
    let index = match load_index(path, format) {
        Ok(index) => index,
        Err(exit) => return exit,
    };

    let Some(entries) = index.get(name) else {
        if format.is_json() {
            let envelope: Envelope<()> =
                Envelope::not_found(format!("No package named '{name}'"))
                    .with_entity_type(EntityType::Package)
                    .with_query(name)
                    .with_hint("Use docdex packages to list package names");
            println!("{}", envelope.to_json().expect("envelope serialization"));
        } else {
            eprintln!("Not found: '{name}'");
        }
        return ExitCode::NotFound;
    };

    if format.is_json() {
        let envelope = Envelope::success(entries)
            .with_entity_type(EntityType::Entry)
            .with_count(entries.len())
            .with_query(name)
            .with_message(format!("Package '{name}' has {} entries", entries.len()));
        println!("{}", envelope.to_json().expect("envelope serialization"));
    } else {
        for entry in entries {
            print_entry(entry);
        }
    }
    ExitCode::Success
}

fn run_lookup_symbol(path: &Path, name: &str, format: OutputFormat) -> ExitCode {
    let index = match load_index(path, format) {
        Ok(index) => index,
        Err(exit) => return exit,
    };

    match query::resolve_symbol(&index, name) {
        ResolveResult::Found(hit) => {
            if format.is_json() {
                let envelope = Envelope::success(&hit)
                    .with_entity_type(EntityType::Entry)
                    .with_count(1)
                    .with_query(name);
                println!("{}", envelope.to_json().expect("envelope serialization"));
            } else {
                println!("{} (in {})", hit.entry.name(), hit.package);
                for (role, page) in hit.entry.roles() {
                    println!("  {role:10}  {page}");
                }
            }
            ExitCode::Success
        }
        ResolveResult::Ambiguous(hits) => {
            if format.is_json() {
                let envelope = Envelope::success(&hits)
                    .with_entity_type(EntityType::Entry)
                    .with_count(hits.len())
                    .with_query(name)
                    .with_message(format!("Ambiguous symbol '{name}' ({} matches)", hits.len()));
                println!("{}", envelope.to_json().expect("envelope serialization"));
            } else {
                println!("Ambiguous symbol '{name}' ({} matches):", hits.len());
                for hit in &hits {
                    println!("  {}", hit.entry.name());
                }
            }
            ExitCode::Success
        }
        ResolveResult::NotFound => {
            if format.is_json() {
                let envelope: Envelope<()> =
                    Envelope::not_found(format!("No symbol found for '{name}'"))
                        .with_entity_type(EntityType::Entry)
                        .with_query(name)
                        .with_hint(format!("Try docdex search {name}"));
                println!("{}", envelope.to_json().expect("envelope serialization"));
            } else {
                eprintln!("Not found: '{name}'");
            }
            ExitCode::NotFound
        }
    }
}

fn run_search(path: &Path, needle: &str, limit: usize, format: OutputFormat) -> ExitCode {
    let index = match load_index(path, format) {
        Ok(index) => index,
        Err(exit) => return exit,
    };

    let results = query::search(&index, needle, limit);
    if results.hits.is_empty() {
        if format.is_json() {
            let envelope: Envelope<()> =
                Envelope::not_found(format!("No entries match '{needle}'"))
                    .with_entity_type(EntityType::SearchResult)
                    .with_query(needle);
            println!("{}", envelope.to_json().expect("envelope serialization"));
        } else {
            eprintln!("No matches for '{needle}'");
        }
        return ExitCode::NotFound;
    }

    if format.is_json() {
        let envelope = Envelope::success(&results.hits)
            .with_entity_type(EntityType::SearchResult)
            .with_count(results.hits.len())
            .with_query(needle)
            .with_truncated(results.truncated);
        println!("{}", envelope.to_json().expect("envelope serialization"));
    } else {
        for hit in &results.hits {
            println!("{} (in {})", hit.entry.name(), hit.package);
        }
        if results.truncated {
            println!("... truncated at {limit} hits, raise with --limit");
        }
    }
    ExitCode::Success
}

fn run_convert(input: &Path, to: Option<Encoding>, output: Option<&Path>) -> ExitCode {
    let index = match load_index(input, OutputFormat::Text) {
        Ok(index) => index,
        Err(exit) => return exit,
    };

    let encoding =
        to.unwrap_or_else(|| output.map(Encoding::from_path).unwrap_or(Encoding::Js));

    let result = match output {
        Some(path) => write_index(&index, path, encoding).map(|()| {
            println!(
                "Wrote {} packages ({} entries) to {}",
                index.package_count(),
                index.entry_count(),
                path.display()
            );
        }),
        None => {
            let rendered = match encoding {
                Encoding::Js => to_js_string(&index),
                Encoding::Json => to_json_string(&index),
            };
            rendered.map(|text| println!("{text}"))
        }
    };

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {e}");
            format_error_codes(&e).1
        }
    }
}

fn run_config(settings: &Settings) -> ExitCode {
    match render_config(settings) {
        Ok(rendered) => {
            print!("{rendered}");
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::GeneralError
        }
    }
}

fn render_config(settings: &Settings) -> anyhow::Result<String> {
    toml::to_string_pretty(settings).context("cannot render settings as TOML")
}

fn print_entry(entry: &Entry) {
    println!("{}", entry.name());
    for (role, page) in entry.roles() {
        println!("  {role:10}  {page}");
    }
}
