use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use alpinefmt_lib::beautifier::{Beautifier, ExternalBeautifier};
use alpinefmt_lib::config::{self, Config, OnError};
use alpinefmt_lib::exit_codes::exit;
use alpinefmt_lib::file_processor::{self, BatchSummary, DiscoveryOptions, FormatMode};
use alpinefmt_lib::format_alpine;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Format Alpine.js directive expressions in HTML and Jinja templates",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Format directive expressions in template files
    Format(FormatArgs),
    /// Create a default .alpinefmt.toml in the current directory
    Init,
}

#[derive(Args)]
struct FormatArgs {
    /// Files or directories to format
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Don't write files, exit with 1 if any file would be reformatted
    #[arg(long)]
    check: bool,

    /// Read a template from stdin and write the result to stdout
    #[arg(long)]
    stdin: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore all configuration files and use defaults
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// Exclude specific files or directories (comma-separated glob patterns)
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Respect .gitignore files when scanning directories (does not apply to explicitly provided paths)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    respect_gitignore: Option<bool>,

    /// Beautifier tool to use (built-in or defined under [tools])
    #[arg(long)]
    beautifier: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init => run_init(cli.quiet),
        Commands::Format(args) => run_format(&args, cli.quiet),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    // RUST_LOG, when set, takes precedence over the flag
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "Error".red().bold(), message);
    exit::tool_error();
}

fn run_init(quiet: bool) -> ! {
    let path = Path::new(".alpinefmt.toml");

    if let Err(e) = config::create_default_config(path) {
        fail(e);
    }

    if !quiet {
        println!("Created default configuration file: {}", path.display());
    }
    exit::success();
}

fn apply_cli_overrides(config: &mut Config, args: &FormatArgs) {
    config.exclude.extend(args.exclude.iter().cloned());

    if let Some(respect) = args.respect_gitignore {
        config.respect_gitignore = respect;
    }

    if let Some(tool) = &args.beautifier {
        config.beautifier.tool = tool.clone();
    }
}

fn run_format(args: &FormatArgs, quiet: bool) -> ! {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => fail(format!("Failed to determine current directory: {e}")),
    };

    let (mut config, config_path) = match config::load_config(args.config.as_deref(), args.no_config, &cwd) {
        Ok(loaded) => loaded,
        Err(e) => fail(e),
    };
    if let Some(path) = &config_path {
        log::debug!("[alpinefmt] Using config file: {}", path.display());
    }
    apply_cli_overrides(&mut config, args);

    let beautifier = match ExternalBeautifier::from_config(&config.beautifier, &config.tools) {
        Ok(beautifier) => beautifier,
        Err(e) => fail(e),
    };
    if let Err(e) = beautifier.ensure_available() {
        fail(e);
    }

    if args.stdin {
        format_stdin(&beautifier, args.check);
    }

    let files = match file_processor::find_template_files(&args.paths, &DiscoveryOptions::from(&config)) {
        Ok(files) => files,
        Err(e) => fail(e),
    };

    if files.is_empty() {
        if !quiet {
            println!("No template files found");
        }
        exit::success();
    }

    let mode = if args.check {
        FormatMode::Check
    } else {
        FormatMode::Write
    };

    let summary = match file_processor::process_files(&files, &beautifier, mode, config.on_error) {
        Ok(summary) => summary,
        Err(e) => fail(e),
    };

    if config.on_error == OnError::Warn {
        for (_, e) in &summary.skipped {
            eprintln!("{}: {e}", "Warning".yellow().bold());
        }
    }

    if !quiet {
        print_summary(&summary);
    }

    if args.check && !summary.would_reformat.is_empty() {
        exit::changes_needed();
    }
    exit::success();
}

fn format_stdin(beautifier: &dyn Beautifier, check: bool) -> ! {
    let mut content = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut content) {
        fail(format!("Failed to read from stdin: {e}"));
    }

    let formatted = match format_alpine(&content, beautifier) {
        Ok(formatted) => formatted,
        Err(e) => fail(format!("<stdin>: {e}")),
    };

    if check {
        if formatted != content {
            exit::changes_needed();
        }
        exit::success();
    }

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(formatted.as_bytes()).and_then(|()| stdout.flush()) {
        fail(format!("Failed to write to stdout: {e}"));
    }
    exit::success();
}

fn print_summary(summary: &BatchSummary) {
    for path in &summary.would_reformat {
        println!("{} {}", "Would reformat:".yellow().bold(), path.display());
    }
    for path in &summary.formatted {
        println!("{} {}", "Reformatted:".green().bold(), path.display());
    }

    let unchanged = summary.processed - summary.changed() - summary.skipped.len();
    let verb = if summary.would_reformat.is_empty() {
        "reformatted"
    } else {
        "would be reformatted"
    };

    let mut parts = vec![format!("{} {verb}", plural(summary.changed(), "file"))];
    if unchanged > 0 {
        parts.push(format!("{} left unchanged", plural(unchanged, "file")));
    }
    if !summary.skipped.is_empty() {
        parts.push(format!("{} skipped", plural(summary.skipped.len(), "file")));
    }

    println!("{}", parts.join(", "));
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
