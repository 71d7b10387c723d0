mod exec;
mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use compiler::{Compiled, CompileFailure, DiagnosticError};
use sxt::command::CommandRegistry;
use sxt::template::TemplateRegistry;

const SUBCOMMANDS: &[&str] = &["run", "preview", "convert", "test", "help"];

/// Parse failures exit with a distinct code so wrappers can tell a
/// broken script from a failed replay.
const EXIT_PARSE: i32 = 2;

#[derive(Parser)]
#[command(name = "tyrec", version, about = "Structured typing script compiler")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a script and replay it as paced typing
    Run(RunArgs),

    /// Show the simulated editor state a script produces
    Preview(PreviewArgs),

    /// Compile a script to the legacy escape string
    Convert(ConvertArgs),

    /// Run .test.sxt test files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Script file to compile and replay
    file: String,

    /// Title of the window to type into
    #[arg(short = 't', long, default_value = "PowerShell")]
    window_title: String,

    /// Replay with a flat minimal delay instead of typing pacing
    #[arg(long)]
    no_delay: bool,

    /// Compile only, don't replay (exit 0 if valid)
    #[arg(long)]
    check: bool,

    /// Dump the compiled event stream instead of replaying
    #[arg(long)]
    events: bool,
}

#[derive(clap::Args)]
struct PreviewArgs {
    /// Script file to compile and preview
    file: String,

    /// Replay only the first N events
    #[arg(long)]
    upto: Option<usize>,
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Script file to convert
    file: String,

    /// Write the legacy string here instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.sxt file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "run" so `tyrec file.sxt` works like
    // `tyrec run file.sxt`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            let pos = args.iter().position(|a| *a == first_pos).unwrap();
            args.insert(pos, "run".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Run(run_args) => do_run(run_args, cli.no_color),
        Command::Preview(preview_args) => do_preview(preview_args, cli.no_color),
        Command::Convert(convert_args) => do_convert(convert_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// Read and compile a script file, reporting diagnostics on stderr.
/// Exits the process on failure.
fn load_and_compile(file: &str, no_color: bool) -> Compiled {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.clone());

    let commands = CommandRegistry::builtin();
    let templates = TemplateRegistry::builtin();

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();

    let compiled = match compiler::compile(&source, file_id, &commands, &templates) {
        Ok(compiled) => compiled,
        Err(CompileFailure::Parse(errors)) => {
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ =
                    term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            }
            process::exit(EXIT_PARSE);
        }
        Err(CompileFailure::Compile(error)) => {
            emit_diagnostic_error(&writer, &config, &files, &error);
            process::exit(1);
        }
    };

    for warning in &compiled.warnings {
        emit_diagnostic_error(&writer, &config, &files, warning);
    }

    compiled
}

fn do_run(args: RunArgs, no_color: bool) {
    let compiled = load_and_compile(&args.file, no_color);

    if args.check {
        eprintln!("ok: {} compiled successfully", args.file);
        return;
    }

    if args.events {
        for event in &compiled.events {
            println!("{event}");
        }
        return;
    }

    let options = exec::ReplayOptions {
        window_title: args.window_title,
        no_delay: args.no_delay,
    };
    if let Err(e) = exec::replay(&compiled.events, &options) {
        eprintln!("error: replay failed: {}", e);
        process::exit(1);
    }
}

fn do_preview(args: PreviewArgs, no_color: bool) {
    let compiled = load_and_compile(&args.file, no_color);
    let preview = compiler::render(&compiled.events, args.upto);
    println!("{}", preview.text_with_marker());
}

fn do_convert(args: ConvertArgs, no_color: bool) {
    let compiled = load_and_compile(&args.file, no_color);
    let legacy = compiler::legacy::encode(&compiled.events);

    match args.output {
        None => println!("{legacy}"),
        Some(path) => {
            if let Err(e) = std::fs::write(&path, legacy) {
                eprintln!("error: cannot write '{}': {}", path, e);
                process::exit(1);
            }
        }
    }
}

fn emit_diagnostic_error(
    writer: &StandardStream,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    error: &DiagnosticError,
) {
    if let Some(span) = &error.span {
        let severity = if error.is_warning {
            Severity::Warning
        } else {
            Severity::Error
        };
        let diagnostic = Diagnostic::new(severity)
            .with_message(error.to_string())
            .with_labels(vec![Label::primary(error.source_id, span.clone())]);
        let _ = term::emit_to_write_style(&mut writer.lock(), config, files, &diagnostic);
    } else {
        let prefix = if error.is_warning {
            "warning"
        } else {
            "compile error"
        };
        eprintln!("{}: {}", prefix, error);
    }
}
