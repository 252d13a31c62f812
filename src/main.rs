use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use env_logger::Builder;
use log::{debug, info};

use minijavac as mj;

use mj::ast_printer::AstPrinter;
use mj::error::CompileError;
use mj::source::SourceBuffer;
use mj::{Config, LexMode};

#[derive(ClapParser, Debug)]
#[command(version, about = "MiniJava compiler front end", long_about = None)]
pub struct Cli {
    /// Path of the MiniJava unit to compile
    path: PathBuf,

    /// How far the pipeline runs
    #[arg(long, value_enum, default_value_t = Stage::Semantic)]
    stage: Stage,

    /// What the lexer does after an error (lex stage only)
    #[arg(long, value_enum, default_value_t = Mode::Compiling)]
    mode: Mode,

    /// Token dump format for the lex stage
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the checked program tree
    #[arg(long)]
    dump_ast: bool,

    /// Enable logging to minijavac.log
    #[arg(long)]
    log: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    /// Print the token stream
    Lex,
    /// Check the grammar only
    Syntax,
    /// Run every check
    Semantic,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Diagnostic,
    Compiling,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

impl From<Mode> for LexMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Diagnostic => LexMode::Diagnostic,
            Mode::Compiling => LexMode::Compiling,
        }
    }
}

const CLEAN_RUN: &str = "[SinErrores]";

/// Exit status for a unit with diagnostics.
const EXIT_DIAGNOSTICS: i32 = 65;
/// Exit status when the unit cannot be read.
const EXIT_NO_INPUT: i32 = 66;

fn init_logger() -> Result<()> {
    let log_file = File::create("minijavac.log").context("Failed to create minijavac.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'minijavac::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("minijavac::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "{} [{}:{}] - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .init();

    info!("Logger initialized, writing to minijavac.log");
    Ok(())
}

fn exit_code(error: &CompileError) -> i32 {
    match error {
        CompileError::FileNotFound(_) | CompileError::Io(_) | CompileError::Utf8(_) => EXIT_NO_INPUT,
        _ => EXIT_DIAGNOSTICS,
    }
}

fn fail(error: &CompileError) -> ! {
    debug!("Run failed: {}", error);

    eprintln!("{}", error.report());

    std::process::exit(exit_code(error));
}

fn lex(source: SourceBuffer, args: &Cli) -> Result<()> {
    let config = Config {
        mode: args.mode.into(),
    };
    let stream = mj::tokenize(source, &config);

    for token in &stream.tokens {
        match args.format {
            Format::Text => println!("{}", token),
            Format::Json => println!(
                "{}",
                serde_json::to_string(token).context("Failed to serialise token")?
            ),
        }
    }

    for error in &stream.errors {
        eprintln!("{}\n", error.report());
    }

    if let Some(first) = stream.errors.first() {
        std::process::exit(exit_code(first));
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let source = match SourceBuffer::from_path(&args.path) {
        Ok(source) => source,
        Err(e) => fail(&e),
    };

    match args.stage {
        Stage::Lex => lex(source, &args)?,

        Stage::Syntax => {
            if let Err(e) = mj::parser::validate(source) {
                fail(&e);
            }
        }

        Stage::Semantic => match mj::analyze(source) {
            Ok(context) => {
                if args.dump_ast {
                    print!("{}", AstPrinter::print_program(&context.table));
                }
            }
            Err(e) => fail(&e),
        },
    }

    info!("Run completed without errors");

    println!("{}", CLEAN_RUN);

    Ok(())
}
