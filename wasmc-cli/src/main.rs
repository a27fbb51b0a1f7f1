//! The `wasmc` binary: reads a typed-AST JSON document, compiles it to a
//! WebAssembly-GC module, and writes the result (spec §5, §8).

mod args;
mod ast_json;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use wasmc::{compile, diagnostics::Diagnostic, CompileOptions, CompileSession};

use args::CliArgs;

fn print_diagnostic(diagnostic: &Diagnostic) {
    let rendered = diagnostic.to_string();
    if diagnostic.is_fatal() {
        eprintln!("{}", rendered.red().bold());
    } else {
        eprintln!("{}", rendered.yellow());
    }
}

fn run(args: CliArgs) -> Result<ExitCode> {
    let source = fs::read_to_string(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let (ast, root, interner) = ast_json::parse_module(&source).context("parsing the typed-AST input")?;

    let file = args.file.clone().unwrap_or_else(|| args.input.display().to_string());
    let options = CompileOptions { emit_names: args.emit_names, file };

    let mut session = CompileSession::new();
    match compile(&mut session, &ast, root, &interner, &options) {
        Ok(compiled) => {
            for diagnostic in &compiled.diagnostics {
                print_diagnostic(diagnostic);
            }
            fs::write(&args.output, &compiled.bytes).with_context(|| format!("writing {}", args.output.display()))?;
            tracing::info!(output = %args.output.display(), bytes = compiled.bytes.len(), "wrote module");
            Ok(ExitCode::SUCCESS)
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                print_diagnostic(diagnostic);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).with_target(false).init();

    let args = CliArgs::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
