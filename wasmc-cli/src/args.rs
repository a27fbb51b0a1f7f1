use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for the `wasmc` binary.
#[derive(Parser, Debug)]
#[command(name = "wasmc", version, about = "Ahead-of-time compiler from a typed AST to WebAssembly-GC bytecode")]
pub struct CliArgs {
    /// Path to the typed-AST input (spec §6.1), serialized as JSON.
    pub input: PathBuf,

    /// Where to write the compiled `.wasm` module.
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Emit a WebAssembly `name` custom section for functions and types.
    #[arg(long = "emitNames", alias = "emit-names")]
    pub emit_names: bool,

    /// File path diagnostics are attributed to, overriding `input`'s own
    /// path.
    #[arg(long)]
    pub file: Option<String>,
}
