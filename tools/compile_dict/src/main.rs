//! Compiles a plain-text dictionary source (YAML header + tab-separated
//! `text, code, weight?` rows) into a `.prism.bin`/`.table.bin` artifact
//! pair via `libchinese_core::compiler`, mirroring the dictionary-compile
//! step of `original_source/src/rime/lever/deployment_tasks.cc`: a
//! checksum of the source is stored in both artifacts so a later load can
//! detect staleness and force a rebuild.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use libchinese_core::compiler;

#[derive(Parser)]
struct Opts {
    /// Dictionary source file (YAML header, then tab-separated rows).
    source: PathBuf,

    /// Output path for the compiled prism (default: <source>.prism.bin).
    #[clap(long)]
    prism_out: Option<PathBuf>,

    /// Output path for the compiled table (default: <source>.table.bin).
    #[clap(long)]
    table_out: Option<PathBuf>,
}

fn default_out(source: &PathBuf, suffix: &str) -> PathBuf {
    let mut name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dict".to_string());
    name.push_str(suffix);
    source.with_file_name(name)
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let source_text = std::fs::read_to_string(&opts.source)
        .with_context(|| format!("reading {}", opts.source.display()))?;
    let compiled = compiler::compile(&source_text);

    let prism_out = opts.prism_out.unwrap_or_else(|| default_out(&opts.source, ".prism.bin"));
    let table_out = opts.table_out.unwrap_or_else(|| default_out(&opts.source, ".table.bin"));

    compiled
        .prism
        .to_arena()
        .context("serializing prism")?
        .finish(&prism_out)
        .with_context(|| format!("writing {}", prism_out.display()))?;
    compiled
        .table
        .to_arena()
        .context("serializing table")?
        .finish(&table_out)
        .with_context(|| format!("writing {}", table_out.display()))?;

    eprintln!(
        "compiled {} -> {} + {} (checksum {:#010x})",
        opts.source.display(),
        prism_out.display(),
        table_out.display(),
        compiled.checksum
    );
    Ok(())
}
