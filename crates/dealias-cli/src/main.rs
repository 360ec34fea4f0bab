#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod logging;

use clap::Parser;
use dealias_core::config::{AliasMap, PackageJson, TsConfig};
use dealias_core::pipeline::{run, RunOptions};
use dealias_core::Error;
use miette::{IntoDiagnostic, Result};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "dealias")]
#[command(author, version, about = "Rewrite tsconfig path aliases in compiled output to relative imports", long_about = None)]
struct Cli {
    /// Compiled output directory to rewrite (defaults to compilerOptions.outDir)
    target: Option<PathBuf>,

    /// Path to tsconfig.json
    #[arg(long, value_name = "FILE", default_value = "tsconfig.json")]
    tsconfig: PathBuf,

    /// Write rewritten files to a parallel tree instead of in place
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Rewrite relative specifiers to explicit extension/index form
    /// (inferred from package.json "type": "module" when omitted)
    #[arg(long)]
    esm: bool,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit JSON formatted logs
    #[arg(long)]
    json: bool,

    /// Override the working directory
    #[arg(long, value_name = "PATH")]
    cwd: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Config errors are fatal before any traversal begins.
    let tsconfig_path = cwd.join(&cli.tsconfig);
    let tsconfig_json = read_config(&tsconfig_path).into_diagnostic()?;
    let tsconfig = TsConfig::parse(&tsconfig_path, &tsconfig_json).into_diagnostic()?;
    let package = read_package(&cwd).into_diagnostic()?;

    let target = cli
        .target
        .or_else(|| {
            tsconfig
                .compiler_options
                .out_dir
                .as_ref()
                .map(PathBuf::from)
        })
        .ok_or(Error::TargetMissing)
        .into_diagnostic()?;
    let target = cwd.join(target);
    let out = cli.out.map_or_else(|| target.clone(), |o| cwd.join(o));

    let esm = cli.esm || package.as_ref().is_some_and(PackageJson::is_module);
    let aliases = AliasMap::from_compiler_options(&tsconfig.compiler_options);

    // The core sink never creates directories; when writing a parallel
    // tree, mirror the source skeleton up front.
    if out != target {
        mirror_directories(&target, &out).into_diagnostic()?;
    }

    let options = RunOptions {
        target,
        out,
        aliases,
        esm,
    };
    tracing::debug!(
        src = %options.target.display(),
        dest = %options.out.display(),
        aliases = options.aliases.len(),
        esm = options.esm,
        "starting rewrite"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;
    let summary = runtime.block_on(run(&options)).into_diagnostic()?;

    tracing::info!(files = summary.files_written, "rewrite complete");
    Ok(())
}

fn read_config(path: &Path) -> Result<String, Error> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(source) => Err(Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// package.json is optional (absence just means ESM is not inferred),
/// but a present-and-unparseable one is a config error.
fn read_package(cwd: &Path) -> Result<Option<PackageJson>, Error> {
    let path = cwd.join("package.json");
    match std::fs::read(&path) {
        Ok(bytes) => {
            let json = String::from_utf8_lossy(&bytes);
            PackageJson::parse(&path, &json).map(Some)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::ConfigRead { path, source }),
    }
}

/// Recreate the target's directory skeleton under `out`.
fn mirror_directories(target: &Path, out: &Path) -> Result<(), Error> {
    for entry in WalkDir::new(target) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(target) {
            std::fs::create_dir_all(out.join(rel))?;
        }
    }
    Ok(())
}
