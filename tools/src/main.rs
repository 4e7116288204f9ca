//! `yinxing`: build sound+shape (音形) code tables.
//!
//! Usage:
//!   yinxing generate --roots parts.txt --decomposition chaizi-jt.txt
//!   yinxing merge --pinyin-db zdic.txt --scheme xiaohe
//!   yinxing build --config yinxing.toml
//!   yinxing export --table xhe_final_yinxing.txt

mod export_table;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use libshuangpin::{merge_and_write, MergeOutcome, PinyinDb, SchemeTable, ShapeTable};
use yinxing_core::{Config, GenerateConfig, MergeConfig};

#[derive(Parser, Debug)]
#[command(name = "yinxing")]
#[command(about = "Generate shape code and sound+shape code tables")]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging: -v for debug, -vv for trace (RUST_LOG overrides)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Default)]
struct GenerateArgs {
    #[arg(long)]
    roots: Option<PathBuf>,
    #[arg(long)]
    decomposition: Option<PathBuf>,
    /// Intermediate character<TAB>shape code table
    #[arg(long)]
    shape_output: Option<PathBuf>,
    #[arg(long)]
    missing_log: Option<PathBuf>,
    #[arg(long)]
    single_code_log: Option<PathBuf>,
}

impl GenerateArgs {
    fn apply(self, cfg: &mut GenerateConfig) {
        if let Some(p) = self.roots {
            cfg.roots = p;
        }
        if let Some(p) = self.decomposition {
            cfg.decomposition = p;
        }
        if let Some(p) = self.shape_output {
            cfg.output = p;
        }
        if let Some(p) = self.missing_log {
            cfg.missing_log = p;
        }
        if let Some(p) = self.single_code_log {
            cfg.single_code_log = p;
        }
    }
}

#[derive(clap::Args, Debug, Default)]
struct MergeArgs {
    #[arg(long)]
    pinyin_db: Option<PathBuf>,
    /// Final character<TAB>composite code table
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    error_log: Option<PathBuf>,
    /// xiaohe, ziranma or custom
    #[arg(long)]
    scheme: Option<String>,
    /// Scheme definition used with --scheme custom
    #[arg(long)]
    scheme_file: Option<PathBuf>,
    /// Also write the merge diagnostics as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,
}

impl MergeArgs {
    fn apply(&self, cfg: &mut MergeConfig) {
        if let Some(p) = &self.pinyin_db {
            cfg.pinyin_db = p.clone();
        }
        if let Some(p) = &self.output {
            cfg.output = p.clone();
        }
        if let Some(p) = &self.error_log {
            cfg.error_log = p.clone();
        }
        if let Some(s) = &self.scheme {
            cfg.scheme = s.clone();
        }
        if let Some(p) = &self.scheme_file {
            cfg.scheme_file = Some(p.clone());
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stage 1: decompositions → character<TAB>shape code
    Generate(GenerateArgs),
    /// Stage 2: shape codes + pinyin → character<TAB>composite code
    Merge {
        /// Shape code table produced by `generate`
        #[arg(long)]
        shape_table: Option<PathBuf>,
        #[command(flatten)]
        args: MergeArgs,
    },
    /// Run both stages; stage 2 reads stage 1's rows directly
    Build {
        #[command(flatten)]
        generate: GenerateArgs,
        #[command(flatten)]
        merge: MergeArgs,
    },
    /// Export a final table as an fst key index plus a redb payload store
    Export {
        #[arg(long)]
        table: PathBuf,
        #[arg(long, default_value = "yinxing.fst")]
        out_fst: PathBuf,
        #[arg(long, default_value = "yinxing.redb")]
        out_redb: PathBuf,
    },
    /// Write the default configuration as TOML
    InitConfig {
        #[arg(default_value = "yinxing.toml")]
        path: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(p) => Config::load_toml(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(Config::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut config = load_config(cli.config.as_ref())?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Generate(args) => {
            args.apply(&mut config.generate);
            config.validate()?;
            let outcome = libxingma::run_from_config(&config.generate)?;
            report_stage1(&outcome, &config.generate);
        }
        Command::Merge { shape_table, args } => {
            if let Some(p) = shape_table {
                config.merge.shape_table = p;
            }
            args.apply(&mut config.merge);
            config.validate()?;
            let outcome = libshuangpin::run_from_config(&config.merge)
                .context("merge aborted; see the error log")?;
            finish_merge(&outcome, &config.merge, args.report_json.as_ref())?;
        }
        Command::Build { generate, merge } => {
            generate.apply(&mut config.generate);
            merge.apply(&mut config.merge);
            config.validate()?;

            let stage1 = libxingma::run_from_config(&config.generate)?;
            report_stage1(&stage1, &config.generate);

            let shapes = ShapeTable::from_rows(stage1.rows);
            let pinyin = PinyinDb::load(&config.merge.pinyin_db)?;
            let scheme = SchemeTable::from_config(&config.merge)?;
            let outcome = merge_and_write(&shapes, &pinyin, &scheme, &config.merge)
                .context("merge aborted; see the error log")?;
            finish_merge(&outcome, &config.merge, merge.report_json.as_ref())?;
        }
        Command::Export {
            table,
            out_fst,
            out_redb,
        } => {
            let keys = export_table::run(&table, &out_fst, &out_redb)?;
            println!(
                "Wrote {} codes to {} and {}",
                keys,
                out_fst.display(),
                out_redb.display()
            );
        }
        Command::InitConfig { path } => {
            config.save_toml(&path)?;
            println!("Wrote configuration to {}", path.display());
        }
    }
    Ok(())
}

fn report_stage1(outcome: &libxingma::GenerateOutcome, cfg: &GenerateConfig) {
    let d = &outcome.diagnostics;
    println!(
        "Wrote {} rows to {}; {} characters failed (see {}), {} single-letter rejections (see {})",
        outcome.rows.len(),
        cfg.output.display(),
        d.failed
            .iter()
            .map(|(c, _)| *c)
            .collect::<std::collections::BTreeSet<_>>()
            .len(),
        cfg.missing_log.display(),
        d.single_letter.len(),
        cfg.single_code_log.display()
    );
}

fn finish_merge(outcome: &MergeOutcome, cfg: &MergeConfig, report_json: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = report_json {
        let json = serde_json::to_string_pretty(&outcome.diagnostics)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    let d = &outcome.diagnostics;
    println!(
        "Wrote {} rows to {}; details in {}",
        d.rows,
        cfg.output.display(),
        cfg.error_log.display()
    );
    if !d.missing_pinyin.is_empty() {
        println!("Note: {} characters have no pinyin", d.missing_pinyin.len());
    }
    if !d.cannot_convert.is_empty() {
        println!("Note: {} readings could not be converted", d.cannot_convert.len());
    }
    Ok(())
}
