//! `layout-css` - builds a layout stylesheet from a project directory.
//!
//! ```text
//! layout-css [--config layout.config.json] [--output dist/layout.css]
//!            [--layouts DIR] [--modules DIR] [--minify] [--flat] [--no-group]
//!            [--watch] [-v...]
//! ```
//!
//! Logging goes through `env_logger`: the default level is `info`, each `-v`
//! raises it, and `RUST_LOG` overrides both.

mod output;
mod watch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};
use layout_css::{minify, BuildOutput, Builder, DirSource, EmitOptions};

const POLL_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Parser)]
#[command(name = "layout-css", version, about = "Compile layout definitions into cascade-layered CSS")]
struct Args {
    /// Build configuration file
    #[arg(short, long, default_value = "layout.config.json")]
    config: PathBuf,

    /// Stylesheet to write
    #[arg(short, long, default_value = "dist/layout.css")]
    output: PathBuf,

    /// Directory of layout variant files [default: <config dir>/layouts]
    #[arg(long)]
    layouts: Option<PathBuf>,

    /// Directory of core/common CSS modules [default: <config dir>/core]
    #[arg(long)]
    modules: Option<PathBuf>,

    /// Rebuild whenever an input file changes
    #[arg(short, long)]
    watch: bool,

    /// Also write a minified copy next to the output (<name>.min.css)
    #[arg(short, long)]
    minify: bool,

    /// Do not wrap query blocks in per-breakpoint cascade layers
    #[arg(long)]
    flat: bool,

    /// Do not merge selectors with identical declarations
    #[arg(long)]
    no_group: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn source(&self) -> DirSource {
        let mut source = DirSource::new(&self.config);
        if let Some(dir) = &self.layouts {
            source = source.layouts_dir(dir);
        }
        if let Some(dir) = &self.modules {
            source = source.modules_dir(dir);
        }
        source
    }

    fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            layered: !self.flat,
            group_identical: !self.no_group,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Runs one build and writes its outputs.
fn build(args: &Args, builder: &Builder<DirSource>) -> anyhow::Result<BuildOutput> {
    let result = builder
        .build()
        .with_context(|| format!("build from {} failed", args.config.display()))?;

    output::write_atomic(&args.output, &result.css)?;
    log::info!(
        "wrote {} ({:.2} KB, {} rule(s))",
        args.output.display(),
        result.size() as f64 / 1024.0,
        result.rules
    );

    if args.minify {
        let path = output::minified_path(&args.output);
        let css = minify(&result.css);
        output::write_atomic(&path, &css)?;
        log::info!("wrote {} ({:.2} KB)", path.display(), css.len() as f64 / 1024.0);
    }

    if !result.warnings.is_empty() {
        log::warn!("build finished with {} warning(s)", result.warnings.len());
    }

    Ok(result)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let builder = Builder::new(args.source()).options(args.emit_options());

    // a failed first build is fatal, even when watching
    build(&args, &builder)?;
    if !args.watch {
        return Ok(());
    }

    log::info!("watching for changes (ctrl-c to stop)");
    watch::run(builder.source(), POLL_INTERVAL, |generation| {
        log::info!("rebuilding (generation {})", generation);
        if let Err(e) = build(&args, &builder) {
            log::error!("generation {} failed: {:#}", generation, e);
        }
    })
}
