//! `fab` — the command-line front end. A thin wrapper: argument parsing and
//! subcommand dispatch only, no configuration-engine logic of its own. The
//! `configure` subcommand runs the core engine (`fab::ops::configure`); for
//! historical reasons the other two subcommands fork/exec the executor
//! (`build`) or copy files out of the cache's install map (`install`).

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fab::core::Cache;
use fab::ops;
use fab::util::paths;

/// A Lua-configured meta-build tool that emits Ninja build graphs.
#[derive(Parser)]
#[command(name = "fab", version, about)]
struct Cli {
    /// Build directory [env: BUILDDIR]
    #[arg(long, global = true, env = "BUILDDIR", default_value = "build")]
    builddir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Configures the build directory with the given arguments.
    Configure {
        /// The value of a user-defined option, as key=value. Repeatable.
        #[arg(short = 'o', long = "option")]
        option: Vec<String>,

        /// Installation prefix.
        #[arg(long, default_value = "/usr")]
        prefix: String,

        /// Configuration script path.
        #[arg(long, default_value = "fab.lua")]
        config: PathBuf,

        /// Overrides a dependency's local directory, as name=path. Repeatable.
        #[arg(long = "depdir")]
        depdir: Vec<String>,
    },
    /// Builds the project.
    Build,
    /// Installs built files.
    Install {
        /// Staging directory prepended to every install destination [env: DESTDIR]
        #[arg(long, env = "DESTDIR")]
        destdir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.builddir)
        .with_context(|| format!("creating build directory {}", cli.builddir.display()))?;
    let build_dir = std::fs::canonicalize(&cli.builddir)
        .with_context(|| format!("resolving build directory {}", cli.builddir.display()))?;

    let cache = Cache::load(&build_dir).context("loading fabricate_cache.json")?;

    match cli.command {
        Command::Configure { option, prefix, config, depdir } => {
            let executor = locate_executor()?;

            let config_path = std::fs::canonicalize(&config)
                .with_context(|| format!("resolving configuration script {}", config.display()))?;

            let options = parse_assignments(&option, "option")?;
            let depdirs = parse_assignments(&depdir, "depdir")?
                .into_iter()
                .map(|(name, path)| (name, PathBuf::from(path)))
                .collect::<BTreeMap<_, _>>();

            ops::configure(&executor, &config_path, &build_dir, &options, &prefix, &depdirs, cache)?;
        }

        Command::Build => {
            let executor = locate_executor()?;
            ops::build(&executor, &build_dir)?;
        }

        Command::Install { destdir } => {
            ops::install(&cache, &build_dir, destdir.as_deref())?;
        }
    }

    Ok(())
}

fn locate_executor() -> anyhow::Result<PathBuf> {
    paths::find_on_path("ninja").context("could not locate `ninja` on PATH")
}

fn parse_assignments(pairs: &[String], kind: &str) -> anyhow::Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) => {
                map.insert(key.to_string(), value.to_string());
            }
            None => bail!("invalid {kind} `{pair}` (expected key=value)"),
        }
    }
    Ok(map)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FAB_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
