// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Project automation for the `LegalTrack` workspace.
//!
//! - `cargo xtask ci` runs lint, build, and the default test suite.
//! - `cargo xtask test-mariadb` provisions a throwaway `MariaDB` container
//!   and runs the ignored backend validation tests against it.
//!
//! Standard `cargo test` never needs external services. Anything that does
//! lives here and is opt-in.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
    process::Output,
    thread::sleep,
    time::Duration,
};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const PERSISTENCE_PACKAGE: &str = "legaltrack-persistence";
const MARIADB_IMAGE: &str = "mariadb:11";
const READY_ATTEMPTS: u32 = 30;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Check that both migration trees carry the same migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    verify_migrations()?;
    build()?;
    test()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without warnings for every default workspace package
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            ["doc", "--no-deps", "--all-features", "--package", &package.name],
        )
        .env_remove("CARGO")
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Run lib and doc tests for the workspace's default packages
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Throwaway `MariaDB` container used by `test-mariadb`.
struct MariaDbContainer {
    name: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    port: &'static str,
}

impl MariaDbContainer {
    const fn for_tests() -> Self {
        Self {
            name: "legaltrack-test-mariadb",
            database: "legaltrack_test",
            user: "legaltrack",
            password: "test_password",
            port: "3307",
        }
    }

    fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }

    fn start(&self) -> Result<()> {
        self.remove();
        tracing::info!(container = self.name, "Starting MariaDB container");
        cmd!(
            "docker",
            "run",
            "--name",
            self.name,
            "-e",
            format!("MARIADB_DATABASE={}", self.database),
            "-e",
            format!("MARIADB_USER={}", self.user),
            "-e",
            format!("MARIADB_PASSWORD={}", self.password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", self.port),
            "-d",
            MARIADB_IMAGE
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;
        Ok(())
    }

    fn wait_until_ready(&self) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready");
        for attempt in 1..=READY_ATTEMPTS {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {attempt}/{READY_ATTEMPTS}");
            let probe = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                self.user,
                format!("-p{}", self.password),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();
            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!("MariaDB did not become ready within timeout"))
    }

    fn remove(&self) {
        let _ = cmd!("docker", "stop", self.name)
            .stdout_null()
            .stderr_null()
            .unchecked()
            .run();
        let _ = cmd!("docker", "rm", self.name)
            .stdout_null()
            .stderr_null()
            .unchecked()
            .run();
    }
}

/// Run the ignored `MariaDB` backend validation tests.
///
/// Requires Docker and a free port 3307. The container is removed whether
/// or not the tests pass.
fn test_mariadb() -> Result<()> {
    tracing::info!("Checking Docker availability");
    cmd!("docker", "--version")
        .run_with_trace()
        .wrap_err("Docker is not available. Please install Docker.")?;

    let container = MariaDbContainer::for_tests();
    container.start()?;

    let result = container.wait_until_ready().and_then(|()| {
        tracing::info!("Running MariaDB backend validation tests");
        cmd!(
            "cargo",
            "test",
            "--package",
            PERSISTENCE_PACKAGE,
            "backend_validation_tests",
            "--",
            "--ignored",
            "--test-threads=1"
        )
        .env("DATABASE_URL", container.database_url())
        .env("LEGALTRACK_TEST_BACKEND", "mariadb")
        .run_with_trace()
        .map(|_| ())
        .wrap_err("MariaDB backend validation tests failed")
    });

    tracing::info!("Removing MariaDB container");
    container.remove();
    result?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Fail if the `SQLite` and `MySQL` migration trees have drifted apart.
///
/// Each migration directory must exist under both trees and carry both an
/// `up.sql` and a `down.sql`.
fn verify_migrations() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;
    let persistence_dir: PathBuf = meta
        .workspace_root
        .join("crates")
        .join("persistence")
        .into_std_path_buf();

    let sqlite = migration_names(&persistence_dir.join("migrations"))?;
    let mysql = migration_names(&persistence_dir.join("migrations_mysql"))?;

    let only_sqlite: Vec<&String> = sqlite.difference(&mysql).collect();
    let only_mysql: Vec<&String> = mysql.difference(&sqlite).collect();
    if !only_sqlite.is_empty() || !only_mysql.is_empty() {
        return Err(eyre!(
            "Migration trees differ\n  only in migrations/: {only_sqlite:?}\n  only in migrations_mysql/: {only_mysql:?}"
        ));
    }

    tracing::info!(count = sqlite.len(), "Migration trees match");
    Ok(())
}

fn migration_names(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in
        fs::read_dir(dir).wrap_err_with(|| format!("failed to read {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let path = entry.path();
        for script in ["up.sql", "down.sql"] {
            if !path.join(script).is_file() {
                return Err(eyre!("{} is missing {script}", path.display()));
            }
        }
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
