// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use shelldiff::fixture::Fixture;
use shelldiff::report::Reporter;
use shelldiff::runner::{self, RunConfig, ShellSpec, ValgrindConfig};
use shelldiff::session::SessionOptions;

#[derive(Parser, Debug)]
#[command(
    name = "shelldiff",
    version,
    about = "Compare two interactive shells command by command"
)]
struct Args {
    /// Command for the shell under test
    #[arg(long)]
    shell: String,

    /// Extra argument for the shell under test (repeatable)
    #[arg(long = "shell-arg", allow_hyphen_values = true)]
    shell_args: Vec<String>,

    /// Prompt emitted by the shell under test
    #[arg(long)]
    shell_prompt: String,

    /// Command for the reference shell
    #[arg(long)]
    reference: String,

    /// Extra argument for the reference shell (repeatable)
    #[arg(long = "reference-arg", allow_hyphen_values = true)]
    reference_args: Vec<String>,

    /// Prompt emitted by the reference shell
    #[arg(long)]
    reference_prompt: String,

    /// YAML file with the ordered command list
    #[arg(long)]
    tests: PathBuf,

    /// Run the tested shell under valgrind
    #[arg(long)]
    valgrind: bool,

    /// Valgrind suppressions file
    #[arg(long)]
    suppressions: Option<PathBuf>,

    /// Terminal width
    #[arg(long, default_value = "60")]
    cols: u16,

    /// Terminal height
    #[arg(long, default_value = "30")]
    rows: u16,

    /// Seconds to wait for each expected prompt
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Disable colorized output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let fixture = Fixture::load(&args.tests)?;

    let config = RunConfig {
        tested: ShellSpec {
            program: args.shell,
            args: args.shell_args,
            prompt: args.shell_prompt,
        },
        reference: ShellSpec {
            program: args.reference,
            args: args.reference_args,
            prompt: args.reference_prompt,
        },
        fixture,
        valgrind: args.valgrind.then(|| ValgrindConfig {
            suppressions: args.suppressions,
        }),
        session: SessionOptions {
            cols: args.cols,
            rows: args.rows,
            timeout: Duration::from_secs(args.timeout),
        },
    };

    let reporter = Reporter::new(!args.no_color, args.cols as usize);
    let mut stdout = std::io::stdout();
    runner::run(&config, &reporter, &mut stdout).await
}
