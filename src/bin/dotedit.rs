// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use dotedit::{
    config::Plan,
    editor::FileEditor,
    outcome::Outcome,
    text::{ini::EntryFormat, LineMatch},
};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::exit};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "dotedit [options] <dotedit-command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let editor = FileEditor::local();
        match self.command {
            Command::Get(opts) => run_get(&editor, opts),
            Command::Set(opts) => report(editor.set_ini_value(
                opts.file,
                &opts.section,
                &opts.key,
                &opts.value,
                opts.require_file,
                if opts.spaced {
                    EntryFormat::Spaced
                } else {
                    EntryFormat::Compact
                },
            )?),
            Command::Unset(opts) => {
                report(editor.remove_ini_value(opts.file, &opts.section, &opts.key)?)
            }
            Command::Replace(opts) => report(editor.replace_lines_in_file(
                opts.file,
                &opts.prefix,
                &opts.replacement,
                opts.append,
            )?),
            Command::Strip(opts) => report(editor.remove_lines_in_file(
                opts.file,
                &opts.target,
                if opts.exact {
                    LineMatch::Exact
                } else {
                    LineMatch::Prefix
                },
            )?),
            Command::Append(opts) => report(editor.append_if_absent(opts.file, &opts.block)?),
            Command::Copy(opts) => report(editor.copy_file_with_line_update(
                opts.source,
                opts.destination,
                &opts.prefix,
                &opts.replacement,
                opts.append,
            )?),
            Command::Apply(opts) => run_apply(&editor, opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print value of key in section of INI file.
    #[command(override_usage = "dotedit get [options] <file> <section> <key>")]
    Get(GetOptions),

    /// Set value of key in section of INI file.
    #[command(override_usage = "dotedit set [options] <file> <section> <key> <value>")]
    Set(SetOptions),

    /// Remove key from section of INI file.
    #[command(override_usage = "dotedit unset [options] <file> <section> <key>")]
    Unset(UnsetOptions),

    /// Replace lines of file starting with prefix.
    #[command(override_usage = "dotedit replace [options] <file> <prefix> <replacement>")]
    Replace(ReplaceOptions),

    /// Remove lines of file starting with, or equal to, target.
    #[command(override_usage = "dotedit strip [options] <file> <target>")]
    Strip(StripOptions),

    /// Append block of lines to file unless already present.
    #[command(override_usage = "dotedit append [options] <file> <block>")]
    Append(AppendOptions),

    /// Copy template file to destination while replacing lines by prefix.
    #[command(
        override_usage = "dotedit copy [options] <source> <destination> <prefix> <replacement>"
    )]
    Copy(CopyOptions),

    /// Apply every step of a plan file.
    #[command(override_usage = "dotedit apply [options] <plan>")]
    Apply(ApplyOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct GetOptions {
    /// Path to INI file.
    #[arg(value_name = "file")]
    pub file: PathBuf,

    /// Section to look in, empty for keys before the first header.
    #[arg(value_name = "section")]
    pub section: String,

    /// Key to look up.
    #[arg(value_name = "key")]
    pub key: String,

    /// Fail if the file does not exist.
    #[arg(long)]
    pub require_file: bool,

    /// Fail if the key does not exist.
    #[arg(long)]
    pub require_key: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct SetOptions {
    /// Path to INI file.
    #[arg(value_name = "file")]
    pub file: PathBuf,

    /// Section to write to, empty for keys before the first header.
    #[arg(value_name = "section")]
    pub section: String,

    /// Key to set.
    #[arg(value_name = "key")]
    pub key: String,

    /// Value to set.
    #[arg(value_name = "value")]
    pub value: String,

    /// Write entry as "key = value" instead of "key=value".
    #[arg(short, long)]
    pub spaced: bool,

    /// Fail instead of creating the file if it does not exist.
    #[arg(long)]
    pub require_file: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct UnsetOptions {
    /// Path to INI file.
    #[arg(value_name = "file")]
    pub file: PathBuf,

    /// Section to remove key from.
    #[arg(value_name = "section")]
    pub section: String,

    /// Key to remove.
    #[arg(value_name = "key")]
    pub key: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ReplaceOptions {
    /// Path to file.
    #[arg(value_name = "file")]
    pub file: PathBuf,

    /// Prefix selecting lines to replace.
    #[arg(value_name = "prefix")]
    pub prefix: String,

    /// Line to replace selected lines with.
    #[arg(value_name = "replacement")]
    pub replacement: String,

    /// Append replacement if no line starts with prefix.
    #[arg(short, long)]
    pub append: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct StripOptions {
    /// Path to file.
    #[arg(value_name = "file")]
    pub file: PathBuf,

    /// Line, or prefix of lines, to remove.
    #[arg(value_name = "target")]
    pub target: String,

    /// Only remove lines exactly equal to target.
    #[arg(short, long)]
    pub exact: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct AppendOptions {
    /// Path to file.
    #[arg(value_name = "file")]
    pub file: PathBuf,

    /// Lines to append, separated by newlines.
    #[arg(value_name = "block")]
    pub block: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct CopyOptions {
    /// Template file to copy from.
    #[arg(value_name = "source")]
    pub source: PathBuf,

    /// File to write to.
    #[arg(value_name = "destination")]
    pub destination: PathBuf,

    /// Prefix selecting template lines to replace.
    #[arg(value_name = "prefix")]
    pub prefix: String,

    /// Line to replace selected lines with.
    #[arg(value_name = "replacement")]
    pub replacement: String,

    /// Append replacement if no line starts with prefix.
    #[arg(short, long)]
    pub append: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ApplyOptions {
    /// Path to plan file.
    #[arg(value_name = "plan")]
    pub plan: PathBuf,
}

fn main() {
    let layer = fmt::layer().compact().with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(layer).with(filter).init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn report(outcome: Outcome) -> Result<()> {
    println!("{outcome}");
    Ok(())
}

fn run_get(editor: &FileEditor, opts: GetOptions) -> Result<()> {
    let value = editor.get_ini_value(
        opts.file,
        &opts.section,
        &opts.key,
        opts.require_file,
        opts.require_key,
    )?;

    if let Some(value) = value {
        println!("{value}");
    }

    Ok(())
}

fn run_apply(editor: &FileEditor, opts: ApplyOptions) -> Result<()> {
    let outcomes = Plan::load(&opts.plan)?.apply(editor);
    println!("{outcomes}");

    if !outcomes.is_success() {
        bail!("{} of {} steps failed", outcomes.failures(), outcomes.len());
    }

    Ok(())
}
