//! xtask - Build tasks for stepwise
//!
//! Run with: cargo xtask <command>
//!
//! Commands:
//! - gen-docs: Generate man pages and COMMANDS.md from the CLI definition

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, Command, CommandFactory, Parser, Subcommand};

use stepwise::cli::Cli;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build tasks for stepwise")]
struct Xtask {
    #[command(subcommand)]
    command: XtaskCommand,
}

#[derive(Subcommand)]
enum XtaskCommand {
    /// Generate documentation from CLI definitions
    #[command(name = "gen-docs")]
    GenDocs {
        /// Output directory (default: docs/)
        #[arg(long, short, default_value = "docs")]
        output: PathBuf,

        /// Generate man pages only
        #[arg(long)]
        man: bool,

        /// Generate COMMANDS.md only
        #[arg(long)]
        markdown: bool,
    },
}

fn main() -> Result<()> {
    let args = Xtask::parse();

    match args.command {
        XtaskCommand::GenDocs {
            output,
            man,
            markdown,
        } => {
            let gen_all = !man && !markdown;
            if gen_all || man {
                generate_man_pages(&output)?;
            }
            if gen_all || markdown {
                generate_markdown(&output)?;
            }
        }
    }

    Ok(())
}

/// Generate man pages using clap_mangen, one per (sub)command.
fn generate_man_pages(output: &Path) -> Result<()> {
    let man_dir = output.join("man");
    fs::create_dir_all(&man_dir).context("Failed to create man directory")?;

    let mut cmd = Cli::command();
    cmd.build();
    render_man(&cmd, "stepwise", &man_dir)?;

    println!("Man pages generated in {}", man_dir.display());
    Ok(())
}

fn render_man(cmd: &Command, page_name: &str, man_dir: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone())
        .render(&mut buffer)
        .with_context(|| format!("Failed to render man page for {}", page_name))?;
    let path = man_dir.join(format!("{}.1", page_name));
    fs::write(&path, buffer).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Generated: {}", path.display());

    for sub in visible_subcommands(cmd) {
        render_man(sub, &format!("{}-{}", page_name, sub.get_name()), man_dir)?;
    }
    Ok(())
}

/// Generate COMMANDS.md
fn generate_markdown(output: &Path) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let cmd = Cli::command();
    let mut markdown = String::new();

    markdown.push_str("# stepwise Command Reference\n\n");
    markdown.push_str("This document is auto-generated from the CLI definitions.\n\n");
    for sub in visible_subcommands(&cmd) {
        let name = sub.get_name();
        markdown.push_str(&format!("- [{}](#stepwise-{})\n", name, name));
    }
    markdown.push_str("\n---\n\n");

    if let Some(long_about) = cmd.get_long_about() {
        markdown.push_str(&format!("## stepwise\n\n```\n{}\n```\n\n", long_about));
    }
    push_options(&mut markdown, cmd.get_arguments());

    for sub in visible_subcommands(&cmd) {
        push_command(&mut markdown, sub, &format!("stepwise {}", sub.get_name()), 2);
    }

    markdown.push_str("\n*Generated by `cargo xtask gen-docs`*\n");

    let output_path = output.join("COMMANDS.md");
    fs::write(&output_path, markdown)?;
    println!("Generated: {}", output_path.display());
    Ok(())
}

fn push_command(markdown: &mut String, cmd: &Command, title: &str, depth: usize) {
    markdown.push_str(&format!("{} {}\n\n", "#".repeat(depth), title));
    if let Some(about) = cmd.get_about() {
        markdown.push_str(&format!("{}\n\n", about));
    }

    for arg in cmd.get_arguments().filter(|a| a.is_positional()) {
        markdown.push_str(&format!("- `<{}>`", arg.get_id().as_str().to_uppercase()));
        if let Some(help) = arg.get_help() {
            markdown.push_str(&format!(": {}", help));
        }
        markdown.push('\n');
    }
    push_options(markdown, cmd.get_arguments().filter(|a| !a.is_positional()));

    if let Some(long_about) = cmd.get_long_about() {
        markdown.push_str(&format!("\n```\n{}\n```\n\n", long_about));
    }

    for sub in visible_subcommands(cmd) {
        let nested_title = format!("{} {}", title, sub.get_name());
        push_command(markdown, sub, &nested_title, depth + 1);
    }

    if depth == 2 {
        markdown.push_str("---\n\n");
    }
}

fn push_options<'a>(markdown: &mut String, args: impl Iterator<Item = &'a Arg>) {
    for arg in args {
        let id = arg.get_id().as_str();
        if id == "help" || id == "version" || arg.is_positional() {
            continue;
        }
        let flag = match (arg.get_long(), arg.get_short()) {
            (Some(l), Some(s)) => format!("-{}, --{}", s, l),
            (Some(l), None) => format!("--{}", l),
            (None, Some(s)) => format!("-{}", s),
            (None, None) => continue,
        };
        markdown.push_str(&format!("- `{}`", flag));
        if let Some(help) = arg.get_help() {
            markdown.push_str(&format!(": {}", help));
        }
        markdown.push('\n');
    }
    markdown.push('\n');
}

fn visible_subcommands(cmd: &Command) -> impl Iterator<Item = &Command> + '_ {
    cmd.get_subcommands()
        .filter(|s| !s.is_hide_set() && s.get_name() != "help")
}
