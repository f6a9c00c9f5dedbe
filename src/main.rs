//! marksync - keep Markdown and an editable content tree in sync.
//!
//! # Usage
//!
//! ```bash
//! marksync README.md
//! marksync --tree README.md
//! marksync --from-tree edited.json -o README.md
//! marksync --watch --export-html README.md
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use marksync::app::App;
use marksync::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use marksync::perf;

/// Render Markdown into a content tree and serialize it back
#[derive(Parser, Debug)]
#[command(name = "marksync", version, about, long_about = None)]
struct Cli {
    /// Markdown file to sync (a JSON content tree with --from-tree)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the rendered content tree as JSON
    #[arg(long)]
    tree: bool,

    /// Read FILE as a JSON content tree and extract Markdown from it
    #[arg(long, conflicts_with = "tree")]
    from_tree: bool,

    /// Save the extracted Markdown to PATH
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also write an HTML export next to the output or input
    #[arg(long)]
    export_html: bool,

    /// Watch FILE for changes and re-sync
    #[arg(short, long)]
    watch: bool,

    /// Refuse to render Markdown larger than BYTES
    #[arg(long, value_name = "BYTES")]
    render_limit: Option<usize>,

    /// Log timing for render and extract passes
    #[arg(long)]
    perf: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    perf::set_enabled(effective.perf || cli.perf);

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let app = App::new(cli.file)
        .with_watch(effective.watch || cli.watch)
        .with_tree_output(cli.tree)
        .with_from_tree(cli.from_tree)
        .with_output(cli.output)
        .with_export_html(effective.export_html || cli.export_html)
        .with_render_limit(cli.render_limit.or(effective.render_limit))
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}
