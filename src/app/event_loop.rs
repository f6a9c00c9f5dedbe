use std::fs;
use std::io::{BufRead, Write, stdin, stdout};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::app::{App, Message, Model, StatusLevel};
use crate::document::ContentNode;
use crate::sync::EditorSurface;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

impl App {
    /// Load the input, sync it through the editor and print the result.
    ///
    /// With watching enabled this keeps polling the input file and re-syncs
    /// on every change until stdin closes during a confirmation prompt.
    /// Closed input declines the prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or parsed, the watcher
    /// cannot be created, or writing to stdout fails.
    pub fn run(&self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");
        tracing::debug!(
            global = ?self.config_global_path,
            local = ?self.config_local_path,
            "config paths"
        );

        let mut model = Model::with_render_limit(self.render_limit);
        let raw = self.read_input()?;
        if self.from_tree {
            let tree = parse_tree(&raw)?;
            Self::dispatch(
                &mut model,
                Message::Open {
                    content: String::new(),
                    origin: None,
                },
            );
            Self::dispatch(&mut model, Message::TreeEdited(tree));
        } else {
            Self::dispatch(
                &mut model,
                Message::Open {
                    content: raw,
                    origin: Some(self.file_path.clone()),
                },
            );
        }
        self.finish_pass(&mut model)?;

        if !self.watch_enabled {
            return Ok(());
        }

        let mut watcher = Self::make_file_watcher(&self.file_path)
            .with_context(|| format!("Failed to watch {}", self.file_path.display()))?;
        tracing::info!(path = %watcher.target_path().display(), "watching for changes");

        while !model.should_quit {
            std::thread::sleep(POLL_INTERVAL);
            if !watcher.take_change_ready() {
                continue;
            }
            let raw = match self.read_input() {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::warn!(error = %err, "reload failed");
                    continue;
                }
            };
            if self.from_tree {
                match parse_tree(&raw) {
                    Ok(tree) => Self::dispatch(&mut model, Message::TreeEdited(tree)),
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring malformed tree");
                        continue;
                    }
                }
            } else {
                Self::dispatch(&mut model, Message::FileChanged(raw));
            }
            if let Some(prompt) = model.confirmation_prompt()
                && !Self::answer_prompt(&mut model, ask(prompt)?)
            {
                tracing::info!("input closed; stopping watch");
                break;
            }
            self.finish_pass(&mut model)?;
        }
        Ok(())
    }

    /// Resolve the pending prompt. `None` (closed input) answers no.
    ///
    /// Returns false when input is closed and the loop should stop.
    pub(super) fn answer_prompt(model: &mut Model, answer: Option<bool>) -> bool {
        Self::dispatch(model, Message::Confirm(answer.unwrap_or(false)));
        answer.is_some()
    }

    fn read_input(&self) -> Result<String> {
        let _scope = crate::perf::scope("app.read_file");
        fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))
    }

    /// Persist and print the current document.
    fn finish_pass(&self, model: &mut Model) -> Result<()> {
        report_status(model);
        if let Some(output) = self.output_path.clone() {
            Self::dispatch(model, Message::EditorUpdated);
            Self::dispatch(model, Message::Save(output));
            report_status(model);
        }
        if self.export_html {
            let target = self.export_target(model);
            Self::dispatch(model, Message::ExportHtml(target));
            report_status(model);
        }

        let mut out = stdout().lock();
        if self.tree_output {
            let json = serde_json::to_string_pretty(model.sync.editor().tree())
                .context("Failed to encode content tree")?;
            writeln!(out, "{json}")?;
        } else {
            writeln!(out, "{}", model.sync.editor().markdown())?;
        }
        out.flush()?;
        Ok(())
    }
}

fn parse_tree(raw: &str) -> Result<ContentNode> {
    serde_json::from_str(raw).context("Failed to parse content tree JSON")
}

fn report_status(model: &Model) {
    if let Some((message, level)) = model.active_status() {
        match level {
            StatusLevel::Info => tracing::info!("{message}"),
            StatusLevel::Warning => eprintln!("[warn] {message}"),
            StatusLevel::Error => eprintln!("[error] {message}"),
        }
    }
}

/// Ask a yes/no question on stderr. `None` when stdin is closed.
fn ask(prompt: &str) -> Result<Option<bool>> {
    eprint!("{prompt} ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    if stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    Ok(Some(
        answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"),
    ))
}
