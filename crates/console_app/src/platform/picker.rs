//! Interactive project picker.
//!
//! Each input line replaces the project-name field. Lookups go out only
//! after typing pauses, and only for names that pass validation.

use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use console_core::{ApplyOutcome, ErrorSink, ImageName, ProjectTypeahead};
use console_engine::{EngineEvent, EngineHandle};
use console_logging::{console_debug, console_info};

use super::effects::{failure_from, suggestions_from, TerminalSink};
use super::settings::ConsoleSettings;
use super::ui::render;

const LOOP_SLEEP: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PickerInput {
    Text(String),
    Choose(usize),
    Done,
    Cancel,
}

pub(crate) fn parse_input(line: &str) -> PickerInput {
    let trimmed = line.trim();
    match trimmed {
        ":done" => PickerInput::Done,
        ":q" | ":quit" => PickerInput::Cancel,
        _ => match trimmed.strip_prefix(':').and_then(|n| n.parse().ok()) {
            Some(index) => PickerInput::Choose(index),
            None => PickerInput::Text(trimmed.to_string()),
        },
    }
}

pub fn run_picker(
    settings: &ConsoleSettings,
    repo: Option<String>,
    tag: Option<String>,
) -> anyhow::Result<()> {
    let engine = EngineHandle::new(settings.client_settings()).context("starting engine")?;
    let mut typeahead = ProjectTypeahead::default();
    let mut sink = TerminalSink::default();

    let (line_tx, line_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                return;
            }
        }
        let _ = line_tx.send(":q".to_string());
    });
    println!("type a project name; :<n> picks a suggestion, :done accepts, :q aborts");

    let project = 'session: loop {
        while let Ok(line) = line_rx.try_recv() {
            match parse_input(&line) {
                PickerInput::Text(name) => {
                    if let Err(err) = typeahead.input(&name, Instant::now()) {
                        console_debug!("Rejected project name {:?}: {}", name, err);
                        print!("{}", render::render_suggestions(&typeahead));
                    }
                }
                PickerInput::Choose(index) => {
                    let chosen = index
                        .checked_sub(1)
                        .and_then(|i| typeahead.suggestions().get(i))
                        .map(|s| s.name.clone());
                    match chosen {
                        Some(name) => {
                            typeahead.select(&name);
                            println!("selected {name}");
                        }
                        None => println!("no suggestion {index}"),
                    }
                }
                PickerInput::Done => match typeahead.submit() {
                    Ok(name) => break 'session name.to_string(),
                    Err(err) => {
                        println!("{err}");
                        print!("{}", render::render_suggestions(&typeahead));
                    }
                },
                PickerInput::Cancel => bail!("project selection aborted"),
            }
        }

        if let Some(query) = typeahead.poll(Instant::now()) {
            console_debug!("Looking up projects matching {:?}", query);
            engine.lookup_projects(query);
        }

        while let Some(event) = engine.try_recv() {
            let EngineEvent::ProjectsFetched { query, result } = event else {
                continue;
            };
            let result = result
                .map(suggestions_from)
                .map_err(|err| failure_from(&err));
            match typeahead.apply_results(&query, result) {
                ApplyOutcome::Applied => print!("{}", render::render_suggestions(&typeahead)),
                ApplyOutcome::Failed(failure) => {
                    sink.report(&failure);
                    print!("{}", render::render_suggestions(&typeahead));
                }
                ApplyOutcome::Stale => {}
            }
        }
        for notice in sink.take_notices() {
            println!("{notice}");
        }

        thread::sleep(LOOP_SLEEP);
    };

    console_info!("Project {} chosen", project);

    match repo {
        Some(repo) => {
            let tag = tag.unwrap_or_else(|| "latest".to_string());
            let image = ImageName::new(project, repo, tag).context("invalid image reference")?;
            println!("{image}");
        }
        None => println!("{project}"),
    }
    Ok(())
}
