use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use console_core::{update, ExecutionId, Msg, PanelState, QueryState};
use console_engine::{EngineHandle, ReplicationService, ReqwestRegistryClient};
use console_logging::{console_debug, console_info};

use super::effects::{EffectRunner, TerminalSink};
use super::settings::ConsoleSettings;
use super::ui::render;

const LOOP_SLEEP: Duration = Duration::from_millis(20);

const HELP: &str = "commands: search <term> | filter <field> | page <n> | size <n> | refresh | \
stop | log <task id> | help | quit";

pub struct WatchOptions {
    pub execution_id: ExecutionId,
    pub filter_field: String,
    pub search: Option<String>,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Panel(Msg),
    ShowLog(i64),
    Help,
    Quit,
}

pub(crate) fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let number = |what: &str| -> Result<u32, String> {
        rest.parse()
            .map_err(|_| format!("{what} needs a number, got {rest:?}"))
    };
    match word {
        "search" | "s" => Ok(Command::Panel(Msg::SearchSubmitted(rest.to_string()))),
        "filter" | "f" if !rest.is_empty() => {
            Ok(Command::Panel(Msg::FilterFieldSelected(rest.to_string())))
        }
        "filter" | "f" => Err("filter needs a field name".to_string()),
        "page" | "p" => Ok(Command::Panel(Msg::PageSelected(number("page")?))),
        "size" => Ok(Command::Panel(Msg::PageSizeSelected(number("size")?))),
        "refresh" | "r" | "" => Ok(Command::Panel(Msg::RefreshClicked)),
        "stop" => Ok(Command::Panel(Msg::StopClicked)),
        "log" => rest
            .parse()
            .map(Command::ShowLog)
            .map_err(|_| format!("log needs a task id, got {rest:?}")),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command {other:?}; type help")),
    }
}

/// Reads stdin on its own thread; end of input counts as quit.
fn spawn_input_reader(tx: mpsc::Sender<String>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                return;
            }
        }
        let _ = tx.send("quit".to_string());
    });
}

pub fn run_watch(settings: &ConsoleSettings, options: WatchOptions) -> anyhow::Result<()> {
    let client = ReqwestRegistryClient::new(settings.client_settings())
        .context("invalid registry settings")?;
    let engine = EngineHandle::new(settings.client_settings()).context("starting engine")?;
    let mut runner = EffectRunner::new(engine, TerminalSink::default());

    let mut query = QueryState::new(options.filter_field);
    query
        .set_page_size(options.page_size)
        .context("invalid page size")?;
    if let Some(term) = &options.search {
        query.set_search_term(term);
    }
    let mut state = PanelState::with_query(options.execution_id, query, settings.poll_interval());

    let (line_tx, line_rx) = mpsc::channel();
    spawn_input_reader(line_tx);
    println!("{HELP}");

    let (next, effects) = update(state, Msg::Init);
    state = next;
    runner.run(effects);

    'session: loop {
        while let Ok(line) = line_rx.try_recv() {
            match parse_command(&line) {
                Ok(Command::Panel(msg)) => {
                    let (next, effects) = update(state, msg);
                    state = next;
                    runner.run(effects);
                }
                Ok(Command::ShowLog(task_id)) => {
                    println!("{}", client.task_log_url(options.execution_id, task_id));
                }
                Ok(Command::Help) => println!("{HELP}"),
                Ok(Command::Quit) => break 'session,
                Err(message) => println!("{message}"),
            }
        }

        while let Some(msg) = runner.next_msg() {
            let (next, effects) = update(state, msg);
            state = next;
            runner.run(effects);
        }

        let notices = runner.sink_mut().take_notices();
        if state.consume_dirty() || !notices.is_empty() {
            println!("{}", render::render_panel(&state.view()));
            for notice in notices {
                println!("{notice}");
            }
            print!("> ");
            let _ = io::stdout().flush();
        }

        thread::sleep(LOOP_SLEEP);
    }

    console_info!("Closing panel for execution {}", options.execution_id);
    let (_state, effects) = update(state, Msg::Teardown);
    console_debug!("Teardown effects: {:?}", effects);
    runner.run(effects);
    Ok(())
}
