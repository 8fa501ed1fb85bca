use anyhow::{Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use super::ui;
use crate::controller::{FormController, FormInput};
use crate::core::FormState;

pub const HELP: &str = "Commands: from <id> | to <id> | amount <text> | submit | quit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Input(FormInput),
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (verb, arg) = line.split_once(' ').unwrap_or((line, ""));
    let arg = arg.trim().to_string();

    let command = match verb.to_lowercase().as_str() {
        "from" => Command::Input(FormInput::FromAccount(arg)),
        "to" => Command::Input(FormInput::ToAccount(arg)),
        "amount" => Command::Input(FormInput::Amount(arg)),
        "submit" => Command::Input(FormInput::Submit),
        "quit" | "exit" => Command::Quit,
        _ => bail!("Unknown command: {line}"),
    };
    Ok(command)
}

/// Feeds commands read from `reader` through the debounced form and prints
/// each new outcome as it settles.
pub async fn run<R>(controller: &mut FormController, reader: R)
where
    R: AsyncBufRead + Unpin,
{
    super::simulate::load(controller).await;
    println!("{}", ui::render_sources(controller.state()));
    println!("{}", ui::style_text(HELP, ui::StyleType::Subtle));

    let (input_tx, input_rx) = mpsc::channel(32);
    let (update_tx, update_rx) = watch::channel(controller.state().clone());

    tokio::join!(
        controller.run(input_rx, update_tx),
        read_commands(reader, input_tx),
        print_updates(update_rx),
    );
}

async fn read_commands<R>(reader: R, inputs: mpsc::Sender<FormInput>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read input");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Input(input)) => {
                if inputs.send(input).await.is_err() {
                    break;
                }
            }
            Ok(Command::Quit) => break,
            Err(e) => println!("{}\n{}", ui::style_text(&e.to_string(), ui::StyleType::Error), HELP),
        }
    }
    debug!("Input closed");
}

async fn print_updates(mut updates: watch::Receiver<FormState>) {
    let mut last = updates.borrow_and_update().clone();
    while updates.changed().await.is_ok() {
        let state = updates.borrow_and_update().clone();
        if state.result != last.result || state.error != last.error {
            println!("{}", ui::render_state(&state));
        }
        last = state;
    }
}
