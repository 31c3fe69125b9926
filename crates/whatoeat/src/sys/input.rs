use crate::events::AppEvent;
use async_channel::Sender;
use carousel::DataSource;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Maps one line of user input to an event.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_ascii_lowercase();
    let arg = words.next();

    match (command.as_str(), arg) {
        ("spin" | "s", None) => Some(AppEvent::Spin),
        ("swipe" | "go", Some(index)) => index.parse().ok().map(AppEvent::Swipe),
        ("flip" | "f", None) => Some(AppEvent::Flip(None)),
        ("flip" | "f", Some(index)) => index.parse().ok().map(|i| AppEvent::Flip(Some(i))),
        ("source", Some(name)) => DataSource::from_str(name).ok().map(AppEvent::SwitchSource),
        ("map", None) => Some(AppEvent::ShowMap),
        ("hide", None) => Some(AppEvent::HideMap),
        ("reload", None) => Some(AppEvent::ConfigReload),
        ("quit" | "exit" | "q", None) => Some(AppEvent::Quit),
        _ => None,
    }
}

/// Forwards commands read from `reader` until it is exhausted or a quit
/// command is forwarded, then asks the model to quit.
pub async fn run_input<R>(reader: R, tx: Sender<AppEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match parse_command(&line) {
                Some(event) => {
                    let quit = event == AppEvent::Quit;
                    if tx.send(event).await.is_err() || quit {
                        return;
                    }
                }
                None => log::warn!("Unknown command: {}", line.trim()),
            },
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    let _ = tx.send(AppEvent::Quit).await;
}

pub async fn run_stdin(tx: Sender<AppEvent>) {
    run_input(BufReader::new(tokio::io::stdin()), tx).await;
}
