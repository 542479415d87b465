//! Line-oriented terminal shell over `BoardSync`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell is the presentation layer: it parses typed commands into
//! intents, dispatches them, and re-renders the state snapshot whenever a
//! completion lands. Input keeps flowing while calls are in flight, so a user
//! can switch boards before the previous board's cards arrive; the core drops
//! whatever comes back late.

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::net::api::BoardApi;
use crate::net::types::{BoardId, CardId};
use crate::state::store::{InspoState, Outcome};
use crate::state::sync::{BoardSync, Intent};

pub const HELP: &str = "\
commands:
  boards                    show boards, selection, cards
  reload                    fetch the board list again
  select <board_id>         select a board and load its cards
  board <title> | <owner>   create a board
  card <message>            add a card to the selected board
  delete <card_id>          delete a card
  like <card_id>            +1 a card
  unlike <card_id>          -1 a card
  edit <card_id> <message>  change a card's message
  help                      show this help
  quit                      exit
";

/// One parsed line of shell input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns a `ParseError` for unknown commands or malformed arguments.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "boards" | "show" => Command::Show,
        "reload" => Command::Intent(Intent::LoadBoards),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "select" => {
            let board_id = parse_id(rest).ok_or(ParseError::Usage("select <board_id>"))?;
            Command::Intent(Intent::SelectBoard(BoardId(board_id)))
        }
        "board" => {
            let (title, owner) = rest
                .split_once('|')
                .ok_or(ParseError::Usage("board <title> | <owner>"))?;
            Command::Intent(Intent::SubmitBoard { title: title.trim().to_owned(), owner: owner.trim().to_owned() })
        }
        "card" => Command::Intent(Intent::SubmitCard { message: rest.to_owned() }),
        "delete" => {
            let card_id = parse_id(rest).ok_or(ParseError::Usage("delete <card_id>"))?;
            Command::Intent(Intent::DeleteCard(CardId(card_id)))
        }
        "like" | "unlike" => {
            let card_id = parse_id(rest).ok_or(ParseError::Usage("like|unlike <card_id>"))?;
            Command::Intent(Intent::ToggleLike { card_id: CardId(card_id), liked: word == "like" })
        }
        "edit" => {
            let usage = ParseError::Usage("edit <card_id> <message>");
            let (id, message) = rest.split_once(char::is_whitespace).ok_or(usage.clone())?;
            let card_id = parse_id(id).ok_or(usage)?;
            Command::Intent(Intent::EditCardMessage { card_id: CardId(card_id), message: message.trim().to_owned() })
        }
        other => return Err(ParseError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Render a snapshot of the four state cells.
#[must_use]
pub fn render(state: &InspoState) -> String {
    let mut out = String::new();
    let selected_id = state.selected_board().map(|b| b.board_id);

    out.push_str("Boards:\n");
    if state.boards().is_empty() {
        out.push_str("  (none)\n");
    }
    for board in state.boards() {
        let marker = if Some(board.board_id) == selected_id { " *" } else { "" };
        let _ = writeln!(out, "  [{}] {} ({}){marker}", board.board_id, board.title, board.owner);
    }

    match state.selected_board() {
        Some(board) => {
            let _ = writeln!(out, "Selected: {} by {}", board.title, board.owner);
            out.push_str("Cards:\n");
            if state.cards().is_empty() {
                out.push_str("  (none)\n");
            }
            for card in state.cards() {
                let _ = writeln!(out, "  #{} {}  [likes: {}]", card.card_id, card.message, card.likes_count);
            }
        }
        None => out.push_str("Selected: (none)\n"),
    }

    if let Some(error) = state.error() {
        let _ = writeln!(out, "Error: {error}");
    }
    out
}

async fn write_str<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}

/// Drive the shell until `quit` or end of input.
///
/// Loads the board list first, then interleaves input lines with completions
/// of dispatched calls. Outstanding calls are settled before returning.
///
/// # Errors
///
/// Returns an I/O error if reading input or writing output fails.
pub async fn run<A, R, W>(sync: &mut BoardSync<A>, input: R, output: &mut W) -> std::io::Result<()>
where
    A: BoardApi + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    sync.initialize().await;
    write_str(output, &render(sync.state())).await?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => write_str(output, HELP).await?,
                    Ok(Some(Command::Show)) => write_str(output, &render(sync.state())).await?,
                    Ok(Some(Command::Intent(intent))) => {
                        tracing::debug!(?intent, "dispatching");
                        if let Err(e) = sync.dispatch(intent) {
                            write_str(output, &format!("! {e}\n")).await?;
                        }
                    }
                    Err(e) => write_str(output, &format!("! {e}\n")).await?,
                }
            }
            Some(outcome) = sync.settle(), if sync.has_pending() => {
                if outcome != Outcome::Stale {
                    write_str(output, &render(sync.state())).await?;
                }
            }
        }
    }

    if sync.has_pending() {
        sync.settle_all().await;
        write_str(output, &render(sync.state())).await?;
    }
    Ok(())
}
