//! Client-side projection of the board service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `InspoState` owns the four cells the shell renders: the board list, the
//! selected board, that board's cards, and the single pending error. Every
//! change arrives as an `Event` (a completed remote call) and goes through
//! `apply`, so transitions are testable without a transport.
//!
//! STALE COMPLETIONS
//! =================
//! Each selection bumps a token. Card fetches and card mutations carry the
//! ticket they were issued under; a completion whose token no longer matches
//! the live one is dropped. The card list only ever describes the currently
//! selected board. A late card create still updates the error cell, which is
//! global rather than per board.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use crate::net::error::{ApiError, extract_message};
use crate::net::types::{Board, BoardId, Card, CardId};

/// Monotonic counter identifying one selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectionToken(u64);

/// The selection a card request was issued under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionTicket {
    pub board_id: BoardId,
    pub token: SelectionToken,
}

/// Precondition failures detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("board {0} not found")]
    NotFound(BoardId),

    #[error("no board selected")]
    NoBoardSelected,

    #[error("card {0} is not on the selected board")]
    CardNotFound(CardId),
}

/// A completed remote call, ready to be folded into state.
#[derive(Debug, Clone)]
pub enum Event {
    BoardsLoaded(Result<Vec<Board>, ApiError>),
    CardsLoaded { ticket: SelectionTicket, result: Result<Vec<Card>, ApiError> },
    BoardCreated(Result<Board, ApiError>),
    CardCreated { ticket: SelectionTicket, result: Result<Card, ApiError> },
    CardDeleted { ticket: SelectionTicket, card_id: CardId, result: Result<(), ApiError> },
    CardLiked { ticket: SelectionTicket, card_id: CardId, result: Result<Card, ApiError> },
    CardEdited { ticket: SelectionTicket, card_id: CardId, result: Result<Card, ApiError> },
}

/// What `apply` did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// State changed to reflect the completion.
    Applied,
    /// The call failed; `error` may have been set per policy.
    Failed,
    /// The completion belonged to a selection that is no longer live.
    Stale,
}

#[derive(Clone, Debug, Default)]
pub struct InspoState {
    boards: Vec<Board>,
    selected_board: Option<Board>,
    cards: Vec<Card>,
    error: Option<String>,
    token: SelectionToken,
}

impl InspoState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    #[must_use]
    pub fn selected_board(&self) -> Option<&Board> {
        self.selected_board.as_ref()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn find_board(&self, board_id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| b.board_id == board_id)
    }

    #[must_use]
    pub fn find_card(&self, card_id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.card_id == card_id)
    }

    /// Whether `ticket` still describes the live selection.
    #[must_use]
    pub fn is_current(&self, ticket: SelectionTicket) -> bool {
        ticket.token == self.token
            && self
                .selected_board
                .as_ref()
                .is_some_and(|b| b.board_id == ticket.board_id)
    }

    // =========================================================================
    // INTENT PREPARATION
    // =========================================================================

    /// Start a new selection and return the ticket its card fetch must carry.
    ///
    /// The previous card list is discarded immediately, and any request
    /// issued under an earlier selection becomes stale.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `board_id` is not in the board list; the
    /// selection is left unset.
    pub fn begin_select(&mut self, board_id: BoardId) -> Result<SelectionTicket, SyncError> {
        self.token = SelectionToken(self.token.0.wrapping_add(1));
        self.cards = Vec::new();
        self.selected_board = self.find_board(board_id).cloned();
        if self.selected_board.is_none() {
            tracing::warn!(%board_id, "selected board not in list");
            return Err(SyncError::NotFound(board_id));
        }
        Ok(SelectionTicket { board_id, token: self.token })
    }

    /// Ticket for a request against the selected board.
    ///
    /// # Errors
    ///
    /// Returns `NoBoardSelected` when there is no selection.
    pub fn selection_ticket(&self) -> Result<SelectionTicket, SyncError> {
        let board = self.selected_board.as_ref().ok_or(SyncError::NoBoardSelected)?;
        Ok(SelectionTicket { board_id: board.board_id, token: self.token })
    }

    /// Ticket for a request that targets one card of the selected board.
    ///
    /// # Errors
    ///
    /// Returns `NoBoardSelected` without a selection, or `CardNotFound` if the
    /// card is not in the current list.
    pub fn card_ticket(&self, card_id: CardId) -> Result<SelectionTicket, SyncError> {
        let ticket = self.selection_ticket()?;
        if self.find_card(card_id).is_none() {
            return Err(SyncError::CardNotFound(card_id));
        }
        Ok(ticket)
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Fold one completion into state.
    pub fn apply(&mut self, event: Event) -> Outcome {
        match event {
            Event::BoardsLoaded(result) => self.apply_boards_loaded(result),
            Event::CardsLoaded { ticket, result } => {
                if !self.is_current(ticket) {
                    tracing::debug!(board_id = %ticket.board_id, "dropping stale card list");
                    return Outcome::Stale;
                }
                match result {
                    Ok(cards) => {
                        tracing::info!(board_id = %ticket.board_id, count = cards.len(), "cards loaded");
                        self.cards = cards;
                        Outcome::Applied
                    }
                    Err(e) => {
                        tracing::warn!(board_id = %ticket.board_id, error = %e, "card list fetch failed");
                        Outcome::Failed
                    }
                }
            }
            Event::BoardCreated(result) => match result {
                Ok(board) => {
                    let board_id = board.board_id;
                    self.boards.retain(|b| b.board_id != board_id);
                    self.boards.insert(0, board);
                    self.error = None;
                    tracing::info!(%board_id, "board created");
                    Outcome::Applied
                }
                Err(e) => {
                    self.error = Some(extract_message(&e));
                    tracing::warn!(error = %e, "board create failed");
                    Outcome::Failed
                }
            },
            // The error cell is global, so it follows every create result.
            // Only the prepend is tied to the selection.
            Event::CardCreated { ticket, result } => match result {
                Ok(card) => {
                    self.error = None;
                    if !self.is_current(ticket) {
                        tracing::debug!(board_id = %ticket.board_id, "dropping card created under old selection");
                        return Outcome::Stale;
                    }
                    let card_id = card.card_id;
                    self.cards.retain(|c| c.card_id != card_id);
                    self.cards.insert(0, card);
                    tracing::info!(%card_id, "card created");
                    Outcome::Applied
                }
                Err(e) => {
                    self.error = Some(extract_message(&e));
                    tracing::warn!(error = %e, "card create failed");
                    Outcome::Failed
                }
            },
            Event::CardDeleted { ticket, card_id, result } => {
                if !self.is_current(ticket) {
                    return Outcome::Stale;
                }
                match result {
                    Ok(()) => {
                        self.cards.retain(|c| c.card_id != card_id);
                        tracing::info!(%card_id, "card deleted");
                        Outcome::Applied
                    }
                    Err(e) => {
                        tracing::warn!(%card_id, error = %e, "card delete failed");
                        Outcome::Failed
                    }
                }
            }
            Event::CardLiked { ticket, card_id, result } | Event::CardEdited { ticket, card_id, result } => {
                if !self.is_current(ticket) {
                    return Outcome::Stale;
                }
                match result {
                    Ok(card) => self.replace_card(card_id, card),
                    Err(e) => {
                        tracing::warn!(%card_id, error = %e, "card update failed");
                        Outcome::Failed
                    }
                }
            }
        }
    }

    fn apply_boards_loaded(&mut self, result: Result<Vec<Board>, ApiError>) -> Outcome {
        let boards = match result {
            Ok(boards) => boards,
            Err(e) => {
                tracing::warn!(error = %e, "board list fetch failed");
                return Outcome::Failed;
            }
        };
        tracing::info!(count = boards.len(), "boards loaded");
        self.boards = boards;

        if let Some(selected_id) = self.selected_board.as_ref().map(|b| b.board_id) {
            match self.find_board(selected_id).cloned() {
                Some(fresh) => self.selected_board = Some(fresh),
                None => {
                    self.token = SelectionToken(self.token.0.wrapping_add(1));
                    self.selected_board = None;
                    self.cards = Vec::new();
                }
            }
        }
        Outcome::Applied
    }

    /// Swap in the server's copy of a card at its existing position.
    fn replace_card(&mut self, card_id: CardId, card: Card) -> Outcome {
        if card.card_id != card_id {
            tracing::warn!(%card_id, returned = %card.card_id, "server returned a different card");
            return Outcome::Failed;
        }
        match self.cards.iter_mut().find(|c| c.card_id == card_id) {
            Some(slot) => {
                *slot = card;
                Outcome::Applied
            }
            None => {
                tracing::debug!(%card_id, "updated card no longer in list");
                Outcome::Stale
            }
        }
    }
}
