//! Intent driver: binds `InspoState` to a `BoardApi` transport.
//!
//! DESIGN
//! ======
//! An intent runs in two halves. `prepare` does the synchronous part against
//! state (start a selection, capture a ticket, check preconditions) and
//! yields a `Request`. `perform` runs the remote call and turns its result
//! into an `Event` that `InspoState::apply` folds back in.
//!
//! Awaited methods (`select_board`, `submit_card`, ...) run both halves in
//! line. `dispatch` instead spawns the call on tokio and delivers its
//! completion over a channel; `settle` applies completions one at a time.
//! Either way only the owner of `BoardSync` ever touches state, so
//! completions can land in any order without locking.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::sync::Arc;

use tokio::sync::mpsc;

use super::store::{Event, InspoState, Outcome, SelectionTicket, SyncError};
use crate::net::api::BoardApi;
use crate::net::types::{BoardId, CardId};

/// A user action forwarded by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Fetch the board list (startup, or on demand).
    LoadBoards,
    SelectBoard(BoardId),
    SubmitBoard { title: String, owner: String },
    SubmitCard { message: String },
    DeleteCard(CardId),
    ToggleLike { card_id: CardId, liked: bool },
    EditCardMessage { card_id: CardId, message: String },
}

/// A remote call with everything it needs captured up front.
#[derive(Debug)]
enum Request {
    Boards,
    Cards(SelectionTicket),
    CreateBoard { title: String, owner: String },
    CreateCard { ticket: SelectionTicket, message: String },
    Delete { ticket: SelectionTicket, card_id: CardId },
    Like { ticket: SelectionTicket, card_id: CardId, liked: bool },
    Edit { ticket: SelectionTicket, card_id: CardId, message: String },
}

async fn perform<A: BoardApi + ?Sized>(api: &A, request: Request) -> Event {
    match request {
        Request::Boards => Event::BoardsLoaded(api.list_boards().await),
        Request::Cards(ticket) => Event::CardsLoaded { ticket, result: api.list_cards(ticket.board_id).await },
        Request::CreateBoard { title, owner } => Event::BoardCreated(api.create_board(&title, &owner).await),
        Request::CreateCard { ticket, message } => {
            Event::CardCreated { ticket, result: api.create_card(ticket.board_id, &message).await }
        }
        Request::Delete { ticket, card_id } => {
            Event::CardDeleted { ticket, card_id, result: api.delete_card(card_id).await }
        }
        Request::Like { ticket, card_id, liked } => {
            Event::CardLiked { ticket, card_id, result: api.set_card_like(card_id, liked).await }
        }
        Request::Edit { ticket, card_id, message } => {
            Event::CardEdited { ticket, card_id, result: api.update_card_message(card_id, &message).await }
        }
    }
}

pub struct BoardSync<A: BoardApi + 'static> {
    api: Arc<A>,
    state: InspoState,
    completions_tx: mpsc::UnboundedSender<Event>,
    completions_rx: mpsc::UnboundedReceiver<Event>,
    in_flight: usize,
}

impl<A: BoardApi + 'static> BoardSync<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::with_shared(Arc::new(api))
    }

    #[must_use]
    pub fn with_shared(api: Arc<A>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self { api, state: InspoState::new(), completions_tx, completions_rx, in_flight: 0 }
    }

    /// Read-only view for rendering.
    #[must_use]
    pub fn state(&self) -> &InspoState {
        &self.state
    }

    /// Number of dispatched calls whose completion has not been applied.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.in_flight > 0
    }

    fn prepare(&mut self, intent: Intent) -> Result<Request, SyncError> {
        match intent {
            Intent::LoadBoards => Ok(Request::Boards),
            Intent::SelectBoard(board_id) => Ok(Request::Cards(self.state.begin_select(board_id)?)),
            Intent::SubmitBoard { title, owner } => Ok(Request::CreateBoard { title, owner }),
            Intent::SubmitCard { message } => {
                Ok(Request::CreateCard { ticket: self.state.selection_ticket()?, message })
            }
            Intent::DeleteCard(card_id) => Ok(Request::Delete { ticket: self.state.card_ticket(card_id)?, card_id }),
            Intent::ToggleLike { card_id, liked } => {
                Ok(Request::Like { ticket: self.state.card_ticket(card_id)?, card_id, liked })
            }
            Intent::EditCardMessage { card_id, message } => {
                Ok(Request::Edit { ticket: self.state.card_ticket(card_id)?, card_id, message })
            }
        }
    }

    // =========================================================================
    // AWAITED INTENTS
    // =========================================================================

    /// Run one intent to completion and apply its result.
    ///
    /// # Errors
    ///
    /// Returns a `SyncError` when the intent's precondition fails; no remote
    /// call is made in that case.
    pub async fn run(&mut self, intent: Intent) -> Result<Outcome, SyncError> {
        let request = self.prepare(intent)?;
        let event = perform(self.api.as_ref(), request).await;
        Ok(self.state.apply(event))
    }

    /// Startup load of the board list. Failures leave the list empty.
    pub async fn initialize(&mut self) -> Outcome {
        let event = perform(self.api.as_ref(), Request::Boards).await;
        self.state.apply(event)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the board is not in the current list.
    pub async fn select_board(&mut self, board_id: BoardId) -> Result<Outcome, SyncError> {
        self.run(Intent::SelectBoard(board_id)).await
    }

    /// Create a board. Transport failures land in the error cell.
    pub async fn submit_board(&mut self, title: &str, owner: &str) -> Outcome {
        let request = Request::CreateBoard { title: title.to_owned(), owner: owner.to_owned() };
        let event = perform(self.api.as_ref(), request).await;
        self.state.apply(event)
    }

    /// # Errors
    ///
    /// Returns `NoBoardSelected` when there is no selection.
    pub async fn submit_card(&mut self, message: &str) -> Result<Outcome, SyncError> {
        self.run(Intent::SubmitCard { message: message.to_owned() }).await
    }

    /// # Errors
    ///
    /// Returns a `SyncError` if the card is not on the selected board.
    pub async fn delete_card(&mut self, card_id: CardId) -> Result<Outcome, SyncError> {
        self.run(Intent::DeleteCard(card_id)).await
    }

    /// # Errors
    ///
    /// Returns a `SyncError` if the card is not on the selected board.
    pub async fn toggle_like(&mut self, card_id: CardId, liked: bool) -> Result<Outcome, SyncError> {
        self.run(Intent::ToggleLike { card_id, liked }).await
    }

    /// # Errors
    ///
    /// Returns a `SyncError` if the card is not on the selected board.
    pub async fn edit_card_message(&mut self, card_id: CardId, message: &str) -> Result<Outcome, SyncError> {
        self.run(Intent::EditCardMessage { card_id, message: message.to_owned() })
            .await
    }

    // =========================================================================
    // DISPATCHED INTENTS
    // =========================================================================

    /// Apply the synchronous half of `intent` and spawn its remote call.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns a `SyncError` when the intent's precondition fails; nothing is
    /// spawned in that case.
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), SyncError> {
        let request = self.prepare(intent)?;
        let api = Arc::clone(&self.api);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let event = perform(api.as_ref(), request).await;
            // Receiver lives as long as `BoardSync`; a send failure means it was dropped.
            let _ = tx.send(event);
        });
        Ok(())
    }

    /// Wait for the next dispatched completion and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn settle(&mut self) -> Option<Outcome> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.completions_rx.recv().await?;
        self.in_flight -= 1;
        Some(self.state.apply(event))
    }

    /// Apply every outstanding completion, in arrival order.
    pub async fn settle_all(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(self.in_flight);
        while let Some(outcome) = self.settle().await {
            outcomes.push(outcome);
        }
        outcomes
    }
}
