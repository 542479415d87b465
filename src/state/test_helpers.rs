//! In-memory board service for driving `BoardSync` in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::net::api::BoardApi;
use crate::net::error::ApiError;
use crate::net::types::{Board, BoardId, Card, CardId};

#[derive(Default)]
struct MockInner {
    boards: Vec<Board>,
    cards: HashMap<BoardId, Vec<Card>>,
    next_board_id: i64,
    next_card_id: i64,
    failures: HashMap<&'static str, ApiError>,
    card_gates: HashMap<BoardId, oneshot::Receiver<()>>,
    calls: Vec<String>,
}

/// Fake service with real create/like/delete semantics and scriptable failures.
#[derive(Default)]
pub struct MockApi {
    inner: Mutex<MockInner>,
}

impl MockApi {
    #[must_use]
    pub fn new() -> Self {
        let api = Self::default();
        {
            let mut inner = api.lock();
            inner.next_board_id = 100;
            inner.next_card_id = 1000;
        }
        api
    }

    #[must_use]
    pub fn with_board(self, id: i64, title: &str, owner: &str) -> Self {
        self.lock().boards.push(Board {
            board_id: BoardId(id),
            title: title.to_owned(),
            owner: owner.to_owned(),
        });
        self
    }

    #[must_use]
    pub fn with_card(self, board_id: i64, id: i64, message: &str, likes: i64) -> Self {
        self.lock()
            .cards
            .entry(BoardId(board_id))
            .or_default()
            .push(Card { card_id: CardId(id), message: message.to_owned(), likes_count: likes });
        self
    }

    /// Make every call to `op` fail with `error` until `clear_failure`.
    pub fn fail(&self, op: &'static str, error: ApiError) {
        self.lock().failures.insert(op, error);
    }

    pub fn clear_failure(&self, op: &'static str) {
        self.lock().failures.remove(op);
    }

    /// Hold the next `list_cards(board_id)` until the returned sender fires.
    pub fn gate_cards(&self, board_id: i64) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().card_gates.insert(BoardId(board_id), rx);
        tx
    }

    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap()
    }

    /// Record the call and return the scripted failure for `op`, if any.
    fn enter(&self, op: &'static str, call: String) -> Result<(), ApiError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        match inner.failures.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn rejected(details: &str) -> ApiError {
        ApiError::Status { status: 400, body: serde_json::json!({ "details": details }).to_string() }
    }

    fn missing() -> ApiError {
        ApiError::Status { status: 404, body: String::new() }
    }

    fn with_card_mut(&self, card_id: CardId, f: impl FnOnce(&mut Card)) -> Result<Card, ApiError> {
        let mut inner = self.lock();
        let card = inner
            .cards
            .values_mut()
            .flat_map(|cards| cards.iter_mut())
            .find(|c| c.card_id == card_id)
            .ok_or_else(Self::missing)?;
        f(card);
        Ok(card.clone())
    }
}

#[async_trait::async_trait]
impl BoardApi for MockApi {
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        self.enter("list_boards", "list_boards".to_owned())?;
        Ok(self.lock().boards.clone())
    }

    async fn list_cards(&self, board_id: BoardId) -> Result<Vec<Card>, ApiError> {
        let gate = self.lock().card_gates.remove(&board_id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.enter("list_cards", format!("list_cards {board_id}"))?;
        Ok(self.lock().cards.get(&board_id).cloned().unwrap_or_default())
    }

    async fn create_board(&self, title: &str, owner: &str) -> Result<Board, ApiError> {
        self.enter("create_board", format!("create_board {title}"))?;
        if title.is_empty() {
            return Err(Self::rejected("title required"));
        }
        let mut inner = self.lock();
        inner.next_board_id += 1;
        let board = Board { board_id: BoardId(inner.next_board_id), title: title.to_owned(), owner: owner.to_owned() };
        inner.boards.push(board.clone());
        Ok(board)
    }

    async fn create_card(&self, board_id: BoardId, message: &str) -> Result<Card, ApiError> {
        self.enter("create_card", format!("create_card {board_id}"))?;
        if message.is_empty() {
            return Err(Self::rejected("message required"));
        }
        let mut inner = self.lock();
        inner.next_card_id += 1;
        let card = Card { card_id: CardId(inner.next_card_id), message: message.to_owned(), likes_count: 0 };
        inner.cards.entry(board_id).or_default().push(card.clone());
        Ok(card)
    }

    async fn set_card_like(&self, card_id: CardId, liked: bool) -> Result<Card, ApiError> {
        self.enter("set_card_like", format!("set_card_like {card_id} {liked}"))?;
        self.with_card_mut(card_id, |card| {
            card.likes_count = if liked { card.likes_count + 1 } else { card.likes_count - 1 };
        })
    }

    async fn update_card_message(&self, card_id: CardId, message: &str) -> Result<Card, ApiError> {
        self.enter("update_card_message", format!("update_card_message {card_id}"))?;
        self.with_card_mut(card_id, |card| message.clone_into(&mut card.message))
    }

    async fn delete_card(&self, card_id: CardId) -> Result<(), ApiError> {
        self.enter("delete_card", format!("delete_card {card_id}"))?;
        let mut inner = self.lock();
        for cards in inner.cards.values_mut() {
            if let Some(pos) = cards.iter().position(|c| c.card_id == card_id) {
                cards.remove(pos);
                return Ok(());
            }
        }
        Err(Self::missing())
    }
}
