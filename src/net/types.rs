//! Board and card DTOs for the client/service boundary.
//!
//! DESIGN
//! ======
//! The service speaks snake_case JSON (`board_id`, `likes_count`). Wire
//! structs mirror that schema exactly and are converted into the client's
//! own `Board`/`Card` shapes at the transport boundary, so state code never
//! sees a partially-shaped payload. Every wire field is required: a missing
//! key fails deserialization instead of defaulting.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// IDS
// =============================================================================

/// Server-assigned board identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub i64);

/// Server-assigned card identifier, unique within one board's card set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub i64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// CLIENT SHAPES
// =============================================================================

/// A board as held in client state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub board_id: BoardId,
    pub title: String,
    pub owner: String,
}

/// A card as held in client state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub card_id: CardId,
    pub message: String,
    /// Server-confirmed like count, taken as-is. Never adjusted locally.
    pub likes_count: i64,
}

// =============================================================================
// WIRE SHAPES
// =============================================================================

/// Board record as returned by `GET /boards`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiBoard {
    pub board_id: i64,
    pub title: String,
    pub owner: String,
}

/// Envelope returned by `POST /boards`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBoardEnvelope {
    pub board: ApiBoard,
}

/// Card record as returned by every card endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCard {
    pub card_id: i64,
    pub message: String,
    pub likes_count: i64,
}

/// Body for `POST /boards`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewBoardRequest<'a> {
    pub title: &'a str,
    pub owner: &'a str,
}

/// Body for `POST /boards/{id}/cards`. New cards always start unliked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewCardRequest<'a> {
    pub message: &'a str,
    pub likes_count: i64,
}

impl<'a> NewCardRequest<'a> {
    #[must_use]
    pub fn new(message: &'a str) -> Self {
        Self { message, likes_count: 0 }
    }
}

/// Body for `PATCH /cards/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessagePatch<'a> {
    pub message: &'a str,
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<ApiBoard> for Board {
    fn from(api: ApiBoard) -> Self {
        Self { board_id: BoardId(api.board_id), title: api.title, owner: api.owner }
    }
}

impl From<ApiCard> for Card {
    fn from(api: ApiCard) -> Self {
        Self { card_id: CardId(api.card_id), message: api.message, likes_count: api.likes_count }
    }
}
