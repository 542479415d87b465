//! REST transport for the board service.
//!
//! DESIGN
//! ======
//! `BoardApi` is the seam between the synchronization core and the network.
//! `HttpBoardApi` is a thin `reqwest` wrapper: it performs one round trip per
//! call and hands the body text to pure `parse_*` helpers, so payload
//! normalization is testable without a server.
//!
//! ERROR HANDLING
//! ==============
//! Calls never panic; every outcome is an `ApiError` value. Non-2xx bodies are
//! kept verbatim so `extract_message` can decide what the user sees.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{
    ApiBoard, ApiCard, Board, BoardId, Card, CardId, CreatedBoardEnvelope, MessagePatch, NewBoardRequest,
    NewCardRequest,
};
use crate::config::ClientConfig;

// =============================================================================
// TRAIT
// =============================================================================

/// Remote operations the client needs from the board service.
#[async_trait::async_trait]
pub trait BoardApi: Send + Sync {
    /// `GET /boards`, in server order.
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError>;

    /// `GET /boards/{board_id}/cards`, in server order.
    async fn list_cards(&self, board_id: BoardId) -> Result<Vec<Card>, ApiError>;

    /// `POST /boards`.
    async fn create_board(&self, title: &str, owner: &str) -> Result<Board, ApiError>;

    /// `POST /boards/{board_id}/cards`. The new card starts with zero likes.
    async fn create_card(&self, board_id: BoardId, message: &str) -> Result<Card, ApiError>;

    /// `PATCH /cards/{card_id}/increase` when `liked`, `/decrease` otherwise.
    /// The returned card carries the server's count.
    async fn set_card_like(&self, card_id: CardId, liked: bool) -> Result<Card, ApiError>;

    /// `PATCH /cards/{card_id}`.
    async fn update_card_message(&self, card_id: CardId, message: &str) -> Result<Card, ApiError>;

    /// `DELETE /cards/{card_id}`.
    async fn delete_card(&self, card_id: CardId) -> Result<(), ApiError>;
}

// =============================================================================
// PATHS
// =============================================================================

fn boards_path() -> String {
    "/boards".to_owned()
}

fn board_cards_path(board_id: BoardId) -> String {
    format!("/boards/{board_id}/cards")
}

fn card_path(card_id: CardId) -> String {
    format!("/cards/{card_id}")
}

fn card_like_path(card_id: CardId, liked: bool) -> String {
    let endpoint = if liked { "increase" } else { "decrease" };
    format!("/cards/{card_id}/{endpoint}")
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpBoardApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBoardApi {
    /// Build a client for the configured service root.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a prepared request and return the body text of a 2xx response.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let request = request.build().map_err(|e| ApiError::Network(e.to_string()))?;
        let (method, path) = request_route(&request);
        tracing::debug!(%method, %path, "api request");

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "api request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%method, %path, status = status.as_u16(), "api returned error status");
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

/// Method and URL path of a built request, for logging.
fn request_route(request: &reqwest::Request) -> (reqwest::Method, String) {
    (request.method().clone(), request.url().path().to_owned())
}

#[async_trait::async_trait]
impl BoardApi for HttpBoardApi {
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        let path = boards_path();
        let body = self.execute(self.http.get(self.url(&path))).await?;
        parse_boards(&body)
    }

    async fn list_cards(&self, board_id: BoardId) -> Result<Vec<Card>, ApiError> {
        let path = board_cards_path(board_id);
        let body = self.execute(self.http.get(self.url(&path))).await?;
        parse_cards(&body)
    }

    async fn create_board(&self, title: &str, owner: &str) -> Result<Board, ApiError> {
        let path = boards_path();
        let request = self
            .http
            .post(self.url(&path))
            .json(&NewBoardRequest { title, owner });
        let body = self.execute(request).await?;
        parse_created_board(&body)
    }

    async fn create_card(&self, board_id: BoardId, message: &str) -> Result<Card, ApiError> {
        let path = board_cards_path(board_id);
        let request = self
            .http
            .post(self.url(&path))
            .json(&NewCardRequest::new(message));
        let body = self.execute(request).await?;
        parse_card(&body)
    }

    async fn set_card_like(&self, card_id: CardId, liked: bool) -> Result<Card, ApiError> {
        let path = card_like_path(card_id, liked);
        let body = self.execute(self.http.patch(self.url(&path))).await?;
        parse_card(&body)
    }

    async fn update_card_message(&self, card_id: CardId, message: &str) -> Result<Card, ApiError> {
        let path = card_path(card_id);
        let request = self
            .http
            .patch(self.url(&path))
            .json(&MessagePatch { message });
        let body = self.execute(request).await?;
        parse_card(&body)
    }

    async fn delete_card(&self, card_id: CardId) -> Result<(), ApiError> {
        let path = card_path(card_id);
        self.execute(self.http.delete(self.url(&path))).await?;
        Ok(())
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Schema(e.to_string()))
}

fn parse_boards(text: &str) -> Result<Vec<Board>, ApiError> {
    let boards: Vec<ApiBoard> = parse_json(text)?;
    Ok(boards.into_iter().map(Board::from).collect())
}

fn parse_created_board(text: &str) -> Result<Board, ApiError> {
    let envelope: CreatedBoardEnvelope = parse_json(text)?;
    Ok(Board::from(envelope.board))
}

fn parse_cards(text: &str) -> Result<Vec<Card>, ApiError> {
    let cards: Vec<ApiCard> = parse_json(text)?;
    Ok(cards.into_iter().map(Card::from).collect())
}

fn parse_card(text: &str) -> Result<Card, ApiError> {
    let card: ApiCard = parse_json(text)?;
    Ok(Card::from(card))
}
