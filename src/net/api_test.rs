use super::*;

// =============================================================
// Paths
// =============================================================

#[test]
fn board_paths_format_expected_routes() {
    assert_eq!(boards_path(), "/boards");
    assert_eq!(board_cards_path(BoardId(3)), "/boards/3/cards");
}

#[test]
fn card_paths_format_expected_routes() {
    assert_eq!(card_path(CardId(11)), "/cards/11");
    assert_eq!(card_like_path(CardId(11), true), "/cards/11/increase");
    assert_eq!(card_like_path(CardId(11), false), "/cards/11/decrease");
}

#[test]
fn url_joins_base_and_path() {
    let config = ClientConfig::new("http://127.0.0.1:5000/").unwrap();
    let api = HttpBoardApi::new(&config).unwrap();
    assert_eq!(api.url("/boards"), "http://127.0.0.1:5000/boards");
}

#[test]
fn request_route_reads_method_and_path_from_built_request() {
    let config = ClientConfig::new("http://127.0.0.1:5000").unwrap();
    let api = HttpBoardApi::new(&config).unwrap();

    let like = api.http.patch(api.url(&card_like_path(CardId(11), true))).build().unwrap();
    assert_eq!(request_route(&like), (reqwest::Method::PATCH, "/cards/11/increase".to_owned()));

    let remove = api.http.delete(api.url(&card_path(CardId(11)))).build().unwrap();
    assert_eq!(request_route(&remove), (reqwest::Method::DELETE, "/cards/11".to_owned()));

    let create = api
        .http
        .post(api.url(&board_cards_path(BoardId(3))))
        .json(&NewCardRequest::new("Stay positive"))
        .build()
        .unwrap();
    assert_eq!(request_route(&create), (reqwest::Method::POST, "/boards/3/cards".to_owned()));
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_boards_keeps_server_order() {
    let text = r#"[
        {"board_id": 2, "title": "Later", "owner": "Bo"},
        {"board_id": 1, "title": "Ideas", "owner": "Ana"}
    ]"#;
    let boards = parse_boards(text).unwrap();
    let ids: Vec<i64> = boards.iter().map(|b| b.board_id.0).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(boards[1].title, "Ideas");
    assert_eq!(boards[1].owner, "Ana");
}

#[test]
fn parse_boards_empty_list() {
    assert!(parse_boards("[]").unwrap().is_empty());
}

#[test]
fn parse_boards_rejects_object_body() {
    let err = parse_boards(r#"{"board_id": 1}"#).unwrap_err();
    assert!(matches!(err, ApiError::Schema(_)));
}

#[test]
fn parse_created_board_unwraps_envelope() {
    let board = parse_created_board(r#"{"board": {"board_id": 9, "title": "T", "owner": "O"}}"#).unwrap();
    assert_eq!(board.board_id, BoardId(9));
}

#[test]
fn parse_created_board_requires_envelope() {
    let err = parse_created_board(r#"{"board_id": 9, "title": "T", "owner": "O"}"#).unwrap_err();
    assert!(matches!(err, ApiError::Schema(_)));
}

#[test]
fn parse_card_normalizes_fields() {
    let card = parse_card(r#"{"card_id": 11, "message": "Stay positive", "likes_count": 1}"#).unwrap();
    assert_eq!(card.card_id, CardId(11));
    assert_eq!(card.message, "Stay positive");
    assert_eq!(card.likes_count, 1);
}

#[test]
fn parse_cards_passes_negative_count_through() {
    let text = r#"[
        {"card_id": 1, "message": "ok", "likes_count": 3},
        {"card_id": 2, "message": "below zero", "likes_count": -1}
    ]"#;
    let cards = parse_cards(text).unwrap();
    let counts: Vec<(i64, i64)> = cards.iter().map(|c| (c.card_id.0, c.likes_count)).collect();
    assert_eq!(counts, vec![(1, 3), (2, -1)]);
}

#[test]
fn parse_card_keeps_negative_count_from_like_response() {
    let card = parse_card(r#"{"card_id": 2, "message": "m", "likes_count": -2}"#).unwrap();
    assert_eq!(card.likes_count, -2);
}

#[test]
fn parse_card_rejects_empty_body() {
    assert!(matches!(parse_card(""), Err(ApiError::Schema(_))));
}
