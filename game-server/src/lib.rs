use serde::Deserialize;
use std::sync::Arc;
use warp::Filter;

use crate::config::Config;
use crate::game_manager::GameManager;
use crate::websocket::ConnectionManager;
use crate::websocket::rate_limiter::RateLimiter;
use game_types::{CreateRoomResponse, JoinRoomResponse};

pub mod config;
pub mod game_manager;
pub mod websocket;

#[derive(Deserialize)]
struct JoinRoomQuery {
    #[serde(rename = "roomID")]
    room_id: Option<String>,
}

pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    game_manager: Arc<GameManager>,
    config: &Config,
) -> impl Filter<Extract = impl warp::Reply + use<>, Error = warp::Rejection> + Clone + use<> {
    let connection_manager_filter = warp::any().map({
        let connection_manager = connection_manager.clone();
        move || connection_manager.clone()
    });

    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    let rate_limiter_filter = warp::any().map({
        let burst = config.rate_limit_burst;
        let per_second = config.rate_limit_per_second;
        move || RateLimiter::new(burst, per_second)
    });

    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(connection_manager_filter)
        .and(game_manager_filter.clone())
        .and(rate_limiter_filter)
        .map(|ws: warp::ws::Ws, conn_mgr, game_mgr, rate_limiter| {
            ws.on_upgrade(move |socket| {
                websocket::handle_connection(socket, conn_mgr, game_mgr, rate_limiter)
            })
        });

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    let create_room = warp::path("create-room")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_create_room);

    let join_room = warp::path("join-room")
        .and(warp::get())
        .and(warp::query::<JoinRoomQuery>())
        .and(game_manager_filter.clone())
        .and_then(handle_join_room);

    let list_rooms = warp::path("list-rooms")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_list_rooms);

    let random_room = warp::path("random-room")
        .and(warp::get())
        .and(game_manager_filter)
        .and_then(handle_random_room);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .or(create_room)
        .or(join_room)
        .or(list_rooms)
        .or(random_room)
        .with(cors)
        .with(warp::log("draw_guess"))
}

async fn handle_create_room(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let code = game_manager.create_room().await;
    Ok(warp::reply::json(&CreateRoomResponse {
        room_id: code.to_string(),
    }))
}

async fn handle_join_room(
    query: JoinRoomQuery,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let response = match query.room_id {
        Some(room_id) if game_manager.room_exists(&room_id).await => JoinRoomResponse {
            success: true,
            room_id: Some(room_id.trim().to_ascii_uppercase()),
        },
        _ => JoinRoomResponse {
            success: false,
            room_id: None,
        },
    };
    Ok(warp::reply::json(&response))
}

async fn handle_list_rooms(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&game_manager.list_rooms().await))
}

async fn handle_random_room(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&game_manager.random_room().await))
}
