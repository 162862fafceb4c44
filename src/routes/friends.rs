use actix_web::{web, HttpResponse};
use serde_json::json;

use super::{acting_as, ApiError, AppState};
use crate::models::{FriendshipRequest, Passport, UserId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/friends", web::get().to(list_friendships))
        .route("/friends", web::post().to(add_friend))
        .route("/friends/{user_id}", web::get().to(friends_of_user))
        .route("/friends/{user_id}/{friend_id}", web::get().to(get_friendship));
}

async fn list_friendships(
    state: web::Data<AppState>,
    _passport: Passport,
) -> Result<HttpResponse, ApiError> {
    let friends = state.store.list_friendships(None).await?;

    Ok(HttpResponse::Ok().json(json!({ "friends": friends })))
}

/// POST /api/v1/friends
///
/// `from` defaults to the caller; friendships are undirected.
async fn add_friend(
    state: web::Data<AppState>,
    passport: Passport,
    req: web::Json<FriendshipRequest>,
) -> Result<HttpResponse, ApiError> {
    let from = acting_as(&passport, req.from)?;

    let friendship = state.store.create_friendship(from, req.to).await?;

    tracing::debug!("Friendship {} between {} and {}", friendship.id, from, req.to);

    Ok(HttpResponse::Ok().json(json!({ "friends": friendship })))
}

async fn friends_of_user(
    state: web::Data<AppState>,
    _passport: Passport,
    path: web::Path<UserId>,
) -> Result<HttpResponse, ApiError> {
    let friends = state.store.list_friendships(Some(path.into_inner())).await?;

    Ok(HttpResponse::Ok().json(json!({ "friends": friends })))
}

async fn get_friendship(
    state: web::Data<AppState>,
    _passport: Passport,
    path: web::Path<(UserId, UserId)>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, friend_id) = path.into_inner();

    let friend = state
        .store
        .find_friendship(user_id, friend_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Users {} and {} are not friends",
                user_id, friend_id
            ))
        })?;

    Ok(HttpResponse::Ok().json(json!({ "friend": friend })))
}
