use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use super::{acting_as, ApiError, AppState};
use crate::core::latest_per_conversation;
use crate::models::{MessageRequest, Passport, UserId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/messages", web::get().to(list_messages))
        .route("/messages", web::post().to(send_message))
        .route("/messages/lasts/{user_id}", web::get().to(last_messages))
        .route("/messages/{sender_id}/{receiver_id}", web::get().to(conversation));
}

/// Admins see every message, other callers their own
async fn list_messages(
    state: web::Data<AppState>,
    passport: Passport,
) -> Result<HttpResponse, ApiError> {
    let messages = if passport.admin {
        state.store.list_messages().await?
    } else {
        state.store.messages_of_user(passport.id).await?
    };

    Ok(HttpResponse::Ok().json(json!({ "messages": messages })))
}

async fn send_message(
    state: web::Data<AppState>,
    passport: Passport,
    req: web::Json<MessageRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let sender_id = acting_as(&passport, req.sender_id)?;

    let message = state
        .store
        .create_message(sender_id, req.receiver_id, &req.message)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}

/// Only the two participants, or an admin, may read a conversation
async fn conversation(
    state: web::Data<AppState>,
    passport: Passport,
    path: web::Path<(UserId, UserId)>,
) -> Result<HttpResponse, ApiError> {
    let (sender_id, receiver_id) = path.into_inner();
    if !passport.may_act_for(sender_id) && !passport.may_act_for(receiver_id) {
        return Err(ApiError::Forbidden(format!(
            "Not a participant in the conversation between {} and {}",
            sender_id, receiver_id
        )));
    }
    let messages = state.store.conversation(sender_id, receiver_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "messages": messages })))
}

/// Latest message of each conversation the user takes part in
async fn last_messages(
    state: web::Data<AppState>,
    passport: Passport,
    path: web::Path<UserId>,
) -> Result<HttpResponse, ApiError> {
    let user_id = acting_as(&passport, Some(path.into_inner()))?;
    let messages = state.store.messages_of_user(user_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "messages": latest_per_conversation(messages) })))
}
