use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::messaging::{
    ContactView, ContactsResponse, ConversationParams, ConversationResponse, InboxParams,
    InboxResponse, SendMessageRequest, SendMessageResponse,
};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Lists everyone the caller has exchanged messages with, with unread counts.
pub async fn contacts(auth_user: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    let contacts = state.message_service.contacts(caller.id).await?;
    let contacts = contacts
        .into_iter()
        .map(|summary| ContactView {
            id: summary.contact.id,
            name: summary.contact.display_name().to_string(),
            unread_count: summary.unread_count,
        })
        .collect();
    Ok(Json(ContactsResponse { contacts }))
}

/// Returns the full two-way thread with a contact, oldest first.
///
/// Fetching a thread marks every unread message from that contact as read.
///
/// # Errors
/// Returns `AppError::BadRequest` if `contact_id` is missing.
/// Returns `AppError::NotFound` if the contact does not exist.
pub async fn conversation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ConversationParams>,
) -> Result<impl IntoResponse> {
    let contact_id = params
        .contact_id
        .ok_or_else(|| AppError::BadRequest("contact_id is required".to_string()))?;

    let conversation =
        state.message_service.fetch_thread_and_mark_read(auth_user.user_id, contact_id).await?;

    Ok(Json(ConversationResponse::from(conversation)))
}

/// # Errors
/// Returns `AppError::BadRequest` if `recipient_id` or `content` is missing or
/// the content is blank.
/// Returns `AppError::NotFound` if the recipient does not exist.
pub async fn send_message(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    let (recipient_id, content) = match (payload.recipient_id, payload.content) {
        (Some(recipient_id), Some(content)) => (recipient_id, content),
        _ => return Err(AppError::BadRequest("recipient_id and content are required".to_string())),
    };

    let sent = state
        .message_service
        .send_message(auth_user.user_id, recipient_id, &content, payload.subject)
        .await?;

    // Plain 200; clients look at the `success` flag, not the status class.
    Ok((StatusCode::OK, Json(SendMessageResponse::from(sent))))
}

/// Lists messages received by the caller, newest first, optionally filtered
/// by read state.
pub async fn inbox(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<InboxParams>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    let filter = params.filter.map(Into::into).unwrap_or_default();
    let (entries, unread_count) = state.message_service.inbox(caller.id, filter, None).await?;

    Ok(Json(InboxResponse {
        messages: entries.into_iter().map(Into::into).collect(),
        unread_count,
    }))
}
