//! Follow edges.

use actix_web::{HttpResponse, web};
use chirp_shared::dto::{FollowRequest, FollowersResponse, FollowingResponse, MessageResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Record that `follower_id` follows `followee_id`.
///
/// POST /api/follow
pub async fn follow_user(
    state: web::Data<AppState>,
    body: web::Json<FollowRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    state
        .timeline
        .follow(&req.follower_id, &req.followee_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Followed successfully".to_string(),
    }))
}

/// GET /api/users/{id}/following
pub async fn list_following(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    let mut following = state.timeline.list_followees(&user_id).await?;
    following.sort();

    Ok(HttpResponse::Ok().json(FollowingResponse { user_id, following }))
}

/// GET /api/users/{id}/followers
pub async fn list_followers(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    let mut followers = state.timeline.list_followers(&user_id).await?;
    followers.sort();

    Ok(HttpResponse::Ok().json(FollowersResponse { user_id, followers }))
}
