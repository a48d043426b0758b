//! Posting and single-post lookup.

use actix_web::{HttpResponse, web};
use chirp_shared::dto::{PostTweetRequest, PostTweetResponse};

use super::tweet_response;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Publish a post.
///
/// POST /api/tweets
pub async fn post_tweet(
    state: web::Data<AppState>,
    body: web::Json<PostTweetRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id is required".to_string()));
    }
    if req.body.trim().is_empty() {
        return Err(AppError::BadRequest("tweet body is required".to_string()));
    }

    let tweet_id = state.timeline.post(&req.user_id, &req.body).await?;

    Ok(HttpResponse::Created().json(PostTweetResponse {
        message: "Tweet posted successfully".to_string(),
        tweet_id,
    }))
}

/// Fetch one post by id.
///
/// GET /api/tweets/{id}
pub async fn get_tweet(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.timeline.get_post(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tweet_response(post)))
}
