//! Timeline reads.

use actix_web::{HttpResponse, web};
use chirp_shared::dto::TimelineResponse;

use super::tweet_response;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// The user's feed, newest first.
///
/// GET /api/timeline/{user_id}
pub async fn get_timeline(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    let posts = state.timeline.get_timeline(&user_id).await?;

    Ok(HttpResponse::Ok().json(TimelineResponse {
        user_id,
        tweets: posts.into_iter().map(tweet_response).collect(),
    }))
}
