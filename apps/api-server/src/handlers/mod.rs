//! HTTP handlers and route configuration.

mod follow;
mod health;
mod timeline;
mod tweets;

use actix_web::web;
use chirp_core::domain::Post;
use chirp_shared::dto::TweetResponse;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/tweets", web::post().to(tweets::post_tweet))
            .route("/tweets/{id}", web::get().to(tweets::get_tweet))
            .route("/follow", web::post().to(follow::follow_user))
            .route("/users/{id}/following", web::get().to(follow::list_following))
            .route("/users/{id}/followers", web::get().to(follow::list_followers))
            .route("/timeline/{user_id}", web::get().to(timeline::get_timeline)),
    );
}

fn tweet_response(post: Post) -> TweetResponse {
    TweetResponse {
        tweet_id: post.id,
        user_id: post.author_id,
        body: post.body,
        created_at: post.created_at,
    }
}

#[cfg(test)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure($crate::handlers::configure_routes),
        )
        .await
    };
}

#[cfg(test)]
pub(crate) use test_app;
