#[cfg(test)]
mod tests {
    use crate::database::entity::{follow, post, timeline_entry};
    use crate::database::postgres_repo::{
        PostgresSocialGraph, PostgresTimelineIndex, PostgresTweetStore,
    };
    use chirp_core::domain::{FollowEdge, Post, PostIdGenerator};
    use chirp_core::error::RepoError;
    use chirp_core::ports::{SocialGraphStore, TimelineIndex, TweetStore};
    use sea_orm::{DatabaseBackend, DbConn, DbErr, MockDatabase, MockExecResult};
    use std::sync::Arc;

    /// Take the connection back from a store once it has been dropped.
    fn into_log(db: Arc<DbConn>) -> String {
        let db = Arc::into_inner(db).expect("store still holds the connection");
        format!("{:?}", db.into_transaction_log())
    }

    fn inserted() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post = Post::new(PostIdGenerator::new().next_stamp(), "u2", "Hello World");

        // Mock the query expectation
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: post.id.clone(),
                author_id: post.author_id.clone(),
                body: post.body.clone(),
                created_at: post.created_at.into(),
            }]])
            .into_connection();

        let store = PostgresTweetStore::new(Arc::new(db));
        let found = store.get(&post.id).await.unwrap();

        assert_eq!(found, post);
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let store = PostgresTweetStore::new(Arc::new(db));
        assert!(matches!(store.get("42").await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_post_id_is_a_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors(vec![DbErr::Custom(
                "duplicate key value violates unique constraint \"posts_pkey\"".to_string(),
            )])
            .into_connection();

        let store = PostgresTweetStore::new(Arc::new(db));
        let post = Post::new(PostIdGenerator::new().next_stamp(), "u1", "again");

        assert!(matches!(
            store.put(&post).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_ignores_existing_edge() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                inserted(),
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let db = Arc::new(db);

        let graph = PostgresSocialGraph::new(db.clone());
        let edge = FollowEdge::new("u1", "u2").unwrap();

        graph.follow(&edge).await.unwrap();
        graph.follow(&edge).await.unwrap();

        drop(graph);
        let log = into_log(db);
        assert_eq!(log.matches("ON CONFLICT").count(), 2);
    }

    #[tokio::test]
    async fn test_followees_and_followers_read_opposite_columns() {
        let edge = follow::Model {
            follower_id: "u1".to_string(),
            followee_id: "u2".to_string(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![edge.clone()], vec![edge]])
            .into_connection();

        let graph = PostgresSocialGraph::new(Arc::new(db));

        assert_eq!(graph.list_followees("u1").await.unwrap(), vec!["u2"]);
        assert_eq!(graph.list_followers("u2").await.unwrap(), vec!["u1"]);
    }

    #[tokio::test]
    async fn test_timeline_index_lists_in_sequence_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![inserted()])
            .append_query_results(vec![vec![
                timeline_entry::Model {
                    seq: 1,
                    user_id: "u1".to_string(),
                    post_id: "00000000000000000001".to_string(),
                },
                timeline_entry::Model {
                    seq: 2,
                    user_id: "u1".to_string(),
                    post_id: "00000000000000000002".to_string(),
                },
            ]])
            .into_connection();
        let db = Arc::new(db);

        let index = PostgresTimelineIndex::new(db.clone());
        index.append("u1", "00000000000000000002").await.unwrap();

        assert_eq!(
            index.list_ids("u1").await.unwrap(),
            vec!["00000000000000000001", "00000000000000000002"]
        );

        drop(index);
        assert!(into_log(db).contains("ORDER BY"));
    }
}
