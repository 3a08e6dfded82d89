use std::sync::Arc;

use chrono::Utc;

use postline_core::auth::UserContext;
use postline_core::comment::{
    authorize_comment_mutation, hash_secret, Comment, CommentAuthPolicy, CommentView,
    CreateCommentRequest, Credentials, DeleteCommentRequest, Denied, NewComment,
    UpdateCommentRequest,
};
use postline_core::events::{DomainEvent, EventBus};
use postline_core::post::validate_comment_content;
use postline_core::storage::CommentRepository;

use super::{publish, Result, ServiceError};
use crate::cache::CommentListCache;

/// Comment lifecycle with a cached, newest-first list per post.
///
/// Every write evicts the list of the affected post instead of patching it.
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    cache: CommentListCache,
    events: Arc<dyn EventBus>,
    policy: CommentAuthPolicy,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        cache: CommentListCache,
        events: Arc<dyn EventBus>,
        policy: CommentAuthPolicy,
    ) -> Self {
        Self {
            comments,
            cache,
            events,
            policy,
        }
    }

    pub async fn create_comment(
        &self,
        user: &UserContext,
        request: CreateCommentRequest,
    ) -> Result<Comment> {
        validate_comment_content(&request.content)?;

        let mut comment = NewComment::new(
            request.post_id,
            user.id,
            user.display_name.clone(),
            request.content,
        );

        if self.policy == CommentAuthPolicy::SharedSecret {
            let password = request
                .password
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    ServiceError::InvalidInput("password is required for comments".to_string())
                })?;
            comment = comment.with_secret_hash(hash_secret(&password)?);
        }

        let comment = self.comments.insert_comment(comment).await?;

        publish(
            self.events.as_ref(),
            DomainEvent::comment_created(&comment, Utc::now()),
        )
        .await;
        self.evict(comment.post_id).await;

        tracing::info!(
            comment_id = comment.id,
            post_id = comment.post_id,
            "Created comment"
        );
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        id: i64,
        user: Option<UserContext>,
        request: UpdateCommentRequest,
    ) -> Result<Comment> {
        validate_comment_content(&request.content)?;

        let comment = self.load_authorized(id, user, request.password).await?;

        let updated = self
            .comments
            .update_comment_content(comment.id, &request.content)
            .await?;

        publish(
            self.events.as_ref(),
            DomainEvent::comment_updated(&updated, Utc::now()),
        )
        .await;
        self.evict(updated.post_id).await;

        tracing::info!(comment_id = id, post_id = updated.post_id, "Updated comment");
        Ok(updated)
    }

    pub async fn delete_comment(
        &self,
        id: i64,
        user: Option<UserContext>,
        request: DeleteCommentRequest,
    ) -> Result<()> {
        let comment = self.load_authorized(id, user, request.password).await?;

        self.comments.delete_comment(comment.id).await?;

        publish(
            self.events.as_ref(),
            DomainEvent::comment_deleted(comment.id, comment.post_id, Utc::now()),
        )
        .await;
        self.evict(comment.post_id).await;

        tracing::info!(comment_id = id, post_id = comment.post_id, "Deleted comment");
        Ok(())
    }

    /// All comments of a post, newest first.
    pub async fn get_comments_by_post(&self, post_id: i64) -> Result<Vec<CommentView>> {
        match self.cache.get_cached_comments(post_id).await {
            Ok(Some(comments)) => {
                tracing::trace!(post_id, count = comments.len(), "Cache hit for comments");
                return Ok(comments);
            }
            Ok(None) => tracing::trace!(post_id, "Cache miss for comments"),
            Err(err) => tracing::warn!(post_id, error = %err, "Comment cache lookup failed"),
        }

        let comments: Vec<CommentView> = self
            .comments
            .list_comments_by_post(post_id)
            .await?
            .into_iter()
            .map(CommentView::from)
            .collect();

        if let Err(err) = self.cache.cache_comments(post_id, &comments).await {
            tracing::warn!(post_id, error = %err, "Failed to cache comments");
        }

        Ok(comments)
    }

    async fn load_authorized(
        &self,
        id: i64,
        user: Option<UserContext>,
        password: Option<String>,
    ) -> Result<Comment> {
        let comment = self
            .comments
            .get_comment(id)
            .await?
            .ok_or_else(|| ServiceError::comment_not_found(id))?;

        let credentials = Credentials {
            user,
            secret: password,
        };

        authorize_comment_mutation(self.policy, &comment, &credentials).map_err(|denied| {
            tracing::warn!(
                comment_id = id,
                caller_id = ?credentials.user.as_ref().map(|u| u.id),
                reason = %denied,
                "Comment mutation denied"
            );
            access_denied(denied)
        })?;

        Ok(comment)
    }

    async fn evict(&self, post_id: i64) {
        if let Err(err) = self.cache.evict(post_id).await {
            tracing::warn!(post_id, error = %err, "Failed to evict cached comments");
        }
    }
}

fn access_denied(denied: Denied) -> ServiceError {
    ServiceError::AccessDenied {
        entity_type: "Comment",
        reason: denied.to_string(),
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use std::time::Duration;

    use postline_core::cache::{comment_list_key, Cache};
    use postline_core::events::{COMMENT_CREATED, COMMENT_DELETED, COMMENT_UPDATED};

    use crate::cache::{MemoryCache, MemoryEventBus};
    use crate::services::testing::{CountingRepository, FailingBus, FailingCache};

    struct Harness {
        service: CommentService,
        repo: Arc<CountingRepository>,
        cache: Arc<MemoryCache>,
        events: Arc<MemoryEventBus>,
    }

    fn harness(policy: CommentAuthPolicy) -> Harness {
        let repo = Arc::new(CountingRepository::default());
        let cache = Arc::new(MemoryCache::new(NonZeroUsize::new(100).unwrap()));
        let events = Arc::new(MemoryEventBus::new());

        let service = CommentService::new(
            repo.clone(),
            CommentListCache::new(cache.clone() as Arc<dyn Cache>, Duration::from_secs(60)),
            events.clone(),
            policy,
        );

        Harness {
            service,
            repo,
            cache,
            events,
        }
    }

    fn user(id: i64) -> UserContext {
        UserContext::new(id, format!("user{id}"), format!("user{id}@example.com"))
    }

    #[tokio::test]
    async fn test_create_comment_publishes_and_evicts() {
        let h = harness(CommentAuthPolicy::Ownership);
        let mut created = h.events.subscribe(COMMENT_CREATED).await.unwrap();

        h.service.get_comments_by_post(1).await.unwrap();
        assert!(h.cache.get(&comment_list_key(1)).await.unwrap().is_some());

        let comment = h
            .service
            .create_comment(&user(1), CreateCommentRequest::new(1, "hello"))
            .await
            .unwrap();

        assert_eq!(comment.owner_id, 1);
        assert_eq!(comment.secret_hash, None);
        assert_eq!(created.recv().await.unwrap().key, comment.id.to_string());
        assert!(h.cache.get(&comment_list_key(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_comments_listed_newest_first_and_cached() {
        let h = harness(CommentAuthPolicy::Ownership);
        for content in ["first", "second"] {
            h.service
                .create_comment(&user(1), CreateCommentRequest::new(1, content))
                .await
                .unwrap();
        }

        let first = h.service.get_comments_by_post(1).await.unwrap();
        let second = h.service.get_comments_by_post(1).await.unwrap();

        let contents: Vec<&str> = first.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["second", "first"]);
        assert_eq!(first, second);
        assert_eq!(h.repo.list_comments_count(), 1);
    }

    #[tokio::test]
    async fn test_writes_invalidate_comment_list() {
        let h = harness(CommentAuthPolicy::Ownership);
        let comment = h
            .service
            .create_comment(&user(1), CreateCommentRequest::new(1, "original"))
            .await
            .unwrap();
        h.service.get_comments_by_post(1).await.unwrap();

        h.service
            .update_comment(comment.id, Some(user(1)), UpdateCommentRequest::new("edited"))
            .await
            .unwrap();
        let after_update = h.service.get_comments_by_post(1).await.unwrap();
        assert_eq!(after_update[0].content, "edited");

        h.service
            .delete_comment(comment.id, Some(user(1)), DeleteCommentRequest::default())
            .await
            .unwrap();
        assert!(h.service.get_comments_by_post(1).await.unwrap().is_empty());
        assert_eq!(h.repo.list_comments_count(), 3);
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_denied() {
        let h = harness(CommentAuthPolicy::Ownership);
        let mut updated = h.events.subscribe(COMMENT_UPDATED).await.unwrap();
        let comment = h
            .service
            .create_comment(&user(1), CreateCommentRequest::new(1, "original"))
            .await
            .unwrap();

        let result = h
            .service
            .update_comment(comment.id, Some(user(2)), UpdateCommentRequest::new("hijacked"))
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::AccessDenied {
                entity_type: "Comment",
                ..
            })
        ));
        let stored = h.repo.get_comment(comment.id).await.unwrap().unwrap();
        assert_eq!(stored.content, "original");
        assert!(updated.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delete_without_caller_is_denied() {
        let h = harness(CommentAuthPolicy::Ownership);
        let comment = h
            .service
            .create_comment(&user(1), CreateCommentRequest::new(1, "keep me"))
            .await
            .unwrap();

        let result = h
            .service
            .delete_comment(comment.id, None, DeleteCommentRequest::default())
            .await;

        assert!(matches!(result, Err(ServiceError::AccessDenied { .. })));
        assert!(h.repo.get_comment(comment.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_comment_is_not_found() {
        let h = harness(CommentAuthPolicy::Ownership);
        let mut deleted = h.events.subscribe(COMMENT_DELETED).await.unwrap();
        h.service.get_comments_by_post(1).await.unwrap();

        let result = h
            .service
            .delete_comment(42, Some(user(1)), DeleteCommentRequest::default())
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::NotFound {
                entity_type: "Comment",
                id: 42
            })
        ));
        assert!(deleted.try_recv().is_err());
        assert!(h.cache.get(&comment_list_key(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blank_update_is_invalid() {
        let h = harness(CommentAuthPolicy::Ownership);
        let result = h
            .service
            .update_comment(1, Some(user(1)), UpdateCommentRequest::new(" "))
            .await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_shared_secret_requires_password_on_create() {
        let h = harness(CommentAuthPolicy::SharedSecret);
        let result = h
            .service
            .create_comment(&user(1), CreateCommentRequest::new(1, "hello"))
            .await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_cached_list_carries_no_secret_hash() {
        let h = harness(CommentAuthPolicy::SharedSecret);
        h.service
            .create_comment(
                &user(1),
                CreateCommentRequest::new(1, "hello").with_password("hunter2"),
            )
            .await
            .unwrap();

        let listed = h.service.get_comments_by_post(1).await.unwrap();
        assert_eq!(listed[0].content, "hello");

        let cached = h.cache.get(&comment_list_key(1)).await.unwrap().unwrap();
        let json = String::from_utf8(cached).unwrap();
        assert!(json.contains("hello"));
        assert!(!json.contains("secretHash"));
    }

    #[tokio::test]
    async fn test_shared_secret_mutations_check_password_only() {
        let h = harness(CommentAuthPolicy::SharedSecret);
        let comment = h
            .service
            .create_comment(
                &user(1),
                CreateCommentRequest::new(1, "hello").with_password("hunter2"),
            )
            .await
            .unwrap();
        assert!(comment.secret_hash.is_some());

        let wrong = h
            .service
            .update_comment(
                comment.id,
                Some(user(1)),
                UpdateCommentRequest::new("x").with_password("nope"),
            )
            .await;
        assert!(matches!(wrong, Err(ServiceError::AccessDenied { .. })));

        let updated = h
            .service
            .update_comment(
                comment.id,
                None,
                UpdateCommentRequest::new("edited").with_password("hunter2"),
            )
            .await
            .unwrap();
        assert_eq!(updated.content, "edited");

        h.service
            .delete_comment(
                comment.id,
                Some(user(99)),
                DeleteCommentRequest {
                    password: Some("hunter2".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(h.repo.get_comment(comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_and_bus_failures_never_surface() {
        let repo = Arc::new(CountingRepository::default());
        let bus = Arc::new(FailingBus::default());
        let service = CommentService::new(
            repo.clone(),
            CommentListCache::new(Arc::new(FailingCache) as Arc<dyn Cache>, Duration::from_secs(60)),
            bus.clone(),
            CommentAuthPolicy::Ownership,
        );

        let comment = service
            .create_comment(&user(1), CreateCommentRequest::new(1, "hello"))
            .await
            .unwrap();
        assert_eq!(
            service.get_comments_by_post(1).await.unwrap(),
            vec![CommentView::from(comment.clone())]
        );

        service
            .delete_comment(comment.id, Some(user(1)), DeleteCommentRequest::default())
            .await
            .unwrap();
        assert_eq!(bus.publish_count(), 2);
    }
}
