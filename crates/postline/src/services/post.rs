use std::sync::Arc;

use chrono::Utc;

use postline_core::auth::UserContext;
use postline_core::events::{DomainEvent, EventBus};
use postline_core::post::{
    page_bounds, validate_page_request, validate_post_request, CreatePostRequest, NewPost, Page,
    PageRequest, Post,
};
use postline_core::storage::PostRepository;

use super::{publish, Result, ServiceError};
use crate::cache::PostCache;
use crate::recency::RecentPosts;

/// Post lifecycle: create, read by id, page newest first, delete.
///
/// Side effects after a store write (recency index, post cache, events) are
/// independent of each other. A failing one is logged and the rest still run.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    cache: PostCache,
    recent: Arc<dyn RecentPosts>,
    events: Arc<dyn EventBus>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        cache: PostCache,
        recent: Arc<dyn RecentPosts>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            posts,
            cache,
            recent,
            events,
        }
    }

    pub async fn create_post(&self, user: &UserContext, request: CreatePostRequest) -> Result<Post> {
        validate_post_request(&request)?;

        let post = self
            .posts
            .insert_post(NewPost::new(
                request.title,
                request.content,
                user.id,
                user.display_name.clone(),
            ))
            .await?;

        let expire_at = self.recent.calculate_expire_time();
        if let Err(err) = self.recent.add(&post, expire_at).await {
            tracing::warn!(post_id = post.id, error = %err, "Failed to add post to recency index");
        }

        if let Err(err) = self.cache.cache_post(&post).await {
            tracing::warn!(post_id = post.id, error = %err, "Failed to cache post");
        }

        publish(
            self.events.as_ref(),
            DomainEvent::post_created(&post, Utc::now()),
        )
        .await;

        tracing::info!(post_id = post.id, owner_id = post.owner_id, "Created post");
        Ok(post)
    }

    /// Cache first; on a miss the store is read and the cache refilled.
    pub async fn get_post(&self, id: i64) -> Result<Post> {
        match self.cache.get_cached_post(id).await {
            Ok(Some(post)) => {
                tracing::trace!(post_id = id, "Cache hit for post");
                return Ok(post);
            }
            Ok(None) => tracing::trace!(post_id = id, "Cache miss for post"),
            Err(err) => tracing::warn!(post_id = id, error = %err, "Post cache lookup failed"),
        }

        let post = self
            .posts
            .get_post(id)
            .await?
            .ok_or_else(|| ServiceError::post_not_found(id))?;

        if let Err(err) = self.cache.cache_post(&post).await {
            tracing::warn!(post_id = id, error = %err, "Failed to cache post");
        }

        Ok(post)
    }

    /// One page of posts, newest first.
    ///
    /// When the recency index fills the whole page it supplies the content and
    /// only the total comes from the store. Otherwise the page is read from
    /// the store entirely.
    pub async fn get_posts_by_page(&self, request: PageRequest) -> Result<Page<Post>> {
        validate_page_request(&request)?;

        let bounds = page_bounds(request.page, request.size);
        let recent = match self.recent.range(bounds.start, bounds.end).await {
            Ok(posts) => posts,
            Err(err) => {
                tracing::warn!(page = request.page, error = %err, "Recency index read failed");
                Vec::new()
            }
        };

        if recent.len() == bounds.len() {
            let total = self.posts.count_posts().await?;
            tracing::debug!(
                page = request.page,
                size = request.size,
                strategy = %self.recent.strategy(),
                "Serving page from recency index"
            );
            return Ok(Page::new(recent, request.page, request.size, total));
        }

        tracing::debug!(
            page = request.page,
            size = request.size,
            cached = recent.len(),
            "Recency index underfilled, reading page from store"
        );
        let (content, total) = self
            .posts
            .list_posts_newest_first(request.page, request.size)
            .await?;
        Ok(Page::new(content, request.page, request.size, total))
    }

    /// Deletes a post.
    ///
    /// The cached copies are dropped before the row, so a failed delete never
    /// leaves a stale cache entry behind. Comments of the post are kept.
    pub async fn delete_post(&self, id: i64) -> Result<()> {
        if !self.posts.post_exists(id).await? {
            return Err(ServiceError::post_not_found(id));
        }

        if let Err(err) = self.cache.remove_cached_post(id).await {
            tracing::warn!(post_id = id, error = %err, "Failed to remove cached post");
        }

        if let Err(err) = self.recent.remove(id).await {
            tracing::warn!(post_id = id, error = %err, "Failed to remove post from recency index");
        }

        self.posts.delete_post(id).await?;

        publish(self.events.as_ref(), DomainEvent::post_deleted(id, Utc::now())).await;

        tracing::info!(post_id = id, "Deleted post");
        Ok(())
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use std::time::Duration;

    use postline_core::cache::{
        encode_recent_member, Cache, SortedSetCache, RECENT_POSTS_KEY,
    };
    use postline_core::events::{POST_CREATED, POST_DELETED};

    use crate::cache::{MemoryCache, MemoryEventBus};
    use crate::recency::{ListRecentPosts, ScoredRecentPosts};
    use crate::services::testing::{CountingRepository, FailingBus, FailingCache};

    const WINDOW: Duration = Duration::from_secs(12 * 60 * 60);

    struct Harness {
        service: PostService,
        repo: Arc<CountingRepository>,
        cache: Arc<MemoryCache>,
        events: Arc<MemoryEventBus>,
    }

    fn scored_harness() -> Harness {
        let repo = Arc::new(CountingRepository::default());
        let cache = Arc::new(MemoryCache::new(NonZeroUsize::new(1_000).unwrap()));
        let events = Arc::new(MemoryEventBus::new());
        let recent: Arc<dyn RecentPosts> = Arc::new(ScoredRecentPosts::new(cache.clone(), WINDOW));

        let service = PostService::new(
            repo.clone(),
            PostCache::new(cache.clone() as Arc<dyn Cache>, Duration::from_secs(3600)),
            recent,
            events.clone(),
        );

        Harness {
            service,
            repo,
            cache,
            events,
        }
    }

    fn list_harness(capacity: usize) -> (PostService, Arc<MemoryCache>) {
        let repo = Arc::new(CountingRepository::default());
        let cache = Arc::new(MemoryCache::new(NonZeroUsize::new(1_000).unwrap()));
        let recent: Arc<dyn RecentPosts> = Arc::new(ListRecentPosts::new(cache.clone(), capacity));

        let service = PostService::new(
            repo,
            PostCache::new(cache.clone() as Arc<dyn Cache>, Duration::from_secs(3600)),
            recent,
            Arc::new(MemoryEventBus::new()),
        );
        (service, cache)
    }

    fn user(id: i64) -> UserContext {
        UserContext::new(id, format!("user{id}"), format!("user{id}@example.com"))
    }

    fn request(title: &str) -> CreatePostRequest {
        CreatePostRequest::new(title, "content")
    }

    async fn create_many(service: &PostService, count: usize) -> Vec<Post> {
        let mut posts = Vec::new();
        for i in 1..=count {
            posts.push(
                service
                    .create_post(&user(1), request(&format!("post {i}")))
                    .await
                    .unwrap(),
            );
        }
        posts
    }

    #[tokio::test]
    async fn test_create_post_sets_owner_and_publishes() {
        let h = scored_harness();
        let mut created = h.events.subscribe(POST_CREATED).await.unwrap();

        let post = h.service.create_post(&user(7), request("T")).await.unwrap();

        assert_eq!(post.owner_id, 7);
        assert_eq!(post.owner_name, "user7");

        let message = created.recv().await.unwrap();
        assert_eq!(message.key, post.id.to_string());
        match DomainEvent::from_bytes(&message.payload).unwrap() {
            DomainEvent::PostCreated { post_id, title, .. } => {
                assert_eq!(post_id, post.id);
                assert_eq!(title, "T");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_post_rejects_blank_title() {
        let h = scored_harness();
        let result = h.service.create_post(&user(1), request("  ")).await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
        assert_eq!(h.repo.count_posts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_post_second_read_hits_cache() {
        let h = scored_harness();
        let post = h.service.create_post(&user(1), request("T")).await.unwrap();
        h.cache.delete(&postline_core::cache::post_key(post.id)).await.unwrap();

        let first = h.service.get_post(post.id).await.unwrap();
        let second = h.service.get_post(post.id).await.unwrap();

        assert_eq!(first, post);
        assert_eq!(second, post);
        assert_eq!(h.repo.get_post_count(), 1);
    }

    #[tokio::test]
    async fn test_get_post_after_create_needs_no_store_read() {
        let h = scored_harness();
        let post = h.service.create_post(&user(1), request("T")).await.unwrap();

        assert_eq!(h.service.get_post(post.id).await.unwrap(), post);
        assert_eq!(h.repo.get_post_count(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_post_is_not_found() {
        let h = scored_harness();
        let result = h.service.get_post(99).await;
        assert!(matches!(
            result,
            Err(ServiceError::NotFound {
                entity_type: "Post",
                id: 99
            })
        ));
    }

    #[tokio::test]
    async fn test_full_page_served_from_recency_index() {
        let h = scored_harness();
        let posts = create_many(&h.service, 12).await;

        let page = h
            .service
            .get_posts_by_page(PageRequest::new(0, 10))
            .await
            .unwrap();

        let expected: Vec<i64> = posts.iter().rev().take(10).map(|p| p.id).collect();
        assert_eq!(page.content.iter().map(|p| p.id).collect::<Vec<_>>(), expected);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 2);
        assert!(page.first);
        assert!(!page.last);
        assert_eq!(h.repo.list_posts_count(), 0);
        assert_eq!(h.repo.count_posts_count(), 1);
    }

    #[tokio::test]
    async fn test_underfilled_page_falls_back_to_store() {
        let h = scored_harness();
        create_many(&h.service, 12).await;

        let page = h
            .service
            .get_posts_by_page(PageRequest::new(1, 10))
            .await
            .unwrap();

        let (expected, _) = h.repo.list_posts_newest_first(1, 10).await.unwrap();
        assert_eq!(page.content, expected);
        assert_eq!(page.content.len(), 2);
        assert!(page.last);
        assert_eq!(h.repo.list_posts_count(), 2);
    }

    #[tokio::test]
    async fn test_expired_index_entries_force_store_read() {
        let h = scored_harness();
        let posts = create_many(&h.service, 3).await;

        // Replace the index with one live entry and two expired ones.
        h.cache.delete(RECENT_POSTS_KEY).await.unwrap();
        let now = Utc::now().timestamp();
        for (post, score) in posts.iter().zip([now - 3600, now - 1, now + 3600]) {
            let member = encode_recent_member(post).unwrap();
            h.cache.zadd(RECENT_POSTS_KEY, &member, score).await.unwrap();
        }

        let page = h
            .service
            .get_posts_by_page(PageRequest::new(0, 3))
            .await
            .unwrap();

        assert_eq!(page.content.len(), 3);
        assert_eq!(h.repo.list_posts_count(), 1);
        assert_eq!(h.cache.zrange_all(RECENT_POSTS_KEY).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_page_size_is_validated() {
        let h = scored_harness();
        let result = h.service.get_posts_by_page(PageRequest::new(0, 0)).await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_delete_post_clears_caches_and_publishes() {
        let h = scored_harness();
        let post = h.service.create_post(&user(1), request("T")).await.unwrap();
        let mut deleted = h.events.subscribe(POST_DELETED).await.unwrap();

        h.service.delete_post(post.id).await.unwrap();

        assert!(h.cache.get(&postline_core::cache::post_key(post.id)).await.unwrap().is_none());
        assert!(h.cache.zrange_all(RECENT_POSTS_KEY).await.unwrap().is_empty());
        assert_eq!(deleted.recv().await.unwrap().key, post.id.to_string());
        assert!(matches!(
            h.service.get_post(post.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_post_touches_nothing() {
        let h = scored_harness();
        let post = h.service.create_post(&user(1), request("T")).await.unwrap();
        let mut deleted = h.events.subscribe(POST_DELETED).await.unwrap();

        let result = h.service.delete_post(post.id + 1).await;

        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
        assert_eq!(h.repo.delete_post_count(), 0);
        assert_eq!(h.cache.zrange_all(RECENT_POSTS_KEY).await.unwrap().len(), 1);
        assert!(deleted.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cache_and_bus_failures_never_surface() {
        let repo = Arc::new(CountingRepository::default());
        let failing = Arc::new(FailingCache);
        let bus = Arc::new(FailingBus::default());
        let recent: Arc<dyn RecentPosts> = Arc::new(ScoredRecentPosts::new(failing.clone(), WINDOW));
        let service = PostService::new(
            repo.clone(),
            PostCache::new(failing as Arc<dyn Cache>, Duration::from_secs(60)),
            recent,
            bus.clone(),
        );

        let post = service.create_post(&user(1), request("T")).await.unwrap();
        assert_eq!(service.get_post(post.id).await.unwrap(), post);

        let page = service
            .get_posts_by_page(PageRequest::new(0, 10))
            .await
            .unwrap();
        assert_eq!(page.content, vec![post.clone()]);

        service.delete_post(post.id).await.unwrap();
        assert_eq!(bus.publish_count(), 2);
        assert!(!repo.post_exists(post.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_fixed_list_keeps_newest_hundred() {
        let (service, cache) = list_harness(100);
        create_many(&service, 105).await;

        let members = postline_core::cache::ListCache::lrange(
            cache.as_ref(),
            postline_core::cache::RECENT_POST_LIST_KEY,
            0,
            -1,
        )
        .await
        .unwrap();
        let ids: Vec<i64> = members
            .iter()
            .map(|m| postline_core::cache::recent_member_id(m).unwrap())
            .collect();

        assert_eq!(ids.len(), 100);
        assert_eq!(ids.first(), Some(&105));
        assert_eq!(ids.last(), Some(&6));

        let page = service
            .get_posts_by_page(PageRequest::new(0, 10))
            .await
            .unwrap();
        assert_eq!(page.content[0].id, 105);
        assert_eq!(page.total_elements, 105);
    }
}
