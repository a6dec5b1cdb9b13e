//! Repository integration tests
//!
//! Require a real PostgreSQL instance. Run with:
//!   DATABASE_URL=postgres://... cargo test -p blogctl-server -- --ignored
//!
//! Tests share one database, so every row they create carries a
//! per-test nonce in its slug to stay out of each other's way.

use std::time::{SystemTime, UNIX_EPOCH};

use blogctl_server::db::repos::{
    CategoryPatch, CategoryRepo, DbError, NewCategory, NewPost, PostFilter, PostPatch, PostRepo,
};
use blogctl_server::db::{create_pool, migrations};
use blogctl_server::models::{CategoryName, Content, ListQuery, Slug, Title};
use sqlx::PgPool;

async fn setup() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    migrations::run(&pool).await.expect("migrations failed");
    pool
}

fn nonce() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("t{}", nanos)
}

fn post_draft(slug: &str, published: bool, category_ids: Vec<i64>) -> NewPost {
    NewPost {
        title: Title::new("Integration Post").unwrap(),
        content: Content::new("body text").unwrap(),
        excerpt: Some("short excerpt".to_owned()),
        slug: Slug::new(slug).unwrap(),
        published,
        category_ids,
    }
}

fn category_draft(slug: &str) -> NewCategory {
    NewCategory {
        name: CategoryName::new("Integration Category").unwrap(),
        description: Some("a test category".to_owned()),
        slug: Slug::new(slug).unwrap(),
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_then_get_round_trips() {
    let pool = setup().await;
    let n = nonce();

    let category = CategoryRepo::new(&pool)
        .create(category_draft(&format!("{n}-cat")))
        .await
        .unwrap();

    let created = PostRepo::new(&pool)
        .create(post_draft(&format!("{n}-post"), true, vec![category.id]))
        .await
        .unwrap();

    let fetched = PostRepo::new(&pool).get(created.post.id).await.unwrap();
    assert_eq!(fetched.post.title, "Integration Post");
    assert_eq!(fetched.post.content, "body text");
    assert_eq!(fetched.post.excerpt.as_deref(), Some("short excerpt"));
    assert_eq!(fetched.post.slug, format!("{n}-post"));
    assert!(fetched.post.published);
    assert_eq!(fetched.categories.len(), 1);
    assert_eq!(fetched.categories[0].id, category.id);

    let by_slug = PostRepo::new(&pool)
        .get_by_slug(&format!("{n}-post"))
        .await
        .unwrap();
    assert_eq!(by_slug.post.id, created.post.id);
}

#[tokio::test]
#[ignore = "requires database"]
async fn post_without_categories_gets_empty_list() {
    let pool = setup().await;
    let n = nonce();

    let created = PostRepo::new(&pool)
        .create(post_draft(&format!("{n}-bare"), false, vec![]))
        .await
        .unwrap();

    let fetched = PostRepo::new(&pool).get(created.post.id).await.unwrap();
    assert!(fetched.categories.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_slug_is_conflict() {
    let pool = setup().await;
    let n = nonce();
    let slug = format!("{n}-dup");

    PostRepo::new(&pool)
        .create(post_draft(&slug, false, vec![]))
        .await
        .unwrap();

    let err = PostRepo::new(&pool)
        .create(post_draft(&slug, false, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict { .. }), "got {err:?}");
}

#[tokio::test]
#[ignore = "requires database"]
async fn generate_slug_appends_counter_on_collision() {
    let pool = setup().await;
    let n = nonce();
    let title = format!("Probe {n}");
    let repo = PostRepo::new(&pool);

    let first = repo.generate_slug(&title).await.unwrap();
    assert_eq!(first, format!("probe-{n}"));

    repo.create(post_draft(&first, false, vec![])).await.unwrap();

    let second = repo.generate_slug(&title).await.unwrap();
    assert_eq!(second, format!("probe-{n}-1"));

    repo.create(post_draft(&second, false, vec![])).await.unwrap();

    let third = repo.generate_slug(&title).await.unwrap();
    assert_eq!(third, format!("probe-{n}-2"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_replaces_category_set() {
    let pool = setup().await;
    let n = nonce();
    let categories = CategoryRepo::new(&pool);
    let posts = PostRepo::new(&pool);

    let first = categories
        .create(category_draft(&format!("{n}-a")))
        .await
        .unwrap();
    let second = categories
        .create(category_draft(&format!("{n}-b")))
        .await
        .unwrap();

    let created = posts
        .create(post_draft(&format!("{n}-p"), false, vec![first.id]))
        .await
        .unwrap();

    // Replace [first] with [second]
    let updated = posts
        .update(
            created.post.id,
            PostPatch {
                category_ids: Some(vec![second.id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.categories.len(), 1);
    assert_eq!(updated.categories[0].id, second.id);

    // Patch without categoryIds leaves associations untouched
    let updated = posts
        .update(
            created.post.id,
            PostPatch {
                published: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.categories.len(), 1);
    assert_eq!(updated.categories[0].id, second.id);
    assert!(updated.post.published);

    // Empty set clears all associations
    let updated = posts
        .update(
            created.post.id,
            PostPatch {
                category_ids: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.categories.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_refreshes_updated_at() {
    let pool = setup().await;
    let n = nonce();
    let repo = PostRepo::new(&pool);

    let created = repo
        .create(post_draft(&format!("{n}-ts"), false, vec![]))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let updated = repo
        .update(
            created.post.id,
            PostPatch {
                title: Some(Title::new("Renamed").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.post.title, "Renamed");
    // Untouched fields survive a partial update
    assert_eq!(updated.post.content, "body text");
    assert!(updated.post.updated_at > created.post.updated_at);
    assert_eq!(updated.post.created_at, created.post.created_at);
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_missing_post_is_not_found() {
    let pool = setup().await;

    let err = PostRepo::new(&pool)
        .update(
            i64::MAX,
            PostPatch {
                published: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_post_cascades_and_reads_not_found() {
    let pool = setup().await;
    let n = nonce();

    let category = CategoryRepo::new(&pool)
        .create(category_draft(&format!("{n}-dc")))
        .await
        .unwrap();
    let created = PostRepo::new(&pool)
        .create(post_draft(&format!("{n}-dp"), true, vec![category.id]))
        .await
        .unwrap();

    PostRepo::new(&pool).delete(created.post.id).await.unwrap();

    let err = PostRepo::new(&pool).get(created.post.id).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }), "got {err:?}");

    let join_rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM post_categories WHERE post_id = $1")
            .bind(created.post.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(join_rows, 0);

    // Deleting again is a quiet no-op
    PostRepo::new(&pool).delete(created.post.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleting_category_detaches_but_keeps_posts() {
    let pool = setup().await;
    let n = nonce();

    let category = CategoryRepo::new(&pool)
        .create(category_draft(&format!("{n}-gone")))
        .await
        .unwrap();
    let created = PostRepo::new(&pool)
        .create(post_draft(&format!("{n}-kept"), true, vec![category.id]))
        .await
        .unwrap();

    CategoryRepo::new(&pool).delete(category.id).await.unwrap();

    let fetched = PostRepo::new(&pool).get(created.post.id).await.unwrap();
    assert!(fetched.categories.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn published_filter_excludes_drafts() {
    let pool = setup().await;
    let n = nonce();
    let repo = PostRepo::new(&pool);

    repo.create(post_draft(&format!("{n}-pub"), true, vec![]))
        .await
        .unwrap();
    repo.create(post_draft(&format!("{n}-draft"), false, vec![]))
        .await
        .unwrap();

    let filter = PostFilter {
        published: Some(true),
        category_id: None,
        page: ListQuery::new(100, 0),
    };
    let posts = repo.list(&filter).await.unwrap();
    assert!(posts.iter().all(|p| p.post.published));

    let all_published = repo.list_published().await.unwrap();
    assert!(all_published.iter().all(|p| p.post.published));
    assert!(all_published
        .iter()
        .any(|p| p.post.slug == format!("{n}-pub")));
}

#[tokio::test]
#[ignore = "requires database"]
async fn post_listings_order_newest_first() {
    let pool = setup().await;
    let n = nonce();
    let posts = PostRepo::new(&pool);

    // A dedicated category scopes list() to just this test's rows
    let scope = CategoryRepo::new(&pool)
        .create(category_draft(&format!("{n}-ord")))
        .await
        .unwrap();

    let older = posts
        .create(post_draft(&format!("{n}-older"), true, vec![scope.id]))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let newer = posts
        .create(post_draft(&format!("{n}-newer"), true, vec![scope.id]))
        .await
        .unwrap();

    let filter = PostFilter {
        category_id: Some(scope.id),
        ..Default::default()
    };
    let listed = posts.list(&filter).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].post.id, newer.post.id);
    assert_eq!(listed[1].post.id, older.post.id);

    // list_published shares the table, so compare positions
    let published = posts.list_published().await.unwrap();
    let pos = |id: i64| published.iter().position(|p| p.post.id == id).unwrap();
    assert!(pos(newer.post.id) < pos(older.post.id));
}

#[tokio::test]
#[ignore = "requires database"]
async fn category_list_orders_newest_first() {
    let pool = setup().await;
    let n = nonce();
    let repo = CategoryRepo::new(&pool);

    let older = repo
        .create(category_draft(&format!("{n}-first")))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let newer = repo
        .create(category_draft(&format!("{n}-second")))
        .await
        .unwrap();

    let listed = repo.list().await.unwrap();
    let pos = |id: i64| listed.iter().position(|c| c.id == id).unwrap();
    assert!(pos(newer.id) < pos(older.id));
}

#[tokio::test]
#[ignore = "requires database"]
async fn category_filter_scopes_results() {
    let pool = setup().await;
    let n = nonce();

    let category = CategoryRepo::new(&pool)
        .create(category_draft(&format!("{n}-scope")))
        .await
        .unwrap();

    // No posts yet: empty without error
    let filter = PostFilter {
        category_id: Some(category.id),
        ..Default::default()
    };
    let posts = PostRepo::new(&pool).list(&filter).await.unwrap();
    assert!(posts.is_empty());

    let created = PostRepo::new(&pool)
        .create(post_draft(&format!("{n}-in"), true, vec![category.id]))
        .await
        .unwrap();
    PostRepo::new(&pool)
        .create(post_draft(&format!("{n}-out"), true, vec![]))
        .await
        .unwrap();

    let posts = PostRepo::new(&pool).list(&filter).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post.id, created.post.id);

    // Both filters combine: the draft status rules the post out
    let filter = PostFilter {
        published: Some(false),
        category_id: Some(category.id),
        ..Default::default()
    };
    let posts = PostRepo::new(&pool).list(&filter).await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_post_with_unknown_category_rolls_back() {
    let pool = setup().await;
    let n = nonce();
    let slug = format!("{n}-rollback");

    let err = PostRepo::new(&pool)
        .create(post_draft(&slug, false, vec![i64::MAX]))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }), "got {err:?}");

    // The post row must not survive the failed transaction
    let err = PostRepo::new(&pool).get_by_slug(&slug).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
#[ignore = "requires database"]
async fn category_crud_round_trips() {
    let pool = setup().await;
    let n = nonce();
    let repo = CategoryRepo::new(&pool);

    let created = repo.create(category_draft(&format!("{n}-crud"))).await.unwrap();
    assert_eq!(created.name, "Integration Category");

    let fetched = repo.get_by_slug(&format!("{n}-crud")).await.unwrap();
    assert_eq!(fetched.id, created.id);

    let updated = repo
        .update(
            created.id,
            CategoryPatch {
                name: Some(CategoryName::new("Renamed Category").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed Category");
    // Untouched fields survive
    assert_eq!(updated.slug, format!("{n}-crud"));
    assert!(updated.updated_at >= created.updated_at);

    let listed = repo.list().await.unwrap();
    assert!(listed.iter().any(|c| c.id == created.id));

    repo.delete(created.id).await.unwrap();
    let err = repo.get_by_slug(&format!("{n}-crud")).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
#[ignore = "requires database"]
async fn category_slug_conflict() {
    let pool = setup().await;
    let n = nonce();
    let slug = format!("{n}-same");
    let repo = CategoryRepo::new(&pool);

    repo.create(category_draft(&slug)).await.unwrap();
    let err = repo.create(category_draft(&slug)).await.unwrap_err();
    assert!(matches!(err, DbError::Conflict { .. }), "got {err:?}");
}
