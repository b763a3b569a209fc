//! Service-layer tests against in-memory SQLite: the real storage
//! adapter, real hashing, real tokens.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use ripple_core::ServiceError;
use ripple_core::engagement::EngagementService;
use ripple_core::posts::PostService;
use ripple_core::token::{self, TokenConfig};
use ripple_core::users::UserService;
use ripple_db::Database;
use ripple_types::models::{AlarmKind, PageRequest, UserRole};

struct Fixture {
    users: UserService,
    posts: PostService,
    engagement: EngagementService,
}

fn fixture() -> Fixture {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let tokens = TokenConfig::new("test-secret", Duration::from_secs(3600)).unwrap();
    Fixture {
        users: UserService::new(db.clone(), tokens),
        posts: PostService::new(db.clone()),
        engagement: EngagementService::new(db),
    }
}

fn join(f: &Fixture, name: &str) {
    f.users
        .join(name, "pw-123456", &format!("{name}@example.com"), name)
        .unwrap();
}

fn first_post_id(f: &Fixture) -> Uuid {
    f.posts.list(PageRequest::default()).unwrap().items[0].id
}

// -- User directory --

#[test]
fn join_twice_with_same_username_fails() {
    let f = fixture();
    let user = f
        .users
        .join("alice", "pw1", "a@x.com", "Al")
        .unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.role, UserRole::User);

    let err = f.users.join("alice", "pw2", "b@x.com", "Al2").unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateUser(name) if name == "alice"));
}

#[test]
fn login_issues_a_validatable_token() {
    let f = fixture();
    f.users.join("alice", "pw1", "a@x.com", "Al").unwrap();

    let token = f.users.login("alice", "pw1").unwrap();
    assert_eq!(token::validate(&token, "test-secret").unwrap(), "alice");
}

#[test]
fn login_with_wrong_password_fails() {
    let f = fixture();
    f.users.join("alice", "pw1", "a@x.com", "Al").unwrap();

    assert!(matches!(
        f.users.login("alice", "wrong"),
        Err(ServiceError::InvalidCredential)
    ));
}

#[test]
fn login_for_unknown_user_fails() {
    let f = fixture();
    assert!(matches!(
        f.users.login("nobody", "pw"),
        Err(ServiceError::UserNotFound(name)) if name == "nobody"
    ));
}

#[test]
fn lookup_finds_joined_users_only() {
    let f = fixture();
    join(&f, "alice");

    assert_eq!(f.users.lookup("alice").unwrap().username, "alice");
    assert!(matches!(
        f.users.lookup("bob"),
        Err(ServiceError::UserNotFound(_))
    ));
}

// -- Post store --

#[test]
fn create_requires_an_existing_author() {
    let f = fixture();
    assert!(matches!(
        f.posts.create("T", "B", "ghost"),
        Err(ServiceError::UserNotFound(_))
    ));
}

#[test]
fn owner_can_modify_their_post() {
    let f = fixture();
    join(&f, "alice");
    f.posts.create("T", "B", "alice").unwrap();
    let post_id = first_post_id(&f);

    let updated = f.posts.modify("T2", "B2", "alice", post_id).unwrap();
    assert_eq!(updated.title, "T2");
    assert_eq!(updated.body, "B2");
    assert!(updated.updated_at.is_some());
}

#[test]
fn modify_by_non_owner_is_denied() {
    let f = fixture();
    join(&f, "alice");
    join(&f, "bob");
    f.posts.create("T", "B", "alice").unwrap();
    let post_id = first_post_id(&f);

    let err = f.posts.modify("T2", "B2", "bob", post_id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::PermissionDenied { username, post_id: p } if username == "bob" && p == post_id
    ));
}

#[test]
fn modify_missing_post_fails_regardless_of_caller() {
    let f = fixture();
    join(&f, "alice");
    let missing = Uuid::new_v4();

    assert!(matches!(
        f.posts.modify("T", "B", "alice", missing),
        Err(ServiceError::PostNotFound(p)) if p == missing
    ));
}

#[test]
fn delete_by_non_owner_is_denied() {
    let f = fixture();
    join(&f, "alice");
    join(&f, "bob");
    f.posts.create("T", "B", "alice").unwrap();
    let post_id = first_post_id(&f);

    assert!(matches!(
        f.posts.delete("bob", post_id),
        Err(ServiceError::PermissionDenied { .. })
    ));
    f.posts.delete("alice", post_id).unwrap();
}

#[test]
fn deleted_posts_vanish_from_reads_and_engagement() {
    let f = fixture();
    join(&f, "alice");
    f.posts.create("T", "B", "alice").unwrap();
    let post_id = first_post_id(&f);

    f.posts.delete("alice", post_id).unwrap();

    assert!(f.posts.list(PageRequest::default()).unwrap().items.is_empty());
    assert!(matches!(
        f.engagement.like(post_id, "alice"),
        Err(ServiceError::PostNotFound(_))
    ));
    assert!(matches!(
        f.engagement.like_count(post_id),
        Err(ServiceError::PostNotFound(_))
    ));
}

#[test]
fn list_is_newest_first_and_paged() {
    let f = fixture();
    join(&f, "alice");
    for i in 0..5 {
        f.posts.create(&format!("post-{i}"), "B", "alice").unwrap();
    }

    let page = f.posts.list(PageRequest::new(0, 2)).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "post-4");
    assert_eq!(page.items[1].title, "post-3");

    let last = f.posts.list(PageRequest::new(2, 2)).unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].title, "post-0");
}

#[test]
fn list_by_owner_filters_to_one_user() {
    let f = fixture();
    join(&f, "alice");
    join(&f, "bob");
    f.posts.create("from-alice", "B", "alice").unwrap();
    f.posts.create("from-bob", "B", "bob").unwrap();

    let mine = f.posts.list_by_owner("alice", PageRequest::default()).unwrap();
    assert_eq!(mine.total, 1);
    assert_eq!(mine.items[0].title, "from-alice");
    assert_eq!(mine.items[0].author_username, "alice");

    assert!(matches!(
        f.posts.list_by_owner("ghost", PageRequest::default()),
        Err(ServiceError::UserNotFound(_))
    ));
}

// -- Engagement engine --

#[test]
fn second_like_for_the_same_pair_fails() {
    let f = fixture();
    join(&f, "alice");
    f.posts.create("T", "B", "alice").unwrap();
    let post_id = first_post_id(&f);

    f.engagement.like(post_id, "alice").unwrap();
    let err = f.engagement.like(post_id, "alice").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::AlreadyLiked { username, post_id: p } if username == "alice" && p == post_id
    ));
    assert_eq!(f.engagement.like_count(post_id).unwrap(), 1);
}

#[test]
fn like_count_equals_number_of_distinct_likers() {
    let f = fixture();
    for name in ["alice", "bob", "carol", "dave"] {
        join(&f, name);
    }
    f.posts.create("T", "B", "alice").unwrap();
    let post_id = first_post_id(&f);

    for name in ["alice", "bob", "carol"] {
        f.engagement.like(post_id, name).unwrap();
    }
    assert_eq!(f.engagement.like_count(post_id).unwrap(), 3);
}

#[test]
fn like_resolves_post_and_user() {
    let f = fixture();
    join(&f, "alice");
    f.posts.create("T", "B", "alice").unwrap();
    let post_id = first_post_id(&f);

    assert!(matches!(
        f.engagement.like(Uuid::new_v4(), "alice"),
        Err(ServiceError::PostNotFound(_))
    ));
    assert!(matches!(
        f.engagement.like(post_id, "ghost"),
        Err(ServiceError::UserNotFound(_))
    ));
}

#[test]
fn comments_come_back_in_creation_order() {
    let f = fixture();
    join(&f, "alice");
    join(&f, "bob");
    f.posts.create("T", "B", "alice").unwrap();
    let post_id = first_post_id(&f);

    f.engagement.comment(post_id, "bob", "first").unwrap();
    f.engagement.comment(post_id, "alice", "second").unwrap();

    let page = f.engagement.comments(post_id, PageRequest::default()).unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].body, "first");
    assert_eq!(page.items[0].author_username, "bob");
    assert_eq!(page.items[1].body, "second");

    assert!(matches!(
        f.engagement.comments(Uuid::new_v4(), PageRequest::default()),
        Err(ServiceError::PostNotFound(_))
    ));
}

// -- Alarm feed --

#[test]
fn engagement_produces_alarms_for_the_post_owner() {
    let f = fixture();
    join(&f, "alice");
    join(&f, "bob");
    f.posts.create("T", "B", "alice").unwrap();
    let post_id = first_post_id(&f);
    let bob_id = f.users.lookup("bob").unwrap().id;

    f.engagement.like(post_id, "bob").unwrap();
    f.engagement.comment(post_id, "bob", "nice").unwrap();

    let page = f.users.alarms("alice", PageRequest::default()).unwrap();
    assert_eq!(page.total, 2);
    // Newest first: the comment landed after the like.
    assert_eq!(page.items[0].kind, AlarmKind::NewCommentOnPost);
    assert_eq!(page.items[1].kind, AlarmKind::NewLikeOnPost);
    for alarm in &page.items {
        assert_eq!(alarm.from_user_id, bob_id);
        assert_eq!(alarm.target_id, post_id);
    }

    // Bob engaged but received nothing.
    assert_eq!(f.users.alarms("bob", PageRequest::default()).unwrap().total, 0);
}

#[test]
fn alarm_feed_requires_an_existing_user() {
    let f = fixture();
    assert!(matches!(
        f.users.alarms("ghost", PageRequest::default()),
        Err(ServiceError::UserNotFound(_))
    ));
}
