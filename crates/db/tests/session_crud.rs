//! Integration tests for the work-record and note repositories.
//!
//! Exercises the repository layer against a real database:
//! - record lifecycle (start, break, continue, finish) through the shared
//!   transition code
//! - the single-active-record partial unique index
//! - date-filtered listing with the has_notes flag
//! - stats aggregation
//! - whole-board note replacement

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tempo_core::record::{apply_transition, closed_totals, initial_segments, WorkAction};
use tempo_db::models::note::CreateNote;
use tempo_db::models::user::CreateUser;
use tempo_db::repositories::{NoteRepo, UserRepo, WorkRecordRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_test_user(pool: &PgPool, username: &str) -> i64 {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: "$argon2id$test-hash".to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
        .id
}

fn sticky(content: &str, order: i32) -> CreateNote {
    CreateNote {
        content: content.to_string(),
        pos_x: 10.0,
        pos_y: 20.0,
        color_tag: Some("pink".to_string()),
        stack_order: order,
    }
}

// ---------------------------------------------------------------------------
// Work record lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_record_lifecycle(pool: PgPool) {
    let owner = create_test_user(&pool, "worker").await;
    let t0 = Utc::now();

    let record = WorkRecordRepo::create(&pool, owner, Some("pomodoro"), &initial_segments(t0))
        .await
        .expect("create should succeed");
    assert!(!record.is_finished);
    assert_eq!(record.technique.as_deref(), Some("pomodoro"));
    assert_eq!(record.segments.0.len(), 1);
    assert!(record.segments.0[0].is_open());

    let active = WorkRecordRepo::find_active(&pool, owner)
        .await
        .expect("find_active should succeed")
        .expect("record should be active");
    assert_eq!(active.id, record.id);

    // Walk the record through break -> continue -> finish with the shared
    // transition code, persisting each step the way the API does.
    let mut segments = active.segments.0;
    apply_transition(&mut segments, WorkAction::Break, t0 + Duration::seconds(5)).unwrap();
    apply_transition(&mut segments, WorkAction::Continue, t0 + Duration::seconds(8)).unwrap();
    apply_transition(&mut segments, WorkAction::Finish, t0 + Duration::seconds(10)).unwrap();
    let (work_ms, break_ms) = closed_totals(&segments);

    let finished_at = t0 + Duration::seconds(10);
    let updated = WorkRecordRepo::update_segments(
        &pool,
        record.id,
        owner,
        &segments,
        work_ms,
        break_ms,
        true,
        Some(finished_at),
        None,
    )
    .await
    .expect("update should succeed")
    .expect("unfinished record should match");

    assert!(updated.is_finished);
    assert_eq!(updated.total_work_ms, 7_000);
    assert_eq!(updated.total_break_ms, 3_000);
    assert_eq!(updated.segments.0.len(), 3);
    assert_eq!(updated.technique.as_deref(), Some("pomodoro"));

    // Finished records no longer match the unfinished-update predicate.
    let second = WorkRecordRepo::update_segments(
        &pool, record.id, owner, &segments, work_ms, break_ms, true, Some(finished_at), None,
    )
    .await
    .expect("query should succeed");
    assert!(second.is_none(), "a finished record cannot be updated again");

    assert!(WorkRecordRepo::find_active(&pool, owner)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_owner_scoping(pool: PgPool) {
    let alice = create_test_user(&pool, "alice").await;
    let bob = create_test_user(&pool, "bob").await;

    let record = WorkRecordRepo::create(&pool, alice, None, &initial_segments(Utc::now()))
        .await
        .unwrap();

    let found = WorkRecordRepo::find_by_id_for_owner(&pool, record.id, bob)
        .await
        .unwrap();
    assert!(found.is_none(), "records are invisible to other owners");
}

/// Two simultaneous unfinished records for one owner violate
/// `uq_work_records_owner_active`.
#[sqlx::test(migrations = "./migrations")]
async fn test_single_active_record_enforced(pool: PgPool) {
    let owner = create_test_user(&pool, "eager").await;
    let now = Utc::now();

    WorkRecordRepo::create(&pool, owner, None, &initial_segments(now))
        .await
        .expect("first start should succeed");

    let second = WorkRecordRepo::create(&pool, owner, None, &initial_segments(now)).await;
    let err = second.expect_err("second start must hit the unique index");
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(
                db_err.constraint(),
                Some("uq_work_records_owner_active"),
                "violation must name the active-record index"
            );
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Listing and stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_with_notes_flag(pool: PgPool) {
    let owner = create_test_user(&pool, "lister").await;
    let now = Utc::now();

    let mut segments = initial_segments(now);
    apply_transition(&mut segments, WorkAction::Finish, now + Duration::seconds(1)).unwrap();
    let (work_ms, break_ms) = closed_totals(&segments);

    let first = WorkRecordRepo::create(&pool, owner, None, &initial_segments(now)).await.unwrap();
    WorkRecordRepo::update_segments(
        &pool, first.id, owner, &segments, work_ms, break_ms, true,
        Some(now + Duration::seconds(1)), None,
    )
    .await
    .unwrap();

    let second = WorkRecordRepo::create(&pool, owner, None, &initial_segments(now)).await.unwrap();
    NoteRepo::replace_for_record(&pool, second.id, &[sticky("remember", 0)])
        .await
        .unwrap();

    let list = WorkRecordRepo::list_for_owner(&pool, owner, None, None)
        .await
        .unwrap();
    assert_eq!(list.len(), 2);
    // Newest first: the second record leads.
    assert_eq!(list[0].id, second.id);
    assert!(list[0].has_notes);
    assert!(!list[1].has_notes);

    // A start date in the future filters everything out.
    let filtered = WorkRecordRepo::list_for_owner(
        &pool,
        owner,
        Some(now + Duration::hours(1)),
        None,
    )
    .await
    .unwrap();
    assert!(filtered.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_aggregation(pool: PgPool) {
    let owner = create_test_user(&pool, "counter").await;
    let now = Utc::now();

    let mut segments = initial_segments(now);
    apply_transition(&mut segments, WorkAction::Break, now + Duration::seconds(5)).unwrap();
    apply_transition(&mut segments, WorkAction::Finish, now + Duration::seconds(8)).unwrap();
    let (work_ms, break_ms) = closed_totals(&segments);

    let record = WorkRecordRepo::create(&pool, owner, None, &initial_segments(now)).await.unwrap();
    WorkRecordRepo::update_segments(
        &pool, record.id, owner, &segments, work_ms, break_ms, true,
        Some(now + Duration::seconds(8)), None,
    )
    .await
    .unwrap();

    // An unfinished record must not count toward stats.
    let other = create_test_user(&pool, "other").await;
    WorkRecordRepo::create(&pool, other, None, &initial_segments(now)).await.unwrap();

    let stats = WorkRecordRepo::stats_for_owner(&pool, owner, now - Duration::days(7))
        .await
        .unwrap();
    assert_eq!(stats.total_work_ms, 5_000);
    assert_eq!(stats.total_break_ms, 3_000);
    assert_eq!(stats.record_count, 1);
    assert_eq!(stats.recent_count, 1);

    let daily = WorkRecordRepo::daily_work_for_owner(&pool, owner).await.unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].work_ms, 5_000);
}

// ---------------------------------------------------------------------------
// Notes board
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_note_board_replace(pool: PgPool) {
    let owner = create_test_user(&pool, "noter").await;
    let record = WorkRecordRepo::create(&pool, owner, None, &initial_segments(Utc::now()))
        .await
        .unwrap();

    let first = NoteRepo::replace_for_record(
        &pool,
        record.id,
        &[sticky("one", 1), sticky("zero", 0)],
    )
    .await
    .unwrap();
    assert_eq!(first.len(), 2);

    let listed = NoteRepo::list_for_record(&pool, record.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    // Stacking order wins over insertion order.
    assert_eq!(listed[0].content, "zero");
    assert_eq!(listed[1].content, "one");
    assert_eq!(listed[0].color_tag, "pink");

    // Replacing with a smaller board drops the rest.
    let replaced = NoteRepo::replace_for_record(&pool, record.id, &[sticky("only", 0)])
        .await
        .unwrap();
    assert_eq!(replaced.len(), 1);
    let listed = NoteRepo::list_for_record(&pool, record.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "only");

    // An empty payload clears the board.
    NoteRepo::replace_for_record(&pool, record.id, &[]).await.unwrap();
    assert!(NoteRepo::list_for_record(&pool, record.id).await.unwrap().is_empty());
}
