//! Record store behaviour across create, edit, list and delete, exercised
//! through the real record service over in-memory adapters.

mod support;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use repair_desk::domain::ports::{RecordsCommand, RecordsQuery, StorageArea};
use repair_desk::domain::{
    CLOSED_STATUS, Caller, ErrorCode, HistoryDraft, PhotoRef, Record, RecordDraft, RecordFields,
    UserId,
};
use support::{RecordHarness, fields, photos, user};

const MECHANIC: i32 = 3;
const OTHER_MECHANIC: i32 = 4;

#[fixture]
fn harness() -> RecordHarness {
    RecordHarness::new()
}

fn admin() -> Caller {
    Caller::new(UserId::ADMIN)
}

fn mechanic(raw: i32) -> Caller {
    Caller::new(user(raw))
}

fn draft(fields: RecordFields, set: &[&str]) -> RecordDraft {
    RecordDraft {
        fields,
        photos: photos(set),
        new_history: Vec::new(),
    }
}

async fn create(harness: &RecordHarness, caller: &Caller, draft: RecordDraft) -> Record {
    harness
        .service
        .create_record(caller, draft)
        .await
        .expect("record created")
}

fn discarded_photos(harness: &RecordHarness) -> Vec<String> {
    harness
        .cleanup
        .discarded()
        .into_iter()
        .filter(|(area, _)| *area == StorageArea::Photos)
        .map(|(_, name)| name)
        .collect()
}

#[rstest]
#[tokio::test]
async fn per_mechanic_listing_hides_closed_and_foreign_records(harness: RecordHarness) {
    let open = create(&harness, &admin(), draft(fields(MECHANIC, 1, 1), &[])).await;
    create(
        &harness,
        &admin(),
        draft(fields(MECHANIC, CLOSED_STATUS.0, 1), &[]),
    )
    .await;
    create(&harness, &admin(), draft(fields(OTHER_MECHANIC, 1, 1), &[])).await;

    let listed = harness
        .service
        .list_records_by_mechanic(&mechanic(MECHANIC), user(MECHANIC))
        .await
        .expect("own records listed");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, open.id);
    assert!(
        listed
            .iter()
            .all(|record| record.mechanic() == user(MECHANIC) && record.fields.status != CLOSED_STATUS)
    );

    let everything = harness
        .service
        .list_records(&admin())
        .await
        .expect("admin lists all");
    assert_eq!(everything.len(), 3);
}

#[rstest]
#[tokio::test]
async fn mechanic_creating_for_someone_else_still_owns_the_record(harness: RecordHarness) {
    let record = create(
        &harness,
        &mechanic(MECHANIC),
        draft(fields(OTHER_MECHANIC, 1, 1), &[]),
    )
    .await;

    assert_eq!(record.mechanic(), user(MECHANIC));
    assert_eq!(harness.announcer.announced(), vec![record.id]);
}

#[rstest]
#[tokio::test]
async fn edit_applies_the_new_photo_order_and_leaves_other_records_alone(
    harness: RecordHarness,
) {
    let caller = mechanic(MECHANIC);
    let target = create(
        &harness,
        &caller,
        draft(fields(MECHANIC, 1, 1), &["a.jpg", "b.jpg", "c.jpg"]),
    )
    .await;
    let bystander = create(&harness, &caller, draft(fields(MECHANIC, 1, 1), &["x.jpg"])).await;

    let edited = harness
        .service
        .edit_record(
            &caller,
            target.id,
            draft(fields(MECHANIC, 2, 1), &["c.jpg", "a.jpg"]),
        )
        .await
        .expect("record edited");

    assert_eq!(edited.photos, photos(&["c.jpg", "a.jpg"]));
    let reread = harness
        .service
        .get_record(&caller, target.id)
        .await
        .expect("record readable");
    assert_eq!(reread.photos, photos(&["c.jpg", "a.jpg"]));

    let untouched = harness
        .service
        .get_record(&caller, bystander.id)
        .await
        .expect("bystander readable");
    assert_eq!(untouched, bystander);
    assert_eq!(discarded_photos(&harness), vec!["b.jpg".to_owned()]);
}

#[rstest]
#[tokio::test]
async fn repeating_an_edit_keeps_the_same_photo_set(harness: RecordHarness) {
    let caller = mechanic(MECHANIC);
    let record = create(&harness, &caller, draft(fields(MECHANIC, 1, 1), &["a.jpg"])).await;
    let edit = draft(fields(MECHANIC, 1, 1), &["b.jpg", "a.jpg"]);

    let first = harness
        .service
        .edit_record(&caller, record.id, edit.clone())
        .await
        .expect("first edit");
    let second = harness
        .service
        .edit_record(&caller, record.id, edit)
        .await
        .expect("second edit");

    assert_eq!(first.photos, second.photos);
    assert_eq!(second.photos, photos(&["b.jpg", "a.jpg"]));
    assert!(discarded_photos(&harness).is_empty());
}

#[rstest]
#[tokio::test]
async fn replaced_photo_is_scheduled_for_cleanup(harness: RecordHarness) {
    let caller = mechanic(MECHANIC);
    let record = create(&harness, &caller, draft(fields(MECHANIC, 1, 1), &["a.jpg"])).await;

    let edited = harness
        .service
        .edit_record(&caller, record.id, draft(fields(MECHANIC, 1, 1), &["b.jpg"]))
        .await
        .expect("record edited");

    assert_eq!(edited.photos, vec![PhotoRef::new("b.jpg").expect("ref")]);
    assert_eq!(discarded_photos(&harness), vec!["a.jpg".to_owned()]);
}

#[rstest]
#[tokio::test]
async fn history_is_listed_newest_first(harness: RecordHarness) {
    let caller = mechanic(MECHANIC);
    let at = |day: u32| {
        Some(
            Utc.with_ymd_and_hms(2025, 4, day, 9, 0, 0)
                .single()
                .expect("timestamp"),
        )
    };
    let mut intake = draft(fields(MECHANIC, 1, 1), &[]);
    intake.new_history = vec![
        HistoryDraft {
            date: at(3),
            notes: "ordered pump".to_owned(),
        },
        HistoryDraft {
            date: at(1),
            notes: "diagnosed".to_owned(),
        },
    ];
    let record = create(&harness, &caller, intake).await;

    let mut follow_up = draft(fields(MECHANIC, 1, 1), &[]);
    follow_up.new_history = vec![HistoryDraft {
        date: at(2),
        notes: "customer called".to_owned(),
    }];
    let edited = harness
        .service
        .edit_record(&caller, record.id, follow_up)
        .await
        .expect("record edited");

    let listed = harness
        .service
        .list_history(&caller, record.id)
        .await
        .expect("history listed");
    let notes: Vec<&str> = listed.iter().map(|entry| entry.notes.as_str()).collect();
    assert_eq!(notes, ["ordered pump", "customer called", "diagnosed"]);
    assert!(listed.windows(2).all(|pair| pair[0].date >= pair[1].date));
    assert_eq!(edited.history, listed);
    assert!(listed.iter().all(|entry| entry.mechanic == user(MECHANIC)));
}

#[rstest]
#[tokio::test]
async fn ownership_gates_reads_but_not_for_the_admin(harness: RecordHarness) {
    let owner = mechanic(MECHANIC);
    let record = create(&harness, &owner, draft(fields(MECHANIC, 1, 1), &[])).await;

    let denied = harness
        .service
        .get_record(&mechanic(OTHER_MECHANIC), record.id)
        .await
        .expect_err("foreign mechanic is refused");
    assert_eq!(denied.code(), ErrorCode::Forbidden);

    let history_denied = harness
        .service
        .list_history(&mechanic(OTHER_MECHANIC), record.id)
        .await
        .expect_err("foreign history is refused");
    assert_eq!(history_denied.code(), ErrorCode::Forbidden);

    let read = harness
        .service
        .get_record(&admin(), record.id)
        .await
        .expect("admin reads any record");
    assert_eq!(read, record);
}

#[rstest]
#[tokio::test]
async fn foreign_edit_changes_nothing(harness: RecordHarness) {
    let record = create(
        &harness,
        &mechanic(MECHANIC),
        draft(fields(MECHANIC, 1, 1), &["a.jpg"]),
    )
    .await;
    let replacements = harness.photos.replacements();

    let err = harness
        .service
        .edit_record(
            &mechanic(OTHER_MECHANIC),
            record.id,
            draft(fields(OTHER_MECHANIC, 2, 1), &[]),
        )
        .await
        .expect_err("foreign edit refused");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(harness.photos.replacements(), replacements);
    assert!(discarded_photos(&harness).is_empty());
}

#[rstest]
#[tokio::test]
async fn delete_is_admin_only_and_discards_every_photo(harness: RecordHarness) {
    let record = create(
        &harness,
        &mechanic(MECHANIC),
        draft(fields(MECHANIC, 1, 1), &["a.jpg", "b.jpg"]),
    )
    .await;

    let refused = harness
        .service
        .delete_record(&mechanic(MECHANIC), record.id)
        .await
        .expect_err("mechanics cannot delete");
    assert_eq!(refused.code(), ErrorCode::Forbidden);

    harness
        .service
        .delete_record(&admin(), record.id)
        .await
        .expect("admin deletes");
    assert!(harness.records.ids().is_empty());
    assert_eq!(
        discarded_photos(&harness),
        vec!["a.jpg".to_owned(), "b.jpg".to_owned()]
    );

    let gone = harness
        .service
        .get_record(&admin(), record.id)
        .await
        .expect_err("deleted record is gone");
    assert_eq!(gone.code(), ErrorCode::NotFound);
}
