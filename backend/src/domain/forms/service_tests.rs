//! Tests for the form generation service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{FileStorageError, MockArtifactCleanup, MockRecordRepository};
use crate::domain::test_fixtures::{fixture_clock, record_id, stored, user};
use crate::domain::{ErrorCode, StoreId, UserId};

const TEMPLATE: &str = r#"<xfdf><fields>
  <field name="id"><value/></field>
  <field name="name"><value/></field>
  <field name="serial"><value/></field>
</fields></xfdf>"#;

#[derive(Default)]
struct MemoryStorage {
    files: Mutex<HashMap<(StorageArea, String), Vec<u8>>>,
    /// When set, writes keep only this many bytes and then fail.
    torn_after: Option<usize>,
}

impl MemoryStorage {
    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .expect("storage lock")
            .keys()
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    fn contents(&self, name: &str) -> Option<String> {
        self.files
            .lock()
            .expect("storage lock")
            .get(&(StorageArea::Forms, name.to_owned()))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn write(
        &self,
        area: StorageArea,
        name: &str,
        bytes: &[u8],
    ) -> Result<(), FileStorageError> {
        let kept = self.torn_after.map_or(bytes.len(), |limit| limit.min(bytes.len()));
        self.files
            .lock()
            .expect("storage lock")
            .insert((area, name.to_owned()), bytes[..kept].to_vec());
        if kept < bytes.len() {
            return Err(FileStorageError::io("file size limit exceeded"));
        }
        Ok(())
    }

    async fn read(
        &self,
        area: StorageArea,
        name: &str,
    ) -> Result<Option<Vec<u8>>, FileStorageError> {
        Ok(self
            .files
            .lock()
            .expect("storage lock")
            .get(&(area, name.to_owned()))
            .cloned())
    }

    async fn remove(&self, area: StorageArea, name: &str) -> Result<(), FileStorageError> {
        self.files
            .lock()
            .expect("storage lock")
            .remove(&(area, name.to_owned()));
        Ok(())
    }
}

/// Renderer double that sees the filled document and optionally leaves a
/// (partial) PDF behind.
struct ScriptedRenderer {
    storage: Arc<MemoryStorage>,
    outcome: Result<(), FormRendererError>,
    seen: Mutex<Vec<(RenderJob, Option<String>)>>,
}

#[async_trait]
impl FormRenderer for ScriptedRenderer {
    async fn render(&self, job: &RenderJob) -> Result<(), FormRendererError> {
        let document = self.storage.contents(&job.filled);
        self.seen
            .lock()
            .expect("renderer lock")
            .push((job.clone(), document));
        self.storage
            .write(StorageArea::Forms, &job.output, b"%PDF-1.7")
            .await
            .map_err(|err| FormRendererError::failed(err.to_string()))?;
        self.outcome.clone()
    }
}

struct Harness {
    storage: Arc<MemoryStorage>,
    renderer: Arc<ScriptedRenderer>,
    service: FormService<MockRecordRepository, MemoryStorage, ScriptedRenderer>,
}

fn harness(
    record: Option<StoredRecord>,
    outcome: Result<(), FormRendererError>,
    cleanup: MockArtifactCleanup,
) -> Harness {
    harness_over(MemoryStorage::default(), record, outcome, cleanup)
}

fn harness_over(
    storage: MemoryStorage,
    record: Option<StoredRecord>,
    outcome: Result<(), FormRendererError>,
    cleanup: MockArtifactCleanup,
) -> Harness {
    let mut records = MockRecordRepository::new();
    records
        .expect_find()
        .returning(move |_| Ok(record.clone()));
    let storage = Arc::new(storage);
    let renderer = Arc::new(ScriptedRenderer {
        storage: Arc::clone(&storage),
        outcome,
        seen: Mutex::new(Vec::new()),
    });
    let service = FormService::new(
        Arc::new(records),
        Arc::clone(&storage),
        Arc::clone(&renderer),
        Arc::new(cleanup),
        fixture_clock(),
        Arc::new(FormTemplate::parse(TEMPLATE).expect("template parses")),
    );
    Harness {
        storage,
        renderer,
        service,
    }
}

#[fixture]
fn no_cleanup() -> MockArtifactCleanup {
    let mut cleanup = MockArtifactCleanup::new();
    cleanup.expect_expire().times(0);
    cleanup
}

#[rstest]
#[tokio::test]
async fn success_keeps_only_the_pdf_and_schedules_its_expiry() {
    let mut cleanup = MockArtifactCleanup::new();
    cleanup
        .expect_expire()
        .withf(|area, name, after| {
            *area == StorageArea::Forms && name.ends_with(".pdf") && *after == FORM_RETENTION
        })
        .times(1)
        .return_const(());
    let mut record = stored(12, 5);
    record.fields.store = StoreId(3);
    let h = harness(Some(record), Ok(()), cleanup);

    let name = h
        .service
        .create_form(&Caller::new(user(5)), record_id(12))
        .await
        .expect("form generated");

    assert!(name.as_str().starts_with("deltio_12_2025_3_7_"));
    assert!(name.is_rendered());
    assert_eq!(h.storage.names(), vec![name.as_str().to_owned()]);

    let seen = h.renderer.seen.lock().expect("renderer lock");
    let (job, document) = &seen[0];
    assert_eq!(job.store, StoreId(3));
    assert_eq!(format!("{}.pdf", job.filled), job.output);
    let document = document.as_deref().expect("filled document written first");
    assert!(document.contains("<value>12</value>"));
    assert!(document.contains("<value>Eleni Papadopoulou</value>"));
    assert!(document.contains(r#"<field name="serial">"#));
}

#[rstest]
#[case(FormRendererError::failed("exit status 1"), ErrorCode::UpstreamFailure)]
#[case(FormRendererError::spawn("java not found"), ErrorCode::UpstreamFailure)]
#[case(FormRendererError::timeout(30_u64), ErrorCode::IntegrationTimeout)]
#[tokio::test]
async fn failure_leaves_nothing_behind(
    no_cleanup: MockArtifactCleanup,
    #[case] failure: FormRendererError,
    #[case] code: ErrorCode,
) {
    let h = harness(Some(stored(12, 5)), Err(failure), no_cleanup);

    let err = h
        .service
        .create_form(&Caller::new(UserId::ADMIN), record_id(12))
        .await
        .expect_err("renderer failed");

    assert_eq!(err.code(), code);
    assert!(h.storage.names().is_empty());
}

#[rstest]
#[tokio::test]
async fn torn_intermediate_write_is_removed(no_cleanup: MockArtifactCleanup) {
    let mut record = stored(12, 5);
    record.fields.notes_received = "x".repeat(64 * 1024);
    let storage = MemoryStorage {
        torn_after: Some(16),
        ..MemoryStorage::default()
    };
    let h = harness_over(storage, Some(record), Ok(()), no_cleanup);

    let err = h
        .service
        .create_form(&Caller::new(user(5)), record_id(12))
        .await
        .expect_err("write failed");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert!(h.storage.names().is_empty());
    assert!(h.renderer.seen.lock().expect("renderer lock").is_empty());
}

#[rstest]
#[tokio::test]
async fn other_mechanics_are_forbidden(no_cleanup: MockArtifactCleanup) {
    let h = harness(Some(stored(12, 5)), Ok(()), no_cleanup);

    let err = h
        .service
        .create_form(&Caller::new(user(6)), record_id(12))
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert!(h.renderer.seen.lock().expect("renderer lock").is_empty());
}

#[rstest]
#[tokio::test]
async fn missing_record_is_not_found(no_cleanup: MockArtifactCleanup) {
    let h = harness(None, Ok(()), no_cleanup);

    let err = h
        .service
        .create_form(&Caller::new(UserId::ADMIN), record_id(99))
        .await
        .expect_err("not found");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn open_form_serves_rendered_files_only(no_cleanup: MockArtifactCleanup) {
    let h = harness(None, Ok(()), no_cleanup);
    h.storage
        .write(StorageArea::Forms, "deltio_1_2025_3_7_00000000", b"<xfdf/>")
        .await
        .expect("seed");
    h.storage
        .write(StorageArea::Forms, "deltio_1_2025_3_7_00000000.pdf", b"%PDF")
        .await
        .expect("seed");

    let pdf = FormName::parse("deltio_1_2025_3_7_00000000.pdf").expect("valid name");
    assert_eq!(h.service.open_form(&pdf).await.expect("served"), b"%PDF");

    let intermediate = FormName::parse("deltio_1_2025_3_7_00000000").expect("valid name");
    let err = h
        .service
        .open_form(&intermediate)
        .await
        .expect_err("field documents are private");
    assert_eq!(err.code(), ErrorCode::NotFound);

    let expired = FormName::parse("deltio_2_2025_3_7_00000000.pdf").expect("valid name");
    let err = h.service.open_form(&expired).await.expect_err("gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
