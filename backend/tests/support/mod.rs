//! In-memory port adapters shared by the integration tests.
//!
//! Integration tests compile as separate crates, so the mockall doubles
//! behind `cfg(test)` are not visible here. These fakes keep state in
//! mutex-guarded collections and record the side effects tests assert on.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};
use tokio::sync::mpsc;

use repair_desk::domain::ports::{
    ArtifactCleanup, HistoryRepository, HistoryRepositoryError, LookupRepository,
    LookupRepositoryError, PhotoRepository, PhotoRepositoryError, RecordAnnouncer,
    RecordRepository, RecordRepositoryError, SmsProvider, SmsProviderError, StorageArea,
};
use repair_desk::domain::{
    Customer, HistoryEntry, HistoryId, Lookups, NewHistoryEntry, OutboundSms, PhotoRef, Product,
    RecordFields, RecordId, RecordService, SmsDispatcher, StatusId, Store, StoreId, StoredRecord,
    UserId,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn user(raw: i32) -> UserId {
    UserId::new(raw).expect("valid user id")
}

pub fn photo(name: &str) -> PhotoRef {
    PhotoRef::new(name).expect("valid photo ref")
}

pub fn photos(names: &[&str]) -> Vec<PhotoRef> {
    names.iter().map(|name| photo(name)).collect()
}

/// Intake fields for a dishwasher owned by `mechanic`.
pub fn fields(mechanic: i32, status: i32, store: i32) -> RecordFields {
    RecordFields {
        date: NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date"),
        customer: Customer {
            name: "Giorgos Nikolaou".to_owned(),
            city: Some("Volos".to_owned()),
            phone_mobile: Some("6911111111".to_owned()),
            ..Customer::default()
        },
        product: Product {
            product: "Dishwasher".to_owned(),
            manufacturer: Some("Miele".to_owned()),
            ..Product::default()
        },
        fee: None,
        advance: None,
        status: StatusId(status),
        mechanic: user(mechanic),
        notes_received: "leaks from the door".to_owned(),
        notes_repaired: None,
        store: StoreId(store),
    }
}

pub fn store(id: i32) -> Store {
    Store {
        id,
        name: "Harbour".to_owned(),
        address: "Iasonos 4".to_owned(),
        phone: "2421000000".to_owned(),
        review_link: "https://example.test/harbour".to_owned(),
    }
}

#[derive(Default)]
pub struct InMemoryRecords {
    rows: Mutex<BTreeMap<RecordId, RecordFields>>,
    next_id: AtomicUsize,
}

impl InMemoryRecords {
    pub fn ids(&self) -> Vec<RecordId> {
        lock(&self.rows).keys().copied().collect()
    }

    fn allocate(&self) -> Result<RecordId, RecordRepositoryError> {
        let next = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        i32::try_from(next)
            .ok()
            .and_then(|raw| RecordId::new(raw).ok())
            .ok_or_else(|| RecordRepositoryError::query("record id overflow"))
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecords {
    async fn insert(&self, fields: &RecordFields) -> Result<RecordId, RecordRepositoryError> {
        let id = self.allocate()?;
        lock(&self.rows).insert(id, fields.clone());
        Ok(id)
    }

    async fn find(&self, id: RecordId) -> Result<Option<StoredRecord>, RecordRepositoryError> {
        Ok(lock(&self.rows).get(&id).map(|fields| StoredRecord {
            id,
            fields: fields.clone(),
        }))
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, RecordRepositoryError> {
        Ok(lock(&self.rows)
            .iter()
            .map(|(id, fields)| StoredRecord {
                id: *id,
                fields: fields.clone(),
            })
            .collect())
    }

    async fn list_open_by_mechanic(
        &self,
        mechanic: UserId,
        closed: StatusId,
    ) -> Result<Vec<StoredRecord>, RecordRepositoryError> {
        Ok(lock(&self.rows)
            .iter()
            .filter(|(_, fields)| fields.mechanic == mechanic && fields.status != closed)
            .map(|(id, fields)| StoredRecord {
                id: *id,
                fields: fields.clone(),
            })
            .collect())
    }

    async fn update(
        &self,
        id: RecordId,
        fields: &RecordFields,
    ) -> Result<bool, RecordRepositoryError> {
        let mut rows = lock(&self.rows);
        match rows.get_mut(&id) {
            Some(row) => {
                *row = fields.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordRepositoryError> {
        Ok(lock(&self.rows).remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

#[async_trait]
impl HistoryRepository for InMemoryHistory {
    async fn append(
        &self,
        entry: &NewHistoryEntry,
    ) -> Result<HistoryEntry, HistoryRepositoryError> {
        let mut entries = lock(&self.entries);
        let raw = i32::try_from(entries.len() + 1)
            .map_err(|_| HistoryRepositoryError::query("history id overflow"))?;
        let id = HistoryId::new(raw).map_err(|err| HistoryRepositoryError::query(err.to_string()))?;
        let stored = HistoryEntry {
            id,
            record_id: entry.record_id,
            mechanic: entry.mechanic,
            date: entry.date,
            notes: entry.notes.clone(),
        };
        entries.push(stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: HistoryId) -> Result<Option<HistoryEntry>, HistoryRepositoryError> {
        Ok(lock(&self.entries)
            .iter()
            .find(|entry| entry.id == id)
            .cloned())
    }

    async fn list_for_records(
        &self,
        records: &[RecordId],
    ) -> Result<Vec<HistoryEntry>, HistoryRepositoryError> {
        Ok(lock(&self.entries)
            .iter()
            .filter(|entry| records.contains(&entry.record_id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryPhotos {
    sets: Mutex<HashMap<RecordId, Vec<PhotoRef>>>,
    replacements: AtomicUsize,
}

impl InMemoryPhotos {
    pub fn replacements(&self) -> usize {
        self.replacements.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhotoRepository for InMemoryPhotos {
    async fn replace(
        &self,
        record: RecordId,
        photos: &[PhotoRef],
    ) -> Result<(), PhotoRepositoryError> {
        self.replacements.fetch_add(1, Ordering::SeqCst);
        let mut sets = lock(&self.sets);
        if photos.is_empty() {
            sets.remove(&record);
        } else {
            sets.insert(record, photos.to_vec());
        }
        Ok(())
    }

    async fn list_for_records(
        &self,
        records: &[RecordId],
    ) -> Result<HashMap<RecordId, Vec<PhotoRef>>, PhotoRepositoryError> {
        Ok(lock(&self.sets)
            .iter()
            .filter(|(id, _)| records.contains(id))
            .map(|(id, set)| (*id, set.clone()))
            .collect())
    }
}

pub struct InMemoryLookups {
    lookups: Lookups,
}

impl InMemoryLookups {
    pub fn with_stores(stores: Vec<Store>) -> Self {
        Self {
            lookups: Lookups {
                stores,
                ..Lookups::default()
            },
        }
    }
}

#[async_trait]
impl LookupRepository for InMemoryLookups {
    async fn load(&self) -> Result<Lookups, LookupRepositoryError> {
        Ok(self.lookups.clone())
    }

    async fn find_store(&self, id: StoreId) -> Result<Option<Store>, LookupRepositoryError> {
        Ok(self
            .lookups
            .stores
            .iter()
            .find(|store| store.id == id.0)
            .cloned())
    }
}

/// Cleanup that remembers what it was asked to remove.
#[derive(Default)]
pub struct RecordingCleanup {
    discarded: Mutex<Vec<(StorageArea, String)>>,
}

impl RecordingCleanup {
    pub fn discarded(&self) -> Vec<(StorageArea, String)> {
        lock(&self.discarded).clone()
    }
}

impl ArtifactCleanup for RecordingCleanup {
    fn discard(&self, area: StorageArea, names: Vec<String>) {
        lock(&self.discarded).extend(names.into_iter().map(|name| (area, name)));
    }

    fn expire(&self, _area: StorageArea, _name: String, _after: Duration) {}
}

#[derive(Default)]
pub struct RecordingAnnouncer {
    announced: Mutex<Vec<RecordId>>,
}

impl RecordingAnnouncer {
    pub fn announced(&self) -> Vec<RecordId> {
        lock(&self.announced).clone()
    }
}

impl RecordAnnouncer for RecordingAnnouncer {
    fn announce_new_record(&self, record: RecordId) {
        lock(&self.announced).push(record);
    }
}

/// Gateway that accepts every message and forwards it to the test.
pub struct ChannelSmsProvider {
    sent: mpsc::UnboundedSender<OutboundSms>,
    calls: AtomicUsize,
}

impl ChannelSmsProvider {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundSms>) {
        let (sent, rx) = mpsc::unbounded_channel();
        (
            Self {
                sent,
                calls: AtomicUsize::new(0),
            },
            rx,
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsProvider for ChannelSmsProvider {
    async fn send(&self, sms: &OutboundSms) -> Result<(), SmsProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent
            .send(sms.clone())
            .map_err(|err| SmsProviderError::transport(err.to_string()))
    }
}

/// Record service over in-memory adapters, with handles on every fake.
pub struct RecordHarness {
    pub records: Arc<InMemoryRecords>,
    pub history: Arc<InMemoryHistory>,
    pub photos: Arc<InMemoryPhotos>,
    pub cleanup: Arc<RecordingCleanup>,
    pub announcer: Arc<RecordingAnnouncer>,
    pub service: RecordService<InMemoryRecords, InMemoryHistory, InMemoryPhotos>,
}

impl RecordHarness {
    pub fn new() -> Self {
        let records = Arc::new(InMemoryRecords::default());
        let history = Arc::new(InMemoryHistory::default());
        let photos = Arc::new(InMemoryPhotos::default());
        let cleanup = Arc::new(RecordingCleanup::default());
        let announcer = Arc::new(RecordingAnnouncer::default());
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let service = RecordService::new(
            Arc::clone(&records),
            Arc::clone(&history),
            Arc::clone(&photos),
            Arc::clone(&announcer) as Arc<dyn RecordAnnouncer>,
            Arc::clone(&cleanup) as Arc<dyn ArtifactCleanup>,
            clock,
        );
        Self {
            records,
            history,
            photos,
            cleanup,
            announcer,
            service,
        }
    }
}

pub type InMemorySms = SmsDispatcher<InMemoryRecords, InMemoryLookups, ChannelSmsProvider>;

/// SMS dispatcher sharing `records` with a record harness.
pub fn sms_dispatcher(
    records: Arc<InMemoryRecords>,
    stores: Vec<Store>,
    delivered_code: i32,
) -> (
    Arc<InMemorySms>,
    Arc<ChannelSmsProvider>,
    mpsc::UnboundedReceiver<OutboundSms>,
) {
    let (provider, rx) = ChannelSmsProvider::channel();
    let provider = Arc::new(provider);
    let dispatcher = Arc::new(SmsDispatcher::new(
        records,
        Arc::new(InMemoryLookups::with_stores(stores)),
        Arc::clone(&provider),
        delivered_code,
    ));
    (dispatcher, provider, rx)
}
