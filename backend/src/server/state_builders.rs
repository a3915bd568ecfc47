//! Builders wiring outbound adapters into the domain services behind
//! [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use repair_desk::domain::ports::{ArtifactCleanup, FileStorage};
use repair_desk::domain::{
    FormService, FormTemplate, LookupsService, PasswordLoginService, PhotoUploadService,
    PushDispatcher, RecordService, SmsDispatcher, StatusId, UploadLimits,
};
use repair_desk::inbound::http::state::HttpState;
use repair_desk::outbound::pdf::PdftkRenderer;
use repair_desk::outbound::persistence::{
    DbPool, DieselHistoryRepository, DieselLookupRepository, DieselPhotoRepository,
    DieselRecordRepository, DieselUserRepository,
};
use repair_desk::outbound::push::{FcmPushProvider, RedisDeviceTokenStore};
use repair_desk::outbound::sms::HttpSmsProvider;
use repair_desk::outbound::storage::{LocalFileStorage, TokioArtifactCleanup};

/// Connected outbound adapters.
pub(crate) struct Adapters {
    pub pool: DbPool,
    pub tokens: RedisDeviceTokenStore,
    pub storage: LocalFileStorage,
    pub sms: HttpSmsProvider,
    pub push: FcmPushProvider,
    pub renderer: PdftkRenderer,
    pub template: FormTemplate,
}

/// Tunables applied by the services.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Policies {
    pub upload_limits: UploadLimits,
    pub closed_status: StatusId,
    pub sms_delivered_code: i32,
}

/// Build the handler state from connected adapters.
pub(crate) fn build_http_state(adapters: Adapters, policies: Policies) -> web::Data<HttpState> {
    let Adapters {
        pool,
        tokens,
        storage,
        sms,
        push,
        renderer,
        template,
    } = adapters;

    let records = Arc::new(DieselRecordRepository::new(pool.clone()));
    let lookups = Arc::new(DieselLookupRepository::new(pool.clone()));
    let storage = Arc::new(storage);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let cleanup: Arc<dyn ArtifactCleanup> = Arc::new(TokioArtifactCleanup::new(
        Arc::clone(&storage) as Arc<dyn FileStorage>,
    ));

    let push = Arc::new(PushDispatcher::new(Arc::new(tokens), Arc::new(push)));
    let record_service = Arc::new(
        RecordService::new(
            Arc::clone(&records),
            Arc::new(DieselHistoryRepository::new(pool.clone())),
            Arc::new(DieselPhotoRepository::new(pool.clone())),
            push.clone(),
            Arc::clone(&cleanup),
            Arc::clone(&clock),
        )
        .with_closed_status(policies.closed_status),
    );
    let forms = FormService::new(
        Arc::clone(&records),
        Arc::clone(&storage),
        Arc::new(renderer),
        cleanup,
        clock,
        Arc::new(template),
    );
    let sms = SmsDispatcher::new(
        records,
        Arc::clone(&lookups),
        Arc::new(sms),
        policies.sms_delivered_code,
    );

    web::Data::new(HttpState {
        login: Arc::new(PasswordLoginService::new(Arc::new(
            DieselUserRepository::new(pool),
        ))),
        devices: push,
        records: record_service.clone(),
        records_query: record_service,
        photos: Arc::new(PhotoUploadService::new(storage, policies.upload_limits)),
        forms: Arc::new(forms),
        sms: Arc::new(sms),
        lookups: Arc::new(LookupsService::new(lookups)),
    })
}
