//! Form generation service.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::{FormName, FormTemplate};
use crate::domain::ports::{
    ArtifactCleanup, FileStorage, FormGeneration, FormRenderer, FormRendererError,
    RecordRepository, RenderJob, StorageArea,
};
use crate::domain::repository_errors::{map_record_error, map_storage_error};
use crate::domain::{Caller, Error, RecordId, StoredRecord};

/// How long a rendered form stays downloadable.
pub const FORM_RETENTION: Duration = Duration::from_secs(5 * 60);

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Values offered to the template, keyed by the record's JSON attribute
/// names.
pub fn form_values(record: &StoredRecord) -> BTreeMap<String, String> {
    let fields = &record.fields;
    let customer = &fields.customer;
    let product = &fields.product;
    [
        ("id", record.id.to_string()),
        ("date", fields.date.format("%d/%m/%Y").to_string()),
        ("name", customer.name.clone()),
        ("address", opt(&customer.address)),
        ("area", opt(&customer.area)),
        ("city", opt(&customer.city)),
        ("postalCode", opt(&customer.postal_code)),
        ("phoneMobile", opt(&customer.phone_mobile)),
        ("phoneHome", opt(&customer.phone_home)),
        ("email", opt(&customer.email)),
        ("product", product.product.clone()),
        ("manufacturer", opt(&product.manufacturer)),
        ("serial", opt(&product.serial)),
        ("hasWarranty", product.has_warranty.to_string()),
        (
            "warrantyDate",
            product
                .warranty_date
                .map(|date| date.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
        ),
        ("fee", opt(&fields.fee)),
        ("advance", opt(&fields.advance)),
        ("status", fields.status.0.to_string()),
        ("mechanic", fields.mechanic.to_string()),
        ("notesReceived", fields.notes_received.clone()),
        ("notesRepaired", opt(&fields.notes_repaired)),
        ("store", fields.store.to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value))
    .collect()
}

fn map_renderer_error(error: FormRendererError) -> Error {
    match error {
        FormRendererError::Timeout { seconds } => {
            Error::integration_timeout(format!("form renderer exceeded {seconds}s"))
        }
        other => Error::upstream_failure(other.to_string()),
    }
}

/// Form generator implementing [`FormGeneration`].
pub struct FormService<R, S, F> {
    records: Arc<R>,
    storage: Arc<S>,
    renderer: Arc<F>,
    cleanup: Arc<dyn ArtifactCleanup>,
    clock: Arc<dyn Clock>,
    template: Arc<FormTemplate>,
    retention: Duration,
}

impl<R, S, F> FormService<R, S, F> {
    pub fn new(
        records: Arc<R>,
        storage: Arc<S>,
        renderer: Arc<F>,
        cleanup: Arc<dyn ArtifactCleanup>,
        clock: Arc<dyn Clock>,
        template: Arc<FormTemplate>,
    ) -> Self {
        Self {
            records,
            storage,
            renderer,
            cleanup,
            clock,
            template,
            retention: FORM_RETENTION,
        }
    }

    #[must_use]
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }
}

impl<R, S, F> FormService<R, S, F>
where
    S: FileStorage,
{
    async fn remove_quietly(&self, name: &FormName) {
        if let Err(error) = self.storage.remove(StorageArea::Forms, name.as_str()).await {
            warn!(form = %name, %error, "could not remove form scratch file");
        }
    }
}

#[async_trait]
impl<R, S, F> FormGeneration for FormService<R, S, F>
where
    R: RecordRepository,
    S: FileStorage,
    F: FormRenderer,
{
    async fn create_form(&self, caller: &Caller, id: RecordId) -> Result<FormName, Error> {
        let record = self
            .records
            .find(id)
            .await
            .map_err(map_record_error)?
            .ok_or_else(|| Error::not_found(format!("record {id} not found")))?;
        caller.require_owner(record.fields.mechanic)?;

        let document = self
            .template
            .fill(&form_values(&record))
            .map_err(|err| Error::internal(format!("form template fill failed: {err}")))?;

        let filled = FormName::intermediate(id, &self.clock.local(), rand::random());
        if let Err(error) = self
            .storage
            .write(StorageArea::Forms, filled.as_str(), document.as_bytes())
            .await
        {
            self.remove_quietly(&filled).await;
            return Err(map_storage_error(error));
        }

        let output = filled.rendered();
        let job = RenderJob {
            store: record.fields.store,
            filled: filled.as_str().to_owned(),
            output: output.as_str().to_owned(),
        };
        let rendered = self.renderer.render(&job).await;
        self.remove_quietly(&filled).await;

        if let Err(error) = rendered {
            warn!(record_id = %id, %error, "form rendering failed");
            self.remove_quietly(&output).await;
            return Err(map_renderer_error(error));
        }

        self.cleanup
            .expire(StorageArea::Forms, output.as_str().to_owned(), self.retention);
        info!(record_id = %id, form = %output, "form generated");
        Ok(output)
    }

    async fn open_form(&self, name: &FormName) -> Result<Vec<u8>, Error> {
        if !name.is_rendered() {
            return Err(Error::not_found(format!("form {name} not found")));
        }
        self.storage
            .read(StorageArea::Forms, name.as_str())
            .await
            .map_err(map_storage_error)?
            .ok_or_else(|| Error::not_found(format!("form {name} not found or expired")))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
