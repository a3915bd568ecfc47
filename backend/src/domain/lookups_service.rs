//! Lookup tables for client pick lists.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{LookupRepository, LookupsQuery};
use crate::domain::repository_errors::map_lookup_error;
use crate::domain::{Error, Lookups};

#[derive(Clone)]
pub struct LookupsService<L> {
    lookups: Arc<L>,
}

impl<L> LookupsService<L> {
    pub fn new(lookups: Arc<L>) -> Self {
        Self { lookups }
    }
}

#[async_trait]
impl<L> LookupsQuery for LookupsService<L>
where
    L: LookupRepository,
{
    async fn lookups(&self) -> Result<Lookups, Error> {
        self.lookups.load().await.map_err(map_lookup_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{LookupRepositoryError, MockLookupRepository};
    use crate::domain::test_fixtures::store;

    #[tokio::test]
    async fn returns_the_loaded_tables() {
        let mut repo = MockLookupRepository::new();
        repo.expect_load().times(1).returning(|| {
            Ok(Lookups {
                stores: vec![store(1)],
                ..Lookups::default()
            })
        });

        let lookups = LookupsService::new(Arc::new(repo))
            .lookups()
            .await
            .expect("loaded");

        assert_eq!(lookups.stores.len(), 1);
    }

    #[tokio::test]
    async fn query_failures_are_internal() {
        let mut repo = MockLookupRepository::new();
        repo.expect_load()
            .returning(|| Err(LookupRepositoryError::query("syntax error")));

        let err = LookupsService::new(Arc::new(repo))
            .lookups()
            .await
            .expect_err("failed");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
