//! The interaction ledger service.
//!
//! Ties validation, the weight rule, the catalog check, and the store
//! together. Holds no per-request state; every call is independent.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::aggregate::{AggregateEntry, AggregateQuery, InteractionSummary};
use crate::catalog::ProductCatalog;
use crate::clock::MonotonicClock;
use crate::error::{Error, NotFoundErrorCode, Result, ValidationErrorCode};
use crate::events::{InteractionEvent, InteractionReport, ValidInteraction};
use crate::limits::{clamp_limit, MAX_ID_LEN};
use crate::schema::validate_report;
use crate::store::InteractionStore;
use crate::weight::compute_weight;

pub struct InteractionLedger {
    store: Arc<dyn InteractionStore>,
    catalog: Arc<dyn ProductCatalog>,
    clock: MonotonicClock,
}

impl InteractionLedger {
    pub fn new(store: Arc<dyn InteractionStore>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            store,
            catalog,
            clock: MonotonicClock::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn InteractionStore> {
        &self.store
    }

    /// Validates, scores, and appends one interaction.
    ///
    /// Returns the persisted event. Either the whole event is stored or
    /// nothing is.
    pub async fn record_interaction(&self, report: &InteractionReport) -> Result<InteractionEvent> {
        let valid = validate_report(report)?;
        self.record(valid).await
    }

    /// Records an interaction that already passed validation.
    pub async fn record(&self, interaction: ValidInteraction) -> Result<InteractionEvent> {
        if !self.catalog.product_exists(&interaction.product_id).await? {
            debug!(product_id = %interaction.product_id, "Rejected interaction for unknown product");
            return Err(Error::not_found(
                NotFoundErrorCode::Product,
                format!("product {} not found", interaction.product_id),
            ));
        }

        let event = InteractionEvent {
            id: Uuid::new_v4(),
            weight: compute_weight(interaction.action, interaction.rating),
            user_id: interaction.user_id,
            product_id: interaction.product_id,
            action: interaction.action,
            rating: interaction.rating,
            timestamp: self.clock.now(),
        };

        self.store.append(&event).await.map_err(|e| {
            warn!(
                user_id = %event.user_id,
                product_id = %event.product_id,
                action = %event.action,
                error = %e,
                "Failed to append interaction"
            );
            e
        })?;

        debug!(
            event_id = %event.id,
            user_id = %event.user_id,
            product_id = %event.product_id,
            action = %event.action,
            weight = event.weight,
            "Recorded interaction"
        );

        Ok(event)
    }

    /// Summed weight per product for a user, heaviest first.
    pub async fn aggregate_weight_by_product(
        &self,
        user_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>> {
        let user_id = require_id("userId", user_id)?;
        self.store.aggregate_by_product(user_id, query).await
    }

    /// Summed weight per user for a product, heaviest first.
    pub async fn aggregate_weight_by_user(
        &self,
        product_id: &str,
        query: &AggregateQuery,
    ) -> Result<Vec<AggregateEntry>> {
        let product_id = require_id("productId", product_id)?;
        self.store.aggregate_by_user(product_id, query).await
    }

    /// A user's latest events, newest first.
    pub async fn recent_events(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<InteractionEvent>> {
        let user_id = require_id("userId", user_id)?;
        self.store.recent_events(user_id, clamp_limit(limit)).await
    }

    pub async fn summary(&self) -> Result<InteractionSummary> {
        self.store.summary().await
    }
}

fn require_id<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(
            ValidationErrorCode::MissingField,
            format!("{} is required", name),
        ));
    }
    if trimmed.chars().count() > MAX_ID_LEN {
        return Err(Error::validation(
            ValidationErrorCode::IdentifierTooLong,
            format!("{} exceeds {} characters", name, MAX_ID_LEN),
        ));
    }
    Ok(trimmed)
}
