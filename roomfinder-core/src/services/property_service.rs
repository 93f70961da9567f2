//! Listing search and host listing management

use std::sync::Arc;

use roomfinder_backend::{
    Capability, PaginatedResponse, PaginationParams, Property, PropertyDraft, PropertySearchParams,
};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::Notifier;
use crate::validation::{self, FieldErrors};

/// Largest page the client asks for.
const MAX_PAGE_SIZE: u32 = 100;

/// Property service
pub struct PropertyService {
    ctx: Arc<ServiceContext>,
}

impl PropertyService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Search public listings.
    ///
    /// Blank text filters are dropped and paging is clamped.
    pub async fn search(
        &self,
        params: &PropertySearchParams,
    ) -> CoreResult<PaginatedResponse<Property>> {
        let params = normalize_search(params)?;
        self.ctx
            .call(Capability::Listings, |b| async move {
                b.search_properties(&params).await
            })
            .await
    }

    pub async fn get(&self, property_id: &str) -> CoreResult<Property> {
        self.ctx
            .call(Capability::Listings, |b| async move {
                b.get_property(property_id).await
            })
            .await
    }

    /// Listings of the signed-in host.
    pub async fn list_own(
        &self,
        params: &PaginationParams,
    ) -> CoreResult<PaginatedResponse<Property>> {
        self.ctx.require_user().await?;
        let params = params.validated(MAX_PAGE_SIZE);
        self.ctx
            .call(Capability::HostListings, |b| async move {
                b.list_host_properties(&params).await
            })
            .await
    }

    pub async fn create(&self, draft: &PropertyDraft) -> CoreResult<Property> {
        validation::validate_property_draft(draft)?;
        self.ctx.require_user().await?;
        let property = self
            .ctx
            .call(Capability::HostListings, |b| async move {
                b.create_property(draft).await
            })
            .await?;
        log::info!("Listing {} created", property.id);
        self.ctx.notifier.success("Listing published");
        Ok(property)
    }

    pub async fn update(&self, property_id: &str, draft: &PropertyDraft) -> CoreResult<Property> {
        validation::validate_property_draft(draft)?;
        self.ctx.require_user().await?;
        let property = self
            .ctx
            .call(Capability::HostListings, |b| async move {
                b.update_property(property_id, draft).await
            })
            .await?;
        self.ctx.notifier.success("Listing updated");
        Ok(property)
    }

    pub async fn delete(&self, property_id: &str) -> CoreResult<()> {
        self.ctx.require_user().await?;
        self.ctx
            .call(Capability::HostListings, |b| async move {
                b.delete_property(property_id).await
            })
            .await?;
        log::info!("Listing {property_id} deleted");
        self.ctx.notifier.success("Listing deleted");
        Ok(())
    }
}

fn normalize_search(params: &PropertySearchParams) -> CoreResult<PropertySearchParams> {
    let blank_to_none =
        |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    let mut errors = FieldErrors::new();
    if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
        if min > max {
            errors.add("maxPrice", "Maximum price must be above the minimum");
        }
    }
    if params.min_price.is_some_and(|p| p < 0.0) {
        errors.add("minPrice", "Price cannot be negative");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let paging = params.to_pagination().validated(MAX_PAGE_SIZE);
    Ok(PropertySearchParams {
        page: paging.page,
        page_size: paging.page_size,
        query: blank_to_none(&params.query),
        city: blank_to_none(&params.city),
        guests: params.guests.filter(|g| *g > 0),
        ..params.clone()
    })
}
