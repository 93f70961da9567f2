//! `MarketplaceBackend` implementation for the legacy PHP API

use async_trait::async_trait;
use serde_json::json;

use crate::error::Result;
use crate::traits::{ErrorContext, MarketplaceBackend};
use crate::types::{
    BackendKind, BackendMetadata, CreateReviewRequest, Notification, PaginatedResponse, Property,
    PropertySearchParams, PropertyType, Review,
};
use crate::utils::datetime;

use super::{
    BACKEND_NAME, CAPABILITIES, LegacyBackend, LegacyNotification, LegacyProperty, LegacyReview,
};

/// Guest uid used for anonymous listing requests.
const ANONYMOUS_UID: &str = "0";

impl LegacyBackend {
    fn convert_property(&self, raw: LegacyProperty) -> Property {
        let mut images: Vec<String> = raw
            .image
            .iter()
            .chain(raw.gallery.iter())
            .filter(|p| !p.is_empty())
            .map(|p| self.asset_url(p))
            .collect();
        images.dedup();

        let amenities = raw
            .facilities
            .as_deref()
            .map(|f| {
                f.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        #[allow(clippy::cast_possible_truncation)]
        let rating = raw.rating.map(|r| r as f32);

        Property {
            id: raw.id,
            title: raw.title,
            description: raw.description.filter(|d| !d.is_empty()),
            property_type: raw
                .property_type
                .as_deref()
                .and_then(|t| t.parse().ok())
                .unwrap_or(PropertyType::Other),
            city: raw.city.unwrap_or_default(),
            address: raw.address.filter(|a| !a.is_empty()),
            price_per_night: raw.price,
            currency: "XAF".to_string(),
            max_guests: raw.person_limit,
            bedrooms: raw.bedrooms,
            bathrooms: raw.bathrooms,
            images,
            amenities,
            host_id: raw.owner_id,
            rating,
            review_count: raw.review_count,
            is_available: raw.status,
            created_at: None,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn convert_review(raw: LegacyReview, property_id: &str) -> Review {
        Review {
            id: raw.id,
            property_id: raw.pid.unwrap_or_else(|| property_id.to_string()),
            user_name: raw.user_name,
            rating: raw.rating.round().clamp(0.0, 5.0) as u8,
            comment: raw.comment,
            created_at: raw.date.as_deref().and_then(datetime::parse_str),
        }
    }

    fn convert_notification(raw: LegacyNotification) -> Notification {
        Notification {
            id: raw.id,
            title: raw.title,
            message: raw.description,
            is_read: raw.is_read,
            created_at: raw.datetime.as_deref().and_then(datetime::parse_str),
        }
    }
}

#[async_trait]
impl MarketplaceBackend for LegacyBackend {
    fn id(&self) -> &'static str {
        BACKEND_NAME
    }

    fn metadata(&self) -> BackendMetadata {
        BackendMetadata {
            kind: BackendKind::Legacy,
            name: "RoomFinder legacy API".to_string(),
            description: "PHP user API: listings, favourites, reviews, notifications".to_string(),
            capabilities: CAPABILITIES.to_vec(),
        }
    }

    fn set_auth_token(&self, _token: Option<String>) {
        // requests carry the uid instead
    }

    // ---- Listings ----

    /// The PHP endpoint returns every listing; filters and paging are applied here.
    async fn search_properties(
        &self,
        params: &PropertySearchParams,
    ) -> Result<PaginatedResponse<Property>> {
        let mut envelope = self
            .call(
                "property_list.php",
                &json!({ "uid": ANONYMOUS_UID }),
                ErrorContext::default(),
            )
            .await?;
        let raw: Vec<LegacyProperty> = self.payload_list(&mut envelope, "propertylist")?;
        let matching: Vec<Property> = raw
            .into_iter()
            .map(|p| self.convert_property(p))
            .filter(|p| params.matches(p))
            .collect();
        Ok(PaginatedResponse::from_full_list(
            matching,
            &params.to_pagination(),
        ))
    }

    async fn get_property(&self, property_id: &str) -> Result<Property> {
        let mut envelope = self
            .call(
                "property_details.php",
                &json!({ "pid": property_id, "uid": ANONYMOUS_UID }),
                ErrorContext::resource("property", property_id),
            )
            .await?;
        let raw: LegacyProperty = self.payload(&mut envelope, "propetydetails")?;
        Ok(self.convert_property(raw))
    }

    // ---- Favorites ----

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Property>> {
        let mut envelope = self
            .call(
                "favourite_list.php",
                &json!({ "uid": user_id }),
                ErrorContext::default(),
            )
            .await?;
        let raw: Vec<LegacyProperty> = self.payload_list(&mut envelope, "propetylist")?;
        Ok(raw.into_iter().map(|p| self.convert_property(p)).collect())
    }

    async fn toggle_favorite(&self, user_id: &str, property_id: &str) -> Result<bool> {
        let envelope = self
            .call(
                "toggle_favourite.php",
                &json!({ "uid": user_id, "pid": property_id }),
                ErrorContext::resource("property", property_id),
            )
            .await?;
        // "Successfully Saved In Favourite List!" / "Successfully Removed In Favourite List!"
        Ok(!envelope.response_msg.to_ascii_lowercase().contains("remove"))
    }

    // ---- Reviews ----

    async fn list_reviews(&self, property_id: &str) -> Result<Vec<Review>> {
        let mut envelope = self
            .call(
                "review_list.php",
                &json!({ "pid": property_id }),
                ErrorContext::resource("property", property_id),
            )
            .await?;
        let raw: Vec<LegacyReview> = self.payload_list(&mut envelope, "reviewlist")?;
        Ok(raw
            .into_iter()
            .map(|r| Self::convert_review(r, property_id))
            .collect())
    }

    async fn create_review(&self, req: &CreateReviewRequest) -> Result<()> {
        self.call(
            "add_review.php",
            &json!({
                "uid": req.user_id,
                "pid": req.property_id,
                "rate_number": req.rating,
                "rate_text": req.comment,
            }),
            ErrorContext::resource("property", &req.property_id),
        )
        .await?;
        Ok(())
    }

    // ---- Notifications ----

    async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        let mut envelope = self
            .call(
                "notification_list.php",
                &json!({ "uid": user_id }),
                ErrorContext::default(),
            )
            .await?;
        let raw: Vec<LegacyNotification> = self.payload_list(&mut envelope, "NotificationData")?;
        Ok(raw.into_iter().map(Self::convert_notification).collect())
    }

    async fn mark_notification_read(&self, user_id: &str, notification_id: &str) -> Result<()> {
        self.call(
            "notification_read.php",
            &json!({ "uid": user_id, "nid": notification_id }),
            ErrorContext::resource("notification", notification_id),
        )
        .await?;
        Ok(())
    }
}
