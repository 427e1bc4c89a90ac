//! # Domain Models
//!
//! The storable entities and value objects of the adhub marketplace.
//! Identity is a UUID key; the repository port stores any [`Entity`] variant
//! under it.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::User;

/// Postal address of a service. Immutable value object, replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub street: String,
    pub number: u32,
    pub city: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,
}

/// Payment details of a provider. Singular, replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Billing {
    pub card_number: String,
    pub expiry_date: NaiveDate,
    pub secret_code: String,
    pub fullname: String,
}

/// A picture only visible to entitled visitors, with its publish timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivatePicture {
    pub picture: Bytes,
    pub date_published: DateTime<Utc>,
}

/// A published service advertisement, owned by exactly one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Cleared together with `expiry_date` when the ad is unpublished.
    pub date_published: Option<DateTime<Utc>>,
    /// Always `date_published + 7 days` when set.
    pub expiry_date: Option<DateTime<Utc>>,
    pub location: Option<Location>,
    /// Offered services, name -> description.
    pub services: BTreeMap<String, String>,
    /// Price list, name -> amount.
    pub prices: BTreeMap<String, i64>,
    /// UUID of the owning provider.
    pub owner: Uuid,
    pub published: bool,
}

/// Promotion record for an advertisement. At most one per ad per provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumAdvertisement {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub ad_id: Uuid,
    pub date_published: DateTime<Utc>,
    /// Copied from the underlying ad at promotion time.
    pub expiry_date: Option<DateTime<Utc>>,
}

/// A comment attached to some entity (an ad, a report, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub target_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub content: String,
}

impl Comment {
    pub fn new(id: Uuid, target_id: Uuid, owner_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id,
            target_id,
            owner_id,
            created_at: Utc::now(),
            modified_at: None,
            content: content.into(),
        }
    }
}

/// Moderation state of a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    New,
    Pending,
    Closed,
}

/// An abuse report against a profile, an ad, a provider, etc.
///
/// Lifecycle: `New` -> (moderator opens) -> `Pending` -> (moderator
/// closes) -> `Closed`. Transitions live on the moderator behaviors in
/// [`crate::users`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    /// What or whom is being reported.
    pub target_id: Uuid,
    /// The reporting user.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub status: ReportStatus,
    /// Ordered moderation trail.
    pub comments: Vec<Comment>,
}

/// Content-agnostic storage unit for the repository port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    User(User),
    Advertisement(Advertisement),
    PremiumAdvertisement(PremiumAdvertisement),
    Comment(Comment),
    Report(Report),
}

impl Entity {
    /// The key under which this entity is stored.
    pub fn id(&self) -> Uuid {
        match self {
            Entity::User(user) => user.id,
            Entity::Advertisement(ad) => ad.id,
            Entity::PremiumAdvertisement(premium) => premium.id,
            Entity::Comment(comment) => comment.id,
            Entity::Report(report) => report.id,
        }
    }

    /// Entity kind, for log lines and not-found messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::User(_) => "user",
            Entity::Advertisement(_) => "advertisement",
            Entity::PremiumAdvertisement(_) => "premium advertisement",
            Entity::Comment(_) => "comment",
            Entity::Report(_) => "report",
        }
    }
}

impl From<User> for Entity {
    fn from(user: User) -> Self {
        Entity::User(user)
    }
}

impl From<Advertisement> for Entity {
    fn from(ad: Advertisement) -> Self {
        Entity::Advertisement(ad)
    }
}

impl From<PremiumAdvertisement> for Entity {
    fn from(premium: PremiumAdvertisement) -> Self {
        Entity::PremiumAdvertisement(premium)
    }
}

impl From<Comment> for Entity {
    fn from(comment: Comment) -> Self {
        Entity::Comment(comment)
    }
}

impl From<Report> for Entity {
    fn from(report: Report) -> Self {
        Entity::Report(report)
    }
}
