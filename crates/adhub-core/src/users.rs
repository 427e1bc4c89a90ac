//! # Users and Role Behaviors
//!
//! One identity record ([`User`]) plus a closed role variant ([`Role`]).
//! Every mutating behavior is a guarded transition: the actor must be
//! active, must carry the right role, and the role-specific precondition
//! must hold before anything is touched.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use bytes::Bytes;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Advertisement, Billing, Comment, Location, PremiumAdvertisement, PrivatePicture, Report,
    ReportStatus,
};

/// How long a published ad stays visible.
const AD_LIFETIME_DAYS: i64 = 7;

/// Lifetime SMS cap per visitor.
const SMS_LIMIT: u32 = 50;

/// A marketplace account. Identity lives here; role-specific state lives
/// in the [`Role`] payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Opaque credential; never processed by the domain layer.
    pub password: String,
    pub email: String,
    /// Tri-state: unset at construction, then flipped by an admin.
    /// Only `Some(false)` blocks guarded operations.
    pub active: Option<bool>,
    pub role: Role,
}

/// Closed set of account roles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Role {
    Provider(Provider),
    Visitor(Visitor),
    Moderator,
    Admin,
}

/// Role payload of an account that publishes services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub verified: bool,
    pub vip: bool,
    pub ads: Vec<Advertisement>,
    pub billing: Option<Billing>,
    pub premium_ads: Vec<PremiumAdvertisement>,
    pub private_pics: Vec<PrivatePicture>,
}

/// Role payload of a browsing account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visitor {
    pub birthday: NaiveDate,
    pub address: String,
    pub profile_pic: Bytes,
    /// Free-form preference bucket.
    pub preferences: serde_json::Value,
    pub is_premium: bool,
    pub sms_sent: u32,
    pub comments: Vec<Comment>,
}

// Equality and hashing are identity-based: two snapshots of the same
// account compare equal regardless of payload drift.
impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl User {
    pub fn new_provider(
        id: Uuid,
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        verified: bool,
        vip: bool,
        billing: Option<Billing>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            email: email.into(),
            active: None,
            role: Role::Provider(Provider {
                verified,
                vip,
                ads: Vec::new(),
                billing,
                premium_ads: Vec::new(),
                private_pics: Vec::new(),
            }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_visitor(
        id: Uuid,
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        birthday: NaiveDate,
        address: impl Into<String>,
        profile_pic: Bytes,
        preferences: serde_json::Value,
        is_premium: bool,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            email: email.into(),
            active: None,
            role: Role::Visitor(Visitor {
                birthday,
                address: address.into(),
                profile_pic,
                preferences,
                is_premium,
                sms_sent: 0,
                comments: Vec::new(),
            }),
        }
    }

    pub fn new_moderator(
        id: Uuid,
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            email: email.into(),
            active: None,
            role: Role::Moderator,
        }
    }

    pub fn new_admin(
        id: Uuid,
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            email: email.into(),
            active: None,
            role: Role::Admin,
        }
    }

    /// Uniform active guard. Runs first in every mutating behavior.
    fn ensure_active(&self) -> Result<()> {
        if self.active == Some(false) {
            return Err(AppError::UserNotActive(self.id));
        }
        Ok(())
    }

    pub fn provider(&self) -> Result<&Provider> {
        match &self.role {
            Role::Provider(provider) => Ok(provider),
            _ => Err(AppError::Unauthorized(format!(
                "user {} is not a provider",
                self.id
            ))),
        }
    }

    pub fn provider_mut(&mut self) -> Result<&mut Provider> {
        let id = self.id;
        match &mut self.role {
            Role::Provider(provider) => Ok(provider),
            _ => Err(AppError::Unauthorized(format!(
                "user {id} is not a provider"
            ))),
        }
    }

    pub fn visitor(&self) -> Result<&Visitor> {
        match &self.role {
            Role::Visitor(visitor) => Ok(visitor),
            _ => Err(AppError::Unauthorized(format!(
                "user {} is not a visitor",
                self.id
            ))),
        }
    }

    pub fn visitor_mut(&mut self) -> Result<&mut Visitor> {
        let id = self.id;
        match &mut self.role {
            Role::Visitor(visitor) => Ok(visitor),
            _ => Err(AppError::Unauthorized(format!("user {id} is not a visitor"))),
        }
    }

    fn ensure_moderator(&self) -> Result<()> {
        match self.role {
            Role::Moderator => Ok(()),
            _ => Err(AppError::Unauthorized(format!(
                "user {} is not a moderator",
                self.id
            ))),
        }
    }

    fn ensure_admin(&self) -> Result<()> {
        match self.role {
            Role::Admin => Ok(()),
            _ => Err(AppError::Unauthorized(format!(
                "user {} is not an admin",
                self.id
            ))),
        }
    }
}

// ── Provider behaviors ──────────────────────────────────────────────────────

impl User {
    /// Publishes a new ad. Rejects a duplicate identifier, otherwise
    /// appends the ad with `published = true` and computed timestamps.
    pub fn publish_ad(
        &mut self,
        title: &str,
        description: &str,
        prices: BTreeMap<String, i64>,
        location: Option<Location>,
        services: BTreeMap<String, String>,
        ad_id: Uuid,
    ) -> Result<Advertisement> {
        self.ensure_active()?;
        let owner = self.id;
        let provider = self.provider_mut()?;
        if provider.ads.iter().any(|ad| ad.id == ad_id) {
            return Err(AppError::AdAlreadyExist(ad_id));
        }
        let now = Utc::now();
        let ad = Advertisement {
            id: ad_id,
            title: title.to_owned(),
            description: description.to_owned(),
            date_published: Some(now),
            expiry_date: Some(now + Duration::days(AD_LIFETIME_DAYS)),
            location,
            services,
            prices,
            owner,
            published: true,
        };
        provider.ads.push(ad.clone());
        Ok(ad)
    }

    /// Takes an ad off the board. Idempotent at the field level: always
    /// clears `published`, `date_published` and `expiry_date`.
    pub fn un_publish_ad(&mut self, ad_id: Uuid) -> Result<Advertisement> {
        self.ensure_active()?;
        let ad = self.owned_ad_mut(ad_id)?;
        ad.published = false;
        ad.date_published = None;
        ad.expiry_date = None;
        Ok(ad.clone())
    }

    /// VIP-only refresh: bumps the publication date to now, pushing the
    /// ad back to the top of listings.
    pub fn update_ad_published_date(&mut self, ad_id: Uuid) -> Result<Advertisement> {
        self.ensure_active()?;
        if !self.provider()?.vip {
            return Err(AppError::NotVip);
        }
        let ad = self.owned_ad_mut(ad_id)?;
        let now = Utc::now();
        ad.date_published = Some(now);
        ad.expiry_date = Some(now + Duration::days(AD_LIFETIME_DAYS));
        Ok(ad.clone())
    }

    /// VIP-only, one-time-per-ad upgrade extending visibility.
    pub fn promote_ad_to_premium(
        &mut self,
        ad_id: Uuid,
        premium_id: Uuid,
    ) -> Result<PremiumAdvertisement> {
        self.ensure_active()?;
        let owner = self.id;
        let provider = self.provider_mut()?;
        if !provider.vip {
            return Err(AppError::NotVip);
        }
        if provider.premium_ads.iter().any(|p| p.ad_id == ad_id) {
            return Err(AppError::AdvertisementAlreadyPromoted(ad_id));
        }
        let ad = provider
            .ads
            .iter()
            .find(|ad| ad.id == ad_id)
            .ok_or(AppError::NotFound("advertisement".into(), ad_id))?;
        let premium = PremiumAdvertisement {
            id: premium_id,
            provider_id: owner,
            ad_id: ad.id,
            date_published: Utc::now(),
            expiry_date: ad.expiry_date,
        };
        provider.premium_ads.push(premium.clone());
        Ok(premium)
    }

    pub fn delete_ad(&mut self, ad_id: Uuid) -> Result<()> {
        self.ensure_active()?;
        let provider = self.provider_mut()?;
        let position = provider
            .ads
            .iter()
            .position(|ad| ad.id == ad_id)
            .ok_or(AppError::NotFound("advertisement".into(), ad_id))?;
        provider.ads.remove(position);
        Ok(())
    }

    /// Optional lookup; an unknown id is not a failure here.
    pub fn get_ad(&self, ad_id: Uuid) -> Result<Option<&Advertisement>> {
        Ok(self.provider()?.ads.iter().find(|ad| ad.id == ad_id))
    }

    pub fn get_billing(&self) -> Result<Option<&Billing>> {
        Ok(self.provider()?.billing.as_ref())
    }

    /// Replaces the billing record wholesale.
    pub fn update_billing(
        &mut self,
        card_number: &str,
        expiry_date: NaiveDate,
        secret_code: &str,
        fullname: &str,
    ) -> Result<Billing> {
        self.ensure_active()?;
        let provider = self.provider_mut()?;
        let billing = Billing {
            card_number: card_number.to_owned(),
            expiry_date,
            secret_code: secret_code.to_owned(),
            fullname: fullname.to_owned(),
        };
        provider.billing = Some(billing.clone());
        Ok(billing)
    }

    /// Replaces the ad's location wholesale.
    pub fn update_ad_location(&mut self, ad_id: Uuid, location: Location) -> Result<Advertisement> {
        self.ensure_active()?;
        let ad = self.owned_ad_mut(ad_id)?;
        ad.location = Some(location);
        Ok(ad.clone())
    }

    /// Replaces the ad's offered services wholesale.
    pub fn update_ad_services(
        &mut self,
        ad_id: Uuid,
        services: BTreeMap<String, String>,
    ) -> Result<Advertisement> {
        self.ensure_active()?;
        let ad = self.owned_ad_mut(ad_id)?;
        ad.services = services;
        Ok(ad.clone())
    }

    /// Replaces the ad's price list wholesale.
    pub fn update_ad_prices(
        &mut self,
        ad_id: Uuid,
        prices: BTreeMap<String, i64>,
    ) -> Result<Advertisement> {
        self.ensure_active()?;
        let ad = self.owned_ad_mut(ad_id)?;
        ad.prices = prices;
        Ok(ad.clone())
    }

    /// Replaces the private picture list wholesale.
    pub fn set_private_pics(&mut self, pictures: Vec<PrivatePicture>) -> Result<()> {
        self.ensure_active()?;
        self.provider_mut()?.private_pics = pictures;
        Ok(())
    }

    fn owned_ad_mut(&mut self, ad_id: Uuid) -> Result<&mut Advertisement> {
        self.provider_mut()?
            .ads
            .iter_mut()
            .find(|ad| ad.id == ad_id)
            .ok_or(AppError::NotFound("advertisement".into(), ad_id))
    }
}

// ── Visitor behaviors ───────────────────────────────────────────────────────

impl User {
    /// Creates a comment on some target and keeps a copy in the
    /// visitor's own collection.
    pub fn add_comment(
        &mut self,
        target_id: Uuid,
        content: &str,
        comment_id: Uuid,
    ) -> Result<Comment> {
        self.ensure_active()?;
        let owner = self.id;
        let visitor = self.visitor_mut()?;
        let comment = Comment::new(comment_id, target_id, owner, content);
        visitor.comments.push(comment.clone());
        Ok(comment)
    }

    /// Rewrites one of the visitor's own comments, stamping the
    /// modification time.
    pub fn modify_comment(&mut self, comment_id: Uuid, content: &str) -> Result<Comment> {
        self.ensure_active()?;
        let visitor = self.visitor_mut()?;
        let comment = visitor
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or(AppError::CommentNotFound(comment_id))?;
        comment.content = content.to_owned();
        comment.modified_at = Some(Utc::now());
        Ok(comment.clone())
    }

    pub fn delete_comment(&mut self, comment_id: Uuid) -> Result<()> {
        self.ensure_active()?;
        let visitor = self.visitor_mut()?;
        let position = visitor
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(AppError::CommentNotFound(comment_id))?;
        visitor.comments.remove(position);
        Ok(())
    }

    /// Bumps the SMS counter. The 51st send in the entity's lifetime
    /// fails; the counter never resets.
    pub fn send_sms(&mut self) -> Result<()> {
        self.ensure_active()?;
        let visitor = self.visitor_mut()?;
        if visitor.sms_sent >= SMS_LIMIT {
            return Err(AppError::SmsLimitWasReached);
        }
        visitor.sms_sent += 1;
        Ok(())
    }
}

// ── Reporting (any role) ────────────────────────────────────────────────────

impl User {
    /// Files a report against a profile, an ad, a provider, etc.
    pub fn report(&self, target_id: Uuid, content: &str, report_id: Uuid) -> Result<Report> {
        self.ensure_active()?;
        Ok(Report {
            id: report_id,
            target_id,
            owner_id: self.id,
            created_at: Utc::now(),
            content: content.to_owned(),
            status: ReportStatus::New,
            comments: Vec::new(),
        })
    }

    /// Appends a comment to an opened report's trail. A report still in
    /// `New` has no trail to talk on.
    pub fn comment_report(
        &self,
        report: &mut Report,
        content: &str,
        comment_id: Uuid,
    ) -> Result<Comment> {
        self.ensure_active()?;
        if report.status == ReportStatus::New {
            return Err(AppError::ReportNotOpened(report.id));
        }
        let comment = Comment::new(comment_id, report.id, self.id, content);
        report.comments.push(comment.clone());
        Ok(comment)
    }
}

// ── Moderator behaviors ─────────────────────────────────────────────────────

impl User {
    /// Takes a report into moderation; the transition is announced on the
    /// trail.
    pub fn open_report(&self, report: &mut Report, comment_id: Uuid) -> Result<()> {
        self.ensure_active()?;
        self.ensure_moderator()?;
        report.status = ReportStatus::Pending;
        let notice = format!("Moderator {} has opened your ticket !", self.username);
        report
            .comments
            .push(Comment::new(comment_id, report.id, self.id, notice));
        Ok(())
    }

    /// Closes a report that is under moderation. Closing something that
    /// was never opened is a precondition violation.
    pub fn close_report(&self, report: &mut Report, comment_id: Uuid) -> Result<()> {
        self.ensure_active()?;
        self.ensure_moderator()?;
        if report.status != ReportStatus::Pending {
            return Err(AppError::ReportNotOpened(report.id));
        }
        report.status = ReportStatus::Closed;
        let notice = format!("Moderator {} has closed your ticket !", self.username);
        report
            .comments
            .push(Comment::new(comment_id, report.id, self.id, notice));
        Ok(())
    }
}

// ── Admin behaviors ─────────────────────────────────────────────────────────

impl User {
    /// Flips the target's active flag on. Pure flag flip, no side effects
    /// on the target's owned data.
    pub fn activate_user(&self, target: &mut User) -> Result<()> {
        self.ensure_active()?;
        self.ensure_admin()?;
        target.active = Some(true);
        Ok(())
    }

    /// Flips the target's active flag off, blocking every guarded
    /// operation from then on.
    pub fn disable_user(&self, target: &mut User) -> Result<()> {
        self.ensure_active()?;
        self.ensure_admin()?;
        target.active = Some(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration as StdDuration;

    fn provider(vip: bool) -> User {
        User::new_provider(
            Uuid::new_v4(),
            "testdude",
            "abcd1234",
            "test@test.com",
            false,
            vip,
            None,
        )
    }

    fn visitor() -> User {
        User::new_visitor(
            Uuid::new_v4(),
            "testdude",
            "abcd1234",
            "test@test.com",
            NaiveDate::from_ymd_opt(1998, 3, 29).unwrap(),
            "Rue des fleurs 27",
            Bytes::new(),
            serde_json::json!({}),
            false,
        )
    }

    fn moderator() -> User {
        User::new_moderator(Uuid::new_v4(), "testdudemodo", "abcd1234", "test@test.com")
    }

    fn admin() -> User {
        User::new_admin(Uuid::new_v4(), "testdudeadmin", "abcd1234", "test@test.com")
    }

    fn simple_ad(user: &mut User, ad_id: Uuid) -> Advertisement {
        user.publish_ad(
            "TestAd",
            "This is a test Ad",
            BTreeMap::from([("service1".to_owned(), 123)]),
            None,
            BTreeMap::new(),
            ad_id,
        )
        .unwrap()
    }

    #[test]
    fn publish_ad_sets_timestamps_and_rejects_duplicates() {
        let mut user = provider(false);
        let ad_id = Uuid::new_v4();
        let ad = simple_ad(&mut user, ad_id);

        assert!(ad.published);
        let published = ad.date_published.unwrap();
        assert_eq!(ad.expiry_date.unwrap(), published + Duration::days(7));

        let second = user.publish_ad(
            "TestAd",
            "This is a test Ad",
            BTreeMap::new(),
            None,
            BTreeMap::new(),
            ad_id,
        );
        assert!(matches!(second, Err(AppError::AdAlreadyExist(id)) if id == ad_id));
        assert_eq!(user.provider().unwrap().ads.len(), 1);
    }

    #[test]
    fn un_publish_ad_clears_all_three_fields() {
        let mut user = provider(false);
        let ad_id = Uuid::new_v4();
        simple_ad(&mut user, ad_id);

        let ad = user.un_publish_ad(ad_id).unwrap();
        assert!(!ad.published);
        assert!(ad.date_published.is_none());
        assert!(ad.expiry_date.is_none());

        // Field-level idempotent: a second call is not an error.
        let ad = user.un_publish_ad(ad_id).unwrap();
        assert!(!ad.published);
    }

    #[test]
    fn published_date_refresh_is_vip_gated() {
        let mut user = provider(false);
        let ad_id = Uuid::new_v4();
        simple_ad(&mut user, ad_id);
        assert!(matches!(
            user.update_ad_published_date(ad_id),
            Err(AppError::NotVip)
        ));

        let mut user = provider(true);
        let ad_id = Uuid::new_v4();
        let ad = simple_ad(&mut user, ad_id);
        let first = ad.date_published.unwrap();

        thread::sleep(StdDuration::from_millis(2));
        let refreshed = user.update_ad_published_date(ad_id).unwrap();
        let second = refreshed.date_published.unwrap();

        // Strict ordering, not inequality: clock resolution may coincide.
        assert!(first < second);
        assert_eq!(refreshed.expiry_date.unwrap(), second + Duration::days(7));
    }

    #[test]
    fn promote_ad_once_per_ad_and_only_for_vip() {
        let mut user = provider(true);
        let ad_id = Uuid::new_v4();
        simple_ad(&mut user, ad_id);

        let premium = user.promote_ad_to_premium(ad_id, Uuid::new_v4()).unwrap();
        assert_eq!(premium.ad_id, ad_id);
        assert_eq!(premium.provider_id, user.id);

        let again = user.promote_ad_to_premium(ad_id, Uuid::new_v4());
        assert!(matches!(
            again,
            Err(AppError::AdvertisementAlreadyPromoted(id)) if id == ad_id
        ));

        user.provider_mut().unwrap().vip = false;
        let other_ad = Uuid::new_v4();
        simple_ad(&mut user, other_ad);
        assert!(matches!(
            user.promote_ad_to_premium(other_ad, Uuid::new_v4()),
            Err(AppError::NotVip)
        ));
    }

    #[test]
    fn update_billing_replaces_wholesale() {
        let billing = Billing {
            card_number: "7987846548498".into(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 4, 29).unwrap(),
            secret_code: "999".into(),
            fullname: "VC AC".into(),
        };
        let mut user = User::new_provider(
            Uuid::new_v4(),
            "testdude",
            "abcd1234",
            "test@test.com",
            false,
            false,
            Some(billing),
        );
        assert_eq!(user.get_billing().unwrap().unwrap().secret_code, "999");

        let updated = user
            .update_billing(
                "789548112558",
                NaiveDate::from_ymd_opt(2030, 1, 30).unwrap(),
                "000",
                "EQ EB",
            )
            .unwrap();
        assert_eq!(updated.card_number, "789548112558");
        assert_eq!(user.get_billing().unwrap().unwrap().fullname, "EQ EB");
    }

    #[test]
    fn update_ad_location_services_and_prices() {
        let mut user = provider(true);
        let ad_id = Uuid::new_v4();
        simple_ad(&mut user, ad_id);

        let location = Location {
            street: "Avenue Paul Des Fleurs".into(),
            number: 42,
            city: "Mont-Marchienne".into(),
            zip_code: "6000".into(),
            state: "Brabant".into(),
            country: "Belgium".into(),
        };
        let ad = user.update_ad_location(ad_id, location.clone()).unwrap();
        assert_eq!(ad.location.unwrap(), location);

        let ad = user
            .update_ad_services(
                ad_id,
                BTreeMap::from([("service2".to_owned(), "Je prends".to_owned())]),
            )
            .unwrap();
        assert_eq!(ad.services["service2"], "Je prends");

        let ad = user
            .update_ad_prices(ad_id, BTreeMap::from([("service1".to_owned(), 220)]))
            .unwrap();
        assert_eq!(ad.prices["service1"], 220);

        let missing = user.update_ad_prices(Uuid::new_v4(), BTreeMap::new());
        assert!(matches!(missing, Err(AppError::NotFound(_, _))));
    }

    #[test]
    fn delete_ad_removes_from_owned_collection() {
        let mut user = provider(false);
        let ad_id = Uuid::new_v4();
        simple_ad(&mut user, ad_id);

        user.delete_ad(ad_id).unwrap();
        assert!(user.get_ad(ad_id).unwrap().is_none());
        assert!(matches!(
            user.delete_ad(ad_id),
            Err(AppError::NotFound(_, _))
        ));
    }

    #[test]
    fn private_pics_are_replaced_wholesale() {
        let mut user = provider(true);
        let stamp = Utc::now();
        let pics = vec![
            PrivatePicture { picture: Bytes::new(), date_published: stamp },
            PrivatePicture { picture: Bytes::new(), date_published: stamp },
            PrivatePicture { picture: Bytes::new(), date_published: stamp },
        ];
        user.set_private_pics(pics).unwrap();
        assert_eq!(user.provider().unwrap().private_pics.len(), 3);
        assert_eq!(
            user.provider().unwrap().private_pics[0].date_published,
            stamp
        );
    }

    #[test]
    fn sms_cap_is_fifty_for_the_entity_lifetime() {
        let mut user = visitor();
        for _ in 0..50 {
            user.send_sms().unwrap();
        }
        assert_eq!(user.visitor().unwrap().sms_sent, 50);
        assert!(matches!(user.send_sms(), Err(AppError::SmsLimitWasReached)));
        assert_eq!(user.visitor().unwrap().sms_sent, 50);
    }

    #[test]
    fn comment_own_collection_rules() {
        let mut user = visitor();
        let target = Uuid::new_v4();
        let comment = user.add_comment(target, "test", Uuid::new_v4()).unwrap();
        assert_eq!(comment.target_id, target);
        assert_eq!(comment.owner_id, user.id);
        assert!(comment.modified_at.is_none());

        let modified = user.modify_comment(comment.id, "better").unwrap();
        assert_eq!(modified.content, "better");
        assert!(modified.modified_at.is_some());

        user.delete_comment(comment.id).unwrap();
        assert!(matches!(
            user.modify_comment(comment.id, "gone"),
            Err(AppError::CommentNotFound(_))
        ));
    }

    #[test]
    fn report_workflow_new_pending_closed() {
        let reported = provider(false);
        let reporter = visitor();
        let report_id = Uuid::new_v4();
        let mut report = reporter
            .report(reported.id, "This is fake", report_id)
            .unwrap();
        assert_eq!(report.status, ReportStatus::New);

        let modo = moderator();

        // No talking on, or closing of, an unopened report.
        assert!(matches!(
            modo.comment_report(&mut report, "This should fail", Uuid::new_v4()),
            Err(AppError::ReportNotOpened(id)) if id == report_id
        ));
        assert!(matches!(
            modo.close_report(&mut report, Uuid::new_v4()),
            Err(AppError::ReportNotOpened(_))
        ));
        assert!(report.comments.is_empty());

        modo.open_report(&mut report, Uuid::new_v4()).unwrap();
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.comments.len(), 1);
        assert_eq!(report.comments[0].target_id, report.id);
        assert_eq!(report.comments[0].owner_id, modo.id);
        assert_eq!(
            report.comments[0].content,
            "Moderator testdudemodo has opened your ticket !"
        );

        modo.comment_report(&mut report, "This should work", Uuid::new_v4())
            .unwrap();
        assert_eq!(report.comments[1].content, "This should work");

        modo.close_report(&mut report, Uuid::new_v4()).unwrap();
        assert_eq!(report.status, ReportStatus::Closed);
        assert_eq!(
            report.comments[2].content,
            "Moderator testdudemodo has closed your ticket !"
        );
    }

    #[test]
    fn only_moderators_drive_reports() {
        let reporter = visitor();
        let mut report = reporter
            .report(Uuid::new_v4(), "spam", Uuid::new_v4())
            .unwrap();
        let not_a_moderator = provider(false);
        assert!(matches!(
            not_a_moderator.open_report(&mut report, Uuid::new_v4()),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn admin_flips_flags_and_guards_kick_in() {
        let boss = admin();
        let mut p = provider(false);
        let mut v = visitor();
        let mut m = moderator();

        boss.disable_user(&mut p).unwrap();
        boss.disable_user(&mut v).unwrap();
        boss.disable_user(&mut m).unwrap();
        assert_eq!(p.active, Some(false));
        assert_eq!(v.active, Some(false));
        assert_eq!(m.active, Some(false));

        assert!(matches!(
            p.publish_ad(
                "TestAd",
                "This is a test Ad",
                BTreeMap::new(),
                None,
                BTreeMap::new(),
                Uuid::new_v4()
            ),
            Err(AppError::UserNotActive(_))
        ));
        assert!(matches!(
            v.add_comment(Uuid::new_v4(), "test", Uuid::new_v4()),
            Err(AppError::UserNotActive(_))
        ));
        let mut report = Report {
            id: Uuid::new_v4(),
            target_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            content: "spam".into(),
            status: ReportStatus::New,
            comments: Vec::new(),
        };
        assert!(matches!(
            m.open_report(&mut report, Uuid::new_v4()),
            Err(AppError::UserNotActive(_))
        ));

        boss.activate_user(&mut p).unwrap();
        assert_eq!(p.active, Some(true));

        // Non-admins cannot flip flags at all.
        let mut other = visitor();
        assert!(matches!(
            p.activate_user(&mut other),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn user_equality_is_identity_based() {
        let a = provider(false);
        let mut b = a.clone();
        b.username = "renamed".into();
        assert_eq!(a, b);
        assert_ne!(a, provider(false));
    }
}
