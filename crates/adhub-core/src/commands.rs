//! # Commands
//!
//! Plain data carriers describing an intended state change, one per use
//! case. Callers build one of these and hand it to the matching handler in
//! `adhub-service` (or to `dispatch` via the [`Command`] enum).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Location, PrivatePicture};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishAdvertisement {
    pub title: String,
    pub description: String,
    pub location: Option<Location>,
    /// Offered services, name -> description.
    pub services: BTreeMap<String, String>,
    /// Price list, name -> amount.
    pub prices: BTreeMap<String, i64>,
    /// Provider uuid.
    pub owner: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnPublishAdvertisement {
    pub owner: Uuid,
    pub ad_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAdvertisementPublishedDate {
    pub owner: Uuid,
    pub ad_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoteAdvertisementToPremium {
    pub owner: Uuid,
    pub ad_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAdvertisement {
    pub owner: Uuid,
    pub ad_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddComment {
    pub target_id: Uuid,
    /// Visitor uuid.
    pub owner: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifyComment {
    pub owner: Uuid,
    pub comment_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteComment {
    pub owner: Uuid,
    pub comment_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendSms {
    pub user_id: Uuid,
    pub to: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub target_id: Uuid,
    /// Reporting user uuid, any role.
    pub owner: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentReport {
    pub owner: Uuid,
    /// Report uuid.
    pub target_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenReport {
    pub moderator_id: Uuid,
    pub report_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseReport {
    pub moderator_id: Uuid,
    pub report_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateUser {
    pub admin_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisableUser {
    pub admin_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPrivatePics {
    pub user_id: Uuid,
    pub pictures: Vec<PrivatePicture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBilling {
    pub user_id: Uuid,
    pub card_number: String,
    pub expiry_date: NaiveDate,
    pub secret_code: String,
    pub fullname: String,
}

/// Tagged union over every command, for callers that route dynamically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    PublishAdvertisement(PublishAdvertisement),
    UnPublishAdvertisement(UnPublishAdvertisement),
    UpdateAdvertisementPublishedDate(UpdateAdvertisementPublishedDate),
    PromoteAdvertisementToPremium(PromoteAdvertisementToPremium),
    DeleteAdvertisement(DeleteAdvertisement),
    AddComment(AddComment),
    ModifyComment(ModifyComment),
    DeleteComment(DeleteComment),
    SendSms(SendSms),
    Report(Report),
    CommentReport(CommentReport),
    OpenReport(OpenReport),
    CloseReport(CloseReport),
    ActivateUser(ActivateUser),
    DisableUser(DisableUser),
    SetPrivatePics(SetPrivatePics),
    UpdateBilling(UpdateBilling),
}
