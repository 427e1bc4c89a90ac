//! # adhub demo binary
//!
//! Assembles the in-memory adapters, seeds one account of each role and
//! walks them through the command set. There is no transport layer here;
//! a real deployment puts its own front end on top of `adhub-service`.

use std::collections::BTreeMap;

use adhub_core::commands::{self, Command};
use adhub_core::{Entity, User};
use adhub_service::handlers;
use anyhow::Context;
use bytes::Bytes;
use chrono::NaiveDate;
use uuid::Uuid;

use adhub_notify_log::LogNotifier;
use adhub_store_memory::{MemoryStore, MemoryUnitOfWork};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let store = MemoryStore::new();
    let notifier = LogNotifier::new();

    // Seed one account per role.
    let provider = User::new_provider(
        Uuid::new_v4(),
        "alice",
        "s3cret",
        "alice@example.com",
        true,
        true,
        None,
    );
    let visitor = User::new_visitor(
        Uuid::new_v4(),
        "bob",
        "s3cret",
        "bob@example.com",
        NaiveDate::from_ymd_opt(1998, 3, 29).context("bad seed date")?,
        "Rue des fleurs 27",
        Bytes::new(),
        serde_json::json!({ "language": "fr" }),
        false,
    );
    let moderator = User::new_moderator(Uuid::new_v4(), "carol", "s3cret", "carol@example.com");
    let admin = User::new_admin(Uuid::new_v4(), "dave", "s3cret", "dave@example.com");
    for user in [&provider, &visitor, &moderator, &admin] {
        store.seed(Entity::User(user.clone()))?;
    }
    tracing::info!(users = store.len(), "seeded accounts");

    let mut uow = MemoryUnitOfWork::new(store.clone());

    let ad = handlers::publish_advertisement(
        commands::PublishAdvertisement {
            title: "Garden maintenance".into(),
            description: "Weekly lawn and hedge care".into(),
            location: None,
            services: BTreeMap::from([(
                "mowing".to_owned(),
                "Lawn mowing, clippings removed".to_owned(),
            )]),
            prices: BTreeMap::from([("mowing".to_owned(), 45)]),
            owner: provider.id,
        },
        &mut uow,
    )
    .await?;
    tracing::info!(ad_id = %ad.id, expires = ?ad.expiry_date, "published advertisement");

    let premium = handlers::promote_ad_to_premium(
        commands::PromoteAdvertisementToPremium {
            owner: provider.id,
            ad_id: ad.id,
        },
        &mut uow,
    )
    .await?;
    tracing::info!(premium_id = %premium.id, "promoted to premium");

    let comment = handlers::add_comment(
        commands::AddComment {
            target_id: ad.id,
            owner: visitor.id,
            content: "Does this include winter service?".into(),
        },
        &mut uow,
    )
    .await?;
    tracing::info!(comment_id = %comment.id, "visitor commented");

    handlers::send_sms(
        commands::SendSms {
            user_id: visitor.id,
            to: "+320000000".into(),
            message: "Your appointment is confirmed".into(),
        },
        &mut uow,
        &notifier,
    )
    .await?;

    // Abuse workflow, driven through the dispatcher.
    let filed = handlers::report(
        commands::Report {
            target_id: ad.id,
            owner: visitor.id,
            content: "Prices do not match the listing".into(),
        },
        &mut uow,
    )
    .await?;
    tracing::info!(report_id = %filed.id, status = ?filed.status, "report filed");

    for command in [
        Command::OpenReport(commands::OpenReport {
            moderator_id: moderator.id,
            report_id: filed.id,
        }),
        Command::CommentReport(commands::CommentReport {
            owner: visitor.id,
            target_id: filed.id,
            content: "Screenshots attached".into(),
        }),
        Command::CloseReport(commands::CloseReport {
            moderator_id: moderator.id,
            report_id: filed.id,
        }),
    ] {
        handlers::dispatch(command, &mut uow, &notifier).await?;
    }
    if let Some(Entity::Report(report)) = store.get(filed.id)? {
        tracing::info!(status = ?report.status, trail = report.comments.len(), "report worked");
    }

    handlers::disable_user(
        commands::DisableUser {
            admin_id: admin.id,
            user_id: provider.id,
        },
        &mut uow,
    )
    .await?;
    let denied = handlers::publish_advertisement(
        commands::PublishAdvertisement {
            title: "Second ad".into(),
            description: "Should bounce".into(),
            location: None,
            services: BTreeMap::new(),
            prices: BTreeMap::new(),
            owner: provider.id,
        },
        &mut uow,
    )
    .await;
    tracing::info!(outcome = %denied.unwrap_err(), "disabled provider was rejected");

    tracing::info!(entities = store.len(), "demo finished");
    Ok(())
}
