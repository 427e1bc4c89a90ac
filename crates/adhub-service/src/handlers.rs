//! # Command Handlers
//!
//! Each handler is a pure orchestration recipe: load the actor(s) by id,
//! call one entity behavior, persist, commit. Because entities are owned
//! values here, a behavior that mutates the actor's collections is always
//! followed by an `update` of the actor — the repository is the only
//! mutation-visibility path.

use adhub_core::commands::{self, Command};
use adhub_core::{
    Advertisement, AppError, Comment, Entity, Notifier, PremiumAdvertisement, Report, Repository,
    Result, UnitOfWork, User,
};
use uuid::Uuid;

/// Tail of every unit-of-work scope. A body that failed never reached
/// `commit`, so the scope exits through `rollback`; the original error is
/// what the caller sees.
async fn finish<T>(uow: &mut dyn UnitOfWork, outcome: Result<T>) -> Result<T> {
    if outcome.is_err() {
        if let Err(rollback_err) = uow.rollback().await {
            tracing::error!(error = %rollback_err, "rollback failed on aborted command");
        }
    }
    outcome
}

async fn fetch_user(repo: &dyn Repository, id: Uuid) -> Result<User> {
    match repo.read(id).await? {
        Some(Entity::User(user)) => Ok(user),
        Some(other) => Err(AppError::Internal(format!(
            "expected a user under {id}, found a {}",
            other.kind()
        ))),
        None => Err(AppError::NotFound("user".into(), id)),
    }
}

async fn fetch_report(repo: &dyn Repository, id: Uuid) -> Result<Report> {
    match repo.read(id).await? {
        Some(Entity::Report(report)) => Ok(report),
        Some(other) => Err(AppError::Internal(format!(
            "expected a report under {id}, found a {}",
            other.kind()
        ))),
        None => Err(AppError::NotFound("report".into(), id)),
    }
}

// ── Advertisement commands ──────────────────────────────────────────────────

/// Publishes a new advertisement on behalf of its provider and returns it.
pub async fn publish_advertisement(
    command: commands::PublishAdvertisement,
    uow: &mut dyn UnitOfWork,
) -> Result<Advertisement> {
    let commands::PublishAdvertisement {
        title,
        description,
        location,
        services,
        prices,
        owner,
    } = command;
    let outcome = async {
        let mut publisher = fetch_user(uow.repo(), owner).await?;
        let ad = publisher.publish_ad(
            &title,
            &description,
            prices,
            location,
            services,
            Uuid::new_v4(),
        )?;
        uow.repo().update(Entity::User(publisher)).await?;
        uow.repo().create(Entity::Advertisement(ad.clone())).await?;
        uow.commit().await?;
        Ok(ad)
    }
    .await;
    finish(uow, outcome).await
}

pub async fn un_publish_advertisement(
    command: commands::UnPublishAdvertisement,
    uow: &mut dyn UnitOfWork,
) -> Result<Advertisement> {
    let outcome = async {
        let mut publisher = fetch_user(uow.repo(), command.owner).await?;
        let ad = publisher.un_publish_ad(command.ad_id)?;
        uow.repo().update(Entity::User(publisher)).await?;
        uow.repo().update(Entity::Advertisement(ad.clone())).await?;
        uow.commit().await?;
        Ok(ad)
    }
    .await;
    finish(uow, outcome).await
}

/// VIP refresh of the publication date.
pub async fn update_ad_published_date(
    command: commands::UpdateAdvertisementPublishedDate,
    uow: &mut dyn UnitOfWork,
) -> Result<Advertisement> {
    let outcome = async {
        let mut publisher = fetch_user(uow.repo(), command.owner).await?;
        let ad = publisher.update_ad_published_date(command.ad_id)?;
        uow.repo().update(Entity::User(publisher)).await?;
        uow.repo().update(Entity::Advertisement(ad.clone())).await?;
        uow.commit().await?;
        Ok(ad)
    }
    .await;
    finish(uow, outcome).await
}

pub async fn promote_ad_to_premium(
    command: commands::PromoteAdvertisementToPremium,
    uow: &mut dyn UnitOfWork,
) -> Result<PremiumAdvertisement> {
    let outcome = async {
        let mut publisher = fetch_user(uow.repo(), command.owner).await?;
        let premium = publisher.promote_ad_to_premium(command.ad_id, Uuid::new_v4())?;
        uow.repo().update(Entity::User(publisher)).await?;
        uow.repo()
            .update(Entity::PremiumAdvertisement(premium.clone()))
            .await?;
        uow.commit().await?;
        Ok(premium)
    }
    .await;
    finish(uow, outcome).await
}

/// Removes the ad from the provider's collection and from the store.
pub async fn delete_ad(command: commands::DeleteAdvertisement, uow: &mut dyn UnitOfWork) -> Result<()> {
    let outcome = async {
        let mut publisher = fetch_user(uow.repo(), command.owner).await?;
        publisher.delete_ad(command.ad_id)?;
        uow.repo().update(Entity::User(publisher)).await?;
        uow.repo().delete(command.ad_id).await?;
        uow.commit().await?;
        Ok(())
    }
    .await;
    finish(uow, outcome).await
}

// ── Comment commands ────────────────────────────────────────────────────────

pub async fn add_comment(command: commands::AddComment, uow: &mut dyn UnitOfWork) -> Result<Comment> {
    let outcome = async {
        let mut visitor = fetch_user(uow.repo(), command.owner).await?;
        let comment = visitor.add_comment(command.target_id, &command.content, Uuid::new_v4())?;
        uow.repo().update(Entity::User(visitor)).await?;
        uow.repo().create(Entity::Comment(comment.clone())).await?;
        uow.commit().await?;
        Ok(comment)
    }
    .await;
    finish(uow, outcome).await
}

pub async fn modify_comment(
    command: commands::ModifyComment,
    uow: &mut dyn UnitOfWork,
) -> Result<Comment> {
    let outcome = async {
        let mut visitor = fetch_user(uow.repo(), command.owner).await?;
        let comment = visitor.modify_comment(command.comment_id, &command.content)?;
        uow.repo().update(Entity::User(visitor)).await?;
        uow.repo().update(Entity::Comment(comment.clone())).await?;
        uow.commit().await?;
        Ok(comment)
    }
    .await;
    finish(uow, outcome).await
}

pub async fn delete_comment(command: commands::DeleteComment, uow: &mut dyn UnitOfWork) -> Result<()> {
    let outcome = async {
        let mut visitor = fetch_user(uow.repo(), command.owner).await?;
        visitor.delete_comment(command.comment_id)?;
        uow.repo().update(Entity::User(visitor)).await?;
        uow.repo().delete(command.comment_id).await?;
        uow.commit().await?;
        Ok(())
    }
    .await;
    finish(uow, outcome).await
}

// ── SMS ─────────────────────────────────────────────────────────────────────

/// Sends an SMS through the notifier port, then bumps the visitor's
/// counter. The port is invoked before the cap check, so the over-limit
/// attempt does reach the gateway and only then fails.
pub async fn send_sms(
    command: commands::SendSms,
    uow: &mut dyn UnitOfWork,
    notifier: &dyn Notifier,
) -> Result<()> {
    let outcome = async {
        let mut visitor = fetch_user(uow.repo(), command.user_id).await?;
        notifier.send(&command.to, &command.message).await?;
        visitor.send_sms()?;
        uow.repo().update(Entity::User(visitor)).await?;
        uow.commit().await?;
        Ok(())
    }
    .await;
    finish(uow, outcome).await
}

// ── Reports ─────────────────────────────────────────────────────────────────

/// Files a new report; any active user may do this.
pub async fn report(command: commands::Report, uow: &mut dyn UnitOfWork) -> Result<Report> {
    let outcome = async {
        let reporter = fetch_user(uow.repo(), command.owner).await?;
        let report = reporter.report(command.target_id, &command.content, Uuid::new_v4())?;
        uow.repo().create(Entity::Report(report.clone())).await?;
        uow.commit().await?;
        Ok(report)
    }
    .await;
    finish(uow, outcome).await
}

pub async fn comment_report(
    command: commands::CommentReport,
    uow: &mut dyn UnitOfWork,
) -> Result<Report> {
    let outcome = async {
        let commenter = fetch_user(uow.repo(), command.owner).await?;
        let mut target = fetch_report(uow.repo(), command.target_id).await?;
        commenter.comment_report(&mut target, &command.content, Uuid::new_v4())?;
        uow.repo().update(Entity::Report(target.clone())).await?;
        uow.commit().await?;
        Ok(target)
    }
    .await;
    finish(uow, outcome).await
}

pub async fn open_report(command: commands::OpenReport, uow: &mut dyn UnitOfWork) -> Result<()> {
    let outcome = async {
        let moderator = fetch_user(uow.repo(), command.moderator_id).await?;
        let mut target = fetch_report(uow.repo(), command.report_id).await?;
        moderator.open_report(&mut target, Uuid::new_v4())?;
        uow.repo().update(Entity::Report(target)).await?;
        uow.commit().await?;
        Ok(())
    }
    .await;
    finish(uow, outcome).await
}

pub async fn close_report(command: commands::CloseReport, uow: &mut dyn UnitOfWork) -> Result<()> {
    let outcome = async {
        let moderator = fetch_user(uow.repo(), command.moderator_id).await?;
        let mut target = fetch_report(uow.repo(), command.report_id).await?;
        moderator.close_report(&mut target, Uuid::new_v4())?;
        uow.repo().update(Entity::Report(target)).await?;
        uow.commit().await?;
        Ok(())
    }
    .await;
    finish(uow, outcome).await
}

// ── Account administration ──────────────────────────────────────────────────

pub async fn activate_user(command: commands::ActivateUser, uow: &mut dyn UnitOfWork) -> Result<()> {
    let outcome = async {
        let admin = fetch_user(uow.repo(), command.admin_id).await?;
        let mut target = fetch_user(uow.repo(), command.user_id).await?;
        admin.activate_user(&mut target)?;
        uow.repo().update(Entity::User(target)).await?;
        uow.commit().await?;
        Ok(())
    }
    .await;
    finish(uow, outcome).await
}

pub async fn disable_user(command: commands::DisableUser, uow: &mut dyn UnitOfWork) -> Result<()> {
    let outcome = async {
        let admin = fetch_user(uow.repo(), command.admin_id).await?;
        let mut target = fetch_user(uow.repo(), command.user_id).await?;
        admin.disable_user(&mut target)?;
        uow.repo().update(Entity::User(target)).await?;
        uow.commit().await?;
        Ok(())
    }
    .await;
    finish(uow, outcome).await
}

// ── Provider profile commands ───────────────────────────────────────────────

pub async fn set_private_pics(
    command: commands::SetPrivatePics,
    uow: &mut dyn UnitOfWork,
) -> Result<()> {
    let outcome = async {
        let mut provider = fetch_user(uow.repo(), command.user_id).await?;
        provider.set_private_pics(command.pictures)?;
        uow.repo().update(Entity::User(provider)).await?;
        uow.commit().await?;
        Ok(())
    }
    .await;
    finish(uow, outcome).await
}

pub async fn update_billing(command: commands::UpdateBilling, uow: &mut dyn UnitOfWork) -> Result<()> {
    let outcome = async {
        let mut provider = fetch_user(uow.repo(), command.user_id).await?;
        provider.update_billing(
            &command.card_number,
            command.expiry_date,
            &command.secret_code,
            &command.fullname,
        )?;
        uow.repo().update(Entity::User(provider)).await?;
        uow.commit().await?;
        Ok(())
    }
    .await;
    finish(uow, outcome).await
}

// ── Dispatcher ──────────────────────────────────────────────────────────────

/// Routes a [`Command`] to its handler.
///
/// Returns the primary affected entity where one exists; deletions and
/// pure flag flips yield `None`.
pub async fn dispatch(
    command: Command,
    uow: &mut dyn UnitOfWork,
    notifier: &dyn Notifier,
) -> Result<Option<Entity>> {
    tracing::debug!(?command, "dispatching command");
    match command {
        Command::PublishAdvertisement(cmd) => {
            Ok(Some(publish_advertisement(cmd, uow).await?.into()))
        }
        Command::UnPublishAdvertisement(cmd) => {
            Ok(Some(un_publish_advertisement(cmd, uow).await?.into()))
        }
        Command::UpdateAdvertisementPublishedDate(cmd) => {
            Ok(Some(update_ad_published_date(cmd, uow).await?.into()))
        }
        Command::PromoteAdvertisementToPremium(cmd) => {
            Ok(Some(promote_ad_to_premium(cmd, uow).await?.into()))
        }
        Command::DeleteAdvertisement(cmd) => {
            delete_ad(cmd, uow).await?;
            Ok(None)
        }
        Command::AddComment(cmd) => Ok(Some(add_comment(cmd, uow).await?.into())),
        Command::ModifyComment(cmd) => Ok(Some(modify_comment(cmd, uow).await?.into())),
        Command::DeleteComment(cmd) => {
            delete_comment(cmd, uow).await?;
            Ok(None)
        }
        Command::SendSms(cmd) => {
            send_sms(cmd, uow, notifier).await?;
            Ok(None)
        }
        Command::Report(cmd) => Ok(Some(report(cmd, uow).await?.into())),
        Command::CommentReport(cmd) => Ok(Some(comment_report(cmd, uow).await?.into())),
        Command::OpenReport(cmd) => {
            open_report(cmd, uow).await?;
            Ok(None)
        }
        Command::CloseReport(cmd) => {
            close_report(cmd, uow).await?;
            Ok(None)
        }
        Command::ActivateUser(cmd) => {
            activate_user(cmd, uow).await?;
            Ok(None)
        }
        Command::DisableUser(cmd) => {
            disable_user(cmd, uow).await?;
            Ok(None)
        }
        Command::SetPrivatePics(cmd) => {
            set_private_pics(cmd, uow).await?;
            Ok(None)
        }
        Command::UpdateBilling(cmd) => {
            update_billing(cmd, uow).await?;
            Ok(None)
        }
    }
}
