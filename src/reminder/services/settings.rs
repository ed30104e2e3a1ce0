//! Lazy creation of per-user nudge settings.

use crate::reminder::{
    domain::NudgeSettings,
    ports::{ReminderRepository, ReminderRepositoryResult},
};
use crate::task::domain::UserId;
use chrono::TimeDelta;
use mockable::Clock;

/// Returns the user's settings, storing defaults on first access.
///
/// Defaults are enabled, allow three nudges, and use `default_interval`
/// (floored at 15 minutes). Defaults never replace settings the user saved
/// between the lookup and the insert.
///
/// # Errors
///
/// Returns repository errors from lookup or insertion.
pub async fn get_or_create_settings<R, C>(
    repository: &R,
    user_id: UserId,
    default_interval: TimeDelta,
    clock: &C,
) -> ReminderRepositoryResult<NudgeSettings>
where
    R: ReminderRepository + ?Sized,
    C: Clock,
{
    if let Some(settings) = repository.find_settings(user_id).await? {
        return Ok(settings);
    }
    let defaults = NudgeSettings::defaults(user_id, default_interval, clock);
    let stored = repository.create_settings_if_absent(&defaults).await?;
    if stored == defaults {
        tracing::debug!(user_id = %user_id, "created default nudge settings");
    }
    Ok(stored)
}
