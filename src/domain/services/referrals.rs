#[cfg(test)]
#[path = "referrals_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time;

use crate::domain::models::ApiError;
use crate::domain::models::Event;
use crate::infrastructure::api::ApiBox;

pub const REFERRAL_CHECK_INTERVAL: Duration = Duration::from_secs(60);
pub const CREDITS_PER_REFERRAL: u64 = 30;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferralStatus {
    pub claimable: u64,
}

impl ReferralStatus {
    pub fn can_claim(&self) -> bool {
        return self.claimable > 0;
    }

    pub fn describe(&self) -> String {
        if self.can_claim() {
            return format!(
                "{} people signed up through your link. You can now claim {} credits!",
                self.claimable,
                self.claimable * CREDITS_PER_REFERRAL
            );
        }

        return "No signups at the moment. Invite friends and earn 30 credits for each one who joins!"
            .to_string();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed {
        claimed: i64,
        new_credits: Option<i64>,
    },
    Rejected(String),
}

impl ClaimOutcome {
    pub fn message(&self) -> String {
        match self {
            ClaimOutcome::Claimed {
                claimed,
                new_credits: Some(new_credits),
            } => {
                return format!("Referral credits claimed! You earned {claimed} credits. New credit balance: {new_credits}");
            }
            ClaimOutcome::Claimed {
                claimed,
                new_credits: None,
            } => {
                return format!("Referral credits claimed! You earned {claimed} credits.");
            }
            ClaimOutcome::Rejected(message) => return message.to_string(),
        }
    }
}

pub struct ReferralPoller {
    api: ApiBox,
    interval: Duration,
}

impl ReferralPoller {
    pub fn new(api: ApiBox) -> ReferralPoller {
        return ReferralPoller::with_interval(api, REFERRAL_CHECK_INTERVAL);
    }

    pub fn with_interval(api: ApiBox, interval: Duration) -> ReferralPoller {
        return ReferralPoller { api, interval };
    }

    pub async fn check(&self) -> Result<ReferralStatus, ApiError> {
        let claimable = self.api.claimable_referrals().await?;
        tracing::debug!(claimable, "Checked claimable referrals");

        return Ok(ReferralStatus { claimable });
    }

    /// Checks right away, then once per interval until the receiver goes
    /// away. Failed checks are logged and skipped.
    pub async fn start(self, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.check().await {
                Ok(status) => {
                    if tx.send(Event::ReferralStatus(status)).is_err() {
                        bail!("Event channel closed");
                    }
                }
                Err(err) => {
                    tracing::error!(error = ?err, "Error checking claimable referrals");
                }
            }
        }
    }

    pub async fn claim(&self) -> ClaimOutcome {
        let res = match self.api.claim_referral().await {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Error claiming referral credits");
                return ClaimOutcome::Rejected(
                    "An error occurred while claiming referral credits.".to_string(),
                );
            }
        };

        if !res.success {
            return ClaimOutcome::Rejected(
                res.message
                    .unwrap_or_else(|| return "No credits to claim at this time.".to_string()),
            );
        }

        return ClaimOutcome::Claimed {
            claimed: res.claimed_credits.unwrap_or_default(),
            new_credits: res.new_credits,
        };
    }
}
