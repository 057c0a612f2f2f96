use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use super::ClaimOutcome;
use super::ReferralPoller;
use super::ReferralStatus;
use crate::domain::models::ClaimResponse;
use crate::domain::models::Event;
use crate::infrastructure::fakes::FakeApi;

fn poller(api: FakeApi) -> (Arc<FakeApi>, ReferralPoller) {
    let api = Arc::new(api);
    let poller = ReferralPoller::with_interval(api.clone(), Duration::from_millis(10));
    return (api, poller);
}

#[test]
fn it_describes_claimable_referrals() {
    let status = ReferralStatus { claimable: 2 };
    assert!(status.can_claim());
    insta::assert_snapshot!(status.describe(), @"2 people signed up through your link. You can now claim 60 credits!");
}

#[test]
fn it_describes_no_referrals() {
    let status = ReferralStatus { claimable: 0 };
    assert!(!status.can_claim());
    insta::assert_snapshot!(status.describe(), @"No signups at the moment. Invite friends and earn 30 credits for each one who joins!");
}

#[test]
fn it_leaves_the_balance_out_when_a_claim_omits_it() {
    let outcome = ClaimOutcome::Claimed {
        claimed: 30,
        new_credits: None,
    };
    insta::assert_snapshot!(outcome.message(), @"Referral credits claimed! You earned 30 credits.");
}

#[tokio::test]
async fn it_checks_claimable_referrals() -> Result<()> {
    let (_api, poller) = poller(FakeApi {
        claimable: Some(3),
        ..FakeApi::default()
    });

    let status = poller.check().await?;
    assert_eq!(status, ReferralStatus { claimable: 3 });
    return Ok(());
}

#[tokio::test]
async fn it_polls_immediately_and_repeatedly() -> Result<()> {
    let (api, poller) = poller(FakeApi {
        claimable: Some(1),
        ..FakeApi::default()
    });
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let worker = tokio::spawn(poller.start(tx));

    for _ in 0..2 {
        match rx.recv().await {
            Some(Event::ReferralStatus(status)) => assert_eq!(status.claimable, 1),
            _ => bail!("Wrong event"),
        }
    }

    worker.abort();
    assert!(api.claimable_calls.load(Ordering::SeqCst) >= 2);
    return Ok(());
}

#[tokio::test]
async fn it_keeps_polling_after_failures() -> Result<()> {
    let (api, poller) = poller(FakeApi::default());
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let worker = tokio::spawn(poller.start(tx));

    tokio::time::sleep(Duration::from_millis(60)).await;
    worker.abort();

    assert!(rx.try_recv().is_err());
    assert!(api.claimable_calls.load(Ordering::SeqCst) >= 2);
    return Ok(());
}

#[tokio::test]
async fn it_stops_polling_when_the_receiver_is_gone() -> Result<()> {
    let (_api, poller) = poller(FakeApi {
        claimable: Some(0),
        ..FakeApi::default()
    });
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    drop(rx);

    let res = poller.start(tx).await;
    assert!(res.is_err());
    return Ok(());
}

#[tokio::test]
async fn it_claims_credits() -> Result<()> {
    let (_api, poller) = poller(FakeApi {
        claim: Some(ClaimResponse {
            success: true,
            claimed_credits: Some(60),
            new_credits: Some(75),
            message: None,
        }),
        ..FakeApi::default()
    });

    let outcome = poller.claim().await;
    assert_eq!(
        outcome,
        ClaimOutcome::Claimed {
            claimed: 60,
            new_credits: Some(75)
        }
    );
    insta::assert_snapshot!(outcome.message(), @"Referral credits claimed! You earned 60 credits. New credit balance: 75");
    return Ok(());
}

#[tokio::test]
async fn it_surfaces_rejections() -> Result<()> {
    let (_api, poller) = poller(FakeApi {
        claim: Some(ClaimResponse {
            success: false,
            message: Some("No credits".to_string()),
            ..ClaimResponse::default()
        }),
        ..FakeApi::default()
    });

    let outcome = poller.claim().await;
    assert_eq!(outcome, ClaimOutcome::Rejected("No credits".to_string()));
    assert_eq!(outcome.message(), "No credits");
    return Ok(());
}

#[tokio::test]
async fn it_uses_a_default_rejection_message() -> Result<()> {
    let (_api, poller) = poller(FakeApi {
        claim: Some(ClaimResponse::default()),
        ..FakeApi::default()
    });

    let outcome = poller.claim().await;
    assert_eq!(outcome.message(), "No credits to claim at this time.");
    return Ok(());
}

#[tokio::test]
async fn it_reports_transport_failures() -> Result<()> {
    let (_api, poller) = poller(FakeApi::default());

    let outcome = poller.claim().await;
    assert_eq!(
        outcome.message(),
        "An error occurred while claiming referral credits."
    );
    return Ok(());
}
