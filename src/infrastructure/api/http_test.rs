use anyhow::bail;
use anyhow::Result;
use mockito::Matcher;
use serde_json::json;

use super::HttpApi;
use crate::domain::models::ApiError;
use crate::domain::models::ChatApi;
use crate::domain::models::ChatMessageBody;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequestBody;

#[tokio::test]
async fn it_sends_chat_messages() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .match_header("cookie", "sid=abc")
        .match_body(Matcher::Json(json!({
            "chat_id": "1700000000000",
            "message": {"text": "Hello", "image_url": null}
        })))
        .with_status(200)
        .with_body(r#"{"response":"Hi there!","creditsLeft":9}"#)
        .create_async()
        .await;

    let api = HttpApi::new(server.url(), "sid=abc".to_string());
    let res = api
        .chat(ChatRequestBody {
            chat_id: "1700000000000".to_string(),
            message: ChatMessageBody {
                text: "Hello".to_string(),
                image_url: None,
            },
        })
        .await?;

    assert_eq!(
        res,
        ChatReply {
            response: "Hi there!".to_string(),
            credits_left: 9,
        }
    );
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_fails_chat_on_bad_status() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .with_status(500)
        .create_async()
        .await;

    let api = HttpApi::new(server.url(), "".to_string());
    let res = api.chat(ChatRequestBody::default()).await;

    match res {
        Err(ApiError::Status(500)) => {}
        _ => bail!("Expected a status error"),
    }
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_fails_chat_on_malformed_bodies() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let api = HttpApi::new(server.url(), "".to_string());
    let res = api.chat(ChatRequestBody::default()).await;

    assert!(matches!(res, Err(ApiError::Decode(_))));
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_fetches_the_profile() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/user")
        .with_status(200)
        .with_body(r#"{"name":"Ada Lovelace","email":"ada@example.com","credits":12,"picture":null}"#)
        .create_async()
        .await;

    let api = HttpApi::new(format!("{url}/", url = server.url()), "".to_string());
    let profile = api.user().await?;

    assert_eq!(profile.first_name(), "Ada");
    assert_eq!(profile.credits, 12);
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_logs_out() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/logout")
        .with_status(200)
        .with_body(r#"{"success":false}"#)
        .create_async()
        .await;

    let api = HttpApi::new(server.url(), "".to_string());
    assert!(!api.logout().await?);
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_fetches_referral_details() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let code = server
        .mock("GET", "/referral-code")
        .with_status(200)
        .with_body(r#"{"referralLink":"https://example.com/?ref=abc"}"#)
        .create_async()
        .await;
    let claimable = server
        .mock("GET", "/claimable-referrals")
        .with_status(200)
        .with_body(r#"{"claimableReferrals":2}"#)
        .create_async()
        .await;

    let api = HttpApi::new(server.url(), "".to_string());
    assert_eq!(api.referral_code().await?, "https://example.com/?ref=abc");
    assert_eq!(api.claimable_referrals().await?, 2);

    code.assert_async().await;
    claimable.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_claims_referrals() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/claim-referral")
        .with_status(200)
        .with_body(r#"{"success":false,"message":"No credits"}"#)
        .create_async()
        .await;

    let api = HttpApi::new(server.url(), "".to_string());
    let res = api.claim_referral().await?;

    assert!(!res.success);
    assert_eq!(res.message, Some("No credits".to_string()));
    assert_eq!(res.new_credits, None);
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_signs_in_and_keeps_the_cookie() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/google")
        .match_body(Matcher::Json(json!({"token": "id-token", "referralCode": "abc"})))
        .with_status(200)
        .with_header("set-cookie", "sid=xyz; Path=/; HttpOnly")
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let api = HttpApi::new(server.url(), "".to_string());
    let res = api.sign_in("id-token", "abc").await?;

    assert_eq!(res.cookie, Some("sid=xyz".to_string()));
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_rejects_failed_sign_ins() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/google")
        .with_status(401)
        .with_body(r#"{"success":false,"message":"Invalid token"}"#)
        .create_async()
        .await;

    let api = HttpApi::new(server.url(), "".to_string());
    let res = api.sign_in("bad", "").await;

    match res {
        Err(ApiError::AuthRejected(Some(message))) => assert_eq!(message, "Invalid token"),
        _ => bail!("Expected an auth rejection"),
    }
    mock.assert_async().await;
    return Ok(());
}
