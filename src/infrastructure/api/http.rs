#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use async_trait::async_trait;
use reqwest::header;
use reqwest::RequestBuilder;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiError;
use crate::domain::models::ChatApi;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequestBody;
use crate::domain::models::ClaimResponse;
use crate::domain::models::SignIn;
use crate::domain::models::UserProfile;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SuccessResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ReferralCodeResponse {
    #[serde(rename = "referralLink")]
    referral_link: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ClaimableResponse {
    #[serde(rename = "claimableReferrals")]
    claimable_referrals: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AuthRequest {
    token: String,
    #[serde(rename = "referralCode")]
    referral_code: String,
}

/// Collects the `name=value` part of every `Set-Cookie` header.
fn session_cookie(res: &Response) -> Option<String> {
    let cookies: Vec<&str> = res
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| return value.to_str().ok())
        .filter_map(|value| return value.split(';').next())
        .map(|pair| return pair.trim())
        .filter(|pair| return !pair.is_empty())
        .collect();

    if cookies.is_empty() {
        return None;
    }

    return Some(cookies.join("; "));
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let body = res.text().await?;
    return serde_json::from_str(&body).map_err(|err| return ApiError::Decode(err.to_string()));
}

pub struct HttpApi {
    url: String,
    cookie: String,
    client: reqwest::Client,
}

impl Default for HttpApi {
    fn default() -> HttpApi {
        return HttpApi::new(
            Config::get(ConfigKey::ApiUrl),
            Config::get(ConfigKey::SessionCookie),
        );
    }
}

impl HttpApi {
    pub fn new(url: String, cookie: String) -> HttpApi {
        return HttpApi {
            url: url.trim_end_matches('/').to_string(),
            cookie,
            client: reqwest::Client::new(),
        };
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{url}{path}", url = self.url));
        if !self.cookie.is_empty() {
            req = req.header(header::COOKIE, &self.cookie);
        }

        return req;
    }

    async fn send(&self, req: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let res = req.send().await?;
        if !res.status().is_success() {
            tracing::error!(path, status = res.status().as_u16(), "Backend request failed");
            return Err(ApiError::Status(res.status().as_u16()));
        }

        return Ok(res);
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let res = self
            .send(self.request(reqwest::Method::GET, path), path)
            .await?;
        return decode(res).await;
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let res = self
            .send(self.request(reqwest::Method::POST, path), path)
            .await?;
        return decode(res).await;
    }
}

#[async_trait]
impl ChatApi for HttpApi {
    #[allow(clippy::implicit_return)]
    async fn chat(&self, body: ChatRequestBody) -> Result<ChatReply, ApiError> {
        tracing::debug!(
            chat_id = %body.chat_id,
            has_image = body.message.image_url.is_some(),
            "Sending chat message"
        );
        let req = self.request(reqwest::Method::POST, "/chat").json(&body);
        let res = self.send(req, "/chat").await?;
        return decode(res).await;
    }

    #[allow(clippy::implicit_return)]
    async fn user(&self) -> Result<UserProfile, ApiError> {
        return self.get_json("/user").await;
    }

    #[allow(clippy::implicit_return)]
    async fn logout(&self) -> Result<bool, ApiError> {
        let res: SuccessResponse = self.post_json("/logout").await?;
        return Ok(res.success);
    }

    #[allow(clippy::implicit_return)]
    async fn referral_code(&self) -> Result<String, ApiError> {
        let res: ReferralCodeResponse = self.get_json("/referral-code").await?;
        return Ok(res.referral_link);
    }

    #[allow(clippy::implicit_return)]
    async fn claimable_referrals(&self) -> Result<u64, ApiError> {
        let res: ClaimableResponse = self.get_json("/claimable-referrals").await?;
        return Ok(res.claimable_referrals);
    }

    #[allow(clippy::implicit_return)]
    async fn claim_referral(&self) -> Result<ClaimResponse, ApiError> {
        return self.post_json("/claim-referral").await;
    }

    #[allow(clippy::implicit_return)]
    async fn sign_in(&self, token: &str, referral_code: &str) -> Result<SignIn, ApiError> {
        let body = AuthRequest {
            token: token.to_string(),
            referral_code: referral_code.to_string(),
        };
        let res = self
            .request(reqwest::Method::POST, "/auth/google")
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Sign in rejected");
            let rejected: SuccessResponse = decode(res).await.unwrap_or_default();
            return Err(ApiError::AuthRejected(rejected.message));
        }

        let cookie = session_cookie(&res);
        let accepted: SuccessResponse = decode(res).await?;
        if !accepted.success {
            return Err(ApiError::AuthRejected(accepted.message));
        }

        return Ok(SignIn { cookie });
    }
}
