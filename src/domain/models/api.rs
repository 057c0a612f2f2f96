use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageBody {
    pub text: String,
    pub image_url: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequestBody {
    pub chat_id: String,
    pub message: ChatMessageBody,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(rename = "creditsLeft")]
    pub credits_left: i64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub credits: i64,
    pub picture: Option<String>,
}

impl UserProfile {
    pub fn first_name(&self) -> &str {
        return self.name.split(' ').next().unwrap_or_default();
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub success: bool,
    #[serde(rename = "claimedCredits", default)]
    pub claimed_credits: Option<i64>,
    #[serde(rename = "newCredits", default)]
    pub new_credits: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of exchanging an identity token for a backend session.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub cookie: Option<String>,
}

#[async_trait]
pub trait ChatApi {
    /// Sends one user turn to the assistant and waits for the full reply.
    async fn chat(&self, body: ChatRequestBody) -> Result<ChatReply, ApiError>;

    async fn user(&self) -> Result<UserProfile, ApiError>;

    /// Ends the backend session. Resolves to the backend's `success` flag.
    async fn logout(&self) -> Result<bool, ApiError>;

    async fn referral_code(&self) -> Result<String, ApiError>;

    async fn claimable_referrals(&self) -> Result<u64, ApiError>;

    async fn claim_referral(&self) -> Result<ClaimResponse, ApiError>;

    /// Exchanges a Google identity token for a session, optionally crediting
    /// the referrer. Rejections surface as `ApiError::AuthRejected`.
    async fn sign_in(&self, token: &str, referral_code: &str) -> Result<SignIn, ApiError>;
}
