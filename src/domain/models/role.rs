use serde::Deserialize;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Role {
    #[strum(serialize = "You")]
    User,
    #[strum(serialize = "AI")]
    Assistant,
    #[strum(serialize = "Error")]
    Error,
}
