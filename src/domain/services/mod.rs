pub mod actions;
mod app_state;
mod auth;
mod bubble;
mod bubble_list;
mod chat_session;
pub mod clipboard;
pub mod events;
mod formatter;
mod media_capture;
mod preferences;
mod referrals;
mod scroll;
mod themes;
mod transcript;

pub use app_state::*;
pub use auth::*;
pub use bubble::*;
pub use bubble_list::*;
pub use chat_session::*;
pub use formatter::*;
pub use media_capture::*;
pub use preferences::*;
pub use referrals::*;
pub use scroll::*;
pub use themes::*;
pub use transcript::*;
