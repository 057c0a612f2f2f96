mod action;
mod api;
mod attachment;
mod camera;
mod chat;
mod error;
mod event;
mod message;
mod panel;
mod role;
mod slash_commands;
mod textarea;
mod theme;

pub use action::*;
pub use api::*;
pub use attachment::*;
pub use camera::*;
pub use chat::*;
pub use error::*;
pub use event::*;
pub use message::*;
pub use panel::*;
pub use role::*;
pub use slash_commands::*;
pub use textarea::*;
pub use theme::*;
