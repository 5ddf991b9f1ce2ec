//! Domain entities

mod chapter;
mod message;

pub use chapter::Chapter;
pub use message::Message;
