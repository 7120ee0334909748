//! External service clients.
//!
//! Both clients degrade rather than propagate: nothing in here is allowed to
//! raise past the checkout engine or the bot loop.

pub mod cdek;
pub mod retry;
pub mod telegram;
