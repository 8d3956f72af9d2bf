pub use auth::*;
pub use mailer::*;
pub use media::*;

mod auth;
mod mailer;
mod media;
