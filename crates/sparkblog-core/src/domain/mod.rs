//! Domain entities - the core business objects.

mod draft;
mod post;
mod user;

pub use draft::Draft;
pub use post::{Post, PostInput};
pub use user::User;
