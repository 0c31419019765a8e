mod account;
mod note;
mod user;

pub use account::*;
pub use note::*;
pub use user::*;
