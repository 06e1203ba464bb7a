mod claims;
mod key;
mod token;
mod user;

pub use claims::*;
pub use key::*;
pub use token::*;
pub use user::*;
