// store

mod expiring_cache;
mod refresh_token_store;

pub use expiring_cache::*;
pub use refresh_token_store::*;

// repo

mod user_repo;

pub use user_repo::*;

// token

mod token_signer;

pub use token_signer::*;
