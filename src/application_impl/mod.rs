mod identity_resolver;
mod identity_service_fake;
mod identity_service_impl;
mod jwt_signer;
mod refresh_token_store_cache;
mod token_issuer;

pub use identity_resolver::*;
pub use identity_service_fake::*;
pub use identity_service_impl::*;
pub use jwt_signer::*;
pub use refresh_token_store_cache::*;
pub use token_issuer::*;
