mod cache_memory;
mod user_repo_memory;

pub use cache_memory::*;
pub use user_repo_memory::*;

#[cfg(test)]
mod recording_cache;

#[cfg(test)]
pub use recording_cache::*;
