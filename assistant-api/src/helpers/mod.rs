pub mod credential_provider;
pub mod database;
pub mod google_oauth;
pub mod oauth_state;
pub mod token_cache;
pub mod token_store;
