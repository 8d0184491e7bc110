//! Transport-level credential decorators.

mod basic_credentials;

pub use basic_credentials::BasicCredentials;
