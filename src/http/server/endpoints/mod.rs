pub mod consent;
pub mod oauth;
