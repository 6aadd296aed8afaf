pub mod encoding;
pub mod request;
pub mod response;
pub mod server;
