pub mod catalog;
pub mod channel;
pub mod config;
pub mod error;
pub mod library;
pub mod m3u;
pub mod merge;
pub mod playlist;
pub mod proxy;
pub mod server;
pub mod source;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
