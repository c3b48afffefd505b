pub mod server;
pub mod storage;
pub mod identity;
pub mod summary;
pub mod i18n;
pub mod error;
