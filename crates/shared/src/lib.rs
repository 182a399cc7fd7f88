pub mod ceremony;
pub mod domain;
pub mod error;
pub mod protocol;
