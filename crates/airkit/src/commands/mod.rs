pub mod build;
pub mod dev;
pub mod fetch;
pub mod init;
pub mod inspect;
