pub mod extract;
pub mod init;
pub mod practice;
pub mod show;
pub mod validate;
