pub mod audio;
pub mod config;
pub mod http;
pub mod providers;
