pub mod config;
pub mod error;
pub mod github;
pub mod http;
pub mod modrinth;
pub mod publish;
pub mod report;
