pub mod handlers;
pub mod jobs;
pub mod lifecycle;
pub mod models;
pub mod naming;
pub mod oracle;
pub mod provisioner;
pub mod reconciler;
pub mod server;
pub mod store;
