pub mod channel;
pub mod configs;
pub mod dispatcher;
pub mod google_cloud;
pub mod logging;
pub mod models;
pub mod tips;
pub mod types;
