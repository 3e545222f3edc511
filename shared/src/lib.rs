pub mod changes;
pub mod models;
pub mod realtime;
