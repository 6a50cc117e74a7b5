pub mod activities;
pub mod article_sync;
pub mod client;
pub mod cursor;
pub mod models;
pub mod render;
pub mod ticket_sync;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;
