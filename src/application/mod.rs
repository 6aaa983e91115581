// Application layer - use cases on top of the overview source
#[cfg(test)]
pub mod fake_source;
pub mod overview_source;
pub mod poller;
pub mod refresh_client;
