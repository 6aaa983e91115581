// Domain layer - SBC overview snapshot and what the dashboard shows for it
pub mod dashboard;
pub mod overview;
