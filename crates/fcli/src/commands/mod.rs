//! Command handlers, one module per entity.

pub mod api;
pub mod attachments;
pub mod checks;
pub mod comment;
pub mod forks;
pub mod issues;
pub mod keys;
pub mod labels;
pub mod milestones;
pub mod notifications;
pub mod pulls;
pub mod releases;
pub mod repos;
