pub mod auth;
pub mod candidate;
pub mod chat;
pub mod dialog;
pub mod job;
pub mod notification;
