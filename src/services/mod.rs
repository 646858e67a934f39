pub mod auth_service;
pub mod candidate_service;
pub mod chat_service;
pub mod dialog_service;
pub mod gateway;
pub mod job_service;
pub mod lifecycle;
pub mod notification_service;
pub mod session_store;
