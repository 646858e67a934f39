pub mod auth_dto;
pub mod candidate_dto;
pub mod chat_dto;
pub mod envelope;
pub mod job_dto;
pub mod lenient;
