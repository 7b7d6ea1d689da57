pub mod ai_service;
pub mod grading_service;
pub mod interview_service;
pub mod question_cache;
pub mod question_service;
pub mod resume_service;
pub mod storage_service;
