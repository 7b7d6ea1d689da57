pub mod answer;
pub mod interview;
pub mod question;
pub mod resume;
pub mod round;
