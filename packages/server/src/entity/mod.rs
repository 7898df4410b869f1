pub mod defect;
pub mod member;
pub mod user;
