pub mod auth;
pub mod defect;
pub mod member;
pub mod shared;
