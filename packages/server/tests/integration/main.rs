mod common;

mod auth;
mod member;
mod notification;
