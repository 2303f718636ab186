//! 数据模型模块

pub mod auth;
pub mod chirp;
pub mod refresh_token;
pub mod user;
pub mod webhook;
