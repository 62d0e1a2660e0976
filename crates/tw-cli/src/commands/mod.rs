mod audit;
pub mod dispatch;
mod exercise;
mod post;
mod shared;
mod solution;
mod track;
mod user;
