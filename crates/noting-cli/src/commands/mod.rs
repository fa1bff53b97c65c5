pub mod add;
pub mod clear;
pub mod common;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod export;
pub mod list;
pub mod pin;
pub mod search;
pub mod show;
pub mod sync;
