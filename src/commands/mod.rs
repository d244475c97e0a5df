pub mod batch;
pub mod history;
pub mod list;
pub mod show;
pub mod tip;
