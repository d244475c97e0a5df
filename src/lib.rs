//! GratChain: browse creators and tip them onchain, one at a time or in batches.

pub mod batch;
pub mod chain;
pub mod context;
pub mod db;
pub mod directory;
pub mod models;
pub mod notify;
pub mod render;
pub mod tip;
pub mod wallet;
