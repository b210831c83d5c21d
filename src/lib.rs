//! bookshelf - a small web front end over an embedded document store
//!
//! Layers, bottom up:
//! - [`storage`]: append-only, checksummed record log
//! - [`document`], [`query`], [`aggregation`]: JSON documents, find and
//!   aggregation pipelines
//! - [`collection`]: named in-memory collections persisted to the log
//! - [`books`]: book records, search, author statistics and the record store
//! - [`http_server`], [`cli`]: the web front end and command line

pub mod aggregation;
pub mod books;
pub mod cli;
pub mod collection;
pub mod document;
pub mod http_server;
pub mod observability;
pub mod query;
pub mod storage;
