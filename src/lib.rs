//! Tab-data cache and request coordinator for football player and team
//! detail pages.
//!
//! A [`detail::DetailController`] owns one page: it serves tabs from its
//! cache, fetches missing ones through a [`fetch::DataSource`] at most once
//! per (entity, tab), and drops results that belong to an entity the page
//! has already moved away from.

pub mod app;
pub mod cache;
pub mod commands;
pub mod config;
pub mod detail;
pub mod event;
pub mod fetch;
pub mod livescore;
pub mod merge;
