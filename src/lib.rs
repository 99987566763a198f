//! # Contest Announcer Bot
//!
//! A Telegram bot announcing upcoming programming contests to a channel.
//!
//! ## Features
//! - Daily announcement of desired contests fetched from clist.by
//! - Per-source allow/deny rules on contest titles
//! - Persian calendar dates and digits in Tehran time
//! - A reply-linked alarm one hour before each contest starts
//! - Admin-only manual announcements

/// Bot command handlers and message processing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Domain error types
pub mod error;
/// Contest records and their API wire format
pub mod models;
/// Fetching, filtering, publishing and alarm services
pub mod services;
/// Utility functions for datetime, formatting, logging and validation
pub mod utils;
