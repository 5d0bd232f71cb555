//! Telegram companion bot with an LLM chat relay and interest-based matching.
//!
//! Mingle answers free-form messages through an OpenAI-compatible completion
//! API and offers a small set of social commands on top: users declare
//! interests and get matched with other users who share them, plus activity
//! suggestions from a curated table.
//!
//! # Architecture
//!
//! - **Storage**: SQLite holding one flat JSON document per user, fronted by
//!   the [`store::ProfileStore`] trait
//! - **Transport**: Telegram Bot API long polling, one task per update with
//!   per-user serialization
//! - **Relay**: OpenAI-compatible `/v1/completions`, first candidate only
//!
//! # Modules
//!
//! - [`config`]: configuration loading from TOML files and environment variables
//! - [`dispatch`]: command routing, handlers, and reply rendering
//! - [`error`]: the command-level error taxonomy
//! - [`matching`]: interest matching and activity recommendations
//! - [`profile`]: the stored profile record and interest normalization
//! - [`relay`]: completion API client
//! - [`store`]: profile persistence
//! - [`telegram`]: Bot API client and poll loop

pub mod config;
pub mod dispatch;
pub mod error;
pub mod matching;
pub mod profile;
pub mod relay;
pub mod store;
pub mod telegram;
