//! pms - project management storage and services
//!
//! Tracks projects, tasks, and users for a small team. All state lives in
//! one JSON file per entity type and is rewritten in full on every change.
//!
//! # Core Concepts
//!
//! - **Entity stores**: one in-memory snapshot per entity type, mirrored to
//!   its backing file, with `max + 1` identifier assignment
//! - **Services**: validation, cross-entity checks, and the task status
//!   lifecycle on top of the stores
//! - **Credentials**: unsalted SHA-256 password hashes, base64 encoded
//!
//! # Module Organization
//!
//! - `app`: opens the stores once and wires them into the services
//! - `auth`: password hashing and the auth service
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `pms.toml`
//! - `error`: error types and result aliases
//! - `lock`: advisory file locks and atomic rewrites
//! - `output`: human and JSON rendering for the CLI
//! - `project`, `task`, `user`: entities, their stores, and services
//! - `storage`: data directory layout and the generic entity store

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod project;
pub mod storage;
pub mod task;
pub mod user;

pub use app::App;
pub use error::{Error, Result};
