//! # kvmirror Core
//!
//! Runtime-agnostic building blocks for kvmirror: the key-value data
//! model, the change-event variant, the [`store::TargetIndex`] abstraction
//! and the key tokenizer/matcher shared by every index backend.
//!
//! This crate contains no tokio, sqlx, HTTP or filesystem dependencies so
//! the index contract can be implemented and tested in isolation.

pub mod models;
pub mod search;
pub mod store;
