//! # tw-core
//!
//! Core types, status resolution, and error types for Trackway.
//!
//! This crate provides the foundational types shared across all Trackway crates:
//! - Entity structs for users, tracks, exercises, solutions and mentorships
//! - The derived solution status and its resolver
//! - Caller-dependent view projections (full, locked, signed-out)
//! - ID prefix constants
//! - Cross-cutting error types
//! - Response types for multi-row operations

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod status;
pub mod views;
