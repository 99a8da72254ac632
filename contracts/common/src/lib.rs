//! Shared building blocks for the stake-ledger contracts.
//!
//! This crate provides:
//! - [`access`] — the three-tier admin hierarchy used to gate privileged calls.
//! - [`amount`] — exact fixed-point money arithmetic (no floats, checked math).
//! - [`ttl`] — persistent-storage TTL maintenance.

#![cfg_attr(not(test), no_std)]

pub mod access;
pub mod amount;
pub mod ttl;

pub use access::AdminTier;
