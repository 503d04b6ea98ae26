//! Rewards Ledger - coin rewards and external-event reconciliation
//!
//! This crate credits referrals, publishes the weekly leaderboard, applies
//! Paystack VIP entitlements and issues signup verification codes against a
//! transactional document store.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
