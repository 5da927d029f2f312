//! Integration tests for aulos-bandwidth

mod balanced_transfers;
mod predictive_meter;
