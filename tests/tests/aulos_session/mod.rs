//! Integration tests for the aulos facade session

mod events;
mod lifecycle;
