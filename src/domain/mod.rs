//! Domain layer: entities, the store contract and click tracking.
//!
//! - [`entities`] - the persisted URL record
//! - [`repositories`] - store trait implemented by the infrastructure layer
//! - [`click_event`] - click events and the best-effort queue
//! - [`click_worker`] - background task applying clicks to the store
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the code and answers immediately
//! 2. A [`click_event::ClickEvent`] is pushed with `try_send`
//! 3. [`click_worker::run_click_worker`] increments the counter in the store

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
