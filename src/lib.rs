#![doc(test(attr(deny(warnings))))]

//! Supplier Desk is a command-line front end for supplier master records:
//! searching and listing suppliers, filing new applications and updating
//! existing entries.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Supplier Desk tracing initialized.");
    });
}
