//! Application layer use cases for the driver.
//!
//! - **`translate_actions`** – Decomposes one semantic [`Action`] into QMP
//!   exchanges.  The channel it writes to and the delay it waits with are
//!   both traits ([`QmpChannel`], [`Delay`]) injected by the caller.
//!
//! - **`session`** – Runs whole action batches: parse, normalize
//!   coordinates, execute in order, then capture the display.
//!
//! [`Action`]: qmp_core::Action
//! [`QmpChannel`]: translate_actions::QmpChannel
//! [`Delay`]: translate_actions::Delay

pub mod session;
pub mod translate_actions;
