//! Infrastructure layer for the driver.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `qmp_core`, but MUST NOT be imported by the `application` layer outside
//! of tests.
//!
//! # Sub-modules
//!
//! - **`transport`** – Unix socket implementation of `QmpChannel`: greeting,
//!   capability negotiation, and buffered one-object reads.  A recording
//!   `mock` channel is also provided for tests.
//!
//! - **`clock`** – `Delay` implementations: a real thread sleep and a
//!   recording fake.
//!
//! - **`storage`** – TOML configuration file loading.

pub mod clock;
pub mod storage;
pub mod transport;
