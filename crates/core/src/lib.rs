//! Domain logic for the Marquee extensions.
//!
//! Everything here is synchronous and I/O-free: host records come in as a
//! [`record::HostSnapshot`], configuration slots are resolved once through
//! [`config`], and the two view models are computed by [`grid`] (weekly
//! event planning) and [`sales`] (cumulative box-office series).

pub mod config;
pub mod dates;
pub mod error;
pub mod field;
pub mod grid;
pub mod record;
pub mod sales;
pub mod types;
