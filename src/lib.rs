//! `mymetrics` library crate.
//!
//! Turns the output of dashboard scripts into typed card payloads:
//!
//! - `args` — tokenize/format the editable argument text a script is invoked with
//! - `execution` — decode a completed run's stdout into a raw `{type, data}` result
//! - `contract` — normalize a raw result into a `CardPayload` for a card type
//! - `series` — pick the axis mode a series payload should be drawn with
//!
//! The binary (`mymetrics`) wires these to a CLI; everything here is pure and
//! callable from any thread.

pub mod args;
pub mod cli;
pub mod config;
pub mod contract;
pub mod execution;
pub mod logging;
pub mod printer;
pub mod series;
pub mod utils;
