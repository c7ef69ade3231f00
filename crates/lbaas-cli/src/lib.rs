//! LBaaS A10 VIP CLI
//!
//! Command-line tooling around the VIP translator: preview the appliance
//! calls a VIP lifecycle event produces on a given device, and inspect the
//! configured devices.

pub mod commands;
