//! Back-office JSON API: substations, MCCs, nodes and accounts
//!
//! Mounted under `/admin/api/v1` behind the staff guard.

pub mod dto;
pub mod mccs;
pub mod nodes;
pub mod substations;
pub mod users;

pub use dto::*;
