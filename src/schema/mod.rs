//! Typed input contract
//!
//! Day logs arrive as loosely-shaped JSON (numbers as strings, snake_case or
//! camelCase keys, single objects where a list is expected). This module
//! normalizes that input once into the typed records of [`crate::types`], so
//! the calculation stages only ever see well-formed values.

mod adapter;
mod coerce;

pub use adapter::*;
pub use coerce::*;
