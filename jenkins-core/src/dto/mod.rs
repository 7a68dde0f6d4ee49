//! Data Transfer Objects
//!
//! Envelopes that only exist on the wire: the client decodes them and hands
//! out something else (a crumb header, a list of computer names).

pub mod computer;
pub mod crumb;
