//! Conversation with the external query tool.
//!
//! The probe engine never touches the DNS wire format. It builds `dig` command lines
//! ([`dig`]) and interprets the text that comes back: transfer verdicts ([`transfer`]), zone
//! dumps ([`zone`]), size statistics ([`stats`]) and the free-form strings found in TXT
//! answers ([`records`]).

pub mod dig;
pub mod records;
pub mod stats;
pub mod transfer;
pub mod zone;
