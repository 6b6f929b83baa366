//! ICS parsing and generation for the shared calendar document.

mod generate;
mod parse;

pub use generate::generate_calendar;
pub use parse::parse_calendar;
