mod descriptor;
mod resolver;

pub use descriptor::{RelativeDay, TimeDescriptor, Token, TokenSet, WeekRef};
pub use resolver::{resolve, week_dates, WeekAnchor};
