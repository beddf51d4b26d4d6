pub mod dispatch;
pub mod proposal;
pub mod thinner;

pub use dispatch::dispatch;
pub use proposal::Proposal;
pub use thinner::{ApplyReport, Thinner};
