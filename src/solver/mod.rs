pub mod construction;
pub mod optimize;
pub mod two_opt;

pub use construction::construct_tour;
pub use optimize::{optimize, plan_tour};
pub use two_opt::{two_opt, RefineBudget, RefineOutcome};
