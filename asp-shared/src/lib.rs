pub mod money;
pub mod options;

pub use money::{round_currency, Money};
pub use options::{Grade, Memory, Storage};
