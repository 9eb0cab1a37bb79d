pub mod error;
pub mod record;
pub mod rules;
pub mod traits;

pub use self::error::*;
pub use self::record::*;
pub use self::rules::*;
pub use self::traits::*;
