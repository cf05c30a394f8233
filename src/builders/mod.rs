mod liquidity;
pub use liquidity::*;

mod swap;
pub use swap::*;
