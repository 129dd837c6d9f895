pub mod beach;
pub mod contract;
pub mod forecast;
pub mod level;
pub mod recommendation;
pub mod session;
