pub mod animate;
pub mod filter;
pub mod highlight;
pub mod layout;
pub mod model;
