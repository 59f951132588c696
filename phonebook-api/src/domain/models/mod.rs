mod avatar;
mod contact;
mod ids;
mod listing;

pub use avatar::*;
pub use contact::*;
pub use ids::*;
pub use listing::*;
