mod avatar;
mod avatar_inspection;
mod contacts;

pub use avatar::*;
pub use avatar_inspection::*;
pub use contacts::*;
