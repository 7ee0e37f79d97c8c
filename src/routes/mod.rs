pub(crate) mod health_check;
mod creators;
mod videos;
mod youtube;

pub use creators::*;
pub use health_check::*;
pub use videos::*;
pub use youtube::*;
