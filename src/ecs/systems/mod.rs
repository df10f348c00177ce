mod collect;
mod particles;
mod photos;
mod picking;

pub use collect::*;
pub use particles::*;
pub use photos::*;
pub use picking::*;
