pub mod acquisition;
pub mod evaluation;
pub mod pipeline;
pub mod sampling;
pub mod shared;
pub mod verification;
pub mod video;
