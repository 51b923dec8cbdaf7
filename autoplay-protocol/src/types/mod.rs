pub mod playback;
pub mod status;

pub use playback::*;
pub use status::*;
