pub mod constraints;
pub mod session;

pub use constraints::{CropAspect, CropConstraints};
pub use session::{CropFrame, CropSession};
