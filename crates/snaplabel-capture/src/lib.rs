mod camera;
mod preview;

pub use camera::{FileCamera, is_image_file, list_images};
pub use preview::{describe, save_preview};
