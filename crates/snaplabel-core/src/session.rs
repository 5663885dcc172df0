use snaplabel_types::CapturedImage;

/// State owned by a single capture-label cycle. Rebuilt for every capture.
#[derive(Debug)]
pub struct CaptureSession {
    pub cycle: u64,
    pub image: CapturedImage,
}

impl CaptureSession {
    pub fn new(cycle: u64, image: CapturedImage) -> Self {
        Self { cycle, image }
    }
}
