//! Batch image processing with a concurrency cap and failure isolation.
//!
//! Simulates a rate-limited image service: images are resized in batches of
//! five, at most two at a time, with a pause between batches. Some images are
//! corrupt; their failures are collected instead of aborting the run.
use async_trait::async_trait;
use batchflow::prelude::*;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone)]
struct Image {
    name: String,
    width: u32,
    height: u32,
    corrupt: bool,
    processing_time_ms: u64,
}

impl Image {
    fn new(name: &str, width: u32, height: u32) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            name: name.to_string(),
            width,
            height,
            corrupt: rng.gen_bool(0.2),
            processing_time_ms: rng.gen_range(50..300),
        }
    }
}

#[derive(Debug, Error)]
enum ImageError {
    #[error("image {0} is corrupt")]
    Corrupt(String),
}

/// Resizes images to a fixed width, keeping the aspect ratio.
struct Resizer {
    target_width: u32,
}

#[async_trait]
impl Processor<Image> for Resizer {
    type Output = Image;
    type Error = ImageError;

    async fn process(&self, image: Image) -> Result<Image, ImageError> {
        sleep(Duration::from_millis(image.processing_time_ms)).await;
        if image.corrupt {
            return Err(ImageError::Corrupt(image.name));
        }
        let height = image.height * self.target_width / image.width;
        info!("Resized {} to {}x{}", image.name, self.target_width, height);
        Ok(Image {
            width: self.target_width,
            height,
            ..image
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    batchflow::init();

    let images: Vec<Image> = (1..=20)
        .map(|i| {
            let mut rng = rand::thread_rng();
            let width = rng.gen_range(800..2000);
            let height = rng.gen_range(600..1500);
            Image::new(&format!("image_{i}.jpg"), width, height)
        })
        .collect();
    info!("Created {} sample images", images.len());

    let config = BatchConfig::new(5)
        .with_concurrency(2)
        .with_delay(Duration::from_millis(200));
    let resizer = Resizer { target_width: 640 };

    let results = run_batch_isolated_with(images, &resizer, &config, |err, image: &Image| {
        warn!("Skipping {}: {}", image.name, err);
    })
    .await?;

    let summary = BatchSummary::from_results(&results);
    info!(
        "Processed {} images: {} resized, {} failed",
        summary.total,
        summary.succeeded,
        summary.failed()
    );
    for resized in results.iter().flatten() {
        info!("{} -> {}x{}", resized.name, resized.width, resized.height);
    }
    Ok(())
}
