//! One-shot sample feed loading

use std::path::{Path, PathBuf};

use satlink_core::SatlinkResult;

use crate::{SampleSlot, SampleTable};

/// Read and parse a sample feed from disk
pub async fn load_samples(path: impl AsRef<Path>) -> SatlinkResult<SampleTable> {
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    SampleTable::parse(&text)
}

/// Load in the background and install into `slot` when done.
/// Failures are logged; the slot stays empty and playback keeps using
/// synthetic motion.
pub fn spawn_loader(path: PathBuf, slot: SampleSlot) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match load_samples(&path).await {
            Ok(table) => slot.install(table),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "sample feed unavailable");
            }
        }
    })
}
