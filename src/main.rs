use anyhow::Result;
use dotenvy::dotenv;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = common::logging_stdout();
    dotenv().ok();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        warn!("usage: loadcache <url>...");
        return Ok(());
    }

    let cache = fetcher::image_cache()?;

    let handles = urls
        .iter()
        .map(|url| cache.load(url))
        .collect::<Result<Vec<_>, _>>()?;

    for (url, handle) in urls.iter().zip(handles) {
        match handle.await {
            Some(image) => info!(url = url.as_str(), bytes = image.value.len(), scale = image.scale, "loaded"),
            None => warn!(url = url.as_str(), "no image"),
        }
    }

    info!(
        entries = cache.cache().len(),
        maximum_size = cache.maximum_size(),
        "done"
    );
    Ok(())
}
