use anyhow::Result;
use chrono::Utc;
use roomcal_core::search::{self, SearchEngine, SearchOptions};
use roomcal_core::share::share_url;
use roomcal_core::week::WeekView;
use roomcal_core::{FeedSource, RoomcalConfig};
use tracing::debug;
use url::Url;

use crate::render;
use crate::utils::tui::create_spinner;

pub async fn run(config: &RoomcalConfig, query: &str, base_url: Option<&Url>) -> Result<()> {
    let tz = config.tz()?;
    let source = FeedSource::from_config(config);

    let spinner = create_spinner(format!("Loading {}", source));
    let result = roomcal_core::refresh(&source, config).await;
    spinner.finish_and_clear();
    let store = result?;

    let week_start = search::week_start(Utc::now(), tz);
    let engine = SearchEngine::new(store.records(), week_start);
    debug!(%week_start, working_set = engine.records().len(), "searching");
    let options = SearchOptions {
        threshold: config.fuzzy_threshold,
        max_results: config.max_results,
    };
    let view = WeekView::bucket(engine.filter(query, &options), week_start);

    println!("{}", render::week(&view, tz));

    if let Some(base) = base_url {
        println!();
        println!("{}", share_url(base, query));
    }

    Ok(())
}
