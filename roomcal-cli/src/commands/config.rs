use anyhow::Result;
use owo_colors::OwoColorize;
use roomcal_core::{FeedSource, RoomcalConfig};

pub fn run() -> Result<()> {
    let config_path = RoomcalConfig::config_path()?;
    let config = RoomcalConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Local feed: {}", config.expanded_local_path().display());

    println!();
    println!("{}", "Feed".bold());
    println!("  Mode:       {}", config.mode);
    println!("  Source:     {}", FeedSource::from_config(&config));
    println!("  Timezone:   {}", config.timezone);

    Ok(())
}
