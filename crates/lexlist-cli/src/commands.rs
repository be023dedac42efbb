use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lexlist_model::ResultPage;
use serde_json::Value;
use tracing::info;
use url::Url;

use lexlist_cli::profile::ListProfile;
use lexlist_cli::replay::{FixtureFetcher, ReplayOptions, ReplayReport, inspect, replay};

use crate::cli::{InspectArgs, ReplayArgs};

pub fn run_inspect(args: &InspectArgs) -> Result<ResultPage> {
    let profile = ListProfile::load(args.profile.as_deref())?;
    let response = read_json(&args.response)?;
    let page = inspect(&profile, &response, args.page_size, args.offset)?;
    info!(items = page.len(), has_more = page.has_more, "interpreted response");
    Ok(page)
}

pub fn run_replay(args: &ReplayArgs) -> Result<(ListProfile, ReplayReport)> {
    let profile = ListProfile::load(args.profile.as_deref())?;
    let filters = profile.parse_filter_args(&args.filters)?;
    let url = Url::parse(&args.url).with_context(|| format!("parse url '{}'", args.url))?;
    let fetcher = FixtureFetcher::from_json(read_json(&args.pages)?)
        .with_context(|| format!("load pages from {}", args.pages.display()))?;

    let options = ReplayOptions {
        url,
        filters,
        scrolls: args.scrolls,
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("start runtime")?;
    let report = runtime.block_on(replay(&profile, fetcher, options))?;
    Ok((profile, report))
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse JSON in {}", path.display()))
}
