pub mod corpus;
mod output;
mod params;
pub mod parse;
pub mod prompt;
pub mod report;
pub mod validate;

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::cli::SearchArgs;
use crate::search::CrossrefSearch;

fn build_search(args: &SearchArgs) -> Result<Option<CrossrefSearch>> {
    if args.no_search {
        info!("academic search disabled");
        return Ok(None);
    }

    CrossrefSearch::new(
        &args.search_endpoint,
        Duration::from_secs(args.search_timeout_secs),
    )
    .map(Some)
}
