//! One-shot search.

use anyhow::{Context as _, Result};
use catalog_core::{QueryParameters, ViewState};
use catalog_fetch::{HttpResultsFetcher, ResultsFetcher, TimeoutFetcher};

use super::SearchArgs;
use crate::context::Context;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let session = &ctx.config.session;
    let params = QueryParameters::new(session.default_page_size)?
        .with_page_size_limit(
            args.page_size.unwrap_or(session.default_page_size),
            session.max_page_size,
        )?
        .with_term(args.term)
        .with_page(args.page)?;

    ctx.config.api.validate()?;
    let fetcher = TimeoutFetcher::new(
        HttpResultsFetcher::new(ctx.config.api.clone()),
        session.fetch_timeout,
    );
    ctx.output.debug(&format!(
        "GET {}",
        fetcher.get_ref().build_request(&params).full_url()
    ));

    let spinner = ctx.output.spinner("Searching...");
    let result = fetcher.fetch(&params).await;
    spinner.finish_and_clear();

    let page = result.with_context(|| format!("Search failed against {}", ctx.config.api.endpoint_url()))?;

    let mut view = ViewState::idle(params.clone());
    view.begin(params);
    view.accept(page);
    ctx.output.view(&view);

    Ok(())
}
