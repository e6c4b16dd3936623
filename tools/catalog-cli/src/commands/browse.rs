//! Interactive browsing.
//!
//! Plain text submits a search term. Lines starting with `:` drive paging:
//! `:n`, `:p`, `:page N`, `:size N`, `:retry`, `:q`.

use anyhow::{Context as _, Result};
use catalog_fetch::HttpResultsFetcher;
use catalog_session::{SearchSession, SessionError, SessionHandle};
use dialoguer::Input;

use super::BrowseArgs;
use crate::context::Context;

/// One line of browse input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Search(String),
    Next,
    Prev,
    Page(u32),
    Size(u32),
    Retry,
    Quit,
}

impl BrowseCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Search(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or("");
        let arg = parts.next();
        match (name, arg) {
            ("n" | "next", None) => Ok(Self::Next),
            ("p" | "prev", None) => Ok(Self::Prev),
            ("page", Some(n)) => parse_number(n).map(Self::Page),
            ("size", Some(n)) => parse_number(n).map(Self::Size),
            ("r" | "retry", None) => Ok(Self::Retry),
            ("q" | "quit", None) => Ok(Self::Quit),
            ("page" | "size", None) => Err(format!(":{} needs a number", name)),
            _ => Err(format!(
                "Unknown command :{}. Try :n, :p, :page N, :size N, :retry or :q",
                command
            )),
        }
    }
}

fn parse_number(text: &str) -> Result<u32, String> {
    text.parse()
        .map_err(|_| format!("{:?} is not a page number", text))
}

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    ctx.config.api.validate()?;

    let mut config = ctx.config.session.clone();
    if let Some(size) = args.page_size {
        config.default_page_size = size;
    }
    if args.term.is_some() {
        config.fetch_on_start = false;
    }

    let fetcher = HttpResultsFetcher::new(ctx.config.api.clone());
    let handle = SearchSession::start(fetcher, config).context("Failed to start search session")?;
    if let Some(term) = args.term {
        handle.submit_term(term).await?;
    }

    ctx.output.info("Type to search. :n/:p to page, :page N, :size N, :retry, :q to quit.");

    let mut redraw = true;
    loop {
        if redraw {
            let spinner = ctx.output.spinner("Loading...");
            let view = handle.settled().await?;
            spinner.finish_and_clear();
            ctx.output.view(&view);
        }

        let line = prompt().await?;
        let command = match BrowseCommand::parse(&line) {
            Ok(BrowseCommand::Quit) => break,
            Ok(command) => command,
            Err(msg) => {
                ctx.output.warn(&msg);
                redraw = false;
                continue;
            }
        };

        redraw = apply(command, &handle, ctx).await?;
    }

    Ok(())
}

/// Apply one command. Returns whether the view changed.
async fn apply(command: BrowseCommand, handle: &SessionHandle, ctx: &Context) -> Result<bool> {
    let view = handle.snapshot();
    let pagination = view.pagination();

    let result = match command {
        BrowseCommand::Search(term) => handle.submit_term(term).await,
        BrowseCommand::Next if !pagination.has_next => {
            ctx.output.warn("Already on the last page");
            return Ok(false);
        }
        BrowseCommand::Prev if !pagination.has_prev => {
            ctx.output.warn("Already on the first page");
            return Ok(false);
        }
        BrowseCommand::Next => handle.set_page(view.query.page() + 1).await,
        BrowseCommand::Prev => handle.set_page(view.query.page() - 1).await,
        BrowseCommand::Page(page) => handle.set_page(page).await,
        BrowseCommand::Size(size) => handle.set_page_size(size).await,
        BrowseCommand::Retry => handle.retry().await,
        BrowseCommand::Quit => return Ok(false),
    };

    match result {
        Ok(()) => Ok(true),
        Err(SessionError::InvalidParameter(e)) => {
            ctx.output.warn(&e.to_string());
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Read one line without blocking the session.
async fn prompt() -> Result<String> {
    let line = tokio::task::spawn_blocking(|| {
        Input::<String>::new()
            .with_prompt("catalog")
            .allow_empty(true)
            .interact_text()
    })
    .await??;
    Ok(line)
}
