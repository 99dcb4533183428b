use super::browse::print_page;
use super::AppContext;
use crate::output::{movie_table, movies_json, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use movie_browser_catalog::{CatalogApi, ImageResolver};
use movie_browser_core::{
    SearchController, SearchPhase, SearchSettings, SearchState, WatchlistStore,
};
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LiveCommand {
    /// New full contents of the search box.
    Edit(String),
    Dismiss,
    Focus,
    Select(usize),
    Add(usize),
    Submit,
    Quit,
}

fn parse_line(line: &str) -> Result<LiveCommand, String> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(LiveCommand::Edit(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let index = |arg: Option<&str>| -> Result<usize, String> {
        arg.and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| format!(":{} needs a result number starting at 1", name))
    };

    match name {
        "dismiss" => Ok(LiveCommand::Dismiss),
        "focus" => Ok(LiveCommand::Focus),
        "select" => index(parts.next()).map(LiveCommand::Select),
        "add" => index(parts.next()).map(LiveCommand::Add),
        "submit" => Ok(LiveCommand::Submit),
        "quit" | "q" => Ok(LiveCommand::Quit),
        other => Err(format!("Unknown command :{}", other)),
    }
}

pub async fn run_live(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create data directories: {}", e))?;
    let watchlist = ctx.open_watchlist();

    let settings = SearchSettings::from_config(&ctx.config.search, &ctx.config.catalog);
    let catalog: Arc<dyn CatalogApi> = ctx.catalog.clone();
    let controller = SearchController::new(catalog, settings);
    let mut states = controller.subscribe();

    output.info(format!(
        "Type to search (at least {} characters). \
         Commands: :dismiss :focus :select N :add N :submit :quit",
        controller.settings().min_query_chars
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed, leaving live search");
                    break;
                };
                match parse_line(&line) {
                    Ok(LiveCommand::Quit) => break,
                    Ok(command) => handle(command, &controller, &watchlist, &ctx, output).await,
                    Err(message) => output.warn(message),
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                render(&state, ctx.catalog.images(), output);
            }
        }
    }

    controller.shutdown();
    Ok(())
}

async fn handle(
    command: LiveCommand,
    controller: &SearchController,
    watchlist: &WatchlistStore,
    ctx: &AppContext,
    output: &Output,
) {
    match command {
        LiveCommand::Edit(text) => controller.input(&text),
        LiveCommand::Dismiss => controller.dismiss(),
        LiveCommand::Focus => controller.focus(),
        LiveCommand::Select(n) => {
            let Some(movie) = visible_result(controller, n, output) else {
                return;
            };
            let movie = controller.select(movie);
            output.success(format!(
                "Selected {} ({}). Run `reelscout detail {}` for details.",
                movie.name, movie.slug, movie.slug
            ));
        }
        LiveCommand::Add(n) => {
            let Some(movie) = visible_result(controller, n, output) else {
                return;
            };
            let name = movie.name.clone();
            watchlist.add(movie);
            output.success(format!("Added {} to the watchlist ({} saved)", name, watchlist.len()));
        }
        LiveCommand::Submit => {
            let Some(keyword) = controller.submit() else {
                output.warn("Nothing to search for");
                return;
            };
            match ctx.catalog.search(&keyword, 1).await {
                Ok(page) => {
                    let title = format!("Kết quả tìm kiếm: {}", keyword);
                    print_page(&title, &page, ctx.catalog.images(), output);
                }
                Err(e) => {
                    warn!("Full search for {} failed: {}", keyword, e);
                    output.error(format!("Search for '{}' failed: {}", keyword, e));
                }
            }
        }
        LiveCommand::Quit => {}
    }
}

fn visible_result(
    controller: &SearchController,
    n: usize,
    output: &Output,
) -> Option<movie_browser_models::MovieSummary> {
    let state = controller.state();
    if !state.is_visible {
        output.warn("No results are shown");
        return None;
    }
    let movie = state.results.get(n - 1).cloned();
    if movie.is_none() {
        output.warn(format!("No result #{} ({} shown)", n, state.results.len()));
    }
    movie
}

fn render(state: &SearchState, images: &ImageResolver, output: &Output) {
    if !output.is_human() {
        output.json(&json!({
            "type": "search_state",
            "query": state.query,
            "phase": format!("{:?}", state.phase),
            "is_loading": state.is_loading,
            "is_visible": state.is_visible,
            "results": movies_json(&state.results, images),
        }));
        return;
    }
    if output.is_quiet() {
        return;
    }

    match state.phase {
        SearchPhase::Idle => println!("{}", "(type at least a few characters)".dimmed()),
        SearchPhase::Pending => println!("{} {}", "…".dimmed(), state.query.trim().dimmed()),
        SearchPhase::Loading => println!("{} {}", "Searching".yellow(), state.query.trim()),
        SearchPhase::Hidden => println!("{}", "(results hidden, :focus to show)".dimmed()),
        SearchPhase::Shown => {
            if state.results.is_empty() {
                println!("{}", "No movies found".dimmed());
            } else {
                println!("{}", movie_table(&state.results));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_edits() {
        assert_eq!(parse_line("bat"), Ok(LiveCommand::Edit("bat".to_string())));
        assert_eq!(parse_line("  "), Ok(LiveCommand::Edit("  ".to_string())));
        assert_eq!(parse_line(""), Ok(LiveCommand::Edit(String::new())));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_line(":dismiss"), Ok(LiveCommand::Dismiss));
        assert_eq!(parse_line(":focus"), Ok(LiveCommand::Focus));
        assert_eq!(parse_line(":select 3"), Ok(LiveCommand::Select(3)));
        assert_eq!(parse_line(":add 1"), Ok(LiveCommand::Add(1)));
        assert_eq!(parse_line(":submit"), Ok(LiveCommand::Submit));
        assert_eq!(parse_line(":q"), Ok(LiveCommand::Quit));
    }

    #[test]
    fn test_bad_commands() {
        assert!(parse_line(":select").is_err());
        assert!(parse_line(":select 0").is_err());
        assert!(parse_line(":add two").is_err());
        assert!(parse_line(":rewind").is_err());
    }
}
