use super::{catalog_failure, AppContext};
use crate::output::Output;
use crate::WatchlistCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use movie_browser_catalog::CatalogApi;
use movie_browser_config::PathManager;
use movie_browser_core::WatchlistStore;
use serde_json::json;
use tracing::info;

pub async fn run_watchlist(cmd: WatchlistCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create data directories: {}", e))?;
    let watchlist = ctx.open_watchlist();

    match cmd {
        WatchlistCommands::List => {
            list(&watchlist, &ctx, output);
            Ok(())
        }
        WatchlistCommands::Add { slug } => add(&watchlist, &ctx, &slug, output).await,
        WatchlistCommands::Remove { id } => {
            remove(&watchlist, &id, output);
            Ok(())
        }
        WatchlistCommands::Clear => {
            clear(&watchlist, &ctx.paths, output);
            Ok(())
        }
    }
}

fn list(watchlist: &WatchlistStore, ctx: &AppContext, output: &Output) {
    let entries = watchlist.snapshot();
    let title = format!("Watchlist ({} movies)", entries.len());
    output.movies(&title, &entries, ctx.catalog.images());
}

async fn add(
    watchlist: &WatchlistStore,
    ctx: &AppContext,
    slug: &str,
    output: &Output,
) -> Result<()> {
    let detail = ctx
        .catalog
        .get_detail(slug)
        .await
        .map_err(|e| catalog_failure(&format!("Failed to look up {}", slug), e))?;
    let movie = detail.summary();

    if watchlist.contains(&movie.id) {
        output.info(format!("{} is already in the watchlist", movie.name));
        return Ok(());
    }

    info!("Adding {} ({}) to watchlist", movie.slug, movie.id);
    let name = movie.name.clone();
    let id = movie.id.clone();
    watchlist.add(movie);
    if output.is_human() {
        output.success(format!("Added {} to the watchlist", name));
    } else {
        output.json(&json!({ "type": "success", "added": id }));
    }
    Ok(())
}

fn remove(watchlist: &WatchlistStore, id: &str, output: &Output) {
    if !watchlist.contains(id) {
        output.warn(format!("No movie with id {} in the watchlist", id));
        return;
    }
    watchlist.remove(id);
    output.success(format!("Removed {} from the watchlist", id));
}

fn clear(watchlist: &WatchlistStore, paths: &PathManager, output: &Output) {
    let removed = watchlist.clear();
    if removed == 0 {
        output.info("Watchlist is already empty");
        return;
    }
    output.success(format!(
        "Removed {} movies from the watchlist ({}.json in {})",
        removed,
        watchlist.storage_key(),
        paths.storage_dir().display()
    ));
}
