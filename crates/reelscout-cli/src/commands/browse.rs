use super::{catalog_failure, AppContext};
use crate::output::{display_year, movie_json, movies_json, Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use movie_browser_catalog::{category_display_name, CatalogApi, ImageResolver};
use movie_browser_core::{page_window, similar_movies, MAX_VISIBLE_PAGES, SIMILAR_MOVIES_LIMIT};
use movie_browser_models::{Episode, MovieDetail, MovieSummary, PagedResult};
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::info;

pub async fn run_home(page: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let result = ctx
        .catalog
        .list_new(page)
        .await
        .map_err(|e| catalog_failure("Failed to load new releases", e))?;
    info!("Loaded {} new releases (page {})", result.items.len(), page);
    print_page("Phim mới cập nhật", &result, ctx.catalog.images(), output);
    Ok(())
}

pub async fn run_category(slug: &str, page: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let result = ctx
        .catalog
        .list_by_category(slug, page)
        .await
        .map_err(|e| catalog_failure(&format!("Failed to load category {}", slug), e))?;
    print_page(category_display_name(slug), &result, ctx.catalog.images(), output);
    Ok(())
}

pub async fn run_search(keyword: &str, page: u32, output: &Output) -> Result<()> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(eyre!("Search keyword must not be empty"));
    }

    let ctx = AppContext::load()?;
    let result = ctx
        .catalog
        .search(keyword, page)
        .await
        .map_err(|e| catalog_failure(&format!("Search for '{}' failed", keyword), e))?;
    let title = format!("Kết quả tìm kiếm: {}", keyword);
    print_page(&title, &result, ctx.catalog.images(), output);
    Ok(())
}

pub async fn run_detail(
    slug: &str,
    similar: bool,
    episode: Option<usize>,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    let detail = ctx
        .catalog
        .get_detail(slug)
        .await
        .map_err(|e| catalog_failure(&format!("Failed to load movie {}", slug), e))?;

    if let Some(number) = episode {
        let chosen = pick_episode(&detail, number)?;
        if output.is_human() {
            output.info(format!("{} - {}", detail.summary.name, episode_label(number, chosen)));
            output.info(episode_link(chosen));
        } else {
            output.json(&json!({
                "movie": detail.summary.slug,
                "number": number,
                "episode": chosen,
            }));
        }
        return Ok(());
    }

    let watchlist = ctx.open_watchlist();
    let saved = watchlist.contains(detail.id());

    let similar_list = match (similar, detail.primary_category()) {
        (true, Some(category)) => {
            similar_movies(ctx.catalog.as_ref(), category, detail.id(), SIMILAR_MOVIES_LIMIT)
                .await
                .map_err(|e| catalog_failure("Failed to load similar movies", e))?
        }
        (true, None) => {
            output.warn("Movie has no category; similar movies unavailable");
            Vec::new()
        }
        (false, _) => Vec::new(),
    };

    let images = ctx.catalog.images();
    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            print_detail(&detail, saved, images);
            if similar {
                println!();
                output.movies("Phim tương tự", &similar_list, images);
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let mut value = json!({
                "movie": detail_json(&detail, images),
                "in_watchlist": saved,
            });
            if similar {
                value["similar"] = movies_json(&similar_list, images);
            }
            output.json(&value);
        }
    }
    Ok(())
}

pub(crate) fn print_page(
    title: &str,
    result: &PagedResult<MovieSummary>,
    images: &ImageResolver,
    output: &Output,
) {
    let current = result.current_page();
    let total = result.total_pages();
    match output.format() {
        OutputFormat::Human => {
            output.movies(title, &result.items, images);
            if output.is_quiet() {
                return;
            }
            println!("{}", page_indicator(current, total));
            let pages: Vec<String> = page_window(current, total, MAX_VISIBLE_PAGES)
                .map(|page| {
                    if page == current {
                        format!("[{}]", page).bold().to_string()
                    } else {
                        page.to_string()
                    }
                })
                .collect();
            if !pages.is_empty() {
                println!("{}", pages.join(" ").dimmed());
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "title": title,
                "movies": movies_json(&result.items, images),
                "page": current,
                "total_pages": total,
                "total_items": result.pagination.map(|p| p.total_items),
            }));
        }
    }
}

pub fn page_indicator(current: u32, total: u32) -> String {
    format!("Page {} / {}", current, total)
}

fn print_detail(detail: &MovieDetail, saved: bool, images: &ImageResolver) {
    let summary = &detail.summary;
    println!("{}", summary.name.bright_cyan().bold());
    if !summary.original_name.is_empty() {
        println!("{}", summary.original_name.dimmed());
    }
    println!();

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Field").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
    ]);
    let names = |taxa: &[movie_browser_models::Taxon]| {
        taxa.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
    };
    let rows: Vec<(&str, String)> = vec![
        ("ID", summary.id.clone()),
        ("Slug", summary.slug.clone()),
        ("Year", display_year(summary.year)),
        ("Status", detail.status.clone()),
        ("Episode", detail.episode_current.clone()),
        ("Runtime", detail.time.clone()),
        ("Quality", detail.quality.clone()),
        ("Language", detail.lang.clone()),
        ("Category", names(&detail.category)),
        ("Country", names(&detail.country)),
        ("Director", detail.director.join(", ")),
        ("Cast", detail.actor.join(", ")),
        ("Episodes", detail.primary_episodes().len().to_string()),
        ("Poster", images.resolve(&summary.poster_url)),
        ("Watchlist", if saved { "✓ saved".to_string() } else { "-".to_string() }),
    ];
    for (field, value) in rows {
        if value.is_empty() {
            continue;
        }
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);

    let episodes = detail.primary_episodes();
    if !episodes.is_empty() {
        println!();
        let server = detail.episodes.first().map(|s| s.server_name.as_str()).unwrap_or_default();
        println!("{} {}", "Episodes".bold(), server.dimmed());
        println!("{}", episode_table(episodes));
    }

    let synopsis = strip_html(&detail.content);
    if !synopsis.is_empty() {
        println!();
        println!("{}", synopsis);
    }
}

fn detail_json(detail: &MovieDetail, images: &ImageResolver) -> serde_json::Value {
    let mut value = movie_json(&detail.summary, images);
    value["content"] = json!(strip_html(&detail.content));
    value["status"] = json!(detail.status);
    value["time"] = json!(detail.time);
    value["episode_current"] = json!(detail.episode_current);
    value["quality"] = json!(detail.quality);
    value["lang"] = json!(detail.lang);
    value["actor"] = json!(detail.actor);
    value["director"] = json!(detail.director);
    value["category"] = json!(detail.category);
    value["country"] = json!(detail.country);
    value["episodes"] = json!(detail.primary_episodes());
    value
}

/// Episode `number` (1-based) of the first server.
fn pick_episode(detail: &MovieDetail, number: usize) -> Result<&Episode> {
    let episodes = detail.primary_episodes();
    number
        .checked_sub(1)
        .and_then(|index| episodes.get(index))
        .ok_or_else(|| {
            eyre!(
                "{} has {} episodes; episode {} does not exist",
                detail.summary.slug,
                episodes.len(),
                number
            )
        })
}

fn episode_label(number: usize, episode: &Episode) -> String {
    if episode.name.is_empty() {
        format!("Tập {}", number)
    } else {
        format!("Tập {}", episode.name)
    }
}

/// Embedded player link, or the raw HLS stream when there is no embed.
fn episode_link(episode: &Episode) -> &str {
    if episode.link_embed.is_empty() {
        &episode.link_m3u8
    } else {
        &episode.link_embed
    }
}

fn episode_table(episodes: &[Episode]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Episode").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Slug").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Link").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for (index, episode) in episodes.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(episode_label(index + 1, episode)),
            Cell::new(&episode.slug),
            Cell::new(episode_link(episode)),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

/// The synopsis arrives as HTML; drop the tags for terminal output.
fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ").trim().to_string()
}
