use clap::ValueEnum;
use comfy_table::{Cell, Table};
use movie_browser_catalog::ImageResolver;
use movie_browser_models::MovieSummary;
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "success",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors should always be shown, even in quiet mode
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", "✗".red(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "error",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{}", msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "info",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "⚠".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "warning",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }

    /// Print a list of movies as a table, or as JSON with resolved image URLs.
    pub fn movies(&self, title: &str, movies: &[MovieSummary], images: &ImageResolver) {
        match self.format {
            OutputFormat::Human => {
                if self.quiet {
                    return;
                }
                println!("{}", title.bold());
                if movies.is_empty() {
                    println!("{}", "No movies found".dimmed());
                    return;
                }
                println!("{}", movie_table(movies));
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.json(&json!({
                    "title": title,
                    "movies": movies_json(movies, images),
                }));
            }
        }
    }
}

pub fn movie_table(movies: &[MovieSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Name").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Original name").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Year").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Slug").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("ID").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for (index, movie) in movies.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&movie.name),
            Cell::new(&movie.original_name),
            Cell::new(display_year(movie.year)),
            Cell::new(&movie.slug),
            Cell::new(&movie.id),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn movies_json(movies: &[MovieSummary], images: &ImageResolver) -> serde_json::Value {
    serde_json::Value::Array(movies.iter().map(|movie| movie_json(movie, images)).collect())
}

pub fn movie_json(movie: &MovieSummary, images: &ImageResolver) -> serde_json::Value {
    json!({
        "id": movie.id,
        "name": movie.name,
        "original_name": movie.original_name,
        "slug": movie.slug,
        "year": movie.year,
        "thumbnail_url": images.resolve(&movie.thumbnail_url),
        "poster_url": images.resolve(&movie.poster_url),
    })
}

pub fn display_year(year: u32) -> String {
    if year == 0 {
        "-".to_string()
    } else {
        year.to_string()
    }
}
