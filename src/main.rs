// Entry point and interactive story browser.
//
// - Option [1] loads the score table, metadata, notes and map boundaries.
// - Option [2] walks the four slides; each command changes the current
//   slide's selection and prints a preview of what it now shows.
// - Option [3] exits.
use sdg_story::config::Config;
use sdg_story::dataset::{load_boundaries, unmatched_regions, Assets};
use sdg_story::options::indicator_options;
use sdg_story::output;
use sdg_story::render::{Boundary, Rendered};
use sdg_story::slides::{Command, View};
use sdg_story::story::Story;
use sdg_story::types::{Boundaries, OptionItem};
use sdg_story::util::format_int;
use sdg_story::{DashboardError, Result};
use std::io::{self, Write};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` picks the level (default `sdg_story=info`); `LOG_FORMAT=json`
/// switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sdg_story=info"));
    let json = std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

struct Session {
    assets: Assets,
    boundaries: Option<Boundaries>,
}

fn handle_load(config: &Config) -> Option<Session> {
    let (assets, report) = match Assets::load(config.clone()) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %e, "failed to load assets");
            eprintln!("Failed to load data: {}\n", e);
            return None;
        }
    };
    println!(
        "Loaded {} score rows ({} skipped, {} missing cells), {} indicators, {} years.",
        format_int(report.loaded_rows),
        format_int(report.skipped_rows),
        format_int(report.missing_cells),
        format_int(assets.meta.len()),
        format_int(assets.data.year_options.len())
    );
    let boundaries = match load_boundaries(config) {
        Ok(b) => Some(b),
        Err(e) => {
            warn!(error = %e, "map boundaries unavailable");
            println!("Note: map boundaries not loaded; region matching is skipped.");
            None
        }
    };
    println!();
    Some(Session { assets, boundaries })
}

fn print_help() {
    println!("Commands:");
    println!("  n | p              next / previous slide");
    println!("  v <view>           chart, table, map or trends");
    println!("  y <year>           e.g. 2023-24 or 2024");
    println!("  r <a>[,<b>...]     region(s)");
    println!("  s <sdg>            e.g. SDG 3");
    println!("  i <indicator>      indicator name or SDG n~name");
    println!("  o                  list options for the current slide");
    println!("  e                  export current view as JSON and CSV");
    println!("  b                  back to the main menu\n");
}

fn parse_command(line: &str) -> Result<Command> {
    let (head, rest) = match line.split_once(' ') {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };
    let cmd = match head {
        "v" => Command::View(rest.parse::<View>()?),
        "y" => Command::Year(rest.replace('-', "–")),
        "r" => Command::Regions(
            rest.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        "s" => Command::Sdg(rest.to_string()),
        "i" => Command::Indicator(rest.to_string()),
        other => {
            return Err(DashboardError::UnknownOption {
                field: "command",
                value: other.to_string(),
            })
        }
    };
    Ok(cmd)
}

fn show(story: &Story, assets: &Assets) {
    let page = story.current();
    println!("\nSlide {}/{}: {}", story.position() + 1, story.len(), page.heading);
    println!("{}", page.narrative);
    println!("[{}]\n", page.slide.describe());
    println!("{}\n", output::preview(&story.render(assets), assets.config.preview_rows));
}

fn export_current(story: &Story, session: &Session) {
    let assets = &session.assets;
    let rendered = story.render(assets);
    let Rendered::Graph(spec) = &rendered else {
        println!("Nothing to export for the current selection.\n");
        return;
    };
    if let (Some(map), Some(bounds)) = (&spec.settings.map, &session.boundaries) {
        let geometry = match map.boundary {
            Boundary::Current => &bounds.current,
            Boundary::BeforeCutoff => &bounds.before_cutoff,
        };
        let column = spec.data_configuration.iter().find(|r| r.chart_config_id == "id");
        if let Some(column) = column {
            let missing = unmatched_regions(&spec.data, &column.column_id, geometry, map.map_property);
            if !missing.is_empty() {
                println!("Regions without a map shape: {}", missing.join(", "));
            }
        }
    }
    let slide = story.current().slide.as_ref();
    match output::export(&assets.config.output_dir, slide.index(), &slide.describe(), spec) {
        Ok(m) => {
            info!(graph = %m.graph_id, rows = m.rows, "exported");
            println!("Exported {} rows to {} and {}\n", format_int(m.rows), m.json.display(), m.csv.display());
        }
        Err(e) => {
            error!(error = %e, "export failed");
            eprintln!("Write error: {}\n", e);
        }
    }
}

fn print_slide_options(story: &Story, assets: &Assets) {
    let data = &assets.data;
    let slide = story.current().slide.as_ref();
    let views: Vec<OptionItem> = slide
        .views()
        .iter()
        .map(|v| OptionItem::new(v.as_str(), v.as_str()))
        .collect();
    output::print_options("Views", &views);
    output::print_options("Years", &data.year_options);
    if matches!(slide.index(), 2 | 3) {
        output::print_options("Regions", &data.region_options);
    }
    if slide.index() >= 3 {
        output::print_options("Goals", &data.sdg_options);
    }
    if slide.index() == 4 {
        for group in indicator_options(&assets.meta) {
            output::print_options(&group.label, &group.options);
        }
    }
}

fn browse(session: &Session) {
    let assets = &session.assets;
    let (mut story, pending) = Story::new(assets);
    for (page, req) in pending {
        story.resolve(page, req, assets);
    }
    print_help();
    show(&story, assets);
    loop {
        let Some(line) = prompt("> ") else { break };
        match line.as_str() {
            "" => continue,
            "b" => break,
            "h" | "?" => print_help(),
            "n" => {
                if story.next() {
                    show(&story, assets);
                } else {
                    println!("Already on the last slide.\n");
                }
            }
            "p" => {
                if story.previous() {
                    show(&story, assets);
                } else {
                    println!("Already on the first slide.\n");
                }
            }
            "o" => print_slide_options(&story, assets),
            "e" => export_current(&story, session),
            _ => match parse_command(&line).and_then(|cmd| story.apply(cmd, assets)) {
                Ok(req) => {
                    if let Some((page, req)) = req {
                        story.resolve(page, req, assets);
                    }
                    show(&story, assets);
                }
                Err(e) => println!("{}\n", e),
            },
        }
    }
}

fn main() {
    init_tracing();
    let config = Config::from_env();
    info!(data_dir = %config.data_dir.display(), "starting");
    let mut session: Option<Session> = None;
    loop {
        println!("SDG India Index story");
        println!("[1] Load data");
        println!("[2] Browse story");
        println!("[3] Exit\n");
        let Some(choice) = prompt("Enter choice: ") else { break };
        match choice.as_str() {
            "1" => {
                if let Some(s) = handle_load(&config) {
                    session = Some(s);
                }
            }
            "2" => match &session {
                Some(s) => browse(s),
                None => println!("Error: No data loaded. Please load the data first (option 1).\n"),
            },
            "3" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}
