mod config;

use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args, Parser, Subcommand};
use itinerary::calendar::{ChangeSource, ScrollOrigin};
use itinerary::classify::DropDescriptor;
use itinerary::dates::{DateError, format_day, parse_iso};
use itinerary::doc::PartialItem;
use itinerary::engine::{Action, Planner};
use itinerary::seed;
use itinerary::snapshot::{Snapshot, SnapshotError};
use time::OffsetDateTime;
use tracing::Level;

use crate::config::{DEFAULT_STATE_PATH, SeedConfig};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no itinerary at {0}; run `itinerary init` first")]
    MissingState(PathBuf),
    #[error("{0} already exists; pass --force to overwrite")]
    StateExists(PathBuf),
    #[error("state file: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("invalid date: {0}")]
    Date(#[from] DateError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "itinerary", about = "Day-by-day trip planner with drag-and-drop boards")]
struct Cli {
    /// Where the planner state is kept.
    #[arg(long, env = "ITINERARY_STATE", default_value = DEFAULT_STATE_PATH)]
    state: PathBuf,

    /// Log mutations as they are applied.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a fresh demo itinerary.
    Init {
        /// First day of the trip (defaults to today).
        #[arg(long, env = "ITINERARY_START_DATE")]
        start: Option<String>,
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the timeline and templates.
    Show {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Board(BoardCommand),
    Template(TemplateCommand),
    Item(ItemCommand),
    /// Drag a board or item and drop it on a target. With no target the
    /// gesture is cancelled.
    Drag(DragArgs),
    /// Pick a day in the calendar; the first board moves to that day.
    Anchor { date: String },
    /// Scroll the timeline to a board position.
    Scroll { index: usize },
}

#[derive(Args, Debug)]
struct BoardCommand {
    #[command(subcommand)]
    command: BoardSubcommand,
}

#[derive(Subcommand, Debug)]
enum BoardSubcommand {
    /// Append an empty board after the last day.
    Add,
    /// Delete a board and its attractions.
    Remove { board_id: String },
    /// Move a board off the timeline into the templates.
    Evict { board_id: String },
    /// Set the hotel for a day; omit --name to clear it.
    Hotel {
        board_id: String,
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Args, Debug)]
struct TemplateCommand {
    #[command(subcommand)]
    command: TemplateSubcommand,
}

#[derive(Subcommand, Debug)]
enum TemplateSubcommand {
    List,
    /// Copy a template onto the end of the timeline.
    Use { template_id: String },
}

#[derive(Args, Debug)]
struct ItemCommand {
    #[command(subcommand)]
    command: ItemSubcommand,
}

#[derive(Subcommand, Debug)]
enum ItemSubcommand {
    Add {
        board_id: String,
        #[arg(long)]
        title: String,
        #[command(flatten)]
        details: ItemDetails,
    },
    Update {
        item_id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        details: ItemDetails,
        /// Raw JSON object of fields, merged under the flags.
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ItemDetails {
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    duration: Option<String>,
    #[arg(long)]
    timeline: Option<String>,
    #[arg(long)]
    time_of_day: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl ItemDetails {
    fn into_partial(self, base: PartialItem, title: Option<String>) -> PartialItem {
        PartialItem {
            image: self.image.or(base.image),
            title: title.or(base.title),
            duration: self.duration.or(base.duration),
            timeline: self.timeline.or(base.timeline),
            time_of_day: self.time_of_day.or(base.time_of_day),
            location: self.location.or(base.location),
            description: self.description.or(base.description),
        }
    }
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").args(["onto_board", "onto_item", "onto_container"])))]
struct DragArgs {
    /// Board or item id being dragged.
    entity_id: String,
    /// Board the item is dragged out of, as the view saw it.
    #[arg(long = "from")]
    from: Option<String>,
    #[arg(long)]
    onto_board: Option<String>,
    #[arg(long)]
    onto_item: Option<String>,
    #[arg(long)]
    onto_container: Option<String>,
}

impl DragArgs {
    fn target(&self) -> Option<DropDescriptor> {
        if let Some(id) = &self.onto_board {
            return Some(DropDescriptor::Board(id.clone()));
        }
        if let Some(id) = &self.onto_item {
            return Some(DropDescriptor::Item(id.clone()));
        }
        self.onto_container.clone().map(DropDescriptor::Container)
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();

    match cli.command {
        Command::Init { start, force } => run_init(&cli.state, start.as_deref(), force),
        Command::Show { json } => run_show(&cli.state, json),
        command => {
            let mut planner = Planner::from_snapshot(load(&cli.state)?);
            let actions = run_command(&mut planner, command)?;
            report(&actions);
            if actions.iter().any(changes_state) {
                planner.snapshot().save(&cli.state)?;
            }
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<Snapshot, CliError> {
    if !path.exists() {
        return Err(CliError::MissingState(path.to_owned()));
    }
    Ok(Snapshot::load(path)?)
}

fn run_init(path: &Path, start: Option<&str>, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::StateExists(path.to_owned()));
    }
    let start = match start {
        Some(text) => parse_iso(text)?,
        None => OffsetDateTime::now_utc().date().midnight().assume_utc(),
    };
    let config = SeedConfig::from_env();
    seed::demo_with(start, config.boards).save(path)?;
    println!("wrote {} boards starting {} to {}", config.boards, format_day(start), path.display());
    Ok(())
}

fn run_show(path: &Path, json: bool) -> Result<(), CliError> {
    let snapshot = load(path)?;
    if json {
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }
    let doc = &snapshot.entities;
    for (index, board) in doc.boards().enumerate() {
        let hotel = board.hotel_name.as_deref().map(|h| format!("  @ {h}")).unwrap_or_default();
        println!("{index:>3}  {}  {}  [{}]{hotel}", format_day(board.date), board.title, board.id);
        for item in doc.items_of(&board.id) {
            println!("       - {} ({})", item.title, item.id);
        }
    }
    if !snapshot.templates.is_empty() {
        println!("templates:");
        for template in snapshot.templates.iter() {
            println!("       {}  [{}]  {} items", template.title, template.id, template.items.len());
        }
    }
    Ok(())
}

fn run_command(planner: &mut Planner, command: Command) -> Result<Vec<Action>, CliError> {
    let actions = match command {
        Command::Init { .. } | Command::Show { .. } => Vec::new(),
        Command::Board(board) => match board.command {
            BoardSubcommand::Add => planner.add_empty_board(),
            BoardSubcommand::Remove { board_id } => planner.remove_board(&board_id),
            BoardSubcommand::Evict { board_id } => planner.evict_board(&board_id),
            BoardSubcommand::Hotel { board_id, name } => planner.set_hotel_name(&board_id, name),
        },
        Command::Template(template) => match template.command {
            TemplateSubcommand::List => {
                for template in planner.templates().iter() {
                    println!("{}\t{}", template.id, template.title);
                }
                Vec::new()
            }
            TemplateSubcommand::Use { template_id } => planner.clone_template(&template_id),
        },
        Command::Item(item) => match item.command {
            ItemSubcommand::Add { board_id, title, details } => {
                planner.add_item(&board_id, &details.into_partial(PartialItem::default(), Some(title)))
            }
            ItemSubcommand::Update { item_id, title, details, data } => {
                let base = match data {
                    Some(text) => serde_json::from_str::<PartialItem>(&text)?,
                    None => PartialItem::default(),
                };
                planner.update_item(&item_id, &details.into_partial(base, title))
            }
        },
        Command::Drag(drag) => {
            let target = drag.target();
            planner.drag_start(&drag.entity_id, drag.from);
            planner.drag_end(target.as_ref())
        }
        Command::Anchor { date } => planner.select_date(&date, ChangeSource::Calendar)?,
        Command::Scroll { index } => planner.scroll_timeline(index, ScrollOrigin::User),
    };
    Ok(actions)
}

/// Whether an action reflects a change to the persisted stores.
fn changes_state(action: &Action) -> bool {
    !matches!(
        action,
        Action::RenderNeeded
            | Action::ScrollTimelineTo { .. }
            | Action::ScrollCalendarTo { .. }
            | Action::CalendarMonthChanged { .. }
    )
}

fn report(actions: &[Action]) {
    let lines: Vec<String> = actions.iter().filter_map(describe).collect();
    if lines.is_empty() {
        eprintln!("no change");
    }
    for line in lines {
        println!("{line}");
    }
}

fn describe(action: &Action) -> Option<String> {
    let line = match action {
        Action::BoardsReordered => "boards reordered".to_owned(),
        Action::BoardItemsChanged { board_id } => format!("items changed on {board_id}"),
        Action::BoardChanged { board_id } => format!("board {board_id} updated"),
        Action::BoardAdded { board_id } => format!("board added: {board_id}"),
        Action::BoardRemoved { board_id } => format!("board removed: {board_id}"),
        Action::ItemChanged { item_id } => format!("item {item_id} updated"),
        Action::TemplatesChanged => "templates changed".to_owned(),
        Action::DatesChanged => "dates re-derived".to_owned(),
        Action::ScrollTimelineTo { index } => format!("timeline -> board {index}"),
        Action::ScrollCalendarTo { date } => format!("calendar -> {}", format_day(*date)),
        Action::CalendarMonthChanged { month } => {
            let (year, name) = month.year_month();
            format!("calendar shows {name} {year}")
        }
        Action::RenderNeeded => return None,
    };
    Some(line)
}
