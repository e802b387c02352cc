use std::cell::RefCell;
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Mutex;

use arboard::Clipboard;
use clap::{Parser, ValueEnum};
use ratatui::{
    Frame,
    crossterm::event::{DisableMouseCapture, EnableMouseCapture},
    crossterm::execute,
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
};
use tracing::{debug, error, info, trace};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, prelude::*};

mod controller;
mod demo;

use controller::{Controller, Message};
use datagrid::{DataGridError, Font, SizingPolicy, TableOptions, TableView};
use demo::{Person, generate_people, load_words, person_row_model, records_as_csv};

const HELP_TEXT: &str = " q quit | y copy | +/- font | h header | p policy | r regenerate ";
const MIN_FONT_SIZE: u32 = 6;
const MAX_FONT_SIZE: u32 = 48;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    None,
    FitsRows,
    Fixed,
}

impl From<Policy> for SizingPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::None => SizingPolicy::None,
            Policy::FitsRows => SizingPolicy::FitsRows,
            Policy::Fixed => SizingPolicy::Fixed,
        }
    }
}

/// Browse generated records in a terminal table.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Word list used to generate names and cities (one word per line).
    #[arg(long)]
    words: Option<String>,

    /// Number of records to generate.
    #[arg(long, default_value_t = 200)]
    rows: usize,

    /// Rows reserved by the fits-rows and fixed sizing policies.
    #[arg(long, default_value_t = 15)]
    max_visible_rows: usize,

    #[arg(long, value_enum, default_value_t = Policy::None)]
    policy: Policy,

    /// Column width weights, e.g. `0.3,0.2`.
    #[arg(long, value_delimiter = ',')]
    weights: Vec<f64>,

    #[arg(long, default_value_t = 12)]
    font_size: u32,

    #[arg(long)]
    hide_header: bool,

    #[arg(long, default_value = "datagrid.log")]
    log_file: String,

    /// Milliseconds to wait for terminal events per frame.
    #[arg(long, default_value_t = 100)]
    event_poll_time: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = run(args);
    ratatui::restore();
    match result {
        Err(e) => {
            error!("Exiting with error: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand_path(path: &str) -> Result<PathBuf, DataGridError> {
    shellexpand::full(path)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| DataGridError::InvalidPath(e.to_string()))
}

fn init_logging(path: &Path) -> Result<(), DataGridError> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

struct App {
    table: TableView<Person>,
    words: Vec<String>,
    rows: usize,
    status: Rc<RefCell<String>>,
    clipboard: Option<Clipboard>,
    quit: bool,
}

impl App {
    fn update(&mut self, message: Message) {
        match message {
            Message::Quit => self.quit = true,
            Message::CopySelection => self.copy_selection(),
            Message::FontBigger => self.resize_font(2),
            Message::FontSmaller => self.resize_font(-2),
            Message::ToggleHeader => {
                let visible = self.table.is_header_visible();
                self.table.set_header_visible(!visible);
            }
            Message::CyclePolicy => {
                let next = match self.table.vertical_size_policy() {
                    SizingPolicy::None => SizingPolicy::FitsRows,
                    SizingPolicy::FitsRows => SizingPolicy::Fixed,
                    SizingPolicy::Fixed => SizingPolicy::None,
                };
                self.set_status(format!("Sizing policy {next:?}"));
                self.table.set_vertical_size_policy(next);
            }
            Message::Regenerate => {
                let people = generate_people(&self.words, self.rows, &mut rand::rng());
                self.table.set_data(people);
                self.set_status(format!("Generated {} records", self.rows));
            }
            Message::Table(key) => {
                self.table.handle_key(key);
            }
            Message::Pointer(mouse) => {
                self.table.handle_mouse(mouse);
            }
            Message::Resize => trace!("Terminal resized"),
        }
    }

    fn set_status(&self, message: impl Into<String>) {
        *self.status.borrow_mut() = message.into();
    }

    fn resize_font(&mut self, delta: i32) {
        let mut font = self.table.font().clone();
        font.size = font
            .size
            .saturating_add_signed(delta)
            .clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.set_status(format!("Font size {}", font.size));
        self.table.set_font(font);
    }

    fn copy_selection(&mut self) {
        let records = self.table.selected_records();
        if records.is_empty() {
            self.set_status("Nothing selected");
            return;
        }
        let content = records_as_csv(self.table.model().row_model(), &records);
        let result = match self.clipboard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(content)
                .map_err(|e| DataGridError::Clipboard(e.to_string())),
            None => Err(DataGridError::Clipboard("no clipboard available".to_string())),
        };
        match result {
            Ok(_) => {
                trace!("Copied {} records to clipboard.", records.len());
                self.set_status(format!("Copied {} records", records.len()));
            }
            Err(e) => {
                trace!("Error copying to clipboard: {:?}", e);
                self.set_status(e.to_string());
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let geometry = self.table.cell_geometry();
        let table_constraint = match self.table.vertical_size_policy() {
            SizingPolicy::None => Constraint::Fill(1),
            _ => {
                let body = self.table.preferred_viewport_size().height;
                let body_lines = if body == 0 { 0 } else { geometry.lines_for(body) };
                let header_lines = if self.table.is_header_visible() {
                    geometry.lines_for(self.table.header_height())
                } else {
                    0
                };
                Constraint::Length(body_lines + header_lines)
            }
        };
        let [table_area, _, status_area] = Layout::vertical([
            table_constraint,
            Constraint::Fill(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(&mut self.table, table_area);

        let status = Line::from(vec![
            self.status.borrow().clone().yellow(),
            "  ".into(),
            HELP_TEXT.blue().bold(),
        ]);
        frame.render_widget(status, status_area);
    }
}

fn run(args: Args) -> Result<(), DataGridError> {
    init_logging(&expand_path(&args.log_file)?)?;
    info!("Starting datagrid demo with {args:?}");

    let words = match args.words.as_deref() {
        Some(path) => load_words(Some(&expand_path(path)?))?,
        None => load_words(None)?,
    };
    let people = generate_people(&words, args.rows, &mut rand::rng());

    let options = TableOptions::default()
        .with_max_visible_rows(args.max_visible_rows)
        .with_sizing_policy(args.policy.into())
        .with_column_weights(args.weights.clone())
        .with_font(Font::new("monospace", args.font_size))
        .with_hide_header(args.hide_header);
    let mut table = TableView::with_row_model(person_row_model(), options);
    table.set_data(people);

    let status = Rc::new(RefCell::new(format!("{} records", args.rows)));
    let sink = status.clone();
    table.add_selection_listener(move |event| {
        let names: Vec<&str> = event.records.iter().map(|p| p.name.as_str()).collect();
        *sink.borrow_mut() = match names.as_slice() {
            [] => "Nothing selected".to_string(),
            [one] => format!("Row {}: {one}", event.rows[0] + 1),
            _ => format!("{} rows selected", names.len()),
        };
    });

    let clipboard = match Clipboard::new() {
        Ok(clipboard) => Some(clipboard),
        Err(e) => {
            debug!("Clipboard unavailable: {e:?}");
            None
        }
    };

    let mut app = App {
        table,
        words,
        rows: args.rows,
        status,
        clipboard,
        quit: false,
    };
    let controller = Controller::new(args.event_poll_time);

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    while !app.quit {
        app.table.dispatch_pending();
        terminal.draw(|frame| app.draw(frame))?;

        if let Some(message) = controller.handle_event()? {
            app.update(message);
        }
    }

    execute!(stdout(), DisableMouseCapture)?;
    info!("Quitting datagrid demo");
    Ok(())
}
