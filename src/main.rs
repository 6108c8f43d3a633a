//! textbuf - inspect and edit text with line/column coordinates.
//!
//! # Usage
//!
//! ```bash
//! textbuf demo
//! printf 'Hello\nWorld' | textbuf find World
//! textbuf --text 'aaa' --json replace-all aa b
//! ```

use std::fmt::Display;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use serde_json::{Value, json};

use textbuf::buffer::{Position, Range};
use textbuf::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use textbuf::perf;
use textbuf::session::{Change, EditKind, Session};

/// Inspect and edit text with line/column coordinates
#[derive(Parser, Debug)]
#[command(name = "textbuf", version, about, long_about = None)]
struct Cli {
    /// Document text (read from stdin when omitted)
    #[arg(long, global = true)]
    text: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print timing for each operation to stderr
    #[arg(long, global = true)]
    perf: bool,

    /// Append one line per edit to a log file
    #[arg(long, global = true, value_name = "PATH")]
    edit_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through the basic editing operations on a sample document
    Demo,
    /// Print the document text
    Text,
    /// Print the number of lines
    Lines,
    /// Print one line
    Line {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Print the range spanning one line, including its newline
    LineRange {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Convert a position to a linear offset
    Offset {
        #[arg(allow_negative_numbers = true)]
        line: i64,
        #[arg(allow_negative_numbers = true)]
        column: i64,
    },
    /// Convert a linear offset to a position
    Position {
        #[arg(allow_negative_numbers = true)]
        offset: i64,
    },
    /// Find the first occurrence of a string
    Find { query: String },
    /// Replace every non-overlapping occurrence of a string
    ReplaceAll { query: String, replacement: String },
    /// Insert text at a position
    Insert {
        #[arg(allow_negative_numbers = true)]
        line: i64,
        #[arg(allow_negative_numbers = true)]
        column: i64,
        #[arg(value_name = "TEXT")]
        content: String,
    },
    /// Delete the text between two positions
    Delete {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Replace the text between two positions
    Replace {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(value_name = "TEXT")]
        content: String,
    },
}

#[derive(clap::Args, Debug)]
struct RangeArgs {
    #[arg(allow_negative_numbers = true)]
    start_line: i64,
    #[arg(allow_negative_numbers = true)]
    start_column: i64,
    #[arg(allow_negative_numbers = true)]
    end_line: i64,
    #[arg(allow_negative_numbers = true)]
    end_column: i64,
}

impl Command {
    /// Name of the timing scope around this command's buffer operation.
    const fn scope_name(&self) -> &'static str {
        match self {
            Self::Demo => "op.demo",
            Self::Text => "op.text",
            Self::Lines => "op.lines",
            Self::Line { .. } => "op.line",
            Self::LineRange { .. } => "op.line_range",
            Self::Offset { .. } => "op.position_to_offset",
            Self::Position { .. } => "op.offset_to_position",
            Self::Find { .. } => "op.find_first",
            Self::ReplaceAll { .. } => "op.replace_all",
            Self::Insert { .. } => "op.insert",
            Self::Delete { .. } => "op.delete_range",
            Self::Replace { .. } => "op.replace_range",
        }
    }
}

impl From<&RangeArgs> for Range {
    fn from(args: &RangeArgs) -> Self {
        Self::new(
            Position::new(args.start_line, args.start_column),
            Position::new(args.end_line, args.end_column),
        )
    }
}

fn read_document(text: Option<&str>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read document from stdin")?;
    Ok(input)
}

fn emit(json: bool, plain: impl Display, value: &Value) -> Result<()> {
    let _scope = perf::scope("output");
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{plain}");
    }
    Ok(())
}

fn describe(change: &Change) -> String {
    match change.kind {
        EditKind::Insert { at } => format!("{} at {at}", change.revision),
        EditKind::Delete { range } | EditKind::Replace { range } => {
            format!("{} over {range}", change.revision)
        }
        EditKind::ReplaceAll { count } => format!("{} count {count}", change.revision),
        EditKind::SetText => change.revision.to_string(),
    }
}

const fn kind_name(kind: &EditKind) -> &'static str {
    match kind {
        EditKind::Insert { .. } => "insert",
        EditKind::Delete { .. } => "delete",
        EditKind::Replace { .. } => "replace",
        EditKind::ReplaceAll { .. } => "replace_all",
        EditKind::SetText => "set_text",
    }
}

fn run(command: &Command, session: &mut Session, json: bool) -> Result<()> {
    let _scope = perf::scope(command.scope_name());
    match command {
        Command::Demo => run_demo(session),
        Command::Text => {
            let text = session.text();
            emit(json, &text, &json!({ "text": text }))
        }
        Command::Lines => {
            let count = session.line_count();
            emit(json, count, &json!({ "lines": count }))
        }
        Command::Line { index } => {
            let line = session.buffer().line(*index)?;
            emit(json, &line, &json!({ "line": index, "text": line }))
        }
        Command::LineRange { index } => {
            let range = session.buffer().line_range(*index)?;
            emit(json, range, &serde_json::to_value(range)?)
        }
        Command::Offset { line, column } => {
            let offset = session
                .buffer()
                .position_to_offset(Position::new(*line, *column));
            emit(json, offset, &json!({ "offset": offset }))
        }
        Command::Position { offset } => {
            let pos = session.buffer().offset_to_position(*offset);
            emit(json, pos, &serde_json::to_value(pos)?)
        }
        Command::Find { query } => match session.buffer().find_first(query) {
            Some(range) => emit(json, range, &serde_json::to_value(range)?),
            None => emit(json, "no match", &Value::Null),
        },
        Command::ReplaceAll { query, replacement } => {
            let count = session.replace_all(query, replacement);
            let text = session.text();
            emit(
                json,
                format!("{count} replaced\n{text}"),
                &json!({ "count": count, "text": text, "revision": session.revision().0 }),
            )
        }
        Command::Insert {
            line,
            column,
            content,
        } => {
            session.insert(Position::new(*line, *column), content);
            emit_edit(session, json)
        }
        Command::Delete { range } => {
            session.delete_range(range.into());
            emit_edit(session, json)
        }
        Command::Replace { range, content } => {
            session.replace_range(range.into(), content);
            emit_edit(session, json)
        }
    }
}

fn emit_edit(session: &Session, json: bool) -> Result<()> {
    let text = session.text();
    emit(
        json,
        &text,
        &json!({ "text": text, "revision": session.revision().0 }),
    )
}

fn log_section(title: &str) {
    println!("\n=== {title} ===");
}

fn run_demo(session: &mut Session) -> Result<()> {
    session.set_text("Hello\nWorld");

    log_section("Initial text");
    println!("{}", session.text());
    println!("lines: {}", session.line_count());
    println!("line 0: {}", session.buffer().line(0)?);

    log_section("Insert ', TS' at the end of line 0");
    let column = i64::try_from(session.buffer().line_len(0))?;
    session.insert(Position::new(0, column), ", TS");
    println!("{}", session.text());

    log_section("Find 'World'");
    let found = session.buffer().find_first("World");
    match found {
        Some(range) => println!("{range}"),
        None => println!("no match"),
    }

    if let Some(range) = found {
        log_section("Replace 'World' -> 'TypeScript'");
        session.replace_range(range, "TypeScript");
        println!("{}", session.text());
    }

    log_section("Position <-> offset");
    let pos = Position::new(1, 4);
    let offset = session.buffer().position_to_offset(pos);
    println!("position {pos} -> offset {offset}");
    println!(
        "offset {offset} -> position {}",
        session.buffer().offset_to_position(i64::try_from(offset)?)
    );
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let config_scope = perf::scope("config");
    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    drop(config_scope);
    if let Some(path) = effective.edit_log.as_deref() {
        if let Err(err) = perf::set_edit_log_path(Some(path)) {
            tracing::warn!(path = %path.display(), %err, "failed to open edit log");
        }
    }

    let Some(command) = cli.command.as_ref() else {
        if !(cli.save || cli.clear) {
            Cli::command().print_help()?;
        }
        return Ok(());
    };

    let text = if matches!(command, Command::Demo) {
        String::new()
    } else {
        let _scope = perf::scope("read_document");
        read_document(cli.text.as_deref())?
    };
    let mut session = {
        let _scope = perf::scope("load_buffer");
        Session::from_text(&text)
    };
    session.subscribe(|change| perf::log_event(kind_name(&change.kind), describe(change)));

    run(command, &mut session, effective.json)
}
