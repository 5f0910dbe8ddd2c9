use crate::loader::ParseWarning;
use crate::timetable::{Entry, Placement, Timetable};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::settings::Style;
use tabled::Tabled;

mod loader;
mod session;
mod time;
mod timetable;

#[derive(Parser)]
struct Args {
    /// Path to the session request file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.txt")]
    requests: PathBuf,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "#")]
    index: usize,
    subject: String,
    instructor: String,
    #[tabled(rename = "min")]
    duration: u64,
    status: String,
}

#[derive(Tabled)]
struct BookingRow {
    instructor: String,
    slots: String,
}

fn paginate(content: String) {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())
        .expect("Failed to spawn pager");

    let mut stdin = pager.stdin.take().expect("Failed to open stdin for pager");

    if let Err(e) = stdin.write_all(content.as_bytes()) {
        // Broken pipe is common if the user quits the pager early
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("Error writing to pager: {}", e);
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn print_table<R: Tabled>(rows: Vec<R>) {
    let mut table = tabled::Table::new(&rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn report_load(timetable: &Timetable, warnings: &[ParseWarning]) {
    for warning in warnings {
        println!("{}", warning.to_string().red());
    }
    if timetable.requests.is_empty() {
        println!("{}", "No valid session requests found.".yellow());
    } else {
        println!(
            "Loaded {} session requests ({} lines skipped).",
            timetable.requests.len(),
            warnings.len()
        );
    }
}

fn print_agenda(timetable: &Timetable) {
    if timetable.entries.is_empty() {
        println!("Agenda is empty.");
        return;
    }
    for entry in &timetable.entries {
        match entry {
            Entry::DayHeader(_) => println!("{}", entry.to_string().bold()),
            Entry::StaffMeeting => println!("{}", entry.to_string().dimmed()),
            Entry::Session { .. } => println!("{}", entry),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    println!("Rota online. Reading requests from {}", args.requests.display());

    let path = args.requests.to_str().unwrap();
    let (mut timetable, warnings) = Timetable::load_from_file(path)?;
    report_load(&timetable, &warnings);
    timetable.build();

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "agenda".to_string(),
            "bookings".to_string(),
            "reload".to_string(),
            "export".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let sub = parts.get(1).map(|s| *s).unwrap_or("a");
                        let rows: Vec<RequestRow> = timetable.requests.iter()
                            .zip(timetable.placements.iter())
                            .enumerate()
                            .filter(|(_, (_, placement))| match sub {
                                "p" | "placed" => matches!(placement, Placement::Placed { .. }),
                                "s" | "skipped" => matches!(placement, Placement::Skipped),
                                "w" | "waiting" => matches!(placement, Placement::Waiting),
                                _ => true, // 'ls' or 'ls a'
                            })
                            .map(|(index, (request, placement))| RequestRow {
                                index,
                                subject: request.subject.to_string(),
                                instructor: request.instructor.to_string(),
                                duration: request.duration_min,
                                status: placement.to_string(),
                            })
                            .collect();
                        if rows.is_empty() {
                            println!("No matching requests found.")
                        } else {
                            print_table(rows);
                        }
                    },
                    "agenda" => print_agenda(&timetable),
                    "bookings" => {
                        if timetable.bookings.is_empty() {
                            println!("No bookings yet.")
                        } else {
                            let rows: Vec<BookingRow> = timetable.bookings.by_instructor()
                                .into_iter()
                                .map(|(instructor, slots)| BookingRow {
                                    instructor: instructor.to_string(),
                                    slots: slots.iter()
                                        .map(|s| s.to_string())
                                        .collect::<Vec<_>>()
                                        .join(", "),
                                })
                                .collect();
                            print_table(rows);
                        }
                    },
                    "reload" => {
                        match Timetable::load_from_file(path) {
                            Ok((fresh, warnings)) => {
                                timetable = fresh;
                                report_load(&timetable, &warnings);
                                timetable.build();
                                println!("Rebuilt weekly agenda.");
                            }
                            Err(e) => println!("Error reading {}: {}", path, e),
                        }
                    },
                    "export" => {
                        if let Some(target) = parts.get(1) {
                            match serde_json::to_string_pretty(&timetable.entries) {
                                Ok(json) => match std::fs::write(target, json) {
                                    Ok(()) => println!("Exported agenda to {}", target),
                                    Err(e) => println!("Error writing {}: {}", target, e),
                                },
                                Err(e) => println!("Error serializing agenda: {}", e),
                            }
                        } else {
                            println!("Usage: export <file>");
                        }
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [status]   - List requests in a table or filter by status: p - placed, s - skipped, w - waiting");
                        println!("  agenda        - Print the weekly agenda");
                        println!("  bookings      - Show booked intervals per instructor");
                        println!("  reload        - Re-read the request file and rebuild the agenda");
                        println!("  export <file> - Write the agenda entries as JSON");
                        println!("  help / ?      - Show this help menu");
                        println!("  exit / quit   - Exit\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
