use env_logger::Env;
use open_hours::{
    HoursService, MemoryQueryCache, MemoryScheduleStore, Schedule, load_schedules_from_json,
    load_seed_csv, parse_schedule, save_schedules_to_json,
};
use std::io::{self, Write};
use std::sync::Arc;

fn render_schedule(schedule: &Schedule) -> String {
    let mut out = format!("{} ({} entries)", schedule.name, schedule.hours.len());
    for entry in &schedule.hours {
        out.push_str("\n  ");
        out.push_str(&entry.to_string());
    }
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  list                               List stored schedules\n  show <name>                        Show one schedule's entries\n  add <name> <hours...>              Create a schedule (e.g. add Cafe Mon-Fri 9 am - 5 pm)\n  update <name> <hours...>           Replace a schedule's hours\n  delete <name>                      Delete a schedule\n  open <datetime>                    List schedules open at an ISO datetime\n  parse <hours...>                   Parse hours without storing them\n  load csv <path>                    Seed schedules from a CSV file\n  load json <path>                   Import schedules from a JSON snapshot\n  save json <path>                   Write all schedules to a JSON snapshot\n  quit|exit                          Exit"
    );
}

fn rest_of_line(input: &str, skip: usize) -> &str {
    let mut remaining = input.trim_start();
    for _ in 0..skip {
        remaining = remaining
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim_start())
            .unwrap_or("");
    }
    remaining.trim()
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let service = HoursService::new(
        Arc::new(MemoryScheduleStore::new()),
        Arc::new(MemoryQueryCache::default()),
    );

    println!("Open Hours (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "list" => match service.list() {
                Ok(schedules) if schedules.is_empty() => println!("No schedules stored."),
                Ok(schedules) => {
                    for schedule in &schedules {
                        println!("{}", render_schedule(schedule));
                    }
                }
                Err(e) => println!("Error: {}", e),
            },
            "show" => match parts.next() {
                Some(name) => match service.get(name) {
                    Ok(schedule) => println!("{}", render_schedule(&schedule)),
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: show <name>"),
            },
            "add" | "update" => {
                let name = parts.next();
                let hours = rest_of_line(input, 2);
                match name {
                    Some(name) if !hours.is_empty() => {
                        let result = if cmd == "add" {
                            service.create(name, hours)
                        } else {
                            service.update(name, name, hours)
                        };
                        match result {
                            Ok(schedule) => {
                                let verb = if cmd == "add" { "Created" } else { "Updated" };
                                println!("{verb} {}", render_schedule(&schedule));
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: {} <name> <hours...>", cmd),
                }
            }
            "delete" => match parts.next() {
                Some(name) => match service.delete(name) {
                    Ok(()) => println!("Deleted schedule {name}."),
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: delete <name>"),
            },
            "open" => {
                let datetime = rest_of_line(input, 1);
                if datetime.is_empty() {
                    println!("Usage: open <datetime>");
                    continue;
                }
                match service.open_at(datetime, true) {
                    Ok(names) if names.is_empty() => println!("Nothing open at {datetime}."),
                    Ok(names) => println!("Open at {datetime}: {}", names.join(", ")),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "parse" => {
                let hours = rest_of_line(input, 1);
                match parse_schedule(hours) {
                    Ok(entries) => {
                        println!("Parsed {} entries:", entries.len());
                        for entry in &entries {
                            println!("  {}", entry);
                        }
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "load" | "save" => {
                let format = parts.next();
                let path = parts.next();
                match (cmd, format, path) {
                    ("load", Some("csv"), Some(path)) => match load_seed_csv(path) {
                        Ok(records) => match service.seed(&records) {
                            Ok(summary) => {
                                println!("Seeded from {path} ({})", summary.to_cli_summary())
                            }
                            Err(e) => println!("Error: {}", e),
                        },
                        Err(e) => println!("Error loading CSV: {}", e),
                    },
                    ("load", Some("json"), Some(path)) => {
                        match load_schedules_from_json(path) {
                            Ok(schedules) => match service.import(&schedules) {
                                Ok(count) => println!("Imported {count} schedules from {path}"),
                                Err(e) => println!("Error: {}", e),
                            },
                            Err(e) => println!("Error loading JSON: {}", e),
                        }
                    }
                    ("save", Some("json"), Some(path)) => match service.list() {
                        Ok(schedules) => match save_schedules_to_json(&schedules, path) {
                            Ok(()) => println!("Saved {} schedules to {path}", schedules.len()),
                            Err(e) => println!("Error saving JSON: {}", e),
                        },
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Usage: load <csv|json> <path> | save json <path>"),
                }
            }
            _ => println!("Unknown command '{}'. Type 'help'.", cmd),
        }
    }
}
