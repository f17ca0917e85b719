use clap::{CommandFactory, Parser};
use liferpg_cli::cli::{Cli, Command, ListCommand, QuestCommand};
use liferpg_core::config::{self, Config, Palette};
use liferpg_core::error::AppError;
use liferpg_core::game_api::{self, Completion};
use liferpg_core::model::{DailyTask, DailyTaskStatus, Quest, Task};
use std::io::{self, BufRead};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const FALLBACK_XP: u32 = 10;

fn status_label(status: DailyTaskStatus) -> &'static str {
    match status {
        DailyTaskStatus::Pending => "pending",
        DailyTaskStatus::Completed => "completed",
        DailyTaskStatus::Failed => "failed",
    }
}

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn print_tasks_plain(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in tasks {
        println!(
            "{} {} | {} | {} XP",
            checkbox(task.completed),
            task.id,
            task.title,
            task.xp
        );
    }
}

fn print_tasks_json(tasks: &[Task]) {
    let payload: Vec<serde_json::Value> = tasks
        .iter()
        .map(|task| {
            serde_json::json!({
                "id": task.id,
                "title": task.title,
                "xp": task.xp,
                "completed": task.completed,
                "earned_xp": task.earned_xp,
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn print_daily_plain(date: &str, tasks: &[DailyTask], palette: &Palette) {
    println!("{}", palette.accentize(&format!("Daily quests for {date}")));
    if tasks.is_empty() {
        println!("No daily quests. Add quests to the pool with `quest add`.");
        return;
    }
    for task in tasks {
        println!(
            "{} {} | {} | {} XP | {}",
            checkbox(task.completed),
            task.id,
            task.title,
            task.xp,
            status_label(task.status)
        );
    }
}

fn print_daily_json(date: &str, tasks: &[DailyTask]) {
    let payload: Vec<serde_json::Value> = tasks
        .iter()
        .map(|task| {
            serde_json::json!({
                "id": task.id,
                "title": task.title,
                "xp": task.xp,
                "status": task.status,
                "earned_xp": task.earned_xp,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::json!({ "date": date, "tasks": payload })
    );
}

fn print_quests_plain(quests: &[Quest]) {
    if quests.is_empty() {
        println!("The quest pool is empty.");
        return;
    }
    for quest in quests {
        let flag = if quest.enabled { "enabled" } else { "disabled" };
        println!("{} | {} | {} XP | {}", quest.id, quest.title, quest.xp, flag);
    }
}

fn print_quest_json(quest: &Quest) {
    let json = serde_json::json!({
        "id": quest.id,
        "title": quest.title,
        "xp": quest.xp,
        "enabled": quest.enabled,
    });
    println!("{}", json);
}

fn print_task_json(task: &Task) {
    let json = serde_json::json!({
        "id": task.id,
        "title": task.title,
        "xp": task.xp,
        "completed": task.completed,
        "earned_xp": task.earned_xp,
    });
    println!("{}", json);
}

fn print_completion_json(completion: &Completion) {
    let json = serde_json::json!({
        "id": completion.id,
        "title": completion.title,
        "earned_xp": completion.earned_xp,
        "total_xp": completion.total_xp,
        "unlocked": completion.unlocked,
    });
    println!("{}", json);
}

fn announce_unlocks(completion: &Completion, palette: &Palette) {
    for id in &completion.unlocked {
        if let Some(def) = liferpg_core::achievements::get(id) {
            println!(
                "{}",
                palette.accentize(&format!("Achievement unlocked: {}!", def.name))
            );
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "XP")]
    xp: u64,
    #[tabled(rename = "Streak")]
    streak: u32,
    #[tabled(rename = "Level")]
    level: u32,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

fn run_command(cli: Cli, config: &Config, palette: &Palette) -> Result<(), AppError> {
    let default_xp = config.default_xp.unwrap_or(FALLBACK_XP);

    match cli.command {
        Command::Add { title, xp } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let task = game_api::add_task(&title, xp.unwrap_or(default_xp))?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Added task: {} ({}) worth {} XP", task.title, task.id, task.xp);
            }
        }
        Command::Delete { id } => {
            let task = game_api::delete_task(&id)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
        }
        Command::Done { id } => {
            let completion = game_api::complete(&id)?;
            if cli.json {
                print_completion_json(&completion);
            } else {
                println!(
                    "Completed: {} (+{} XP, total {})",
                    completion.title, completion.earned_xp, completion.total_xp
                );
                announce_unlocks(&completion, palette);
            }
        }
        Command::Undo { id } => {
            let completion = game_api::uncomplete(&id)?;
            if cli.json {
                print_completion_json(&completion);
            } else {
                println!(
                    "Undone: {} (-{} XP, total {})",
                    completion.title, completion.earned_xp, completion.total_xp
                );
            }
        }
        Command::Quest { quest } => match quest {
            QuestCommand::Add { title, xp } => {
                let title = match title {
                    Some(value) if !value.trim().is_empty() => value,
                    _ => return Err(AppError::invalid_input("title is required")),
                };

                let quest = game_api::add_quest(&title, xp.unwrap_or(default_xp))?;
                if cli.json {
                    print_quest_json(&quest);
                } else {
                    println!(
                        "Added quest: {} ({}) worth {} XP",
                        quest.title, quest.id, quest.xp
                    );
                }
            }
            QuestCommand::Delete { id } => {
                let quest = game_api::delete_quest(&id)?;
                if cli.json {
                    print_quest_json(&quest);
                } else {
                    println!("Deleted quest: {} ({})", quest.title, quest.id);
                }
            }
            QuestCommand::Enable { id } => {
                let quest = game_api::set_quest_enabled(&id, true)?;
                if cli.json {
                    print_quest_json(&quest);
                } else {
                    println!("Enabled quest: {} ({})", quest.title, quest.id);
                }
            }
            QuestCommand::Disable { id } => {
                let quest = game_api::set_quest_enabled(&id, false)?;
                if cli.json {
                    print_quest_json(&quest);
                } else {
                    println!("Disabled quest: {} ({})", quest.title, quest.id);
                }
            }
        },
        Command::Reroll => {
            let tasks = game_api::reroll_today()?;
            if cli.json {
                let payload: Vec<serde_json::Value> = tasks
                    .iter()
                    .map(|task| {
                        serde_json::json!({
                            "id": task.id,
                            "title": task.title,
                            "xp": task.xp,
                        })
                    })
                    .collect();
                println!("{}", serde_json::Value::Array(payload));
            } else {
                println!("Rerolled today's quests:");
                for task in &tasks {
                    println!("  {} | {} | {} XP", task.id, task.title, task.xp);
                }
            }
        }
        Command::List { list } => match list {
            ListCommand::Tasks => {
                let tasks = game_api::list_tasks()?;
                if cli.json {
                    print_tasks_json(&tasks);
                } else {
                    print_tasks_plain(&tasks);
                }
            }
            ListCommand::Daily => {
                let (date, tasks) = game_api::list_daily()?;
                if cli.json {
                    print_daily_json(&date, &tasks);
                } else {
                    print_daily_plain(&date, &tasks, palette);
                }
            }
            ListCommand::Quests => {
                let quests = game_api::list_quests()?;
                if cli.json {
                    let payload: Vec<serde_json::Value> = quests
                        .iter()
                        .map(|quest| {
                            serde_json::json!({
                                "id": quest.id,
                                "title": quest.title,
                                "xp": quest.xp,
                                "enabled": quest.enabled,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::Value::Array(payload));
                } else {
                    print_quests_plain(&quests);
                }
            }
        },
        Command::Status => {
            let report = game_api::status()?;
            if cli.json {
                let json = serde_json::json!({
                    "date": report.date,
                    "total_xp": report.total_xp,
                    "level": report.level.level,
                    "progress": report.level.progress,
                    "xp_to_next": report.level.xp_to_next,
                    "streak": report.streak,
                    "multiplier": report.multiplier,
                    "daily_done": report.daily_done,
                    "daily_total": report.daily_total,
                    "open_tasks": report.open_tasks,
                });
                println!("{}", json);
            } else {
                println!(
                    "{}",
                    palette.accentize(&format!(
                        "Level {} ({} / 100 XP, {} to next)",
                        report.level.level, report.level.progress, report.level.xp_to_next
                    ))
                );
                println!("Total XP: {}", report.total_xp);
                println!(
                    "Streak: {} day(s) (x{} XP)",
                    report.streak, report.multiplier
                );
                println!(
                    "Daily quests: {}/{} done",
                    report.daily_done, report.daily_total
                );
                println!("Open tasks: {}", report.open_tasks);
                println!("{}", palette.mutedize(&report.date));
            }
        }
        Command::History { limit } => {
            let mut entries = game_api::history_entries()?;
            if let Some(limit) = limit {
                entries.truncate(limit);
            }

            if cli.json {
                let payload: Vec<serde_json::Value> = entries
                    .iter()
                    .map(|entry| {
                        serde_json::json!({
                            "date": entry.date,
                            "xp_gained": entry.xp_gained,
                            "streak": entry.streak,
                            "level": entry.level,
                            "finalized": entry.finalized,
                        })
                    })
                    .collect();
                println!("{}", serde_json::Value::Array(payload));
            } else if entries.is_empty() {
                println!("No history yet.");
            } else {
                let rows: Vec<HistoryRow> = entries
                    .iter()
                    .map(|entry| HistoryRow {
                        date: entry.date.clone(),
                        xp: entry.xp_gained,
                        streak: entry.streak,
                        level: entry.level,
                        done: format!(
                            "{}/{}",
                            entry.tasks.iter().filter(|task| task.completed).count(),
                            entry.tasks.len()
                        ),
                        status: if entry.finalized { "final" } else { "today" },
                    })
                    .collect();
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
        }
        Command::Achievements => {
            let statuses = game_api::achievement_status()?;
            if cli.json {
                let payload: Vec<serde_json::Value> = statuses
                    .iter()
                    .map(|status| {
                        serde_json::json!({
                            "id": status.def.id,
                            "name": status.def.name,
                            "description": status.def.description,
                            "unlocked_at": status.unlocked_at,
                        })
                    })
                    .collect();
                println!("{}", serde_json::Value::Array(payload));
            } else {
                for status in &statuses {
                    match &status.unlocked_at {
                        Some(at) => println!(
                            "{} {} - {} (unlocked {})",
                            checkbox(true),
                            palette.accentize(status.def.name),
                            status.def.description,
                            at
                        ),
                        None => println!(
                            "{} {} - {}",
                            checkbox(false),
                            status.def.name,
                            status.def.description
                        ),
                    }
                }
            }
        }
        Command::Share => {
            let card = game_api::generate_share()?;
            if cli.json {
                let json = serde_json::json!({
                    "level": card.level,
                    "total_xp": card.total_xp,
                    "streak": card.streak,
                    "daily_done": card.daily_done,
                    "daily_total": card.daily_total,
                    "generated_at": card.generated_at,
                });
                println!("{}", json);
            } else {
                println!("{}", palette.accentize("=== LifeRPG ==="));
                println!("Level {} | {} XP", card.level, card.total_xp);
                println!("Streak: {} day(s)", card.streak);
                println!("Today: {}/{} daily quests", card.daily_done, card.daily_total);
                println!("{}", palette.mutedize(&format!("Generated {}", card.generated_at)));
            }
        }
        Command::Sync => {
            let rolled = game_api::sync_day()?;
            if cli.json {
                println!("{}", serde_json::json!({ "rolled": rolled }));
            } else if rolled {
                println!("Rolled a new day.");
            } else {
                println!("Already up to date.");
            }
        }
    }

    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive(config: &Config, palette: &Palette) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        // Interactive sessions can straddle midnight; the rollover check
        // before each command is the timer the original app ran.
        if let Err(err) = game_api::sync_day() {
            eprintln!("ERROR: {}", err);
        }

        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("liferpg".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, config, palette) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = &loaded.error {
        eprintln!("WARNING: config ignored: {}", err);
    }
    let palette = config::palette_for_theme(loaded.config.theme.as_deref());

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&loaded.config, &palette) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, &loaded.config, &palette) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
