use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use tokio::runtime::Runtime;

use tf_core::QuestStatus;
use tf_engine::quest_log;
use tf_session::{FileStore, Session, SessionConfig, TurnOutcome};

pub struct PlayOptions {
    pub save_dir: PathBuf,
    pub slot: String,
    pub max_trigger_passes: usize,
    pub autosave: bool,
}

const HELP: &str = "\
  <number>        pick a choice
  look            describe the current scene again
  inv             list the inventory and party
  quests          show the quest log
  use <item>      use an item
  drop <item>     discard an item
  save / load     write or restore the save slot
  pause / resume  pause or resume play
  reset           start over
  debug <cmd>     run a debug command (set, get, give, take, goto, quest)
  quit            leave the game";

pub fn run(file: &Path, options: PlayOptions) -> Result<(), String> {
    let project = super::load_project(file)?;
    let config = SessionConfig::default()
        .with_max_trigger_passes(options.max_trigger_passes)
        .with_save_key(options.slot);
    let mut session =
        Session::start(project, config).map_err(|e| format!("failed to start session: {e}"))?;
    let store = FileStore::new(options.save_dir);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;

    println!("  {} {}", "Playing".bold(), session.project().name);
    println!("  Type 'help' for commands, 'quit' to exit.\n");
    describe(&session);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let (cmd, rest) = input.split_once(' ').unwrap_or((input, ""));
        let rest = rest.trim();

        match cmd.to_lowercase().as_str() {
            "quit" | "q" => break,
            "help" => println!("{HELP}\n"),
            "look" => describe(&session),
            "inv" | "inventory" => inventory(&session),
            "quests" => quests(&session),
            "use" => {
                let result = session.use_item(rest);
                report(&session, result);
            }
            "drop" => {
                let result = session.discard_item(rest);
                report(&session, result);
            }
            "save" => match runtime.block_on(session.save(&store)) {
                Ok(()) => println!("  Saved to {}.\n", store.dir().display()),
                Err(e) => println!("{}\n", e.to_string().yellow()),
            },
            "load" => match runtime.block_on(session.load(&store)) {
                Ok(true) => {
                    println!("  Loaded.\n");
                    describe(&session);
                }
                Ok(false) => println!("  Nothing saved yet.\n"),
                Err(e) => println!("{}\n", e.to_string().yellow()),
            },
            "pause" => {
                session.pause();
                println!("  Paused.\n");
            }
            "resume" => {
                session.resume();
                println!("  Resumed.\n");
            }
            "reset" => {
                session.reset();
                describe(&session);
            }
            "debug" => println!("  {}\n", session.debug(rest)),
            _ => match input.parse::<usize>() {
                Ok(n) => {
                    let result = pick(&mut session, n);
                    let chose = result.is_ok();
                    report(&session, result);
                    if chose && options.autosave {
                        autosave(&runtime, &session, &store);
                    }
                }
                Err(_) => println!("{}\n", format!("unknown command: {cmd}").yellow()),
            },
        }
    }

    Ok(())
}

fn autosave(runtime: &Runtime, session: &Session, store: &FileStore) {
    if let Err(e) = runtime.block_on(session.save(store)) {
        println!("{}\n", format!("autosave failed: {e}").yellow());
    }
}

/// Resolve the n-th listed choice (1-based).
fn pick(session: &mut Session, n: usize) -> Result<TurnOutcome, String> {
    let choice_id = session
        .choices()
        .get(n.wrapping_sub(1))
        .map(|view| view.choice.id.clone())
        .ok_or_else(|| format!("no choice {n}"))?;
    session.choose(&choice_id).map_err(|e| e.to_string())
}

fn report<E: ToString>(session: &Session, result: Result<TurnOutcome, E>) {
    match result {
        Ok(outcome) => {
            for fired in &outcome.fired {
                let who = session
                    .project()
                    .character(&fired.character_id)
                    .map_or(fired.character_id.as_str(), |c| c.display_name());
                println!("  {}", format!("({who} reacts)").dimmed());
            }
            describe(session);
        }
        Err(e) => println!("{}\n", e.to_string().yellow()),
    }
}

fn describe(session: &Session) {
    let Some(scene) = session.current_scene() else {
        println!(
            "{}\n",
            format!("scene not found: {}", session.state().current_scene_id).yellow()
        );
        return;
    };

    println!("  {}", scene.display_name().bold());
    for line in scene.content.lines() {
        println!("  {}", line.trim());
    }
    println!();

    for (i, view) in session.choices().iter().enumerate() {
        let label = format!("  {}. {}", i + 1, view.choice.text);
        if view.available {
            println!("{label}");
        } else {
            println!("{} {}", label.dimmed(), "(locked)".dimmed());
        }
    }
    if session.is_over() {
        println!("  {}", "The End.".bold());
        println!("  Type 'reset' to start over or 'quit' to exit.");
    }
    if session.is_paused() {
        println!("  {}", "(paused)".dimmed());
    }
    println!();
}

fn inventory(session: &Session) {
    let project = session.project();
    let state = session.state();

    if state.inventory.is_empty() {
        println!("  You carry nothing.");
    } else {
        println!("  {}", "Inventory".bold());
        for id in &state.inventory {
            let name = project.item(id).map_or(id.as_str(), |i| i.display_name());
            println!("  - {name} ({id})");
        }
    }
    if !state.party.is_empty() {
        println!("  {}", "Party".bold());
        for id in &state.party {
            let name = project.character(id).map_or(id.as_str(), |c| c.display_name());
            println!("  - {name}");
        }
    }
    println!();
}

fn quests(session: &Session) {
    let log = quest_log(session.state(), session.project());
    if log.is_empty() {
        println!("  No quests yet.\n");
        return;
    }
    for entry in log {
        let status = entry.status.to_string();
        let status = match entry.status {
            QuestStatus::Completed => status.green(),
            QuestStatus::Failed => status.red(),
            _ => status.normal(),
        };
        if entry.stages.is_empty() {
            println!("  {} [{status}]", entry.name.bold());
        } else {
            println!(
                "  {} [{status}]: {}",
                entry.name.bold(),
                entry.stages.join(", ")
            );
        }
    }
    println!();
}
