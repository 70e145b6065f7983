use std::env;
use std::path::Path;

use crate::combat::combatant::Combatant;
use crate::combat::slots::{ArmourSlot, WeaponSlot};
use crate::data::config::{load_request, SimulationRequest};
use crate::data::game_data::{GameData, GameDataSource};
use crate::data::loader::load_game_data;
use crate::parallel::WorkerPool;
use crate::server::{self, api::fresh_seed, BIND_ENV, DEFAULT_BIND};
use crate::simulator::export_csv::export_summary_csv;
use crate::simulator::monte_carlo::run_simulation;

const USAGE: &str = "usage: duelsim <serve|simulate|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Simulate,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("simulate") => Some(Command::Simulate),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var(BIND_ENV).unwrap_or_else(|_| DEFAULT_BIND.to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// Value following `--name`, if present.
fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a String> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|index| args.get(index + 1))
}

fn parse_flag<T: std::str::FromStr>(args: &[String], name: &str) -> Result<Option<T>, String> {
    match flag_value(args, name) {
        None if args.iter().any(|arg| arg == name) => Err(format!("missing value for {name}")),
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("invalid {name} '{raw}'")),
    }
}

fn load_request_arg(args: &[String], command: &str) -> Result<SimulationRequest, i32> {
    let Some(path) = args.get(2).filter(|arg| !arg.starts_with("--")) else {
        eprintln!("usage: duelsim {command} <request.json|request.yaml>");
        return Err(2);
    };
    load_request(Path::new(path)).map_err(|err| {
        eprintln!("failed to load {path}: {err}");
        1
    })
}

fn handle_simulate(args: &[String]) -> i32 {
    let mut request = match load_request_arg(args, "simulate") {
        Ok(request) => request,
        Err(code) => return code,
    };
    let overrides = parse_flag::<u32>(args, "--trials")
        .and_then(|trials| Ok((trials, parse_flag::<u64>(args, "--seed")?)));
    let (trials, seed) = match overrides {
        Ok(values) => values,
        Err(message) => {
            eprintln!("{message}");
            return 2;
        }
    };
    if let Some(trials) = trials {
        request.trials = trials;
    }
    if let Some(seed) = seed {
        request.seed = Some(seed);
    }
    if let Err(err) = request.validate() {
        eprintln!("invalid request: {err}");
        return 1;
    }

    let seed = match request.seed.map_or_else(fresh_seed, Ok) {
        Ok(seed) => seed,
        Err(err) => {
            eprintln!("failed to draw a seed: {err}");
            return 1;
        }
    };
    let data = load_game_data();
    let summary = run_simulation(&request, &data, seed, &WorkerPool::from_env());

    if let Some(csv_path) = flag_value(args, "--csv") {
        if let Err(err) = export_summary_csv(&summary, Path::new(csv_path)) {
            eprintln!("csv export failed: {err}");
            return 1;
        }
    }

    let payload = serde_json::json!({ "seed": seed, "summary": summary });
    match serde_json::to_string_pretty(&payload) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize simulation result: {err}");
            1
        }
    }
}

/// Lines describing which slots of `combatant` fall back to game-data defaults.
fn defaults_report(role: &str, combatant: &Combatant, data: &GameData) -> Vec<String> {
    let mut lines = Vec::new();
    for slot in WeaponSlot::ALL {
        if combatant.weapons.get(slot).is_none() {
            lines.push(format!(
                "{role} '{}': {} defaults to {}",
                combatant.name,
                slot.label(),
                data.default_weapon(slot).name
            ));
        }
    }
    let bare: Vec<&str> = ArmourSlot::ALL
        .into_iter()
        .filter(|slot| {
            combatant.armour.get(*slot).is_none() && data.default_armour(*slot).is_none()
        })
        .map(ArmourSlot::label)
        .collect();
    if !bare.is_empty() {
        lines.push(format!("{role} '{}': no armour on {}", combatant.name, bare.join(", ")));
    }
    lines
}

fn handle_validate(args: &[String]) -> i32 {
    let request = match load_request_arg(args, "validate") {
        Ok(request) => request,
        Err(code) => return code,
    };
    if let Err(err) = request.validate() {
        eprintln!("validation failed: {err}");
        return 1;
    }
    let data = load_game_data();
    println!("validation passed: {}", args[2]);
    println!("trials: {}", request.trials);
    match request.seed {
        Some(seed) => println!("seed: {seed}"),
        None => println!("seed: drawn at run time"),
    }
    for line in defaults_report("attacker", &request.attacker, &data)
        .into_iter()
        .chain(defaults_report("defender", &request.defender, &data))
    {
        println!("{line}");
    }
    0
}
