//! Competition engine CLI.
//!
//! Operates a JSON engine-state file: loads it, applies one operation, prints
//! the result as JSON, and writes the state back for mutating commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use mjc_core::{
    AdvanceRequest, CompetitionEngine, CompetitionId, CompetitionKind, CompetitionRule,
    CreateMatchRequest, EngineState, EntrantId, PlayerId, TeamId, UpdateMatchRequest,
};

#[derive(Parser)]
#[command(name = "mjc")]
#[command(about = "Operate a competition engine state file", long_about = None)]
struct Cli {
    /// Engine state JSON file
    #[arg(long, default_value = "state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty engine state file
    Init,

    /// Create a competition with its scoring rule
    CreateCompetition {
        #[arg(long)]
        competition: String,
        /// "individual" or "team"
        #[arg(long)]
        kind: String,
        #[arg(long)]
        origin: i32,
        #[arg(long)]
        first: i32,
        #[arg(long)]
        second: i32,
        #[arg(long)]
        third: i32,
        #[arg(long)]
        fourth: i32,
    },

    /// Register a player and open their round-1 status
    RegisterPlayer {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        player: String,
    },

    /// Register a team with members and open its round-1 status
    RegisterTeam {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        team: String,
        /// Member player IDs
        #[arg(long, num_args = 1..)]
        members: Vec<String>,
    },

    /// Record a match from a JSON request file
    CreateMatch {
        #[arg(long)]
        request: PathBuf,
    },

    /// Correct a recorded match from a JSON request file
    UpdateMatch {
        #[arg(long)]
        request: PathBuf,
    },

    /// Print a round's ranking
    Rank {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        round: u32,
    },

    /// Advance entrants from a JSON request file
    Advance {
        #[arg(long)]
        request: PathBuf,
    },

    /// Overwrite an entrant's current score
    UpdateScore {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        round: u32,
        #[arg(long)]
        score: i32,
    },

    /// Eliminate an entrant from a round
    Eliminate {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        round: u32,
    },

    /// Close a round: active entrants become completed
    CompleteRound {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        round: u32,
    },

    /// Print the round snapshot
    Status {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        round: u32,
    },

    /// Print the competition's current maximum round
    MaxRound {
        #[arg(long)]
        competition: String,
    },

    /// Delete a competition and everything it owns
    DeleteCompetition {
        #[arg(long)]
        competition: String,
    },
}

fn load_engine(path: &Path) -> Result<CompetitionEngine> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    let state: EngineState =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(CompetitionEngine::from_state(state))
}

fn save_engine(path: &Path, engine: &CompetitionEngine) -> Result<()> {
    let text = serde_json::to_string_pretty(&engine.to_state())?;
    fs::write(path, text).with_context(|| format!("writing state file {}", path.display()))?;
    Ok(())
}

fn read_request<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading request file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn entrant_arg(player: Option<String>, team: Option<String>) -> Result<EntrantId> {
    match (player, team) {
        (Some(p), None) => Ok(EntrantId::Player(PlayerId::new(p))),
        (None, Some(t)) => Ok(EntrantId::Team(TeamId::new(t))),
        _ => bail!("exactly one of --player or --team is required"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        save_engine(&cli.state, &CompetitionEngine::new())?;
        log::info!("initialized state file {}", cli.state.display());
        return Ok(());
    }

    let mut engine = load_engine(&cli.state)?;

    match cli.command {
        Commands::Init => unreachable!("handled above"),

        Commands::CreateCompetition {
            competition,
            kind,
            origin,
            first,
            second,
            third,
            fourth,
        } => {
            let kind = match kind.as_str() {
                "individual" => CompetitionKind::Individual,
                "team" => CompetitionKind::Team,
                other => bail!("unknown competition kind: {other}"),
            };
            engine.create_competition(
                CompetitionId::new(competition),
                kind,
                CompetitionRule::new(origin, first, second, third, fourth),
            );
            save_engine(&cli.state, &engine)?;
        }

        Commands::RegisterPlayer { competition, player } => {
            let competition = CompetitionId::new(competition);
            let player = PlayerId::new(player);
            engine.register_player(&competition, player.clone())?;
            let status =
                engine.create_round_one_status(EntrantId::Player(player), competition)?;
            save_engine(&cli.state, &engine)?;
            print_json(&status)?;
        }

        Commands::RegisterTeam {
            competition,
            team,
            members,
        } => {
            let competition = CompetitionId::new(competition);
            let team = TeamId::new(team);
            engine.register_team(
                &competition,
                team.clone(),
                members.into_iter().map(PlayerId::new),
            )?;
            let status = engine.create_round_one_status(EntrantId::Team(team), competition)?;
            save_engine(&cli.state, &engine)?;
            print_json(&status)?;
        }

        Commands::CreateMatch { request } => {
            let request: CreateMatchRequest = read_request(&request)?;
            let record = engine.create_match(request)?;
            save_engine(&cli.state, &engine)?;
            print_json(&record)?;
        }

        Commands::UpdateMatch { request } => {
            let request: UpdateMatchRequest = read_request(&request)?;
            let record = engine.update_match(request)?;
            save_engine(&cli.state, &engine)?;
            print_json(&record)?;
        }

        Commands::Rank { competition, round } => {
            let entries = engine.rank_round(&CompetitionId::new(competition), round);
            print_json(&entries)?;
        }

        Commands::Advance { request } => {
            let request: AdvanceRequest = read_request(&request)?;
            let created = engine.advance(request)?;
            save_engine(&cli.state, &engine)?;
            print_json(&created)?;
        }

        Commands::UpdateScore {
            competition,
            player,
            team,
            round,
            score,
        } => {
            let entrant = entrant_arg(player, team)?;
            engine.update_score(&entrant, &CompetitionId::new(competition), round, score)?;
            save_engine(&cli.state, &engine)?;
        }

        Commands::Eliminate {
            competition,
            player,
            team,
            round,
        } => {
            let entrant = entrant_arg(player, team)?;
            engine.eliminate(&entrant, &CompetitionId::new(competition), round)?;
            save_engine(&cli.state, &engine)?;
        }

        Commands::CompleteRound { competition, round } => {
            let flipped = engine.complete_round(&CompetitionId::new(competition), round);
            save_engine(&cli.state, &engine)?;
            println!("{flipped}");
        }

        Commands::Status { competition, round } => {
            let snapshot = engine.competition_status(&CompetitionId::new(competition), round);
            print_json(&snapshot)?;
        }

        Commands::MaxRound { competition } => {
            println!("{}", engine.current_max_round(&CompetitionId::new(competition)));
        }

        Commands::DeleteCompetition { competition } => {
            engine.delete_competition(&CompetitionId::new(competition));
            save_engine(&cli.state, &engine)?;
        }
    }

    Ok(())
}
