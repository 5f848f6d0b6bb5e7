//! Local play harness: one human at seat 0 against three bots, driving
//! `GameMachine` directly with no network round-trip. Bot decisions reuse
//! `liap-ai` the same way `liap-room::bot_scheduler` does; this binary just
//! calls them inline on its own turn instead of over a channel.

use std::env;

use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};

use liap_ai::context::DeclarationContext;
use liap_ai::{declare, play, redeal};
use liap_engine::GameMachine;
use liap_types::ids::PlayerId;
use liap_types::phase::{DeclarationData, PhaseData};
use liap_types::piece::{Color, Piece, PieceKind};
use liap_types::player::Player;

fn parse_seed() -> u32 {
    env::args().skip_while(|a| a != "--seed").nth(1).and_then(|s| s.parse().ok()).unwrap_or(42)
}

fn format_piece(p: &Piece) -> String {
    let kind = match p.kind {
        PieceKind::General => "General",
        PieceKind::Advisor => "Advisor",
        PieceKind::Elephant => "Elephant",
        PieceKind::Chariot => "Chariot",
        PieceKind::Horse => "Horse",
        PieceKind::Cannon => "Cannon",
        PieceKind::Soldier => "Soldier",
    };
    let color = match p.color {
        Color::Red => "Red",
        Color::Black => "Black",
    };
    format!("{kind} {color} ({})", p.points)
}

fn main() {
    println!("\n  =============================");
    println!("    L I A P   T U I");
    println!("  =============================\n");

    let seed = parse_seed();
    let human = PlayerId::from("you");
    let players = vec![
        Player::new(human.clone(), "You".into(), 0, false),
        Player::new(PlayerId::from("bot-1"), "Bot 1".into(), 1, true),
        Player::new(PlayerId::from("bot-2"), "Bot 2".into(), 2, true),
        Player::new(PlayerId::from("bot-3"), "Bot 3".into(), 3, true),
    ];

    let mut machine = GameMachine::new(players, seed);
    machine.start_game();
    println!("  Playing as You, seed {seed}\n");

    loop {
        match machine.game.phase.clone() {
            PhaseData::GameOver { winner } => {
                println!("\n  === GAME OVER ===");
                for p in &machine.game.players {
                    println!("  {:<8} {:>3} pts", p.name, p.score);
                }
                println!("\n  Winner: {}", display_name(&machine, &winner));
                break;
            }
            PhaseData::Preparation(data) => {
                let undecided: Vec<PlayerId> =
                    data.weak_players.iter().filter(|id| !data.decisions.contains_key(id)).cloned().collect();
                for player_id in undecided {
                    let accept = decide_redeal(&machine, &player_id);
                    let _ = machine.redeal_decision(&player_id, accept);
                }
            }
            PhaseData::Declaration(data) => {
                let Some(declarer) = data.current_declarer().cloned() else { continue };
                let value = decide_declare(&machine, &data, &declarer);
                if let Err(e) = machine.declare(&declarer, value) {
                    println!("  ! {}", e.message());
                }
            }
            PhaseData::Turn(data) => {
                let expected = if data.plays.is_empty() { data.starter.clone() } else { data.pending.first().cloned() };
                let Some(player_id) = expected else { continue };
                let indices = decide_play(&machine, &player_id, data.required_count);
                if let Err(e) = machine.play(&player_id, &indices) {
                    println!("  ! {}", e.message());
                }
            }
            PhaseData::Waiting | PhaseData::Scoring => {}
        }
    }
}

fn display_name(machine: &GameMachine, id: &PlayerId) -> String {
    machine.game.player_by_id(id).map(|p| p.name.clone()).unwrap_or_else(|| id.to_string())
}

fn decide_redeal(machine: &GameMachine, player_id: &PlayerId) -> bool {
    let player = machine.game.player_by_id(player_id).expect("weak player is seated");
    if !player.is_bot {
        println!("\n  Your hand is weak (max {} pts):", player.max_piece_points());
        for piece in &player.hand {
            println!("    {}", format_piece(piece));
        }
        return Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Request a redeal?")
            .items(&["Yes", "No"])
            .default(1)
            .interact()
            .unwrap_or(1)
            == 0;
    }
    let best_opponent = machine.game.players.iter().filter(|p| p.id != player.id).map(|p| p.score).max().unwrap_or(0);
    redeal::decide_redeal(&player.hand, player.score - best_opponent, rand::random())
}

fn decide_declare(machine: &GameMachine, data: &DeclarationData, player_id: &PlayerId) -> u8 {
    let player = machine.game.player_by_id(player_id).expect("declarer is seated");
    let forbidden = if data.is_last_declarer() {
        let sum = machine.game.sum_declared();
        (sum <= 8).then_some((8 - sum) as u8)
    } else {
        None
    };

    if !player.is_bot {
        println!("\n  {}'s hand:", player.name);
        for piece in &player.hand {
            println!("    {}", format_piece(piece));
        }
        loop {
            let value: u8 = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Declare how many piles will you win? (0-8)")
                .interact_text()
                .unwrap_or(0);
            if value > 8 {
                println!("  ! must be between 0 and 8");
                continue;
            }
            if value == 0 && player.must_declare_nonzero() {
                println!("  ! you declared zero twice in a row, must declare nonzero");
                continue;
            }
            if Some(value) == forbidden {
                println!("  ! declarations can't sum to exactly 8");
                continue;
            }
            return value;
        }
    }

    let previous_declarations =
        data.order[..data.current_index].iter().filter_map(|id| machine.game.player_by_id(id)).filter_map(|p| p.declared).collect();
    let ctx = DeclarationContext {
        position: data.current_index,
        previous_declarations,
        must_declare_nonzero: player.must_declare_nonzero(),
        redeal_multiplier: machine.game.redeal_multiplier,
        own_score: player.score,
        opponent_scores: machine.game.players.iter().filter(|p| p.id != player.id).map(|p| p.score).collect(),
    };
    declare::declare_decision(&player.hand, &ctx)
}

fn decide_play(machine: &GameMachine, player_id: &PlayerId, required_count: Option<usize>) -> Vec<usize> {
    let player = machine.game.player_by_id(player_id).expect("expected player is seated");
    if !player.is_bot {
        println!("\n  {}'s hand:", player.name);
        let labels: Vec<String> = player.hand.iter().map(format_piece).collect();
        loop {
            let selected = MultiSelect::with_theme(&ColorfulTheme::default())
                .with_prompt(match required_count {
                    Some(n) => format!("Choose {n} piece(s) to play"),
                    None => "Choose your opening piece(s)".to_string(),
                })
                .items(&labels)
                .interact()
                .unwrap_or_default();
            if let Some(n) = required_count {
                if selected.len() != n {
                    println!("  ! must select exactly {n}");
                    continue;
                }
            }
            if selected.is_empty() {
                println!("  ! must select at least one piece");
                continue;
            }
            return selected;
        }
    }
    play::choose_play(&player.hand, required_count)
}
