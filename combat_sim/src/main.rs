//! Combat Sim - Runs a seeded battle headlessly and prints the combat log
//!
//! Usage: `combat_sim [seed] [config_dir]`
//!
//! Every combatant uses the first ability it can afford. Set `RUST_LOG=debug`
//! to see engine diagnostics on stderr.

use combat_core::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::error::Error;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Safety net against battles that never end
const MAX_TURNS: u32 = 500;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 7,
    };
    let data = match args.next() {
        Some(dir) => GameData::load_from_dir(Path::new(&dir))?,
        None => GameData::defaults()?,
    };

    let mut engine = CombatEngine::from_game_data(data, ChaCha8Rng::seed_from_u64(seed))
        .with_rewards(BasicRewards::new(seed));
    let mut policy_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));

    let enemies = encounter(engine.templates())?;
    let mut state = engine.initialize_combat(party(), reserves(), enemies);
    engine.start_combat(&mut state)?;
    info!(seed, "battle started");

    let mut printed = 0;
    while !state.phase.is_terminal() && state.current_turn < MAX_TURNS {
        match state.phase {
            CombatPhase::Active => {
                take_turn(&mut engine, &mut state, &mut policy_rng);
                engine.end_turn(&mut state)?;
            }
            CombatPhase::TeamWipe => engine.swap_reserve_team(&mut state)?,
            _ => break,
        }
        printed = print_log(&state, printed);
    }
    print_log(&state, printed);

    if !state.phase.is_terminal() {
        warn!(turns = state.current_turn, "battle did not finish");
    }
    print_summary(&state);
    Ok(())
}

/// Use the first affordable ability against a sensible target
fn take_turn(engine: &mut CombatEngine<ChaCha8Rng>, state: &mut CombatState, rng: &mut impl Rng) {
    let Some(actor) = state.current_combatant() else {
        return;
    };
    let side = actor.side();
    let actor_id = actor.id().to_string();

    let Some((ability_id, target_type)) = engine
        .affordable_abilities(state)
        .first()
        .map(|a| (a.id.clone(), a.target_type))
    else {
        return;
    };

    let target = if target_type.targets_allies() {
        weakest_ally(state, side)
    } else {
        let enemies = state.living_ids(side.opposite());
        enemies.choose(rng).cloned()
    };
    let target = target.unwrap_or(actor_id);

    engine.execute_ability(state, &ability_id, &[target.as_str()]);
}

fn weakest_ally(state: &CombatState, side: Side) -> Option<String> {
    state
        .living_ids(side)
        .into_iter()
        .filter_map(|id| state.unit(&id).map(|c| (c.stats.hp_percent(), id)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

fn hero(id: &str, name: &str, stats: Stats, abilities: &[&str]) -> PlayerCharacter {
    PlayerCharacter::new(
        Combatant::new(id, name, 5, stats, 10),
        abilities.iter().map(|a| a.to_string()).collect(),
    )
}

fn party() -> Vec<PlayerCharacter> {
    let mut knight = hero(
        "knight",
        "Knight",
        Stats::new(180, 28, 18, 4, 10, 8),
        &["heavy_blow", "shield_bash", "slash"],
    );
    knight
        .combatant
        .equip(Equipment::new("iron_sword", "Iron Sword", 5).with_bonus(StatBonus::new(StatKind::Atk, 6)));

    let mage = hero(
        "mage",
        "Mage",
        Stats::new(110, 8, 6, 30, 16, 10).with_precision(8, 5, 95),
        &["fireball", "arcane_bolt"],
    );
    let cleric = hero(
        "cleric",
        "Cleric",
        Stats::new(130, 12, 10, 22, 18, 9),
        &["mass_renew", "heal", "slash"],
    );
    vec![knight, mage, cleric]
}

fn reserves() -> Vec<PlayerCharacter> {
    vec![
        hero(
            "rogue",
            "Rogue",
            Stats::new(120, 24, 8, 4, 8, 14).with_precision(20, 15, 95),
            &["execute", "poison_dart", "slash"],
        ),
        hero(
            "paladin",
            "Paladin",
            Stats::new(170, 22, 16, 14, 14, 7),
            &["war_cry", "heal", "slash"],
        ),
    ]
}

fn encounter(templates: &EnemyTemplateRegistry) -> Result<Vec<Enemy>, Box<dyn Error>> {
    let roster = [("goblin_warlord", "warlord", 6), ("goblin", "goblin_a", 4), ("goblin_archer", "archer", 4)];

    let mut enemies = Vec::new();
    for (template_id, instance_id, level) in roster {
        let template = templates
            .get(template_id)
            .ok_or_else(|| format!("missing enemy template '{}'", template_id))?;
        enemies.push(template.instantiate(instance_id, level));
    }
    Ok(enemies)
}

fn print_log(state: &CombatState, from: usize) -> usize {
    for entry in state.combat_log.iter().skip(from) {
        println!("[R{:>2} T{:>3}] {}", entry.round, entry.turn, entry.message);
    }
    state.combat_log.len()
}

fn print_summary(state: &CombatState) {
    println!("\n{}", "=".repeat(60));
    println!("  Result: {:?} after {} rounds", state.phase, state.round_number);
    println!("{}\n", "=".repeat(60));

    for member in state.player_team.iter().chain(state.reserve_team.iter()) {
        let unit = &member.combatant;
        println!(
            "  {:<8} lvl {:>2}  hp {:>3}/{:<3}  xp {}",
            unit.name, unit.level, unit.stats.hp, unit.stats.max_hp, member.xp
        );
    }

    if state.victory {
        println!("\n  XP earned: {}", state.xp_earned);
        for item in &state.loot_dropped {
            println!("  Loot: {} (level {})", item.name, item.level);
        }
    }
}
