use std::path::PathBuf;

use aw_combat::{
    BalanceConfig, CombatLog, CombatResult, Combatant, EncounterFactory, EncounterRequest,
    ExplorationService, InMemoryLedger, InMemoryVault, Outcome, SessionSnapshot, Settlement,
};
use aw_core::player::player_attack_range;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::{load_tables, parse_companion};

const MAX_TURNS: usize = 10_000;

/// Options for one simulated encounter.
pub struct SimulateArgs {
    pub material: String,
    pub skill: u32,
    pub accessory: u32,
    pub companions: Vec<String>,
    pub seed: u64,
    pub flee: bool,
    pub verbose: bool,
    pub json: bool,
    pub tables: Option<PathBuf>,
}

struct Finished {
    snapshot: SessionSnapshot,
    settlement: Settlement,
    log: CombatLog,
}

pub fn run(args: &SimulateArgs) -> Result<(), String> {
    let tables = load_tables(args.tables.as_deref())?;
    let mut request =
        EncounterRequest::new(&args.material, args.skill).with_accessory_tier(args.accessory);
    for arg in &args.companions {
        request = request.with_companion(parse_companion(arg)?);
    }

    let config = BalanceConfig::default().with_seed(args.seed);
    let factory = EncounterFactory::new(tables, config);
    let service = ExplorationService::new(factory, InMemoryLedger::new(), InMemoryVault::new());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    let finished = runtime
        .block_on(play(&service, request, args.flee))
        .map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&finished.snapshot)
            .map_err(|e| format!("failed to serialize snapshot: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    print_summary(&finished);
    if args.verbose {
        println!();
        for line in finished.log.export_text().lines() {
            println!("  {line}");
        }
    }
    Ok(())
}

async fn play(
    service: &ExplorationService<InMemoryLedger, InMemoryVault>,
    request: EncounterRequest,
    flee: bool,
) -> CombatResult<Finished> {
    let id = service.start(request).await?;
    if flee {
        service.flee(id).await?;
    } else {
        service.act(id, &Combatant::Player).await?;
        service.run_until_settled(id, MAX_TURNS).await?;
    }

    let snapshot = service.snapshot(id).await?;
    let settlement = service.settle(id).await?;

    let mut log = CombatLog::new(0);
    for event in service.log(id).await? {
        log.push(event);
    }
    Ok(Finished {
        snapshot,
        settlement,
        log,
    })
}

fn print_summary(finished: &Finished) {
    let Finished {
        snapshot,
        settlement,
        log,
    } = finished;
    let enemy = &snapshot.enemy;
    let (low, high) = player_attack_range(snapshot.player.skill);
    println!(
        "  {} {}",
        "Encounter:".bold(),
        format!("{} (rank {})", enemy.name, enemy.rank).bold().underline()
    );
    println!(
        "  {}",
        format!(
            "Spent: {}  Enemy HP: {}  Speed: {:.1}",
            snapshot.resource, enemy.hp, enemy.speed
        )
        .dimmed()
    );
    println!(
        "  {}",
        format!("Player hits for {low}-{high} before criticals").dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Combatant", "HP", "Level", "Morale"]);
    table.add_row(vec![
        "Player".to_string(),
        snapshot.player.hp.to_string(),
        format!("skill {}", snapshot.player.skill),
        "-".to_string(),
    ]);
    for companion in &snapshot.companions {
        table.add_row(vec![
            companion.id.to_string(),
            companion.hp.to_string(),
            companion.level.to_string(),
            if companion.ability_ready {
                format!("{} (ready)", companion.morale)
            } else {
                companion.morale.to_string()
            },
        ]);
    }
    table.add_row(vec![
        enemy.name.clone(),
        enemy.hp.to_string(),
        enemy.rank.to_string(),
        "-".to_string(),
    ]);
    println!("{table}");
    println!();

    let outcome = match snapshot.outcome {
        Outcome::Victory => "Victory".green().bold(),
        Outcome::Defeat => "Defeat".red().bold(),
        Outcome::Fled => "Fled".yellow().bold(),
        Outcome::InProgress => "In progress".normal(),
    };
    println!("  {} {}", "Outcome:".bold(), outcome);
    if let Some(last) = log.last() {
        println!("  {}", last.description.dimmed());
    }
    println!("  {}", format!("Rounds: {}", snapshot.round).dimmed());

    let Some(reward) = &snapshot.reward else {
        return;
    };
    println!(
        "  {} {} (base {} × {})",
        "Currency:".bold(),
        reward.currency.amount,
        reward.currency.base,
        reward.currency.multiplier
    );
    if let Some(total) = settlement.currency_total {
        println!("  {}", format!("Wallet: {total}").dimmed());
    }

    if reward.experience.is_empty() {
        return;
    }
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Companion", "EXP", "Level", "Progress"]);
    for progress in &reward.experience {
        let level = if progress.leveled_up() {
            format!("{} → {}", progress.level_before, progress.level)
                .green()
                .to_string()
        } else {
            progress.level.to_string()
        };
        table.add_row(vec![
            progress.companion.to_string(),
            format!("+{}", progress.gained),
            level,
            format!("{}/{}", progress.experience, progress.exp_to_next),
        ]);
    }
    println!("{table}");
}
