use colored::Colorize;
use tt_mechanics::{AdvantageStatus, DiceEngine, DiceNotation, EngineConfig};

pub fn run(
    notation: &str,
    seed: Option<u64>,
    advantage: bool,
    disadvantage: bool,
    reason: Option<&str>,
) -> Result<(), String> {
    let notation: DiceNotation = notation.parse().map_err(|e| format!("{e}"))?;
    let mut config = EngineConfig::default();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let mut dice = config.build_dice();

    let status = AdvantageStatus::from_flags(advantage, disadvantage);
    if status != AdvantageStatus::Normal {
        return roll_d20(&mut dice, &notation, status, reason);
    }

    let result = dice.roll_notation(&notation, reason);
    let rolls: Vec<String> = result.rolls.iter().map(u32::to_string).collect();
    print_label(reason);
    println!(
        "  {} [{}]{} = {}",
        notation.to_string().bold(),
        rolls.join(", "),
        format_modifier(result.modifier),
        result.total.to_string().green().bold()
    );
    println!(
        "  {}",
        format!(
            "range {}-{}, average {}",
            notation.min(),
            notation.max(),
            notation.average()
        )
        .dimmed()
    );
    Ok(())
}

fn roll_d20(
    dice: &mut DiceEngine,
    notation: &DiceNotation,
    status: AdvantageStatus,
    reason: Option<&str>,
) -> Result<(), String> {
    if notation.count != 1 || notation.sides != 20 {
        return Err("advantage and disadvantage only apply to 1d20 rolls".into());
    }
    let roll = dice.roll_d20(status);
    let total = roll.chosen as i32 + notation.modifier;
    let label = match status {
        AdvantageStatus::Advantage => "advantage",
        AdvantageStatus::Disadvantage => "disadvantage",
        AdvantageStatus::Normal => "normal",
    };
    let natural = if roll.is_natural_20() {
        " natural 20!".green().bold().to_string()
    } else if roll.is_natural_1() {
        " natural 1".red().bold().to_string()
    } else {
        String::new()
    };
    print_label(reason);
    println!(
        "  {} with {label}: {:?} keep {}{} = {}{natural}",
        notation.to_string().bold(),
        roll.rolls,
        roll.chosen,
        format_modifier(notation.modifier),
        total.to_string().green().bold()
    );
    Ok(())
}

fn print_label(reason: Option<&str>) {
    if let Some(reason) = reason {
        println!("  {}", reason.dimmed());
    }
}

fn format_modifier(modifier: i32) -> String {
    match modifier {
        0 => String::new(),
        m if m > 0 => format!(" + {m}"),
        m => format!(" - {}", -m),
    }
}
