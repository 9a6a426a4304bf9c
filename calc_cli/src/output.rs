//! Text rendering of sessions and sizing results.

use std::fmt;

use serde::Serialize;

use calc_core::calculations::CircuitResult;
use calc_core::{CalculationParameters, ChargerKind, Parameter, Session, SizingResult};

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════";

/// Session plus its result, as printed by `--json` and `json`
#[derive(Serialize)]
pub struct JsonExport<'a> {
    pub session: &'a Session,
    pub result: &'a SizingResult,
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", RULE)?;
    writeln!(f, "  {}", title)?;
    writeln!(f, "{}", RULE)
}

fn status_icon(exceeded: bool) -> &'static str {
    if exceeded { "[EXCEEDS]" } else { "[OK]" }
}

/// Numbered charger schedule
pub fn schedule(session: &Session) -> String {
    if session.is_empty() {
        return "No chargers. Use: add <ac|dc>:<kW>[:<qty>[:<1p|3p>]]\n".to_string();
    }
    let header = format!("{:>3}  {:<4} {:>8} {:>5}  {:<6}\n", "#", "Type", "Power", "Qty", "Supply");
    let rows: String = session
        .chargers
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let spec = &entry.spec;
            format!(
                "{:>3}  {:<4} {:>6}kW {:>5}  {:<6}\n",
                i + 1,
                spec.kind,
                spec.power_kw,
                spec.quantity,
                spec.supply_phase().display_name()
            )
        })
        .collect();
    header + &rows
}

pub fn params(params: &CalculationParameters) -> String {
    Parameter::ALL
        .iter()
        .map(|p| {
            let range = p.range();
            let reference = p.reference().map(|r| format!("  {}", r.citation())).unwrap_or_default();
            format!(
                "  {:<22} {:>8}   {:<34} [{} - {}]{}\n",
                p.name(),
                params.get(*p),
                p.display_name(),
                range.start(),
                range.end(),
                reference
            )
        })
        .collect()
}

pub fn catalog() -> String {
    [ChargerKind::Ac, ChargerKind::Dc]
        .iter()
        .map(|kind| {
            let ratings: Vec<String> = kind.catalog_kw().iter().map(|kw| format!("{}kW", kw)).collect();
            format!("  {}: {}\n", kind, ratings.join(", "))
        })
        .collect()
}

fn circuit_row(number: usize, circuit: &CircuitResult) -> String {
    let breaker = circuit.breaker.describe(|rating| {
        let class = circuit.breaker_class().map(|c| c.code()).unwrap_or_default();
        format!("{}A {} {}", rating, class, circuit.phase.poles())
    });
    let cable = circuit
        .cable
        .describe(|c| format!("{}mm² {} ({}A)", c.size_mm2, circuit.cable_cores, c.ampacity_a));
    format!(
        "{:>3}  {:<14} {:>9.1}A {:>9.1}A  {:<16} {} {}",
        number,
        circuit.spec.label(),
        circuit.design_current_a,
        circuit.design_ac_input_current_a,
        breaker,
        cable,
        status_icon(circuit.exceeds_standard_range())
    )
}

/// Full text report of a sizing result
struct ResultText<'a>(&'a SizingResult);

impl fmt::Display for ResultText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        heading(f, "CHARGER CIRCUITS")?;
        if result.circuits.is_empty() {
            writeln!(f, "  (no chargers)")?;
        } else {
            writeln!(
                f,
                "{:>3}  {:<14} {:>10} {:>10}  {:<16} {}",
                "#", "Charger", "Design I", "AC input", "Breaker", "Cable"
            )?;
            for (i, circuit) in result.circuits.iter().enumerate() {
                writeln!(f, "{}", circuit_row(i + 1, circuit))?;
            }
        }
        writeln!(f)?;

        let msb = &result.msb;
        heading(f, "MAIN SWITCHBOARD")?;
        writeln!(f, "  Total connected load:    {:.1} kW", msb.total_connected_kw)?;
        writeln!(f, "  Total design AC current: {:.1} A", msb.total_design_ac_current_a)?;
        writeln!(
            f,
            "  Diversified current:     {:.1} A (x{})",
            msb.diversified_current_a, msb.diversity_factor
        )?;
        writeln!(
            f,
            "  Main breaker:            {}",
            msb.main_breaker.describe(|rating| format!("{}A", rating))
        )?;
        writeln!(f, "  MSB configuration:       {}", msb.configuration_description())?;
        writeln!(f, "  Busbar rating:           {} A", msb.busbar_rating_a)?;
        writeln!(f, "  Incomer cable:           {}", msb.incomer_description())?;
        writeln!(f)?;

        let t = &result.transformer;
        heading(f, "SUPPLY TRANSFORMER")?;
        writeln!(f, "  Load:    {:.1} kVA", t.apparent_power_kva)?;
        writeln!(f, "  Rating:  {}", t.description())?;
        writeln!(f)?;

        if result.exceeds_standard_range() {
            writeln!(f, "WARNING: one or more selections exceed the standard range. Consider:")?;
            writeln!(f, "  - splitting the load across multiple switchboards")?;
            writeln!(f, "  - a higher supply voltage")?;
            writeln!(f, "  - a custom design by a specialist")?;
            writeln!(f)?;
        }

        writeln!(f, "Technical notes ({}):", result.edition)?;
        for note in &result.notes {
            writeln!(f, "  - {}", note)?;
        }
        Ok(())
    }
}

/// Full result: circuits, MSB, transformer and notes
pub fn result(result: &SizingResult) -> String {
    ResultText(result).to_string()
}

/// One-line recap printed after each mutating command
pub fn summary(result: &SizingResult) -> String {
    let msb = &result.msb;
    let transformer = if result.transformer.is_no_load() {
        "no transformer load".to_string()
    } else {
        format!("{} kVA transformer", result.transformer.rating_kva)
    };
    format!(
        "{} chargers, {:.1} kW connected, {:.1} A diversified -> main breaker {}, {}{}",
        result.charger_count(),
        msb.total_connected_kw,
        msb.diversified_current_a,
        msb.main_breaker.describe(|rating| format!("{}A", rating)),
        transformer,
        if result.exceeds_standard_range() { " [EXCEEDS STANDARD RANGE]" } else { "" }
    )
}
