use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::solver::{SolveConfig, solve_base_withdrawal};
use super::tax::capital_gains_tax;
use super::types::Inputs;

/// Improvement in sustainable withdrawal (dollars per year) a candidate
/// assignment must deliver before the optimizer commits it.
const MIN_IMPROVEMENT: f64 = 1.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LotKind {
    Equity,
    FixedIncome,
}

/// A discrete purchased block with its own basis, as reported on the custody
/// statement. Reference data: the engine never mutates lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLot {
    pub id: u32,
    pub ticker: String,
    pub description: String,
    pub fair_value: f64,
    pub cost_basis: f64,
    pub acquired_year: i32,
    pub kind: LotKind,
}

impl TaxLot {
    pub fn unrealized_gain(&self) -> f64 {
        self.fair_value - self.cost_basis
    }
}

/// Maps lot ids to the calendar year they are sold; unmapped lots are held.
/// Ordered so iteration (and therefore optimization) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiquidationPlan {
    assignments: BTreeMap<u32, i32>,
}

impl LiquidationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assignments(assignments: BTreeMap<u32, i32>) -> Self {
        Self { assignments }
    }

    pub fn assign(&mut self, lot_id: u32, sale_year: i32) {
        self.assignments.insert(lot_id, sale_year);
    }

    pub fn hold(&mut self, lot_id: u32) {
        self.assignments.remove(&lot_id);
    }

    pub fn sale_year(&self, lot_id: u32) -> Option<i32> {
        self.assignments.get(&lot_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, i32)> + '_ {
        self.assignments.iter().map(|(&id, &year)| (id, year))
    }
}

/// Aggregated cash effect of every lot sold in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidationEvent {
    pub gross: f64,
    pub tax: f64,
    pub net: f64,
    pub equity_reduction: f64,
    pub note_reduction: f64,
}

impl LiquidationEvent {
    pub const ZERO: LiquidationEvent = LiquidationEvent {
        gross: 0.0,
        tax: 0.0,
        net: 0.0,
        equity_reduction: 0.0,
        note_reduction: 0.0,
    };
}

/// Market value of a lot at its sale year. Equity-like lots participate in
/// portfolio growth between the projection start and the sale; note-ladder
/// lots redeem at fair value.
pub fn sale_value(lot: &TaxLot, sale_year: i32, inputs: &Inputs) -> f64 {
    match lot.kind {
        LotKind::Equity => {
            let years = (sale_year - inputs.start_year).max(0);
            lot.fair_value * (1.0 + inputs.equity_growth_rate).powi(years)
        }
        LotKind::FixedIncome => lot.fair_value,
    }
}

fn effective_basis(lot: &TaxLot, inputs: &Inputs) -> f64 {
    if lot.kind == LotKind::FixedIncome && inputs.fixed_income_zero_basis {
        0.0
    } else {
        lot.cost_basis
    }
}

/// Expands a plan into per-year liquidation events: realized-gain tax, net
/// proceeds, and the balance reduction in the owning account. Pure; an empty
/// plan yields an empty map.
pub fn schedule_events(
    lots: &[TaxLot],
    plan: &LiquidationPlan,
    inputs: &Inputs,
) -> BTreeMap<i32, LiquidationEvent> {
    let mut events: BTreeMap<i32, LiquidationEvent> = BTreeMap::new();

    for lot in lots {
        let Some(year) = plan.sale_year(lot.id) else {
            continue;
        };

        let gross = sale_value(lot, year, inputs);
        let gain = gross - effective_basis(lot, inputs);
        let tax = capital_gains_tax(gain, inputs.ltcg_rate);

        let event = events.entry(year).or_insert(LiquidationEvent::ZERO);
        event.gross += gross;
        event.tax += tax;
        event.net += gross - tax;
        match lot.kind {
            LotKind::Equity => event.equity_reduction += gross,
            LotKind::FixedIncome => event.note_reduction += gross,
        }
    }

    events
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerStep {
    pub lot_id: u32,
    pub sale_year: i32,
    pub withdrawal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedSchedule {
    pub plan: LiquidationPlan,
    pub withdrawal: f64,
    pub steps: Vec<OptimizerStep>,
}

/// Greedy hill climb over liquidation schedules. Starting from all-hold, every
/// (unassigned lot, sale year) candidate is scored by the sustainable
/// withdrawal it unlocks; the single best strictly-improving assignment is
/// committed and the search repeats until no candidate improves. Lots are
/// scanned in id order and years ascending, so ties resolve deterministically
/// to the earliest candidate found.
pub fn optimize_schedule(
    inputs: &Inputs,
    lots: &[TaxLot],
    config: SolveConfig,
) -> Result<OptimizedSchedule, String> {
    let mut plan = LiquidationPlan::new();
    let mut best = solve_base_withdrawal(inputs, lots, &plan, config)?.withdrawal;
    let mut steps = Vec::new();

    loop {
        let mut winner: Option<OptimizerStep> = None;

        for lot in lots {
            if plan.sale_year(lot.id).is_some() {
                continue;
            }
            for year in inputs.start_year..=inputs.final_year() {
                let mut candidate = plan.clone();
                candidate.assign(lot.id, year);
                let solved = solve_base_withdrawal(inputs, lots, &candidate, config)?.withdrawal;

                let beats_current = solved > best + MIN_IMPROVEMENT;
                let beats_winner = winner.map_or(true, |w| solved > w.withdrawal);
                if beats_current && beats_winner {
                    winner = Some(OptimizerStep {
                        lot_id: lot.id,
                        sale_year: year,
                        withdrawal: solved,
                    });
                }
            }
        }

        let Some(step) = winner else {
            break;
        };
        plan.assign(step.lot_id, step.sale_year);
        best = step.withdrawal;
        tracing::debug!(
            lot_id = step.lot_id,
            sale_year = step.sale_year,
            withdrawal = step.withdrawal,
            "committed liquidation assignment"
        );
        steps.push(step);
    }

    Ok(OptimizedSchedule {
        plan,
        withdrawal: best,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::run_projection;
    use crate::core::engine::tests::baseline_inputs;
    use crate::core::types::Jurisdiction;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn equity_lot(id: u32, fair_value: f64, cost_basis: f64) -> TaxLot {
        TaxLot {
            id,
            ticker: format!("EQ{id}"),
            description: "Index fund block".to_string(),
            fair_value,
            cost_basis,
            acquired_year: 2015,
            kind: LotKind::Equity,
        }
    }

    fn note_lot(id: u32, fair_value: f64, cost_basis: f64) -> TaxLot {
        TaxLot {
            id,
            ticker: format!("FRN{id}"),
            description: "Floating-rate note".to_string(),
            fair_value,
            cost_basis,
            acquired_year: 2020,
            kind: LotKind::FixedIncome,
        }
    }

    #[test]
    fn equity_sale_value_compounds_from_start_year() {
        let inputs = baseline_inputs();
        let lot = equity_lot(1, 100_000.0, 60_000.0);

        assert_approx(sale_value(&lot, inputs.start_year, &inputs), 100_000.0);
        let grown = 100_000.0 * (1.0 + inputs.equity_growth_rate).powi(3);
        assert_approx(sale_value(&lot, inputs.start_year + 3, &inputs), grown);
    }

    #[test]
    fn note_sale_value_is_fair_value_regardless_of_year() {
        let inputs = baseline_inputs();
        let lot = note_lot(1, 250_000.0, 250_000.0);
        assert_approx(sale_value(&lot, inputs.start_year + 10, &inputs), 250_000.0);
    }

    #[test]
    fn schedule_taxes_gain_and_reduces_owning_account() {
        let mut inputs = baseline_inputs();
        inputs.equity_growth_rate = 0.0;
        let lots = vec![equity_lot(1, 100_000.0, 60_000.0), note_lot(2, 50_000.0, 50_000.0)];

        let mut plan = LiquidationPlan::new();
        let year = inputs.start_year + 2;
        plan.assign(1, year);
        plan.assign(2, year);

        let events = schedule_events(&lots, &plan, &inputs);
        let event = events.get(&year).expect("event for sale year");
        assert_approx(event.gross, 150_000.0);
        assert_approx(event.tax, 40_000.0 * inputs.ltcg_rate);
        assert_approx(event.net, 150_000.0 - 8_000.0);
        assert_approx(event.equity_reduction, 100_000.0);
        assert_approx(event.note_reduction, 50_000.0);
    }

    #[test]
    fn loss_lots_pay_no_gains_tax() {
        let inputs = baseline_inputs();
        let lots = vec![equity_lot(1, 50_000.0, 90_000.0)];
        let mut plan = LiquidationPlan::new();
        plan.assign(1, inputs.start_year);

        let events = schedule_events(&lots, &plan, &inputs);
        let event = events.get(&inputs.start_year).expect("event");
        assert_approx(event.tax, 0.0);
        assert_approx(event.net, event.gross);
    }

    #[test]
    fn zero_basis_election_applies_to_fixed_income_only() {
        let mut inputs = baseline_inputs();
        inputs.fixed_income_zero_basis = true;
        let lots = vec![note_lot(1, 50_000.0, 50_000.0), equity_lot(2, 50_000.0, 50_000.0)];

        let mut plan = LiquidationPlan::new();
        plan.assign(1, inputs.start_year);
        plan.assign(2, inputs.start_year);

        let events = schedule_events(&lots, &plan, &inputs);
        let event = events.get(&inputs.start_year).expect("event");
        // The note's full 50k is gain under the election; the equity lot,
        // still carrying its real basis, has none.
        assert_approx(event.tax, 50_000.0 * inputs.ltcg_rate);
    }

    #[test]
    fn all_hold_plan_matches_disabled_liquidation_byte_for_byte() {
        let inputs = baseline_inputs();
        let lots = vec![equity_lot(1, 100_000.0, 60_000.0), note_lot(2, 50_000.0, 20_000.0)];
        let plan = LiquidationPlan::new();

        let with_lots =
            run_projection(&inputs, 200_000.0, &lots, &plan, Jurisdiction::Netherlands);
        let without =
            run_projection(&inputs, 200_000.0, &[], &plan, Jurisdiction::Netherlands);

        assert_eq!(with_lots, without);
        let with_json = serde_json::to_string(&with_lots).expect("serialize");
        let without_json = serde_json::to_string(&without).expect("serialize");
        assert_eq!(with_json, without_json);
    }

    #[test]
    fn liquidation_can_pay_margin_directly() {
        let mut inputs = baseline_inputs();
        inputs.liquidation_pays_margin = true;
        let lots = vec![equity_lot(1, 500_000.0, 500_000.0)];
        let mut plan = LiquidationPlan::new();
        plan.assign(1, inputs.start_year);

        // A deep shortfall year: under direct routing the proceeds retire
        // margin before the draw split runs, so only the margin share of the
        // (now larger) shortfall comes back on. Proceeds fed through the
        // waterfall instead shrink the shortfall itself, which leans harder
        // on margin overall.
        let routed =
            run_projection(&inputs, 1_000_000.0, &lots, &plan, Jurisdiction::Netherlands);
        inputs.liquidation_pays_margin = false;
        let waterfall =
            run_projection(&inputs, 1_000_000.0, &lots, &plan, Jurisdiction::Netherlands);

        assert!(routed[0].margin_balance < waterfall[0].margin_balance);
    }

    fn fast_config() -> SolveConfig {
        SolveConfig {
            scenario: Jurisdiction::Netherlands,
            search_max: 2_000_000.0,
            tolerance: 10.0,
            max_iterations: 80,
        }
    }

    fn small_inputs() -> Inputs {
        let mut inputs = baseline_inputs();
        inputs.start_age = 58;
        inputs.end_age = 63;
        inputs.note_balance = 500_000.0;
        inputs.equity_balance = 800_000.0;
        inputs.margin_loan = 200_000.0;
        inputs.secondary_balance = 300_000.0;
        inputs
    }

    #[test]
    fn optimizer_returns_all_hold_for_empty_lot_set() {
        let inputs = small_inputs();
        let result = optimize_schedule(&inputs, &[], fast_config()).expect("solves");
        assert!(result.plan.is_empty());
        assert!(result.steps.is_empty());
        assert!(result.withdrawal > 0.0);
    }

    #[test]
    fn optimizer_objective_is_monotone_across_steps() {
        let inputs = small_inputs();
        let lots = vec![
            equity_lot(1, 150_000.0, 150_000.0),
            note_lot(2, 100_000.0, 100_000.0),
        ];

        let baseline = optimize_schedule(&inputs, &[], fast_config())
            .expect("solves")
            .withdrawal;
        let result = optimize_schedule(&inputs, &lots, fast_config()).expect("solves");

        let mut previous = baseline;
        for step in &result.steps {
            assert!(step.withdrawal > previous);
            previous = step.withdrawal;
        }
        assert!(result.withdrawal + EPS >= baseline);
    }

    #[test]
    fn optimizer_assigns_free_money_lots() {
        let inputs = small_inputs();
        // Zero-basis-free lots with no gains tax are pure extra cash; holding
        // them forever cannot be optimal.
        let lots = vec![equity_lot(1, 200_000.0, 200_000.0)];

        let result = optimize_schedule(&inputs, &lots, fast_config()).expect("solves");
        assert!(result.plan.sale_year(1).is_some());
        assert!(!result.steps.is_empty());
    }
}
