use super::lots::{LiquidationEvent, LiquidationPlan, TaxLot, schedule_events};
use super::tax::{self, IncomeFlows, WealthSnapshot};
use super::types::{
    Inputs, Jurisdiction, Projection, ProjectionSummary, YearRow, curve_multiplier,
};

/// Maximum margin balance permitted by the financing facility.
fn margin_cap(notes: f64, equities: f64) -> f64 {
    notes * 0.9 + equities * 0.5
}

#[derive(Debug)]
struct SimulationState {
    notes: f64,
    equities: f64,
    margin: f64,
    secondary: f64,
    retirement_primary: f64,
    retirement_partner: f64,
    nl_loss_carryforward: f64,
    /// Spending and tax the waterfall could not fund, carried so that an
    /// insolvent trajectory shows up as a negative ending balance instead of
    /// parking forever at the locked-collateral floor.
    unfunded: f64,
}

impl SimulationState {
    fn opening(inputs: &Inputs) -> Self {
        Self {
            notes: inputs.note_balance.max(0.0),
            equities: inputs.equity_balance.max(0.0),
            margin: inputs.margin_loan.max(0.0),
            secondary: inputs.secondary_balance.max(0.0),
            retirement_primary: inputs.retirement_primary.max(0.0),
            retirement_partner: inputs.retirement_partner.max(0.0),
            nl_loss_carryforward: 0.0,
            unfunded: 0.0,
        }
    }

    fn net_assets(&self) -> f64 {
        self.notes + self.equities + self.secondary + self.retirement_primary
            + self.retirement_partner
            - self.margin
    }
}

/// Level payment that amortizes `balance` to zero over `years_remaining` at
/// the given growth rate; straight-line when the rate is ~zero.
fn annuity_payment(balance: f64, rate: f64, years_remaining: u32) -> f64 {
    if balance <= 0.0 {
        return 0.0;
    }
    let years = years_remaining.max(1) as f64;
    if rate.abs() < 1e-9 {
        return balance / years;
    }
    if rate <= -0.99 {
        return balance;
    }

    let denom = 1.0 - (1.0 + rate).powf(-years);
    if denom <= 1e-9 {
        balance
    } else {
        balance * rate / denom
    }
}

/// Annuitized payment for a retirement account, computed on the opening
/// balance and collected after the year's growth. Recomputing the level
/// payment from the shrinking balance each year reproduces the same amount
/// and lands the account on zero at the end of the window.
fn retirement_year(inputs: &Inputs, age: u32, balance: &mut f64) -> f64 {
    let growth_factor = 1.0 + inputs.retirement_growth_rate;
    let grown = (*balance * growth_factor).max(0.0);

    let active = inputs.retirement_drawdown_years > 0
        && age >= inputs.retirement_drawdown_start_age
        && age - inputs.retirement_drawdown_start_age < inputs.retirement_drawdown_years;
    if !active {
        *balance = grown;
        return 0.0;
    }

    let remaining = inputs.retirement_drawdown_years - (age - inputs.retirement_drawdown_start_age);
    let payment =
        annuity_payment(*balance, inputs.retirement_growth_rate, remaining).min(grown);
    *balance = (grown - payment).max(0.0);
    payment
}

/// Allocates a funding shortfall across the margin facility and the secondary
/// account. Returns the uncovered remainder.
fn draw_shortfall(inputs: &Inputs, state: &mut SimulationState, shortfall: f64) -> f64 {
    let cap = margin_cap(state.notes, state.equities);
    let share = inputs.margin_draw_share.clamp(0.0, 1.0);

    let mut margin_draw = shortfall * share;
    let mut secondary_draw = shortfall - margin_draw;

    let headroom = (cap - state.margin).max(0.0);
    if margin_draw > headroom {
        secondary_draw += margin_draw - headroom;
        margin_draw = headroom;
    }

    let mut uncovered = 0.0;
    if secondary_draw > state.secondary {
        let excess = secondary_draw - state.secondary;
        secondary_draw = state.secondary;
        let remaining_headroom = (cap - state.margin - margin_draw).max(0.0);
        let redirected = excess.min(remaining_headroom);
        margin_draw += redirected;
        uncovered = excess - redirected;
    }

    state.margin += margin_draw;
    state.secondary -= secondary_draw;
    uncovered
}

/// Restores `margin <= 0.9*notes + 0.5*equities` after interest
/// capitalization or shrinking collateral. The secondary account is drained
/// first; any remainder force-sells equity, then notes. Selling one dollar of
/// equity cuts the excess by fifty cents, one dollar of notes by ten.
fn enforce_margin_cap(state: &mut SimulationState) {
    let mut excess = state.margin - margin_cap(state.notes, state.equities);
    if excess <= 0.0 {
        return;
    }

    let from_secondary = state.secondary.min(excess);
    state.secondary -= from_secondary;
    state.margin -= from_secondary;
    excess -= from_secondary;
    if excess <= 0.0 {
        return;
    }

    let equity_sale = (2.0 * excess).min(state.equities);
    state.equities -= equity_sale;
    state.margin = (state.margin - equity_sale).max(0.0);

    excess = state.margin - margin_cap(state.notes, state.equities);
    if excess > 0.0 {
        let note_sale = (10.0 * excess).min(state.notes);
        state.notes -= note_sale;
        state.margin = (state.margin - note_sale).max(0.0);
    }
}

/// One deterministic year-by-year trajectory for a chosen residency scenario
/// and constant base withdrawal. Pure: identical arguments always produce the
/// identical row sequence.
pub fn run_projection(
    inputs: &Inputs,
    base_withdrawal: f64,
    lots: &[TaxLot],
    plan: &LiquidationPlan,
    scenario: Jurisdiction,
) -> Vec<YearRow> {
    let inputs = inputs.sanitized();
    let base_withdrawal = if base_withdrawal.is_finite() {
        base_withdrawal.max(0.0)
    } else {
        0.0
    };

    let events = schedule_events(lots, plan, &inputs);
    let mut state = SimulationState::opening(&inputs);
    let mut rows = Vec::with_capacity((inputs.final_year() - inputs.start_year + 1) as usize);

    for year in inputs.start_year..=inputs.final_year() {
        let age = inputs.age_in(year);

        let flows = IncomeFlows {
            note_interest: state.notes * inputs.note_rate,
            dividends: state.equities * inputs.dividend_yield,
            equity_growth: state.equities * inputs.equity_growth_rate,
            margin_interest: state.margin * inputs.margin_rate,
        };
        let secondary_earnings = state.secondary * inputs.secondary_rate();

        let benefits_active = age >= inputs.benefit_start_age;
        let benefit_primary = if benefits_active {
            inputs.benefit_primary_monthly * 12.0 * inputs.benefit_haircut
        } else {
            0.0
        };
        let benefit_partner = if benefits_active {
            inputs.benefit_partner_monthly * 12.0 * inputs.benefit_haircut
        } else {
            0.0
        };

        let snapshot = WealthSnapshot {
            notes: state.notes,
            equities: state.equities,
            margin: state.margin,
            other_assets: state.secondary + state.retirement_primary + state.retirement_partner,
        };
        let nl = tax::dutch_box3(&inputs, year, &snapshot, &flows, &mut state.nl_loss_carryforward);
        let ch = tax::swiss_tax(&inputs, &snapshot, &flows);
        let ch_applies = inputs.move_year.is_some_and(|move_year| year >= move_year);
        let ch_total_tax = if ch_applies { ch.total } else { nl.tax };

        let charged_tax = match scenario {
            Jurisdiction::Netherlands => nl.tax,
            Jurisdiction::Switzerland => ch_total_tax,
        };

        // Growth: note interest and dividends are cash, the balances they
        // come from stay put; equity growth and secondary earnings reinvest;
        // margin interest capitalizes onto the loan.
        state.equities += flows.equity_growth;
        state.secondary += secondary_earnings;
        state.margin += flows.margin_interest;

        let retirement_withdrawal = retirement_year(&inputs, age, &mut state.retirement_primary)
            + retirement_year(&inputs, age, &mut state.retirement_partner);

        let event = events.get(&year).copied().unwrap_or(LiquidationEvent::ZERO);
        state.equities = (state.equities - event.equity_reduction).max(0.0);
        state.notes = (state.notes - event.note_reduction).max(0.0);
        let liquidation_cash = if inputs.liquidation_pays_margin {
            state.margin = (state.margin - event.net).max(0.0);
            0.0
        } else {
            event.net
        };

        let withdrawal = base_withdrawal * curve_multiplier(age);

        let cash_income = flows.note_interest
            + flows.dividends
            + benefit_primary
            + benefit_partner
            + retirement_withdrawal
            + liquidation_cash;
        let net_flow = cash_income - charged_tax - withdrawal;

        let uncovered_shortfall = if net_flow >= 0.0 {
            state.margin = (state.margin - net_flow).max(0.0);
            0.0
        } else {
            draw_shortfall(&inputs, &mut state, -net_flow)
        };
        state.unfunded += uncovered_shortfall;

        state.notes = state.notes.max(0.0);
        state.equities = state.equities.max(0.0);
        state.secondary = state.secondary.max(0.0);

        enforce_margin_cap(&mut state);

        let net_assets = state.net_assets() - state.unfunded;
        let total_income = flows.note_interest + flows.dividends - flows.margin_interest
            + benefit_primary
            + benefit_partner
            + retirement_withdrawal;

        rows.push(YearRow {
            age,
            year,
            benefit_primary,
            benefit_partner,
            retirement_primary_balance: state.retirement_primary,
            retirement_partner_balance: state.retirement_partner,
            retirement_withdrawal,
            note_balance: state.notes,
            note_interest: flows.note_interest,
            equity_balance: state.equities,
            dividends: flows.dividends,
            equity_growth: flows.equity_growth,
            margin_balance: state.margin,
            margin_interest: flows.margin_interest,
            secondary_balance: state.secondary,
            secondary_earnings,
            liquidation_gross: event.gross,
            liquidation_tax: event.tax,
            liquidation_net: event.net,
            nl_deemed_or_actual: nl.deemed_or_actual,
            nl_margin_deduction: nl.margin_deduction,
            nl_allowance: nl.allowance,
            nl_taxable: nl.taxable,
            nl_tax_rate: inputs.nl_tax_rate,
            nl_box3_tax: nl.tax,
            nl_ftc_credit: nl.tax,
            ch_net_wealth_usd: ch.net_wealth_usd,
            ch_net_wealth_chf: ch.net_wealth_chf,
            ch_cantonal_basic_tax: ch.cantonal_basic,
            ch_municipal_tax: ch.municipal,
            ch_total_wealth_tax_chf: ch.total_wealth_chf,
            ch_total_wealth_tax_usd: if ch_applies { ch.total_wealth_usd } else { 0.0 },
            ch_investment_income: ch.investment_income,
            ch_income_tax: if ch_applies { ch.income_tax } else { 0.0 },
            ch_total_tax,
            total_income,
            withdrawal,
            uncovered_shortfall,
            ending_balance_nl: net_assets + charged_tax - nl.tax,
            ending_balance_ch: net_assets + charged_tax - ch_total_tax,
        });
    }

    rows
}

pub fn summarize(rows: &[YearRow]) -> ProjectionSummary {
    let years = rows.len().max(1) as f64;
    let total_withdrawal: f64 = rows.iter().map(|r| r.withdrawal).sum();

    ProjectionSummary {
        total_income: rows.iter().map(|r| r.total_income).sum(),
        total_tax_nl: rows.iter().map(|r| r.nl_box3_tax).sum(),
        total_tax_ch: rows.iter().map(|r| r.ch_total_tax).sum(),
        total_withdrawal,
        avg_withdrawal: total_withdrawal / years,
        total_liquidation_tax: rows.iter().map(|r| r.liquidation_tax).sum(),
        total_uncovered_shortfall: rows.iter().map(|r| r.uncovered_shortfall).sum(),
        ending_nl: rows.last().map(|r| r.ending_balance_nl).unwrap_or(0.0),
        ending_ch: rows.last().map(|r| r.ending_balance_ch).unwrap_or(0.0),
        depleted_year_nl: rows
            .iter()
            .find(|r| r.ending_balance_nl <= 0.0)
            .map(|r| r.year),
        depleted_year_ch: rows
            .iter()
            .find(|r| r.ending_balance_ch <= 0.0)
            .map(|r| r.year),
    }
}

pub fn project(
    inputs: &Inputs,
    base_withdrawal: f64,
    lots: &[TaxLot],
    plan: &LiquidationPlan,
    scenario: Jurisdiction,
) -> Projection {
    let rows = run_projection(inputs, base_withdrawal, lots, plan, scenario);
    let summary = summarize(&rows);
    Projection { rows, summary }
}
