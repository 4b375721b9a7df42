use serde::Serialize;

/// Which residency scenario's tax bill is actually charged against cash flow.
///
/// The Switzerland scenario still pays Dutch tax for years before the
/// relocation year; with no relocation year configured it is identical to the
/// Netherlands scenario.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Jurisdiction {
    Netherlands,
    Switzerland,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub start_year: i32,
    pub start_age: u32,
    pub end_age: u32,

    pub note_balance: f64,
    pub equity_balance: f64,
    pub margin_loan: f64,
    pub secondary_balance: f64,
    pub retirement_primary: f64,
    pub retirement_partner: f64,

    pub note_rate: f64,
    pub dividend_yield: f64,
    pub equity_growth_rate: f64,
    pub margin_rate: f64,
    /// Own return rate for the secondary account; defaults to dividend yield
    /// plus equity growth when absent.
    pub secondary_return_rate: Option<f64>,
    pub retirement_growth_rate: f64,

    pub benefit_primary_monthly: f64,
    pub benefit_partner_monthly: f64,
    pub benefit_start_age: u32,
    pub benefit_haircut: f64,

    /// Share of a funding shortfall drawn against margin; the rest comes from
    /// the secondary account.
    pub margin_draw_share: f64,

    pub move_year: Option<i32>,
    pub usd_chf: f64,
    pub municipal_multiplier: f64,

    pub nl_transition_year: i32,
    pub nl_deemed_asset_rate: f64,
    pub nl_deemed_debt_rate: f64,
    pub nl_allowance: f64,
    pub nl_tax_rate: f64,
    pub nl_loss_carryforward: bool,

    pub ch_investment_tax_rate: f64,
    pub ch_deduct_margin_interest: bool,

    pub ltcg_rate: f64,
    pub liquidation_pays_margin: bool,
    pub fixed_income_zero_basis: bool,

    pub retirement_drawdown_start_age: u32,
    /// Number of years over which the retirement accounts are annuitized to
    /// zero; 0 disables scheduled decumulation.
    pub retirement_drawdown_years: u32,
}

impl Inputs {
    /// Last simulated calendar year.
    pub fn final_year(&self) -> i32 {
        self.start_year + self.end_age.saturating_sub(self.start_age) as i32
    }

    pub fn age_in(&self, year: i32) -> u32 {
        let offset = year - self.start_year;
        if offset < 0 {
            self.start_age
        } else {
            self.start_age + offset as u32
        }
    }

    pub fn secondary_rate(&self) -> f64 {
        self.secondary_return_rate
            .unwrap_or(self.dividend_yield + self.equity_growth_rate)
    }

    /// Returns a copy with every non-finite numeric field coerced to zero so
    /// that NaN/Infinity never enters the year loop.
    pub fn sanitized(&self) -> Inputs {
        fn safe(n: f64) -> f64 {
            if n.is_finite() { n } else { 0.0 }
        }

        Inputs {
            note_balance: safe(self.note_balance),
            equity_balance: safe(self.equity_balance),
            margin_loan: safe(self.margin_loan),
            secondary_balance: safe(self.secondary_balance),
            retirement_primary: safe(self.retirement_primary),
            retirement_partner: safe(self.retirement_partner),
            note_rate: safe(self.note_rate),
            dividend_yield: safe(self.dividend_yield),
            equity_growth_rate: safe(self.equity_growth_rate),
            margin_rate: safe(self.margin_rate),
            secondary_return_rate: self.secondary_return_rate.map(safe),
            retirement_growth_rate: safe(self.retirement_growth_rate),
            benefit_primary_monthly: safe(self.benefit_primary_monthly),
            benefit_partner_monthly: safe(self.benefit_partner_monthly),
            benefit_haircut: safe(self.benefit_haircut),
            margin_draw_share: safe(self.margin_draw_share),
            usd_chf: safe(self.usd_chf),
            municipal_multiplier: safe(self.municipal_multiplier),
            nl_deemed_asset_rate: safe(self.nl_deemed_asset_rate),
            nl_deemed_debt_rate: safe(self.nl_deemed_debt_rate),
            nl_allowance: safe(self.nl_allowance),
            nl_tax_rate: safe(self.nl_tax_rate),
            ch_investment_tax_rate: safe(self.ch_investment_tax_rate),
            ltcg_rate: safe(self.ltcg_rate),
            ..self.clone()
        }
    }
}

/// One step of the age-dependent spending curve. The first band whose
/// inclusive range contains the current age wins; ages outside every band
/// spend at the base rate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WithdrawalBand {
    pub min_age: u32,
    pub max_age: u32,
    pub multiplier: f64,
}

/// Full rate until 70, reduced through the 70s while benefits offset
/// spending, then slightly raised for the remaining years.
pub const WITHDRAWAL_CURVE: [WithdrawalBand; 3] = [
    WithdrawalBand {
        min_age: 58,
        max_age: 69,
        multiplier: 1.0,
    },
    WithdrawalBand {
        min_age: 70,
        max_age: 79,
        multiplier: 0.9,
    },
    WithdrawalBand {
        min_age: 80,
        max_age: 90,
        multiplier: 1.026,
    },
];

pub fn curve_multiplier(age: u32) -> f64 {
    WITHDRAWAL_CURVE
        .iter()
        .find(|band| age >= band.min_age && age <= band.max_age)
        .map(|band| band.multiplier)
        .unwrap_or(1.0)
}

/// One simulated year. Rows are immutable once produced; the ordered sequence
/// for a run is the complete audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRow {
    pub age: u32,
    pub year: i32,

    pub benefit_primary: f64,
    pub benefit_partner: f64,
    pub retirement_primary_balance: f64,
    pub retirement_partner_balance: f64,
    pub retirement_withdrawal: f64,

    pub note_balance: f64,
    pub note_interest: f64,
    pub equity_balance: f64,
    pub dividends: f64,
    pub equity_growth: f64,
    pub margin_balance: f64,
    pub margin_interest: f64,
    pub secondary_balance: f64,
    pub secondary_earnings: f64,

    pub liquidation_gross: f64,
    pub liquidation_tax: f64,
    pub liquidation_net: f64,

    pub nl_deemed_or_actual: f64,
    pub nl_margin_deduction: f64,
    pub nl_allowance: f64,
    pub nl_taxable: f64,
    pub nl_tax_rate: f64,
    pub nl_box3_tax: f64,
    pub nl_ftc_credit: f64,

    pub ch_net_wealth_usd: f64,
    pub ch_net_wealth_chf: f64,
    pub ch_cantonal_basic_tax: f64,
    pub ch_municipal_tax: f64,
    pub ch_total_wealth_tax_chf: f64,
    pub ch_total_wealth_tax_usd: f64,
    pub ch_investment_income: f64,
    pub ch_income_tax: f64,
    pub ch_total_tax: f64,

    pub total_income: f64,
    pub withdrawal: f64,
    pub uncovered_shortfall: f64,

    pub ending_balance_nl: f64,
    pub ending_balance_ch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub total_income: f64,
    pub total_tax_nl: f64,
    pub total_tax_ch: f64,
    pub total_withdrawal: f64,
    pub avg_withdrawal: f64,
    pub total_liquidation_tax: f64,
    pub total_uncovered_shortfall: f64,
    pub ending_nl: f64,
    pub ending_ch: f64,
    /// First calendar year the jurisdiction's ending balance is non-positive.
    pub depleted_year_nl: Option<i32>,
    pub depleted_year_ch: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub rows: Vec<YearRow>,
    pub summary: ProjectionSummary,
}
