use super::types::Inputs;

/// Opening balances a tax year is assessed on.
#[derive(Debug, Clone, Copy, Default)]
pub struct WealthSnapshot {
    pub notes: f64,
    pub equities: f64,
    pub margin: f64,
    /// Secondary account plus retirement balances; counted for net wealth but
    /// outside the deemed-return base.
    pub other_assets: f64,
}

impl WealthSnapshot {
    pub fn total_assets(&self) -> f64 {
        self.notes + self.equities + self.other_assets
    }
}

/// The year's income flows, computed from opening balances.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeFlows {
    pub note_interest: f64,
    pub dividends: f64,
    pub equity_growth: f64,
    pub margin_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DutchAssessment {
    pub deemed_or_actual: f64,
    pub margin_deduction: f64,
    pub allowance: f64,
    pub taxable: f64,
    pub tax: f64,
}

/// One year of Box 3 tax. Before the transition year the base is a deemed
/// return on assets net of a deemed debt charge; from the transition year
/// onward it is the actual return net of margin interest. A negative base
/// after the allowance is banked into `loss_carryforward` and offsets the
/// next positive year before flooring.
pub fn dutch_box3(
    inputs: &Inputs,
    year: i32,
    snapshot: &WealthSnapshot,
    flows: &IncomeFlows,
    loss_carryforward: &mut f64,
) -> DutchAssessment {
    let pre_transition = year < inputs.nl_transition_year;
    let deemed_or_actual = if pre_transition {
        (snapshot.notes + snapshot.equities) * inputs.nl_deemed_asset_rate
    } else {
        flows.note_interest + flows.dividends + flows.equity_growth
    };
    let margin_deduction = if pre_transition {
        snapshot.margin * inputs.nl_deemed_debt_rate
    } else {
        flows.margin_interest
    };

    let base = deemed_or_actual - margin_deduction - inputs.nl_allowance;
    let taxable = if inputs.nl_loss_carryforward {
        let net = base - *loss_carryforward;
        *loss_carryforward = (-net).max(0.0);
        net.max(0.0)
    } else {
        base.max(0.0)
    };

    DutchAssessment {
        deemed_or_actual,
        margin_deduction,
        allowance: inputs.nl_allowance,
        taxable,
        tax: taxable * inputs.nl_tax_rate,
    }
}

#[derive(Debug, Clone, Copy)]
struct WealthBracket {
    up_to: f64,
    rate: f64,
}

/// Zurich net-wealth schedule, CHF, married tariff.
const CH_WEALTH_BRACKETS: [WealthBracket; 7] = [
    WealthBracket {
        up_to: 161_000.0,
        rate: 0.0,
    },
    WealthBracket {
        up_to: 403_000.0,
        rate: 0.0005,
    },
    WealthBracket {
        up_to: 805_000.0,
        rate: 0.001,
    },
    WealthBracket {
        up_to: 1_451_000.0,
        rate: 0.0015,
    },
    WealthBracket {
        up_to: 2_418_000.0,
        rate: 0.002,
    },
    WealthBracket {
        up_to: 3_385_000.0,
        rate: 0.0025,
    },
    WealthBracket {
        up_to: f64::INFINITY,
        rate: 0.003,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WealthTaxBreakdown {
    pub basic: f64,
    pub municipal: f64,
    pub total: f64,
}

/// Marginal-bracket cantonal tax, scaled to cantonal + municipal by the
/// municipal multiplier.
pub fn zurich_wealth_tax(chf_wealth: f64, municipal_multiplier: f64) -> WealthTaxBreakdown {
    let mut basic = 0.0;
    let mut prev = 0.0;
    for bracket in &CH_WEALTH_BRACKETS {
        let taxable_slice = (chf_wealth.min(bracket.up_to) - prev).max(0.0);
        basic += taxable_slice * bracket.rate;
        prev = bracket.up_to;
        if chf_wealth <= bracket.up_to {
            break;
        }
    }
    let municipal = basic * (municipal_multiplier - 1.0);
    WealthTaxBreakdown {
        basic,
        municipal,
        total: basic + municipal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwissAssessment {
    pub net_wealth_usd: f64,
    pub net_wealth_chf: f64,
    pub cantonal_basic: f64,
    pub municipal: f64,
    pub total_wealth_chf: f64,
    pub total_wealth_usd: f64,
    pub investment_income: f64,
    pub income_tax: f64,
    pub total: f64,
}

/// Wealth tax on net assets converted to CHF, plus a flat tax on investment
/// income. Margin interest reduces the income base only when the
/// deductibility flag is set, and always before the zero floor.
pub fn swiss_tax(inputs: &Inputs, snapshot: &WealthSnapshot, flows: &IncomeFlows) -> SwissAssessment {
    let net_wealth_usd = (snapshot.total_assets() - snapshot.margin).max(0.0);
    let net_wealth_chf = net_wealth_usd * inputs.usd_chf;
    let wealth = zurich_wealth_tax(net_wealth_chf, inputs.municipal_multiplier);
    let total_wealth_usd = wealth.total / inputs.usd_chf.max(1e-4);

    let mut investment_income = flows.note_interest + flows.dividends;
    if inputs.ch_deduct_margin_interest {
        investment_income -= flows.margin_interest;
    }
    investment_income = investment_income.max(0.0);
    let income_tax = (investment_income * inputs.ch_investment_tax_rate).max(0.0);

    SwissAssessment {
        net_wealth_usd,
        net_wealth_chf,
        cantonal_basic: wealth.basic,
        municipal: wealth.municipal,
        total_wealth_chf: wealth.total,
        total_wealth_usd,
        investment_income,
        income_tax,
        total: total_wealth_usd + income_tax,
    }
}

/// Flat long-term rate on a realized gain; losses are never refunded.
pub fn capital_gains_tax(gain: f64, rate: f64) -> f64 {
    gain.max(0.0) * rate
}
