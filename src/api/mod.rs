use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Inputs, Jurisdiction, LiquidationPlan, OptimizerStep, ProjectionSummary, SolveConfig, TaxLot,
    YearRow, optimize_schedule, project, solve_base_withdrawal,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliScenario {
    Netherlands,
    Switzerland,
}

impl From<CliScenario> for Jurisdiction {
    fn from(value: CliScenario) -> Self {
        match value {
            CliScenario::Netherlands => Jurisdiction::Netherlands,
            CliScenario::Switzerland => Jurisdiction::Switzerland,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiScenario {
    #[serde(alias = "nl", alias = "NL")]
    Netherlands,
    #[serde(alias = "ch", alias = "CH")]
    Switzerland,
}

impl From<ApiScenario> for CliScenario {
    fn from(value: ApiScenario) -> Self {
        match value {
            ApiScenario::Netherlands => CliScenario::Netherlands,
            ApiScenario::Switzerland => CliScenario::Switzerland,
        }
    }
}

impl From<Jurisdiction> for ApiScenario {
    fn from(value: Jurisdiction) -> Self {
        match value {
            Jurisdiction::Netherlands => ApiScenario::Netherlands,
            Jurisdiction::Switzerland => ApiScenario::Switzerland,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    start_year: Option<i32>,
    start_age: Option<u32>,
    end_age: Option<u32>,

    note_balance: Option<f64>,
    equity_balance: Option<f64>,
    margin_loan: Option<f64>,
    secondary_balance: Option<f64>,
    retirement_primary: Option<f64>,
    retirement_partner: Option<f64>,

    note_rate: Option<f64>,
    dividend_yield: Option<f64>,
    equity_growth_rate: Option<f64>,
    margin_rate: Option<f64>,
    secondary_return_rate: Option<f64>,
    retirement_growth_rate: Option<f64>,

    benefit_primary_monthly: Option<f64>,
    benefit_partner_monthly: Option<f64>,
    benefit_start_age: Option<u32>,
    benefit_haircut: Option<f64>,

    margin_draw_share: Option<f64>,

    move_year: Option<i32>,
    move_never: Option<bool>,
    usd_chf: Option<f64>,
    municipal_multiplier: Option<f64>,

    nl_transition_year: Option<i32>,
    nl_deemed_asset_rate: Option<f64>,
    nl_deemed_debt_rate: Option<f64>,
    nl_allowance: Option<f64>,
    nl_tax_rate: Option<f64>,
    nl_loss_carryforward: Option<bool>,

    ch_investment_tax_rate: Option<f64>,
    ch_deduct_margin_interest: Option<bool>,

    ltcg_rate: Option<f64>,
    liquidation_pays_margin: Option<bool>,
    fixed_income_zero_basis: Option<bool>,

    retirement_drawdown_start_age: Option<u32>,
    retirement_drawdown_years: Option<u32>,

    solve_max: Option<f64>,
    solve_tolerance: Option<f64>,
    solve_iterations: Option<u32>,

    target_scenario: Option<ApiScenario>,
    base_withdrawal: Option<f64>,
    optimize: Option<bool>,
    lots: Option<Vec<TaxLot>>,
    assignments: Option<BTreeMap<u32, i32>>,
}

#[derive(Parser, Debug)]
#[command(
    name = "drawdown",
    about = "Household drawdown projector (Netherlands vs Switzerland residency)"
)]
struct Cli {
    #[arg(long, default_value_t = 2026)]
    start_year: i32,
    #[arg(long, default_value_t = 58)]
    start_age: u32,
    #[arg(long, default_value_t = 90, help = "Age to fund through")]
    end_age: u32,

    #[arg(long, default_value_t = 4_100_069.0, help = "Floating-rate note ladder balance")]
    note_balance: f64,
    #[arg(long, default_value_t = 7_731_381.0)]
    equity_balance: f64,
    #[arg(long, default_value_t = 6_451_994.0)]
    margin_loan: f64,
    #[arg(long, default_value_t = 1_206_187.0, help = "Secondary brokerage balance")]
    secondary_balance: f64,
    #[arg(long, default_value_t = 398_054.0)]
    retirement_primary: f64,
    #[arg(long, default_value_t = 194_528.0)]
    retirement_partner: f64,

    #[arg(long, default_value_t = 4.34, help = "Note interest rate in percent")]
    note_rate: f64,
    #[arg(long, default_value_t = 2.65, help = "Dividend yield in percent")]
    dividend_yield: f64,
    #[arg(long, default_value_t = 2.65, help = "Equity capital growth in percent")]
    equity_growth_rate: f64,
    #[arg(long, default_value_t = 5.678, help = "Margin interest rate in percent")]
    margin_rate: f64,
    #[arg(
        long,
        help = "Secondary account return in percent; defaults to dividend yield plus growth"
    )]
    secondary_return_rate: Option<f64>,
    #[arg(long, default_value_t = 5.3, help = "Retirement account growth in percent")]
    retirement_growth_rate: f64,

    #[arg(long, default_value_t = 3_750.0)]
    benefit_primary_monthly: f64,
    #[arg(long, default_value_t = 3_750.0)]
    benefit_partner_monthly: f64,
    #[arg(long, default_value_t = 70)]
    benefit_start_age: u32,
    #[arg(
        long,
        default_value_t = 80.0,
        help = "Solvency haircut applied to benefits, in percent"
    )]
    benefit_haircut: f64,

    #[arg(
        long,
        default_value_t = 70.0,
        help = "Share of shortfalls drawn against margin, in percent"
    )]
    margin_draw_share: f64,

    #[arg(long, help = "Calendar year of the move to Switzerland; omit for never")]
    move_year: Option<i32>,
    #[arg(long, default_value_t = 0.9)]
    usd_chf: f64,
    #[arg(long, default_value_t = 1.19, help = "Zurich municipal multiplier")]
    municipal_multiplier: f64,

    #[arg(
        long,
        default_value_t = 2028,
        help = "First year Box 3 taxes actual returns instead of the deemed return"
    )]
    nl_transition_year: i32,
    #[arg(long, default_value_t = 6.04, help = "Deemed return on assets in percent")]
    nl_deemed_asset_rate: f64,
    #[arg(long, default_value_t = 2.47, help = "Deemed charge on debt in percent")]
    nl_deemed_debt_rate: f64,
    #[arg(long, default_value_t = 3_600.0)]
    nl_allowance: f64,
    #[arg(long, default_value_t = 36.0, help = "Box 3 flat rate in percent")]
    nl_tax_rate: f64,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    nl_loss_carryforward: bool,

    #[arg(long, default_value_t = 22.0, help = "Swiss investment income rate in percent")]
    ch_investment_tax_rate: f64,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Net margin interest against Swiss investment income"
    )]
    ch_deduct_margin_interest: bool,

    #[arg(long, default_value_t = 20.0, help = "Long-term capital gains rate in percent")]
    ltcg_rate: f64,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Route liquidation proceeds to the margin loan instead of the waterfall"
    )]
    liquidation_pays_margin: bool,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Basis step-down election: fixed-income lots realize full sale value as gain"
    )]
    fixed_income_zero_basis: bool,

    #[arg(long, default_value_t = 70)]
    retirement_drawdown_start_age: u32,
    #[arg(
        long,
        default_value_t = 0,
        help = "Years over which retirement accounts annuitize to zero; 0 disables"
    )]
    retirement_drawdown_years: u32,

    #[arg(long, default_value_t = 2_000_000.0)]
    solve_max: f64,
    #[arg(long, default_value_t = 10.0, help = "Terminal balance tolerance in dollars")]
    solve_tolerance: f64,
    #[arg(long, default_value_t = 80)]
    solve_iterations: u32,

    #[arg(long, value_enum, default_value_t = CliScenario::Netherlands)]
    target_scenario: CliScenario,
}

#[derive(Debug)]
struct ApiOptions {
    scenario: Jurisdiction,
    base_withdrawal: Option<f64>,
    optimize: bool,
    lots: Vec<TaxLot>,
    plan: LiquidationPlan,
    solve: SolveConfig,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: Inputs,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    scenario: ApiScenario,
    base_withdrawal: f64,
    solved: bool,
    converged: Option<bool>,
    solver_iterations: Option<u32>,
    terminal_balance: f64,
    rows: Vec<YearRow>,
    summary: ProjectionSummary,
    optimized_plan: Option<LiquidationPlan>,
    optimizer_steps: Option<Vec<OptimizerStep>>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<Inputs, String> {
    if cli.end_age < cli.start_age {
        return Err("--end-age must be >= --start-age".to_string());
    }
    if cli.end_age - cli.start_age > 120 {
        return Err("--end-age spans an implausible horizon".to_string());
    }

    for (name, balance) in [
        ("--note-balance", cli.note_balance),
        ("--equity-balance", cli.equity_balance),
        ("--margin-loan", cli.margin_loan),
        ("--secondary-balance", cli.secondary_balance),
        ("--retirement-primary", cli.retirement_primary),
        ("--retirement-partner", cli.retirement_partner),
        ("--benefit-primary-monthly", cli.benefit_primary_monthly),
        ("--benefit-partner-monthly", cli.benefit_partner_monthly),
        ("--nl-allowance", cli.nl_allowance),
    ] {
        if !balance.is_finite() || balance < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    for (name, rate) in [
        ("--note-rate", cli.note_rate),
        ("--dividend-yield", cli.dividend_yield),
        ("--equity-growth-rate", cli.equity_growth_rate),
        ("--margin-rate", cli.margin_rate),
        ("--retirement-growth-rate", cli.retirement_growth_rate),
    ] {
        if !rate.is_finite() || rate <= -100.0 {
            return Err(format!("{name} must be a percentage > -100"));
        }
    }

    for (name, pct) in [
        ("--benefit-haircut", cli.benefit_haircut),
        ("--margin-draw-share", cli.margin_draw_share),
        ("--nl-deemed-asset-rate", cli.nl_deemed_asset_rate),
        ("--nl-deemed-debt-rate", cli.nl_deemed_debt_rate),
        ("--nl-tax-rate", cli.nl_tax_rate),
        ("--ch-investment-tax-rate", cli.ch_investment_tax_rate),
        ("--ltcg-rate", cli.ltcg_rate),
    ] {
        if !(0.0..=100.0).contains(&pct) {
            return Err(format!("{name} must be between 0 and 100"));
        }
    }

    if let Some(rate) = cli.secondary_return_rate {
        if !rate.is_finite() || rate <= -100.0 {
            return Err("--secondary-return-rate must be a percentage > -100".to_string());
        }
    }

    if !cli.usd_chf.is_finite() || cli.usd_chf <= 0.0 {
        return Err("--usd-chf must be > 0".to_string());
    }

    if !cli.municipal_multiplier.is_finite() || cli.municipal_multiplier < 1.0 {
        return Err("--municipal-multiplier must be >= 1".to_string());
    }

    if !cli.solve_max.is_finite() || cli.solve_max <= 0.0 {
        return Err("--solve-max must be > 0".to_string());
    }
    if !cli.solve_tolerance.is_finite() || cli.solve_tolerance <= 0.0 {
        return Err("--solve-tolerance must be > 0".to_string());
    }
    if cli.solve_iterations == 0 {
        return Err("--solve-iterations must be > 0".to_string());
    }

    Ok(Inputs {
        start_year: cli.start_year,
        start_age: cli.start_age,
        end_age: cli.end_age,
        note_balance: cli.note_balance,
        equity_balance: cli.equity_balance,
        margin_loan: cli.margin_loan,
        secondary_balance: cli.secondary_balance,
        retirement_primary: cli.retirement_primary,
        retirement_partner: cli.retirement_partner,
        note_rate: cli.note_rate / 100.0,
        dividend_yield: cli.dividend_yield / 100.0,
        equity_growth_rate: cli.equity_growth_rate / 100.0,
        margin_rate: cli.margin_rate / 100.0,
        secondary_return_rate: cli.secondary_return_rate.map(|rate| rate / 100.0),
        retirement_growth_rate: cli.retirement_growth_rate / 100.0,
        benefit_primary_monthly: cli.benefit_primary_monthly,
        benefit_partner_monthly: cli.benefit_partner_monthly,
        benefit_start_age: cli.benefit_start_age,
        benefit_haircut: cli.benefit_haircut / 100.0,
        margin_draw_share: cli.margin_draw_share / 100.0,
        move_year: cli.move_year,
        usd_chf: cli.usd_chf,
        municipal_multiplier: cli.municipal_multiplier,
        nl_transition_year: cli.nl_transition_year,
        nl_deemed_asset_rate: cli.nl_deemed_asset_rate / 100.0,
        nl_deemed_debt_rate: cli.nl_deemed_debt_rate / 100.0,
        nl_allowance: cli.nl_allowance,
        nl_tax_rate: cli.nl_tax_rate / 100.0,
        nl_loss_carryforward: cli.nl_loss_carryforward,
        ch_investment_tax_rate: cli.ch_investment_tax_rate / 100.0,
        ch_deduct_margin_interest: cli.ch_deduct_margin_interest,
        ltcg_rate: cli.ltcg_rate / 100.0,
        liquidation_pays_margin: cli.liquidation_pays_margin,
        fixed_income_zero_basis: cli.fixed_income_zero_basis,
        retirement_drawdown_start_age: cli.retirement_drawdown_start_age,
        retirement_drawdown_years: cli.retirement_drawdown_years,
    })
}

fn validate_lots(inputs: &Inputs, lots: &[TaxLot], plan: &LiquidationPlan) -> Result<(), String> {
    for lot in lots {
        if !lot.fair_value.is_finite() || lot.fair_value < 0.0 {
            return Err(format!("lot {} fairValue must be >= 0", lot.id));
        }
        if !lot.cost_basis.is_finite() || lot.cost_basis < 0.0 {
            return Err(format!("lot {} costBasis must be >= 0", lot.id));
        }
    }

    for (lot_id, sale_year) in plan.iter() {
        if !lots.iter().any(|lot| lot.id == lot_id) {
            return Err(format!("assignment references unknown lot {lot_id}"));
        }
        if sale_year < inputs.start_year || sale_year > inputs.final_year() {
            return Err(format!(
                "lot {lot_id} sale year {sale_year} is outside the projection horizon"
            ));
        }
    }

    Ok(())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("drawdown API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match run_request(request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn run_request(request: ApiRequest) -> Result<SimulateResponse, String> {
    let ApiRequest { inputs, options } = request;
    let scenario = options.scenario;

    if options.optimize {
        let optimized = optimize_schedule(&inputs, &options.lots, options.solve)?;
        let projection = project(
            &inputs,
            optimized.withdrawal,
            &options.lots,
            &optimized.plan,
            scenario,
        );
        let terminal = terminal_for(&projection.summary, scenario);
        return Ok(SimulateResponse {
            scenario: scenario.into(),
            base_withdrawal: optimized.withdrawal,
            solved: true,
            converged: None,
            solver_iterations: None,
            terminal_balance: terminal,
            rows: projection.rows,
            summary: projection.summary,
            optimized_plan: Some(optimized.plan),
            optimizer_steps: Some(optimized.steps),
        });
    }

    if let Some(base_withdrawal) = options.base_withdrawal {
        let projection = project(&inputs, base_withdrawal, &options.lots, &options.plan, scenario);
        let terminal = terminal_for(&projection.summary, scenario);
        return Ok(SimulateResponse {
            scenario: scenario.into(),
            base_withdrawal,
            solved: false,
            converged: None,
            solver_iterations: None,
            terminal_balance: terminal,
            rows: projection.rows,
            summary: projection.summary,
            optimized_plan: None,
            optimizer_steps: None,
        });
    }

    let solved = solve_base_withdrawal(&inputs, &options.lots, &options.plan, options.solve)?;
    let projection = project(&inputs, solved.withdrawal, &options.lots, &options.plan, scenario);
    Ok(SimulateResponse {
        scenario: scenario.into(),
        base_withdrawal: solved.withdrawal,
        solved: true,
        converged: Some(solved.converged),
        solver_iterations: Some(solved.iterations),
        terminal_balance: solved.terminal_balance,
        rows: projection.rows,
        summary: projection.summary,
        optimized_plan: None,
        optimizer_steps: None,
    })
}

fn terminal_for(summary: &ProjectionSummary, scenario: Jurisdiction) -> f64 {
    match scenario {
        Jurisdiction::Netherlands => summary.ending_nl,
        Jurisdiction::Switzerland => summary.ending_ch,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.start_year {
        cli.start_year = v;
    }
    if let Some(v) = payload.start_age {
        cli.start_age = v;
    }
    if let Some(v) = payload.end_age {
        cli.end_age = v;
    }

    if let Some(v) = payload.note_balance {
        cli.note_balance = v;
    }
    if let Some(v) = payload.equity_balance {
        cli.equity_balance = v;
    }
    if let Some(v) = payload.margin_loan {
        cli.margin_loan = v;
    }
    if let Some(v) = payload.secondary_balance {
        cli.secondary_balance = v;
    }
    if let Some(v) = payload.retirement_primary {
        cli.retirement_primary = v;
    }
    if let Some(v) = payload.retirement_partner {
        cli.retirement_partner = v;
    }

    if let Some(v) = payload.note_rate {
        cli.note_rate = v;
    }
    if let Some(v) = payload.dividend_yield {
        cli.dividend_yield = v;
    }
    if let Some(v) = payload.equity_growth_rate {
        cli.equity_growth_rate = v;
    }
    if let Some(v) = payload.margin_rate {
        cli.margin_rate = v;
    }
    if let Some(v) = payload.secondary_return_rate {
        cli.secondary_return_rate = Some(v);
    }
    if let Some(v) = payload.retirement_growth_rate {
        cli.retirement_growth_rate = v;
    }

    if let Some(v) = payload.benefit_primary_monthly {
        cli.benefit_primary_monthly = v;
    }
    if let Some(v) = payload.benefit_partner_monthly {
        cli.benefit_partner_monthly = v;
    }
    if let Some(v) = payload.benefit_start_age {
        cli.benefit_start_age = v;
    }
    if let Some(v) = payload.benefit_haircut {
        cli.benefit_haircut = v;
    }

    if let Some(v) = payload.margin_draw_share {
        cli.margin_draw_share = v;
    }

    if let Some(v) = payload.move_year {
        cli.move_year = Some(v);
    }
    if payload.move_never == Some(true) {
        cli.move_year = None;
    }
    if let Some(v) = payload.usd_chf {
        cli.usd_chf = v;
    }
    if let Some(v) = payload.municipal_multiplier {
        cli.municipal_multiplier = v;
    }

    if let Some(v) = payload.nl_transition_year {
        cli.nl_transition_year = v;
    }
    if let Some(v) = payload.nl_deemed_asset_rate {
        cli.nl_deemed_asset_rate = v;
    }
    if let Some(v) = payload.nl_deemed_debt_rate {
        cli.nl_deemed_debt_rate = v;
    }
    if let Some(v) = payload.nl_allowance {
        cli.nl_allowance = v;
    }
    if let Some(v) = payload.nl_tax_rate {
        cli.nl_tax_rate = v;
    }
    if let Some(v) = payload.nl_loss_carryforward {
        cli.nl_loss_carryforward = v;
    }

    if let Some(v) = payload.ch_investment_tax_rate {
        cli.ch_investment_tax_rate = v;
    }
    if let Some(v) = payload.ch_deduct_margin_interest {
        cli.ch_deduct_margin_interest = v;
    }

    if let Some(v) = payload.ltcg_rate {
        cli.ltcg_rate = v;
    }
    if let Some(v) = payload.liquidation_pays_margin {
        cli.liquidation_pays_margin = v;
    }
    if let Some(v) = payload.fixed_income_zero_basis {
        cli.fixed_income_zero_basis = v;
    }

    if let Some(v) = payload.retirement_drawdown_start_age {
        cli.retirement_drawdown_start_age = v;
    }
    if let Some(v) = payload.retirement_drawdown_years {
        cli.retirement_drawdown_years = v;
    }

    if let Some(v) = payload.solve_max {
        cli.solve_max = v;
    }
    if let Some(v) = payload.solve_tolerance {
        cli.solve_tolerance = v;
    }
    if let Some(v) = payload.solve_iterations {
        cli.solve_iterations = v;
    }
    if let Some(v) = payload.target_scenario {
        cli.target_scenario = v.into();
    }

    let inputs = build_inputs(&cli)?;

    let lots = payload.lots.unwrap_or_default();
    let plan = payload
        .assignments
        .map(LiquidationPlan::from_assignments)
        .unwrap_or_default();
    validate_lots(&inputs, &lots, &plan)?;

    let scenario: Jurisdiction = Jurisdiction::from(cli.target_scenario);
    let base_withdrawal = match payload.base_withdrawal {
        Some(v) if !v.is_finite() || v < 0.0 => {
            return Err("baseWithdrawal must be >= 0".to_string());
        }
        other => other,
    };

    Ok(ApiRequest {
        inputs,
        options: ApiOptions {
            scenario,
            base_withdrawal,
            optimize: payload.optimize.unwrap_or(false),
            lots,
            plan,
            solve: SolveConfig {
                scenario,
                search_max: cli.solve_max,
                tolerance: cli.solve_tolerance,
                max_iterations: cli.solve_iterations,
            },
        },
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        start_year: 2026,
        start_age: 58,
        end_age: 90,
        note_balance: 4_100_069.0,
        equity_balance: 7_731_381.0,
        margin_loan: 6_451_994.0,
        secondary_balance: 1_206_187.0,
        retirement_primary: 398_054.0,
        retirement_partner: 194_528.0,
        note_rate: 4.34,
        dividend_yield: 2.65,
        equity_growth_rate: 2.65,
        margin_rate: 5.678,
        secondary_return_rate: None,
        retirement_growth_rate: 5.3,
        benefit_primary_monthly: 3_750.0,
        benefit_partner_monthly: 3_750.0,
        benefit_start_age: 70,
        benefit_haircut: 80.0,
        margin_draw_share: 70.0,
        move_year: Some(2028),
        usd_chf: 0.9,
        municipal_multiplier: 1.19,
        nl_transition_year: 2028,
        nl_deemed_asset_rate: 6.04,
        nl_deemed_debt_rate: 2.47,
        nl_allowance: 3_600.0,
        nl_tax_rate: 36.0,
        nl_loss_carryforward: true,
        ch_investment_tax_rate: 22.0,
        ch_deduct_margin_interest: false,
        ltcg_rate: 20.0,
        liquidation_pays_margin: false,
        fixed_income_zero_basis: false,
        retirement_drawdown_start_age: 70,
        retirement_drawdown_years: 0,
        solve_max: 2_000_000.0,
        solve_tolerance: 10.0,
        solve_iterations: 80,
        target_scenario: CliScenario::Netherlands,
    }
}
