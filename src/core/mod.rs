mod engine;
mod lots;
mod solver;
mod tax;
mod types;

pub use engine::{project, run_projection, summarize};
pub use lots::{
    LiquidationEvent, LiquidationPlan, LotKind, OptimizedSchedule, OptimizerStep, TaxLot,
    optimize_schedule, schedule_events,
};
pub use solver::{SolveConfig, SolveResult, solve_base_withdrawal};
pub use types::{
    Inputs, Jurisdiction, Projection, ProjectionSummary, WITHDRAWAL_CURVE, WithdrawalBand,
    YearRow, curve_multiplier,
};
