//! Replacement rule and period endpoints

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use caledit_core::ConfigProvider;
use caledit_domain::{CalEditError, EditorConfig, ReplacementRule};
use serde::{Deserialize, Serialize};

use crate::commands::ApiError;
use crate::utils::logging::log_command_execution;
use crate::AppContext;

pub fn configuration_router() -> Router<Arc<AppContext>> {
    Router::new().route("/configuration", get(get_configuration).post(update_configuration))
}

/// Unit a period value is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PeriodUnit {
    Millis,
    Seconds,
    Minutes,
    Hours,
}

impl PeriodUnit {
    /// Largest unit first.
    const DESCENDING: [Self; 4] = [Self::Hours, Self::Minutes, Self::Seconds, Self::Millis];

    fn millis(self) -> u64 {
        match self {
            Self::Millis => 1,
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
        }
    }

    /// `value` of this unit, or `None` on overflow.
    pub fn to_duration(self, value: u64) -> Option<Duration> {
        value.checked_mul(self.millis()).map(Duration::from_millis)
    }

    /// Express `period` in the largest unit that represents it exactly.
    ///
    /// Sub-millisecond remainders are dropped.
    pub fn best_fit(period: Duration) -> (u64, Self) {
        let millis = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        Self::DESCENDING
            .into_iter()
            .find(|unit| millis > 0 && millis % unit.millis() == 0)
            .map_or((millis, Self::Millis), |unit| (millis / unit.millis(), unit))
    }
}

/// Wire shape of the editable settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDto {
    pub original_text: String,
    pub replacement_text: String,
    pub update_period_value: u64,
    pub update_period_unit: PeriodUnit,
    pub query_period_value: u64,
    pub query_period_unit: PeriodUnit,
}

impl From<&EditorConfig> for ConfigurationDto {
    fn from(config: &EditorConfig) -> Self {
        let (update_period_value, update_period_unit) = PeriodUnit::best_fit(config.update_period);
        let (query_period_value, query_period_unit) = PeriodUnit::best_fit(config.query_period);
        Self {
            original_text: config.replacement.original_text.clone(),
            replacement_text: config.replacement.replacement_text.clone(),
            update_period_value,
            update_period_unit,
            query_period_value,
            query_period_unit,
        }
    }
}

fn period(field: &str, value: u64, unit: PeriodUnit) -> Result<Duration, CalEditError> {
    unit.to_duration(value)
        .ok_or_else(|| CalEditError::InvalidInput(format!("{field} is out of range")))
}

/// GET /configuration - Current rule and periods
pub async fn get_configuration(State(ctx): State<Arc<AppContext>>) -> Json<ConfigurationDto> {
    Json(ConfigurationDto::from(&ctx.config.snapshot()))
}

/// POST /configuration - Replace rule and periods
///
/// Applied from the next pass; nothing changes when validation fails.
pub async fn update_configuration(
    State(ctx): State<Arc<AppContext>>,
    Json(dto): Json<ConfigurationDto>,
) -> Result<Json<ConfigurationDto>, ApiError> {
    let command_name = "configuration::update_configuration";
    let start = Instant::now();

    let result = apply(&ctx, dto);
    log_command_execution(command_name, start.elapsed(), result.is_ok());
    result?;

    Ok(Json(ConfigurationDto::from(&ctx.config.snapshot())))
}

fn apply(ctx: &AppContext, dto: ConfigurationDto) -> Result<(), CalEditError> {
    let update_period = period("update period", dto.update_period_value, dto.update_period_unit)?;
    let query_period = period("query period", dto.query_period_value, dto.query_period_unit)?;
    ctx.config.update_settings(
        ReplacementRule::new(dto.original_text, dto.replacement_text),
        update_period,
        query_period,
    )
}
