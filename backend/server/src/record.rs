//! # Survey Record
//!
//! The one record every survey step writes into.
//!
//! ## Layout
//!
//! - selectedGoals (**list of strings**): non-empty once saved
//! - primaryGoal (**string**): non-empty once saved
//! - drinksPerDay (**weekday to number**): always all seven days, Monday first
//! - totalDrinks, dryDays (**numbers**): derived from drinksPerDay on demand
//! - spendPerDrink (**number**): finite once saved
//! - weeklySpend, totalPerWeek (**numbers**): derived, drinks times spend
//! - savedIdealOutcome (**1, 2 or 3**)
//! - alcoholEffectFrequency (**string**): non-empty once saved
//! - alcoholConcernLevel (**any JSON value**): only presence is checked
//! - improvementAreas (**list**): may be empty, elements kept as sent
//!
//! ## Numbers
//!
//! Posted numbers are kept as JSON numbers, so `1` reads back as `1` and
//! `4.5` as `4.5`. Derived values are written as integers whenever they
//! are whole.
//!
//! ## Writes
//!
//! Every setter validates first and only then replaces its field wholesale.
//! A rejected write never touches the record, so last write wins per field.
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::AppError::{self, NotFound, Rejected, Validation};

pub const DEFAULT_SPEND_PER_DRINK: u8 = 8;

pub const GOALS_INVALID: &str = "selectedGoals must be a non-empty array.";
pub const PRIMARY_GOAL_INVALID: &str = "primaryGoal must be a non-empty string.";
pub const DRINKS_INVALID: &str =
    "Drinks per day must be an object with all days as keys and number values.";
pub const DRINKS_NOT_FOUND: &str = "No drinks per day data found";
pub const IDEAL_OUTCOME_INVALID: &str = "Invalid ideal outcome ID";
pub const IDEAL_OUTCOME_NOT_FOUND: &str = "No ideal outcome saved";
pub const TOTALS_NO_DATA: &str = "No data";
pub const SPEND_INVALID: &str = "Invalid spendPerDrink value";
pub const WEEKLY_SPEND_NO_DATA: &str = "Missing or invalid data for calculation";
pub const FREQUENCY_MISSING: &str = "No selection provided";
pub const CONCERN_MISSING: &str = "Missing concern level";
pub const AREAS_INVALID: &str = "Invalid selection";

// 2^53, past this f64 stops holding every integer
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whole values become integer numbers, `None` when not finite.
pub fn to_number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

fn as_f64(number: &Number) -> f64 {
    number.as_f64().unwrap_or(f64::NAN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

/// Drinks logged for each day of a typical week.
///
/// Payload keys outside the seven weekdays are dropped on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DrinksPerDay {
    pub monday: Number,
    pub tuesday: Number,
    pub wednesday: Number,
    pub thursday: Number,
    pub friday: Number,
    pub saturday: Number,
    pub sunday: Number,
}

impl Default for DrinksPerDay {
    fn default() -> Self {
        let zero = Number::from(0u8);

        Self {
            monday: zero.clone(),
            tuesday: zero.clone(),
            wednesday: zero.clone(),
            thursday: zero.clone(),
            friday: zero.clone(),
            saturday: zero.clone(),
            sunday: zero,
        }
    }
}

impl DrinksPerDay {
    pub fn get(&self, day: Weekday) -> &Number {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        Weekday::ALL.into_iter().map(|day| as_f64(self.get(day)))
    }

    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    pub fn dry_days(&self) -> u32 {
        self.values().filter(|&count| count == 0.0).count() as u32
    }

    fn is_valid(&self) -> bool {
        self.values().all(|count| count.is_finite() && count >= 0.0) && self.total().is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub struct IdealOutcome(u8);

impl IdealOutcome {
    pub fn id(self) -> u8 {
        self.0
    }
}

impl TryFrom<u64> for IdealOutcome {
    type Error = AppError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        match id {
            1..=3 => Ok(IdealOutcome(id as u8)),
            _ => Err(Validation(IDEAL_OUTCOME_INVALID)),
        }
    }
}

impl From<IdealOutcome> for u8 {
    fn from(outcome: IdealOutcome) -> Self {
        outcome.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_drinks: Number,
    pub dry_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRecord {
    pub selected_goals: Vec<String>,
    pub primary_goal: Option<String>,
    pub drinks_per_day: Option<DrinksPerDay>,
    pub total_drinks: Number,
    pub dry_days: u32,
    pub spend_per_drink: Option<Number>,
    pub weekly_spend: Number,
    pub total_per_week: Number,
    pub saved_ideal_outcome: Option<IdealOutcome>,
    pub alcohol_effect_frequency: Option<String>,
    pub alcohol_concern_level: Option<Value>,
    pub improvement_areas: Vec<Value>,
}

impl SurveyRecord {
    /// Nothing answered yet, every optional field unset.
    pub fn empty() -> Self {
        Self {
            selected_goals: Vec::new(),
            primary_goal: None,
            drinks_per_day: None,
            total_drinks: Number::from(0u8),
            dry_days: 0,
            spend_per_drink: None,
            weekly_spend: Number::from(0u8),
            total_per_week: Number::from(0u8),
            saved_ideal_outcome: None,
            alcohol_effect_frequency: None,
            alcohol_concern_level: None,
            improvement_areas: Vec::new(),
        }
    }

    /// A zeroed week at the default price, what a fresh frontend reads back.
    pub fn seeded() -> Self {
        Self {
            drinks_per_day: Some(DrinksPerDay::default()),
            dry_days: Weekday::ALL.len() as u32,
            spend_per_drink: Some(Number::from(DEFAULT_SPEND_PER_DRINK)),
            ..Self::empty()
        }
    }

    pub fn set_selected_goals(&mut self, goals: Vec<String>) -> Result<&[String], AppError> {
        if goals.is_empty() {
            return Err(Rejected(GOALS_INVALID));
        }

        self.selected_goals = goals;

        Ok(self.selected_goals.as_slice())
    }

    pub fn set_primary_goal(&mut self, goal: String) -> Result<&str, AppError> {
        if goal.is_empty() {
            return Err(Rejected(PRIMARY_GOAL_INVALID));
        }

        Ok(self.primary_goal.insert(goal).as_str())
    }

    /// Rejects negative counts and weeks whose total overflows.
    pub fn set_drinks_per_day(&mut self, drinks: DrinksPerDay) -> Result<&DrinksPerDay, AppError> {
        if !drinks.is_valid() {
            return Err(Rejected(DRINKS_INVALID));
        }

        Ok(&*self.drinks_per_day.insert(drinks))
    }

    pub fn drinks_per_day(&self) -> Result<&DrinksPerDay, AppError> {
        self.drinks_per_day.as_ref().ok_or(NotFound(DRINKS_NOT_FOUND))
    }

    pub fn set_ideal_outcome(&mut self, outcome: IdealOutcome) {
        self.saved_ideal_outcome = Some(outcome);
    }

    pub fn ideal_outcome(&self) -> Result<IdealOutcome, AppError> {
        self.saved_ideal_outcome.ok_or(NotFound(IDEAL_OUTCOME_NOT_FOUND))
    }

    /// Recomputes totalDrinks and dryDays from the stored week and keeps them.
    pub fn compute_totals(&mut self) -> Result<Totals, AppError> {
        let drinks = self
            .drinks_per_day
            .as_ref()
            .ok_or(Validation(TOTALS_NO_DATA))?;

        let totals = Totals {
            total_drinks: to_number(drinks.total()).ok_or(Validation(TOTALS_NO_DATA))?,
            dry_days: drinks.dry_days(),
        };

        self.total_drinks = totals.total_drinks.clone();
        self.dry_days = totals.dry_days;

        Ok(totals)
    }

    pub fn set_spend_per_drink(&mut self, spend: Number) -> Result<&Number, AppError> {
        if !as_f64(&spend).is_finite() {
            return Err(Validation(SPEND_INVALID));
        }

        Ok(&*self.spend_per_drink.insert(spend))
    }

    /// Weekly drinks times spend per drink. Stored in both weeklySpend and
    /// totalPerWeek, totalDrinks is left as last computed.
    pub fn compute_weekly_spend(&mut self) -> Result<Number, AppError> {
        let (Some(drinks), Some(spend)) = (&self.drinks_per_day, &self.spend_per_drink) else {
            return Err(Validation(WEEKLY_SPEND_NO_DATA));
        };

        let weekly_spend =
            to_number(drinks.total() * as_f64(spend)).ok_or(Validation(WEEKLY_SPEND_NO_DATA))?;

        self.total_per_week = weekly_spend.clone();
        self.weekly_spend = weekly_spend.clone();

        Ok(weekly_spend)
    }

    pub fn set_alcohol_effect_frequency(&mut self, frequency: String) -> Result<&str, AppError> {
        if frequency.is_empty() {
            return Err(Validation(FREQUENCY_MISSING));
        }

        Ok(self.alcohol_effect_frequency.insert(frequency).as_str())
    }

    /// `None` means the field was absent. Any present value is kept, `0` included.
    pub fn set_alcohol_concern_level(&mut self, level: Option<Value>) -> Result<&Value, AppError> {
        let level = level.ok_or(Validation(CONCERN_MISSING))?;

        Ok(&*self.alcohol_concern_level.insert(level))
    }

    pub fn set_improvement_areas(&mut self, areas: Vec<Value>) -> &[Value] {
        self.improvement_areas = areas;

        &self.improvement_areas
    }
}
