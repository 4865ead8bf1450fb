/*!
 * Field reformatter registry.
 *
 * Rules are keyed by `(table, column)` in the source vocabulary. A missing
 * rule is the normal case and leaves the value untouched. Rules also carry
 * presentation hints for spreadsheet destinations and mark the categorical
 * columns whose values go through the translation directory.
 */

pub mod fields;

use log::warn;
use std::collections::HashMap;

use crate::database::Value;

/// Semantic family of a reformatted column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `DD-MM-YYYY` text date
    DayMonthYear,
    /// `HH:MM` text time
    HourMinute,
    /// Millisecond epoch, date component
    EpochDate,
    /// Milliseconds since midnight
    EpochTimeOfDay,
    /// Enumerated value eligible for translation
    Categorical,
}

impl FieldKind {
    /// Apply the transform, or `None` when the kind leaves values alone
    fn apply(self, value: &Value, excel: bool) -> Option<Value> {
        match self {
            Self::DayMonthYear => fields::day_month_year(value, excel),
            Self::HourMinute => fields::hour_minute(value, excel),
            Self::EpochDate => fields::epoch_date(value, excel),
            Self::EpochTimeOfDay => fields::epoch_time_of_day(value, excel),
            Self::Categorical => Some(value.clone()),
        }
    }
}

/// Named cell style understood by spreadsheet sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Elapsed hours and minutes
    Duration,
}

/// Presentation hints for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presentation {
    /// Style for every data cell in the column
    pub style: Option<CellStyle>,
    /// Column width in characters
    pub width: Option<u16>,
}

/// How one column is reformatted and presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReformatRule {
    /// Transform family
    pub kind: FieldKind,
    /// Spreadsheet hints
    pub presentation: Presentation,
}

impl ReformatRule {
    /// Rule without presentation hints
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            presentation: Presentation::default(),
        }
    }

    /// Attach a cell style
    pub fn styled(mut self, style: CellStyle) -> Self {
        self.presentation.style = Some(style);
        self
    }

    /// Attach a column width
    pub fn width(mut self, width: u16) -> Self {
        self.presentation.width = Some(width);
        self
    }
}

/// Rules keyed by (table, column)
#[derive(Debug, Clone, Default)]
pub struct ReformatRegistry {
    rules: HashMap<(String, String), ReformatRule>,
}

impl ReformatRegistry {
    /// Empty registry: every value passes through
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules for the GlucoLog backup schema
    pub fn glucolog() -> Self {
        let date = ReformatRule::new(FieldKind::DayMonthYear).styled(CellStyle::Date).width(12);
        let hour = ReformatRule::new(FieldKind::HourMinute).styled(CellStyle::Time).width(8);
        let epoch_date = ReformatRule::new(FieldKind::EpochDate).styled(CellStyle::Date).width(12);
        let epoch_time = ReformatRule::new(FieldKind::EpochTimeOfDay).styled(CellStyle::Duration).width(8);

        let mut registry = Self::new();
        registry.insert("t_parametri", "data_nascita", date);
        for column in [
            "digiuno",
            "mattino",
            "primo_pomeriggio",
            "tardo_pomeriggio",
            "sera",
            "notte",
            "periodocustoms1",
            "periodocustoms2",
            "periodocustoms3",
            "periodocustoms4",
        ] {
            registry.insert("t_parametri", column, hour);
        }
        registry.insert("t_risultati", "data", epoch_date);
        registry.insert("t_risultati", "ora", epoch_time);
        registry.insert("t_risultati", "periodo", ReformatRule::new(FieldKind::Categorical).width(18));
        registry.insert("t_glucometri", "data", epoch_date);
        registry.insert("t_glucometri", "ora", epoch_time);
        registry
    }

    /// Add or replace a rule
    pub fn insert(&mut self, table: &str, column: &str, rule: ReformatRule) {
        self.rules.insert((table.to_string(), column.to_string()), rule);
    }

    /// Look up the rule for a column
    pub fn rule(&self, table: &str, column: &str) -> Option<&ReformatRule> {
        self.rules.get(&(table.to_string(), column.to_string()))
    }

    /// Reformat one value for the destination
    pub fn reformat(&self, table: &str, column: &str, value: Value, excel: bool) -> Value {
        let Some(rule) = self.rule(table, column) else {
            return value;
        };
        if value.is_empty() {
            return value;
        }

        match rule.kind.apply(&value, excel) {
            Some(formatted) => formatted,
            None => {
                warn!(
                    "Cannot reformat value '{}' in column '{}.{}' as {:?}; keeping it unchanged",
                    value, table, column, rule.kind
                );
                value
            }
        }
    }

    /// Presentation hints for a column, if any
    pub fn presentation(&self, table: &str, column: &str) -> Option<Presentation> {
        self.rule(table, column)
            .map(|rule| rule.presentation)
            .filter(|p| p.style.is_some() || p.width.is_some())
    }

    /// Whether a column holds translatable category values
    pub fn is_categorical(&self, table: &str, column: &str) -> bool {
        self.rule(table, column)
            .is_some_and(|rule| rule.kind == FieldKind::Categorical)
    }
}
