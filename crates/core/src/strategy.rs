//! Point-betting vocabulary for a Don't Pass bettor.
//!
//! A strategy assigns one [`PointBehavior`] to each of the six point numbers.
//! The live [`StrategyEditor`] can be mutated at any time; the simulator only
//! ever sees a [`PointStrategy`] snapshot taken when a run is configured.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// One of the six numbers a come-out roll can establish as the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Point {
    Four,
    Five,
    Six,
    Eight,
    Nine,
    Ten,
}

impl Point {
    /// All points in ascending order.
    pub const ALL: [Point; 6] = [
        Point::Four,
        Point::Five,
        Point::Six,
        Point::Eight,
        Point::Nine,
        Point::Ten,
    ];

    /// Returns the dice total this point stands for.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Point::Four => 4,
            Point::Five => 5,
            Point::Six => 6,
            Point::Eight => 8,
            Point::Nine => 9,
            Point::Ten => 10,
        }
    }
}

impl TryFrom<u8> for Point {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Point::Four),
            5 => Ok(Point::Five),
            6 => Ok(Point::Six),
            8 => Ok(Point::Eight),
            9 => Ok(Point::Nine),
            10 => Ok(Point::Ten),
            _ => Err(ConfigError::UnknownPoint(value.to_string())),
        }
    }
}

impl From<Point> for u8 {
    fn from(point: Point) -> Self {
        point.value()
    }
}

impl FromStr for Point {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| ConfigError::UnknownPoint(s.to_string()))?;
        Point::try_from(value)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// What the bettor does once a point is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointBehavior {
    /// Leave the base bet working, no odds.
    #[default]
    Keep,
    /// Leave the base bet working and lay odds behind it.
    Odds,
    /// Swap the base bet for the reduced bet.
    Lower,
}

impl PointBehavior {
    /// Returns the next behavior in the editor's click cycle.
    ///
    /// Keep -> Odds -> Lower -> Keep
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            PointBehavior::Keep => PointBehavior::Odds,
            PointBehavior::Odds => PointBehavior::Lower,
            PointBehavior::Lower => PointBehavior::Keep,
        }
    }

    /// Lowercase name as used in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PointBehavior::Keep => "keep",
            PointBehavior::Odds => "odds",
            PointBehavior::Lower => "lower",
        }
    }
}

impl FromStr for PointBehavior {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Ok(PointBehavior::Keep),
            "odds" => Ok(PointBehavior::Odds),
            "lower" => Ok(PointBehavior::Lower),
            _ => Err(ConfigError::UnknownBehavior(s.to_string())),
        }
    }
}

impl fmt::Display for PointBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frozen point -> behavior assignment used by a simulation run.
///
/// Points without an entry behave as [`PointBehavior::Keep`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointStrategy {
    points: BTreeMap<Point, PointBehavior>,
}

impl PointStrategy {
    /// Creates a strategy from explicit assignments.
    #[must_use]
    pub fn new(points: BTreeMap<Point, PointBehavior>) -> Self {
        Self { points }
    }

    /// Creates a strategy where every point has the same behavior.
    #[must_use]
    pub fn uniform(behavior: PointBehavior) -> Self {
        Self {
            points: Point::ALL.iter().map(|&p| (p, behavior)).collect(),
        }
    }

    /// Parses string-keyed assignments as they appear in config files.
    ///
    /// # Errors
    ///
    /// Returns an error for a key that is not a point number or a value that
    /// is not a known behavior.
    pub fn from_named<'a, I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut points = BTreeMap::new();
        for (key, value) in entries {
            points.insert(key.parse::<Point>()?, value.parse::<PointBehavior>()?);
        }
        Ok(Self { points })
    }

    /// Returns the behavior for a point, defaulting to keep.
    #[must_use]
    pub fn behavior(&self, point: Point) -> PointBehavior {
        self.points.get(&point).copied().unwrap_or_default()
    }

    /// Returns the points assigned a behavior, ascending.
    #[must_use]
    pub fn points_with(&self, behavior: PointBehavior) -> Vec<Point> {
        Point::ALL
            .iter()
            .copied()
            .filter(|&p| self.behavior(p) == behavior)
            .collect()
    }

    /// Returns a copy with one point reassigned.
    #[must_use]
    pub fn with(mut self, point: Point, behavior: PointBehavior) -> Self {
        self.points.insert(point, behavior);
        self
    }
}

/// Named strategies used as comparison baselines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyPreset {
    /// Every point keeps the flat base bet.
    Flat,
    /// Lay odds on 4 and 10, lower everything else.
    Classic,
    /// Lay odds on 4 and 10, keep the rest.
    LayOutside,
    /// Lay odds on every point.
    LayAll,
    /// Lower the bet on every point.
    LowerAll,
    /// Lower on 5, 6, 8 and 9, keep 4 and 10.
    LowerInside,
}

impl StrategyPreset {
    pub const ALL: [StrategyPreset; 6] = [
        StrategyPreset::Flat,
        StrategyPreset::Classic,
        StrategyPreset::LayOutside,
        StrategyPreset::LayAll,
        StrategyPreset::LowerAll,
        StrategyPreset::LowerInside,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            StrategyPreset::Flat => "flat",
            StrategyPreset::Classic => "classic",
            StrategyPreset::LayOutside => "lay-outside",
            StrategyPreset::LayAll => "lay-all",
            StrategyPreset::LowerAll => "lower-all",
            StrategyPreset::LowerInside => "lower-inside",
        }
    }

    /// Builds the point assignments for this preset.
    #[must_use]
    pub fn strategy(self) -> PointStrategy {
        use PointBehavior::{Keep, Lower, Odds};

        let outside_inside = |outside: PointBehavior, inside: PointBehavior| {
            PointStrategy::uniform(inside)
                .with(Point::Four, outside)
                .with(Point::Ten, outside)
        };

        match self {
            StrategyPreset::Flat => PointStrategy::uniform(Keep),
            StrategyPreset::Classic => outside_inside(Odds, Lower),
            StrategyPreset::LayOutside => outside_inside(Odds, Keep),
            StrategyPreset::LayAll => PointStrategy::uniform(Odds),
            StrategyPreset::LowerAll => PointStrategy::uniform(Lower),
            StrategyPreset::LowerInside => outside_inside(Keep, Lower),
        }
    }
}

impl FromStr for StrategyPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        StrategyPreset::ALL
            .iter()
            .copied()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for StrategyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Live, mutable point assignments behind an interactive editor.
///
/// The engine never reads this directly. Call [`StrategyEditor::snapshot`]
/// when configuring a run; later edits do not reach that run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyEditor {
    current: PointStrategy,
}

impl Default for StrategyEditor {
    fn default() -> Self {
        Self::new(StrategyPreset::Classic.strategy())
    }
}

impl StrategyEditor {
    #[must_use]
    pub fn new(initial: PointStrategy) -> Self {
        Self { current: initial }
    }

    /// Current behavior for a point.
    #[must_use]
    pub fn behavior(&self, point: Point) -> PointBehavior {
        self.current.behavior(point)
    }

    /// Assigns a behavior to a point.
    pub fn set(&mut self, point: Point, behavior: PointBehavior) {
        self.current.points.insert(point, behavior);
    }

    /// Advances a point to the next behavior and returns it.
    pub fn cycle(&mut self, point: Point) -> PointBehavior {
        let next = self.behavior(point).next();
        self.set(point, next);
        next
    }

    /// Restores the classic defaults.
    pub fn reset(&mut self) {
        self.current = StrategyPreset::Classic.strategy();
    }

    /// Returns an owned copy of the current assignments.
    #[must_use]
    pub fn snapshot(&self) -> PointStrategy {
        self.current.clone()
    }
}
