//! Core vocabulary for the nine-type model.
//!
//! These types are shared by the content pools and the assessment engine:
//! type numbers and their fixed centers and wings, the three instincts, and
//! the fixed-size score vectors that accumulate answers.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for the question-rendering frontend.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Errors raised when building vocabulary values or validating content.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypologyError {
    /// A type number outside 1..=9
    #[error("Invalid type number: {0} (expected 1-9)")]
    InvalidTypeNumber(u8),

    /// An unrecognised instinct code
    #[error("Invalid instinct: {0} (expected sp, so or sx)")]
    InvalidInstinct(String),

    /// Structurally invalid content pool
    #[error("Invalid content: {0}")]
    InvalidContent(String),
}

/// One of the nine mutually exclusive primary types.
///
/// Ordering follows the number, which is also the tie-break order used
/// wherever scores are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(try_from = "u8", into = "u8")]
pub struct TypeNumber(u8);

/// Adjacent types on the circle, lower neighbour first.
const WING_TABLE: [[u8; 2]; 9] = [
    [9, 2],
    [1, 3],
    [2, 4],
    [3, 5],
    [4, 6],
    [5, 7],
    [6, 8],
    [7, 9],
    [8, 1],
];

impl TypeNumber {
    /// All nine types in ascending order.
    pub const ALL: [TypeNumber; 9] = [
        TypeNumber(1),
        TypeNumber(2),
        TypeNumber(3),
        TypeNumber(4),
        TypeNumber(5),
        TypeNumber(6),
        TypeNumber(7),
        TypeNumber(8),
        TypeNumber(9),
    ];

    /// Create a type number, rejecting values outside 1..=9.
    pub fn new(value: u8) -> Result<Self, TypologyError> {
        if (1..=9).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypologyError::InvalidTypeNumber(value))
        }
    }

    /// Constructor for built-in content literals. Panics when out of range.
    pub(crate) const fn known(value: u8) -> Self {
        assert!(value >= 1 && value <= 9, "type number out of range");
        Self(value)
    }

    /// The raw number (1-9).
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index into fixed-size score vectors.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The center this type belongs to.
    pub fn center(self) -> Center {
        match self.0 {
            8 | 9 | 1 => Center::Gut,
            2..=4 => Center::Heart,
            _ => Center::Head,
        }
    }

    /// The two fixed neighbours of this type, lower neighbour first.
    pub fn wings(self) -> [TypeNumber; 2] {
        let [low, high] = WING_TABLE[self.index()];
        [Self(low), Self(high)]
    }

    /// Check whether `other` is one of this type's wings.
    pub fn is_wing(self, other: TypeNumber) -> bool {
        self.wings().contains(&other)
    }

    /// Conventional short name.
    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "Reformer",
            2 => "Helper",
            3 => "Achiever",
            4 => "Individualist",
            5 => "Investigator",
            6 => "Loyalist",
            7 => "Enthusiast",
            8 => "Challenger",
            _ => "Peacemaker",
        }
    }
}

impl TryFrom<u8> for TypeNumber {
    type Error = TypologyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeNumber> for u8 {
    fn from(value: TypeNumber) -> Self {
        value.0
    }
}

impl fmt::Display for TypeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed grouping of three types each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Center {
    /// Instinctive center: 8, 9, 1
    Gut,
    /// Feeling center: 2, 3, 4
    Heart,
    /// Thinking center: 5, 6, 7
    Head,
}

impl Center {
    /// All centers in canonical order.
    pub const ALL: [Center; 3] = [Center::Gut, Center::Heart, Center::Head];

    /// The three types of this center.
    pub fn types(&self) -> [TypeNumber; 3] {
        match self {
            Self::Gut => [TypeNumber(8), TypeNumber(9), TypeNumber(1)],
            Self::Heart => [TypeNumber(2), TypeNumber(3), TypeNumber(4)],
            Self::Head => [TypeNumber(5), TypeNumber(6), TypeNumber(7)],
        }
    }

    /// Check membership.
    pub fn contains(&self, type_number: TypeNumber) -> bool {
        type_number.center() == *self
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gut => "gut",
            Self::Heart => "heart",
            Self::Head => "head",
        }
    }
}

/// One of the three instinctual drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum InstinctType {
    /// Self-preservation
    Sp,
    /// Social
    So,
    /// Sexual / one-to-one
    Sx,
}

impl InstinctType {
    /// All instincts in canonical order (also the tie-break order).
    pub const ALL: [InstinctType; 3] = [InstinctType::Sp, InstinctType::So, InstinctType::Sx];

    fn index(self) -> usize {
        match self {
            Self::Sp => 0,
            Self::So => 1,
            Self::Sx => 2,
        }
    }

    /// Short code ("sp", "so", "sx").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sp => "sp",
            Self::So => "so",
            Self::Sx => "sx",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sp => "Self-Preservation",
            Self::So => "Social",
            Self::Sx => "One-to-One",
        }
    }
}

impl FromStr for InstinctType {
    type Err = TypologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sp" => Ok(Self::Sp),
            "so" => Ok(Self::So),
            "sx" => Ok(Self::Sx),
            other => Err(TypologyError::InvalidInstinct(other.to_string())),
        }
    }
}

impl fmt::Display for InstinctType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Running score for every type. Always holds exactly nine entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct TypeScores([f64; 9]);

impl TypeScores {
    /// All scores zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for one type.
    pub fn get(&self, type_number: TypeNumber) -> f64 {
        self.0[type_number.index()]
    }

    /// Add `delta` to one type.
    pub fn add(&mut self, type_number: TypeNumber, delta: f64) {
        self.0[type_number.index()] += delta;
    }

    /// Add every entry of `other` into this vector.
    pub fn merge(&mut self, other: &TypeScores) {
        for (slot, delta) in self.0.iter_mut().zip(other.0.iter()) {
            *slot += delta;
        }
    }

    /// Entries in ascending type order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeNumber, f64)> + '_ {
        TypeNumber::ALL.iter().map(move |t| (*t, self.get(*t)))
    }

    /// Highest-scoring type; the first encountered (lowest number) wins ties.
    pub fn top(&self) -> TypeNumber {
        let mut best = TypeNumber::ALL[0];
        for (type_number, score) in self.iter() {
            if score > self.get(best) {
                best = type_number;
            }
        }
        best
    }

    /// All entries sorted by descending score, ties in ascending type order.
    pub fn ranked(&self) -> Vec<(TypeNumber, f64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| descending(a.1, b.1));
        entries
    }

    /// The `n` highest-scoring types.
    pub fn top_n(&self, n: usize) -> Vec<TypeNumber> {
        self.ranked().into_iter().take(n).map(|(t, _)| t).collect()
    }

    /// Lowest score in the vector.
    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Sum of all scores.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Accumulated instinct points, one entry per instinct.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct InstinctScores {
    pub sp: f64,
    pub so: f64,
    pub sx: f64,
}

impl InstinctScores {
    /// Score for one instinct.
    pub fn get(&self, instinct: InstinctType) -> f64 {
        match instinct {
            InstinctType::Sp => self.sp,
            InstinctType::So => self.so,
            InstinctType::Sx => self.sx,
        }
    }

    /// Add points to one instinct.
    pub fn add(&mut self, instinct: InstinctType, points: f64) {
        match instinct {
            InstinctType::Sp => self.sp += points,
            InstinctType::So => self.so += points,
            InstinctType::Sx => self.sx += points,
        }
    }

    /// Sum across all three instincts.
    pub fn total(&self) -> f64 {
        self.sp + self.so + self.sx
    }

    /// Instincts by descending score, ties in canonical sp/so/sx order.
    pub fn ranked(&self) -> [InstinctType; 3] {
        let mut order = InstinctType::ALL;
        order.sort_by(|a, b| {
            descending(self.get(*a), self.get(*b)).then(a.index().cmp(&b.index()))
        });
        order
    }
}
