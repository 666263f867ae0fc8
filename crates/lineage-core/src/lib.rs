use serde::{Deserialize, Serialize};
use std::fmt;

pub mod error;
pub mod placement;
pub mod snapshot;
pub mod source;

pub use error::{DataError, EnumConversionError, PlacementError};
pub use placement::{Placement, place_member};
pub use snapshot::FamilySnapshot;
pub use source::{FamilySource, JsonFileSource, MemorySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "male", alias = "Male", alias = "Nam")]
    Male,
    #[serde(rename = "female", alias = "Female", alias = "Nữ")]
    Female,
}

impl TryFrom<&str> for Gender {
    type Error = EnumConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "male" | "Male" | "Nam" => Ok(Gender::Male),
            "female" | "Female" | "Nữ" => Ok(Gender::Female),
            other => Err(EnumConversionError::InvalidGender(other.to_string())),
        }
    }
}

/// How a person is attached to the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    /// Connected by descent through parent-child edges.
    #[default]
    Blood,
    /// Connected only through marriage to a blood member.
    InLaw,
}

impl TryFrom<&str> for MemberType {
    type Error = EnumConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "blood" => Ok(MemberType::Blood),
            "in_law" => Ok(MemberType::InLaw),
            other => Err(EnumConversionError::InvalidMemberType(other.to_string())),
        }
    }
}

/// Marker used by the storage layer for dates that were recorded as unknown.
pub const UNKNOWN_DATE: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub id: PersonId,
    #[serde(default)]
    pub full_name: String,
    pub gender: Gender,
    /// ISO date, `"unknown"`, or absent.
    #[serde(default)]
    pub birth_date: Option<String>,
    /// ISO date, `"unknown"`, or absent (alive).
    #[serde(default)]
    pub death_date: Option<String>,
    /// Explicit liveness flag. Derived from `death_date` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_alive: Option<bool>,
    /// 1 for founders. 0 when the record carries no generation.
    #[serde(default)]
    pub generation: u32,
    #[serde(default)]
    pub member_type: MemberType,
}

impl Person {
    /// A generation-1 blood member with no parent.
    pub fn founder(id: PersonId, full_name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            gender,
            birth_date: None,
            death_date: None,
            is_alive: None,
            generation: 1,
            member_type: MemberType::Blood,
        }
    }

    /// A blood member one generation below `parent`, saturating at the
    /// deepest representable generation.
    pub fn child_of(
        id: PersonId,
        full_name: impl Into<String>,
        gender: Gender,
        parent: &Person,
    ) -> Self {
        Self {
            generation: parent.generation.saturating_add(1),
            ..Self::founder(id, full_name, gender)
        }
    }

    /// An in-law sharing the generation of the blood member they married.
    pub fn in_law_of(
        id: PersonId,
        full_name: impl Into<String>,
        gender: Gender,
        spouse: &Person,
    ) -> Self {
        Self {
            generation: spouse.generation,
            member_type: MemberType::InLaw,
            ..Self::founder(id, full_name, gender)
        }
    }

    pub fn with_birth_date(mut self, date: impl Into<String>) -> Self {
        self.birth_date = Some(date.into());
        self
    }

    pub fn with_death_date(mut self, date: impl Into<String>) -> Self {
        self.death_date = Some(date.into());
        self
    }

    pub fn is_blood(&self) -> bool {
        self.member_type == MemberType::Blood
    }

    pub fn is_in_law(&self) -> bool {
        self.member_type == MemberType::InLaw
    }

    pub fn is_founder(&self) -> bool {
        self.generation == 1
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
            .unwrap_or_else(|| self.death_date.as_deref().is_none_or(str::is_empty))
    }

    /// Cards render a person as deceased when either the flag says so or any
    /// death date, even `"unknown"`, is on record.
    pub fn is_deceased(&self) -> bool {
        !self.is_alive() || self.death_date.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Sort key for sibling ordering. Undated and `"unknown"` births sort first.
    pub fn birth_sort_key(&self) -> &str {
        match self.birth_date.as_deref() {
            Some(date) if date != UNKNOWN_DATE => date,
            _ => "",
        }
    }

    pub fn birth_year(&self) -> Option<i32> {
        let date = self.birth_date.as_deref()?.trim();
        if date.is_empty() || date == UNKNOWN_DATE {
            return None;
        }
        if let Ok(parsed) = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(chrono::Datelike::year(&parsed));
        }
        if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(date) {
            return Some(chrono::Datelike::year(&parsed));
        }
        date.get(..4).and_then(|year| year.parse().ok())
    }

    /// Birth year for display, `?` when unknown.
    pub fn birth_year_label(&self) -> String {
        self.birth_year()
            .map(|year| year.to_string())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Name shown on a card. Long names keep only their last three words.
    pub fn display_name(&self) -> String {
        let words: Vec<&str> = self.full_name.split_whitespace().collect();
        if words.is_empty() {
            return "Unnamed".to_string();
        }
        if words.len() > 4 {
            return words[words.len() - 3..].join(" ");
        }
        words.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentChildEdge {
    pub parent_id: PersonId,
    pub child_id: PersonId,
}

impl ParentChildEdge {
    pub fn new(parent_id: PersonId, child_id: PersonId) -> Self {
        Self {
            parent_id,
            child_id,
        }
    }
}

/// Symmetric marriage record. Either side may be missing in partially
/// recorded data; such records never produce a spouse link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarriageEdge {
    #[serde(alias = "husband_id")]
    pub spouse_a_id: Option<PersonId>,
    #[serde(alias = "wife_id")]
    pub spouse_b_id: Option<PersonId>,
}

impl MarriageEdge {
    pub fn new(spouse_a_id: PersonId, spouse_b_id: PersonId) -> Self {
        Self {
            spouse_a_id: Some(spouse_a_id),
            spouse_b_id: Some(spouse_b_id),
        }
    }

    /// Both ends, if the record is complete.
    pub fn pair(&self) -> Option<(PersonId, PersonId)> {
        match (self.spouse_a_id, self.spouse_b_id) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn partner_of(&self, id: PersonId) -> Option<PersonId> {
        let (a, b) = self.pair()?;
        if a == id {
            Some(b)
        } else if b == id {
            Some(a)
        } else {
            None
        }
    }
}
