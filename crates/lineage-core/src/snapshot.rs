use crate::{DataError, MarriageEdge, ParentChildEdge, Person};
use serde::{Deserialize, Serialize};

/// Everything the renderer needs from storage, supplied in full per render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySnapshot {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub relationships: Vec<ParentChildEdge>,
    #[serde(default)]
    pub marriages: Vec<MarriageEdge>,
}

impl FamilySnapshot {
    pub fn new(
        people: Vec<Person>,
        relationships: Vec<ParentChildEdge>,
        marriages: Vec<MarriageEdge>,
    ) -> Self {
        Self {
            people,
            relationships,
            marriages,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let snapshot: FamilySnapshot = serde_json::from_str(json)?;
        tracing::debug!(
            "Decoded snapshot: {} people, {} relationships, {} marriages",
            snapshot.people.len(),
            snapshot.relationships.len(),
            snapshot.marriages.len()
        );
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, MemberType, PersonId};

    #[test]
    fn test_decode_storage_payload() {
        let json = r#"{
            "people": [
                {"id": 1, "full_name": "Tran Van A", "gender": "Nam", "generation": 1},
                {"id": 2, "full_name": "Le Thi B", "gender": "Nữ", "generation": 1,
                 "member_type": "in_law", "birth_date": "unknown"}
            ],
            "relationships": [],
            "marriages": [{"husband_id": 1, "wife_id": 2}]
        }"#;

        let snapshot = FamilySnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.people.len(), 2);
        assert_eq!(snapshot.people[0].gender, Gender::Male);
        assert_eq!(snapshot.people[1].member_type, MemberType::InLaw);
        assert_eq!(
            snapshot.marriages[0].pair(),
            Some((PersonId(1), PersonId(2)))
        );
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let snapshot = FamilySnapshot::from_json("{}").unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.relationships.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_reported() {
        let err = FamilySnapshot::from_json(r#"{"people": [{"id": 1, "gender": "robot"}]}"#)
            .unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }
}
