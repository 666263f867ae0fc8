//! Generation and membership rules for adding a person to a family.

use crate::{MemberType, Person, PlacementError};

/// Where a new member lands: their generation and how they belong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub generation: u32,
    pub member_type: MemberType,
}

/// Computes the placement of a new member.
///
/// A parent always wins over a spouse: a member with a recorded parent is a
/// blood descendant even when a spouse is also given. A requested generation,
/// if present, must agree with the computed one.
pub fn place_member(
    requested_generation: Option<u32>,
    parent: Option<&Person>,
    spouse: Option<&Person>,
) -> Result<Placement, PlacementError> {
    if requested_generation == Some(1) {
        if parent.is_some() {
            return Err(PlacementError::FounderWithParent);
        }
        return Ok(Placement {
            generation: 1,
            member_type: MemberType::Blood,
        });
    }

    let (computed, member_type) = match (parent, spouse) {
        (Some(parent), _) => {
            let generation = parent
                .generation
                .checked_add(1)
                .ok_or(PlacementError::GenerationOverflow {
                    parent: parent.generation,
                })?;
            (generation, MemberType::Blood)
        }
        (None, Some(spouse)) => (spouse.generation, MemberType::InLaw),
        (None, None) => return Err(PlacementError::Unattached),
    };

    if let Some(requested) = requested_generation
        && requested != computed
    {
        return Err(PlacementError::GenerationMismatch {
            requested,
            computed,
        });
    }

    Ok(Placement {
        generation: computed,
        member_type,
    })
}
