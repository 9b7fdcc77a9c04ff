use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub type ActorId = String;

/// Which of the two actor pickers an event or selection belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerId {
    First,
    Second,
}

impl PickerId {
    pub const ALL: [PickerId; 2] = [PickerId::First, PickerId::Second];

    pub fn index(self) -> usize {
        match self {
            PickerId::First => 0,
            PickerId::Second => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PickerId::First => "first",
            PickerId::Second => "second",
        }
    }
}

impl fmt::Display for PickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of an actor-prefix search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: ActorId,
    pub full_name: String,
    #[serde(default)]
    pub birth_year: Option<u32>,
}

/// One edge of a shortest path: two actors linked by a shared movie
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub actor_1: String,
    pub movie: String,
    pub actor_2: String,
}

// The server keys actors by integer id; other deployments send strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<ActorId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
