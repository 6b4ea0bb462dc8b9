//! The fixed vocabulary of storage backend kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend kinds a submission may request fan-out to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    MongoDb,
    Postgres,
    Neo4j,
    Vector,
}

impl StoreKind {
    /// All kinds in the vocabulary.
    pub const ALL: [StoreKind; 4] = [Self::MongoDb, Self::Postgres, Self::Neo4j, Self::Vector];

    /// Wire/config representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MongoDb => "mongodb",
            Self::Postgres => "postgres",
            Self::Neo4j => "neo4j",
            Self::Vector => "vector",
        }
    }
}

impl FromStr for StoreKind {
    type Err = crate::StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mongodb" => Ok(Self::MongoDb),
            "postgres" => Ok(Self::Postgres),
            "neo4j" => Ok(Self::Neo4j),
            "vector" => Ok(Self::Vector),
            other => Err(crate::StoreError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
