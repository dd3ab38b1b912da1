use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::{OntologyId, UserId};

/// A user-defined ontology.
///
/// `structure` is an arbitrary tree of concepts and relationships. The store
/// keeps it as an opaque JSON value and hands it back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ontology {
    pub id: OntologyId,
    pub owner: UserId,
    pub name: String,
    pub structure: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Update for an ontology. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OntologyUpdate {
    pub name: Option<String>,
    pub structure: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structure_round_trips_untouched() {
        let now = OffsetDateTime::now_utc();
        let structure = json!({
            "concepts": [{"name": "Model", "children": [{"name": "Transformer"}]}],
            "relationships": [{"from": "Transformer", "to": "Model", "type": "is-a"}],
            "weights": [0.5, 1, null, true]
        });
        let ontology = Ontology {
            id: OntologyId::new(1),
            owner: UserId::new(1),
            name: "ml".to_string(),
            structure: structure.clone(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&ontology).unwrap();
        let back: Ontology = serde_json::from_str(&json).unwrap();
        assert_eq!(back.structure, structure);
    }
}
