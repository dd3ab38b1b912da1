use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::{EntityKind, Ontology, OntologyId, OntologyUpdate, UserId};

use super::{Store, now};

impl Store {
    /// Stores an ontology. `structure` is kept exactly as given.
    pub fn create_ontology(
        &self,
        owner: UserId,
        name: impl Into<String>,
        structure: Value,
    ) -> StoreResult<Ontology> {
        let mut tables = self.tables.write();
        if !tables.users.contains(owner) {
            return Err(StoreError::invalid_reference(EntityKind::User, owner.get()));
        }

        let id = OntologyId::new(self.ids.next_id(EntityKind::Ontology));
        let timestamp = now();
        let ontology = Ontology {
            id,
            owner,
            name: name.into(),
            structure,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.ontologies.put(id, ontology.clone());

        debug!(ontology_id = %id, owner = %owner, "created ontology");
        Ok(ontology)
    }

    pub fn get_ontology(&self, id: OntologyId) -> Option<Ontology> {
        self.tables.read().ontologies.get(id).cloned()
    }

    /// Renames an ontology and/or replaces its structure, bumping
    /// `updated_at`.
    pub fn update_ontology(&self, id: OntologyId, update: OntologyUpdate) -> StoreResult<Ontology> {
        let mut tables = self.tables.write();
        let ontology = tables
            .ontologies
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Ontology, id.get()))?;

        if let Some(name) = update.name {
            ontology.name = name;
        }
        if let Some(structure) = update.structure {
            ontology.structure = structure;
        }
        ontology.updated_at = now().max(ontology.updated_at);

        debug!(ontology_id = %id, "updated ontology");
        Ok(ontology.clone())
    }

    pub fn delete_ontology(&self, id: OntologyId) -> bool {
        self.tables.write().ontologies.delete(id)
    }

    /// Returns a user's ontologies ordered by id.
    pub fn list_user_ontologies(&self, owner: UserId) -> Vec<Ontology> {
        let mut ontologies = self.tables.read().ontologies.list_where(|o| o.owner == owner);
        ontologies.sort_by_key(|o| o.id);
        ontologies
    }
}
