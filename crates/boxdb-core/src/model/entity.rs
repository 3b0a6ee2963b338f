use crate::{
    error::InternalError,
    model::property::{Property, PropertyKind},
};
use std::collections::BTreeSet;

///
/// EntityModel
/// Minimal runtime model for one entity type.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Stable external name used by the engine for routing.
    pub entity_name: &'static str,
    /// Primary key property (must also appear in `properties`).
    pub primary_key: &'static Property,
    /// Ordered property list (authoritative for record layout).
    pub properties: &'static [Property],
}

impl EntityModel {
    #[must_use]
    pub const fn new(
        entity_name: &'static str,
        primary_key: &'static Property,
        properties: &'static [Property],
    ) -> Self {
        Self {
            entity_name,
            primary_key,
            properties,
        }
    }

    /// Look up a property by its numeric id.
    #[must_use]
    pub fn property(&self, id: u32) -> Option<&'static Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    /// Check that every property id is resolved and consistent.
    ///
    /// Conditions reference properties by id only, so an unresolved (zero),
    /// duplicated or foreign id would make a predicate undefined.
    pub fn validate(&self) -> Result<(), InternalError> {
        let name = self.entity_name;

        if name.is_empty() {
            return Err(InternalError::model_invalid("entity name must not be empty"));
        }
        if self.properties.is_empty() {
            return Err(InternalError::model_invalid(format!(
                "entity '{name}' declares no properties"
            )));
        }

        let mut seen = BTreeSet::new();
        for property in self.properties {
            if property.id == 0 {
                return Err(InternalError::model_invalid(format!(
                    "property '{name}.{}' has an unresolved id",
                    property.name
                )));
            }
            if property.entity != name {
                return Err(InternalError::model_invalid(format!(
                    "property '{property}' does not belong to entity '{name}'"
                )));
            }
            if !seen.insert(property.id) {
                return Err(InternalError::model_invalid(format!(
                    "entity '{name}' declares property id {} twice",
                    property.id
                )));
            }
        }

        if self.property(self.primary_key.id) != Some(self.primary_key) {
            return Err(InternalError::model_invalid(format!(
                "primary key '{}' is not a property of '{name}'",
                self.primary_key
            )));
        }
        if self.primary_key.kind != PropertyKind::Id {
            return Err(InternalError::model_invalid(format!(
                "primary key '{}' must be of kind Id",
                self.primary_key
            )));
        }

        Ok(())
    }
}
