use crate::{
    db::{
        engine::BuilderHandle,
        query::{Condition, ConditionOp, Operand, OrderDirective, OrderFlags, Query},
        store::EntityBox,
    },
    error::InternalError,
    model::Property,
    obs::sink::MetricsEvent,
    traits::EntityKind,
};
use std::{collections::BTreeSet, fmt};

///
/// QueryBuilder
///
/// Accumulates conditions and order directives for one entity type against a
/// live engine-side builder resource.
///
/// The resource is released exactly once: by `build`, by `close`, or (as a
/// logged leak guard) on drop. Every call after release fails with an
/// invalid-state error.
///

pub struct QueryBuilder<E: EntityKind> {
    entity_box: EntityBox<E>,
    handle: Option<BuilderHandle>,
}

impl<E: EntityKind> QueryBuilder<E> {
    /// Open a builder resource. Property metadata is validated first so an
    /// unresolved property fails here instead of at the first predicate.
    pub(crate) fn new(entity_box: EntityBox<E>) -> Result<Self, InternalError> {
        E::MODEL.validate()?;

        let store = entity_box.store();
        let handle = store.engine().create_builder(E::MODEL.entity_name)?;
        store.emit(MetricsEvent::BuilderOpen {
            entity_name: E::MODEL.entity_name,
        });

        Ok(Self {
            entity_box,
            handle: Some(handle),
        })
    }

    /// True once `build` or `close` has released the builder resource.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    fn live(&self) -> Result<BuilderHandle, InternalError> {
        self.handle
            .ok_or_else(|| InternalError::builder_closed(E::MODEL.entity_name))
    }

    /// Property ids are only unique within one entity.
    fn own_property(property: &Property) -> Result<(), InternalError> {
        if property.entity == E::MODEL.entity_name {
            Ok(())
        } else {
            Err(InternalError::builder_argument(format!(
                "property '{property}' does not belong to '{}'",
                E::MODEL.entity_name
            )))
        }
    }

    // ---------------------------------------------------------------------
    // Conditions
    // ---------------------------------------------------------------------

    /// Append one predicate. Conditions are conjoined in append order; the
    /// engine rejects operand/property-kind mismatches.
    pub fn condition(
        &mut self,
        property: &Property,
        op: ConditionOp,
        operand: impl Into<Operand>,
    ) -> Result<&mut Self, InternalError> {
        let handle = self.live()?;
        Self::own_property(property)?;
        let operand = operand.into();

        if let Operand::IntList(values) = &operand {
            let mut seen = BTreeSet::new();
            if let Some(dup) = values.iter().find(|v| !seen.insert(**v)) {
                return Err(InternalError::builder_argument(format!(
                    "'in' list for '{property}' contains {dup} more than once"
                )));
            }
        }

        let store = self.entity_box.store();
        if store.debug_enabled() {
            tracing::debug!(
                entity = E::MODEL.entity_name,
                property = %property,
                op = op.symbol(),
                operand = %operand,
                "append condition"
            );
        }
        store
            .engine()
            .append_condition(handle, Condition::new(property.id, op, operand))?;

        Ok(self)
    }

    pub fn is_null(&mut self, property: &Property) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::IsNull, Operand::None)
    }

    pub fn not_null(&mut self, property: &Property) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::NotNull, Operand::None)
    }

    /// Integer or text equality, depending on the operand.
    pub fn equal(
        &mut self,
        property: &Property,
        value: impl Into<Operand>,
    ) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::Equal, value)
    }

    pub fn not_equal(
        &mut self,
        property: &Property,
        value: impl Into<Operand>,
    ) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::NotEqual, value)
    }

    pub fn less(
        &mut self,
        property: &Property,
        value: impl Into<Operand>,
    ) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::Less, value)
    }

    pub fn greater(
        &mut self,
        property: &Property,
        value: impl Into<Operand>,
    ) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::Greater, value)
    }

    /// Inclusive on both ends.
    pub fn between(
        &mut self,
        property: &Property,
        low: i64,
        high: i64,
    ) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::Between, Operand::IntPair(low, high))
    }

    /// Membership test. Duplicate values are rejected before reaching the
    /// engine.
    pub fn in_values(
        &mut self,
        property: &Property,
        values: &[i64],
    ) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::In, Operand::IntList(values.to_vec()))
    }

    pub fn contains(
        &mut self,
        property: &Property,
        text: &str,
    ) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::Contains, text)
    }

    pub fn starts_with(
        &mut self,
        property: &Property,
        text: &str,
    ) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::StartsWith, text)
    }

    pub fn ends_with(
        &mut self,
        property: &Property,
        text: &str,
    ) -> Result<&mut Self, InternalError> {
        self.condition(property, ConditionOp::EndsWith, text)
    }

    // ---------------------------------------------------------------------
    // Ordering
    // ---------------------------------------------------------------------

    /// Ascending, ASCII case-insensitive, nulls first.
    pub fn order(&mut self, property: &Property) -> Result<&mut Self, InternalError> {
        self.order_with(property, OrderFlags::NONE)
    }

    pub fn order_desc(&mut self, property: &Property) -> Result<&mut Self, InternalError> {
        self.order_with(property, OrderFlags::DESCENDING)
    }

    /// Append a sort key. Flags are passed through to the engine uninterpreted.
    pub fn order_with(
        &mut self,
        property: &Property,
        flags: OrderFlags,
    ) -> Result<&mut Self, InternalError> {
        let handle = self.live()?;
        Self::own_property(property)?;

        let store = self.entity_box.store();
        if store.debug_enabled() {
            tracing::debug!(
                entity = E::MODEL.entity_name,
                property = %property,
                flags = %flags,
                "append order"
            );
        }
        store
            .engine()
            .append_order(handle, OrderDirective::new(property.id, flags))?;

        Ok(self)
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Compile the accumulated state into a new `Query` and release the
    /// builder resource. The builder is single-use afterwards.
    pub fn build(&mut self) -> Result<Query<E>, InternalError> {
        let handle = self.live()?;

        let store = self.entity_box.store();
        let query_handle = store.engine().build_query(handle)?;
        let query = Query::new(self.entity_box.clone(), query_handle);
        if store.debug_enabled() {
            tracing::debug!(
                entity = E::MODEL.entity_name,
                builder = %handle,
                query = %query_handle,
                "build query"
            );
        }
        store.emit(MetricsEvent::QueryBuild {
            entity_name: E::MODEL.entity_name,
        });

        self.close()?;

        Ok(query)
    }

    /// Release the builder resource if still live. Idempotent.
    pub fn close(&mut self) -> Result<(), InternalError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let store = self.entity_box.store();
        store.engine().destroy_builder(handle)?;
        store.emit(MetricsEvent::BuilderClose {
            entity_name: E::MODEL.entity_name,
        });

        Ok(())
    }
}

impl<E: EntityKind> Drop for QueryBuilder<E> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        tracing::warn!(
            entity = E::MODEL.entity_name,
            %handle,
            "query builder dropped without build or close; releasing"
        );

        let store = self.entity_box.store();
        store.emit(MetricsEvent::BuilderLeak {
            entity_name: E::MODEL.entity_name,
        });
        if let Err(err) = store.engine().destroy_builder(handle) {
            tracing::error!(
                entity = E::MODEL.entity_name,
                %handle,
                error = %err,
                "builder release failed"
            );
        }
    }
}

impl<E: EntityKind> fmt::Debug for QueryBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("entity", &E::MODEL.entity_name)
            .field("handle", &self.handle)
            .finish()
    }
}
