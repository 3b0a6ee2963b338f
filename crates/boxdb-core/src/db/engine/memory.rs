use crate::{
    db::{
        engine::{BuilderHandle, Engine, QueryHandle, eval},
        query::{Condition, OrderDirective},
        record::{RawRow, Record},
    },
    error::InternalError,
    model::EntityModel,
    value::Value,
};
use std::{
    collections::{BTreeMap, HashMap},
    num::NonZeroU64,
    sync::{Mutex, MutexGuard},
};

///
/// Table
/// Rows of one entity, keyed and iterated by primary key.
///

struct Table {
    model: &'static EntityModel,
    rows: BTreeMap<u64, RawRow>,
    next_id: u64,
}

///
/// QueryState
/// Accumulated conditions and order directives. Builders mutate one;
/// `build_query` freezes a copy under a fresh query handle.
///

#[derive(Clone)]
struct QueryState {
    model: &'static EntityModel,
    conditions: Vec<Condition>,
    orders: Vec<OrderDirective>,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<&'static str, Table>,
    builders: HashMap<BuilderHandle, QueryState>,
    queries: HashMap<QueryHandle, QueryState>,
    next_handle: u64,
}

impl MemoryState {
    fn next_raw_handle(&mut self) -> Result<NonZeroU64, InternalError> {
        self.next_handle = self
            .next_handle
            .checked_add(1)
            .ok_or_else(|| InternalError::engine_internal("handle space exhausted"))?;

        NonZeroU64::new(self.next_handle)
            .ok_or_else(|| InternalError::engine_internal("handle space exhausted"))
    }

    fn table(&self, entity_name: &str) -> Result<&Table, InternalError> {
        self.tables.get(entity_name).ok_or_else(|| unknown_entity(entity_name))
    }

    fn table_mut(&mut self, entity_name: &str) -> Result<&mut Table, InternalError> {
        self.tables
            .get_mut(entity_name)
            .ok_or_else(|| unknown_entity(entity_name))
    }

    fn builder_mut(&mut self, handle: BuilderHandle) -> Result<&mut QueryState, InternalError> {
        self.builders.get_mut(&handle).ok_or_else(|| {
            InternalError::engine_invalid_state(format!("{handle} is not a live builder"))
        })
    }

    fn query(&self, handle: QueryHandle) -> Result<&QueryState, InternalError> {
        self.queries.get(&handle).ok_or_else(|| {
            InternalError::engine_invalid_state(format!("{handle} is not a live query"))
        })
    }

    /// Matching rows as `(id, row)` in compiled order.
    fn run(&self, handle: QueryHandle) -> Result<Vec<(u64, RawRow)>, InternalError> {
        let query = self.query(handle)?;
        let table = self.table(query.model.entity_name)?;

        let mut hits = Vec::new();
        for (id, row) in &table.rows {
            let record = Record::decode(row)?;
            if query.conditions.iter().all(|c| eval::matches(&record, c)) {
                hits.push((*id, record, row));
            }
        }

        hits.sort_by(|a, b| {
            eval::compare_records(query.model, &query.orders, (a.0, &a.1), (b.0, &b.1))
        });

        Ok(hits
            .into_iter()
            .map(|(id, _, row)| (id, row.clone()))
            .collect())
    }
}

fn unknown_entity(entity_name: &str) -> InternalError {
    InternalError::engine_not_found(format!("entity '{entity_name}' is not registered"))
}

///
/// MemoryEngine
///
/// Reference in-memory engine. Rows are CBOR records kept in id order behind
/// one mutex; compiled queries may be executed from any thread.
///

#[derive(Default)]
pub struct MemoryEngine {
    state: Mutex<MemoryState>,
}

impl MemoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, InternalError> {
        self.state
            .lock()
            .map_err(|_| InternalError::engine_internal("memory engine state poisoned"))
    }

    /// Number of builder resources not yet destroyed.
    pub fn live_builders(&self) -> Result<usize, InternalError> {
        Ok(self.lock()?.builders.len())
    }

    /// Number of query resources not yet destroyed.
    pub fn live_queries(&self) -> Result<usize, InternalError> {
        Ok(self.lock()?.queries.len())
    }
}

impl Engine for MemoryEngine {
    fn register_entity(&self, model: &'static EntityModel) -> Result<(), InternalError> {
        model.validate()?;

        let mut state = self.lock()?;
        if let Some(existing) = state.tables.get(model.entity_name) {
            if existing.model.properties != model.properties {
                return Err(InternalError::engine_unsupported(format!(
                    "entity '{}' is already registered with a different layout",
                    model.entity_name
                )));
            }
            return Ok(());
        }

        state.tables.insert(
            model.entity_name,
            Table {
                model,
                rows: BTreeMap::new(),
                next_id: 1,
            },
        );

        Ok(())
    }

    fn create_builder(&self, entity_name: &str) -> Result<BuilderHandle, InternalError> {
        let mut state = self.lock()?;
        let model = state.table(entity_name)?.model;
        let handle = BuilderHandle::new(state.next_raw_handle()?);

        state.builders.insert(
            handle,
            QueryState {
                model,
                conditions: Vec::new(),
                orders: Vec::new(),
            },
        );

        Ok(handle)
    }

    fn destroy_builder(&self, handle: BuilderHandle) -> Result<(), InternalError> {
        self.lock()?
            .builders
            .remove(&handle)
            .map(|_| ())
            .ok_or_else(|| {
                InternalError::engine_invalid_state(format!("{handle} released twice or unknown"))
            })
    }

    fn append_condition(
        &self,
        handle: BuilderHandle,
        condition: Condition,
    ) -> Result<(), InternalError> {
        let mut state = self.lock()?;
        let builder = state.builder_mut(handle)?;
        eval::check_condition(builder.model, &condition)?;
        builder.conditions.push(condition);

        Ok(())
    }

    fn append_order(
        &self,
        handle: BuilderHandle,
        order: OrderDirective,
    ) -> Result<(), InternalError> {
        let mut state = self.lock()?;
        let builder = state.builder_mut(handle)?;
        if builder.model.property(order.property_id).is_none() {
            return Err(InternalError::engine_unsupported(format!(
                "entity '{}' has no property with id {}",
                builder.model.entity_name, order.property_id
            )));
        }
        builder.orders.push(order);

        Ok(())
    }

    fn build_query(&self, handle: BuilderHandle) -> Result<QueryHandle, InternalError> {
        let mut state = self.lock()?;
        let frozen = state.builder_mut(handle)?.clone();
        let query = QueryHandle::new(state.next_raw_handle()?);
        state.queries.insert(query, frozen);

        Ok(query)
    }

    fn destroy_query(&self, handle: QueryHandle) -> Result<(), InternalError> {
        self.lock()?
            .queries
            .remove(&handle)
            .map(|_| ())
            .ok_or_else(|| {
                InternalError::engine_invalid_state(format!("{handle} released twice or unknown"))
            })
    }

    fn find(&self, handle: QueryHandle) -> Result<Vec<RawRow>, InternalError> {
        let rows = self.lock()?.run(handle)?;

        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    fn find_first(&self, handle: QueryHandle) -> Result<Option<RawRow>, InternalError> {
        let rows = self.lock()?.run(handle)?;

        Ok(rows.into_iter().next().map(|(_, row)| row))
    }

    fn find_unique(&self, handle: QueryHandle) -> Result<Option<RawRow>, InternalError> {
        let state = self.lock()?;
        let entity_name = state.query(handle)?.model.entity_name;
        let mut rows = state.run(handle)?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop().map(|(_, row)| row)),
            n => Err(InternalError::not_unique(entity_name, n)),
        }
    }

    fn find_ids(&self, handle: QueryHandle) -> Result<Vec<u64>, InternalError> {
        let rows = self.lock()?.run(handle)?;

        Ok(rows.into_iter().map(|(id, _)| id).collect())
    }

    fn count(&self, handle: QueryHandle) -> Result<u64, InternalError> {
        let rows = self.lock()?.run(handle)?;

        Ok(rows.len() as u64)
    }

    fn remove_matching(&self, handle: QueryHandle) -> Result<u64, InternalError> {
        let mut state = self.lock()?;
        let entity_name = state.query(handle)?.model.entity_name;
        let ids: Vec<u64> = state.run(handle)?.into_iter().map(|(id, _)| id).collect();

        let table = state.table_mut(entity_name)?;
        for id in &ids {
            table.rows.remove(id);
        }

        Ok(ids.len() as u64)
    }

    fn describe(&self, handle: QueryHandle) -> Result<String, InternalError> {
        let state = self.lock()?;
        let query = state.query(handle)?;
        let name_of = |id: u32| query.model.property(id).map_or("?", |p| p.name);

        let mut out = query.model.entity_name.to_string();
        for (i, c) in query.conditions.iter().enumerate() {
            out.push_str(if i == 0 { " where " } else { " and " });
            out.push_str(name_of(c.property_id));
            out.push(' ');
            out.push_str(c.op.symbol());
            let operand = c.operand.to_string();
            if !operand.is_empty() {
                out.push(' ');
                out.push_str(&operand);
            }
        }
        for (i, o) in query.orders.iter().enumerate() {
            out.push_str(if i == 0 { " order by " } else { ", " });
            out.push_str(name_of(o.property_id));
            out.push(' ');
            out.push_str(&o.flags.to_string());
        }

        Ok(out)
    }

    fn put(&self, entity_name: &str, id: u64, row: RawRow) -> Result<u64, InternalError> {
        let mut state = self.lock()?;
        let table = state.table_mut(entity_name)?;

        let id = if id == 0 {
            let assigned = table.next_id;
            table.next_id = table
                .next_id
                .checked_add(1)
                .ok_or_else(|| InternalError::engine_internal("id space exhausted"))?;
            assigned
        } else {
            table.next_id = table.next_id.max(id.saturating_add(1));
            id
        };

        // The stored record always carries its final primary key.
        let mut record = Record::decode(&row)?;
        record.set(table.model.primary_key, Value::from_id(id));
        table.rows.insert(id, record.encode()?);

        Ok(id)
    }

    fn get(&self, entity_name: &str, id: u64) -> Result<Option<RawRow>, InternalError> {
        Ok(self.lock()?.table(entity_name)?.rows.get(&id).cloned())
    }

    fn get_all(&self, entity_name: &str) -> Result<Vec<RawRow>, InternalError> {
        Ok(self
            .lock()?
            .table(entity_name)?
            .rows
            .values()
            .cloned()
            .collect())
    }

    fn remove(&self, entity_name: &str, id: u64) -> Result<bool, InternalError> {
        Ok(self
            .lock()?
            .table_mut(entity_name)?
            .rows
            .remove(&id)
            .is_some())
    }

    fn count_all(&self, entity_name: &str) -> Result<u64, InternalError> {
        Ok(self.lock()?.table(entity_name)?.rows.len() as u64)
    }
}
