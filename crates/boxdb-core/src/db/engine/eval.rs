//! Condition evaluation and order comparison for the in-memory engine.

use crate::{
    db::{
        query::{Condition, ConditionOp, Operand, OrderDirective, OrderFlags},
        record::Record,
    },
    error::InternalError,
    model::{EntityModel, PropertyKind},
    value::{Value, numeric_cmp},
};
use std::cmp::Ordering;

/// Reject unknown properties and operator/operand/kind combinations the
/// engine cannot evaluate. Runs when the condition is appended so the error
/// surfaces at the offending call.
pub(super) fn check_condition(
    model: &EntityModel,
    condition: &Condition,
) -> Result<(), InternalError> {
    let Some(property) = model.property(condition.property_id) else {
        return Err(InternalError::engine_unsupported(format!(
            "entity '{}' has no property with id {}",
            model.entity_name, condition.property_id
        )));
    };
    let kind = property.kind;

    let accepted = match (condition.op, &condition.operand) {
        (ConditionOp::IsNull | ConditionOp::NotNull, Operand::None) => true,
        (ConditionOp::Equal | ConditionOp::NotEqual, Operand::Int(_)) => kind.is_integer(),
        (ConditionOp::Equal | ConditionOp::NotEqual, Operand::Text(_))
        | (
            ConditionOp::Contains | ConditionOp::StartsWith | ConditionOp::EndsWith,
            Operand::Text(_),
        ) => kind == PropertyKind::Text,
        (ConditionOp::Less | ConditionOp::Greater, Operand::Int(_) | Operand::Float(_))
        | (ConditionOp::Between, Operand::IntPair(..)) => kind.is_numeric(),
        (ConditionOp::In, Operand::IntList(_)) => kind.is_integer(),
        _ => false,
    };

    if accepted {
        Ok(())
    } else {
        Err(InternalError::engine_unsupported(format!(
            "operator '{}' with {} operand is not supported on {:?} property '{}'",
            condition.op.symbol(),
            condition.operand.family(),
            kind,
            property
        )))
    }
}

/// Evaluate one condition against a record. Null values only match `IsNull`.
pub(super) fn matches(record: &Record, condition: &Condition) -> bool {
    let value = record.get_by_id(condition.property_id);

    match condition.op {
        ConditionOp::IsNull => return value.is_null(),
        ConditionOp::NotNull => return !value.is_null(),
        _ if value.is_null() => return false,
        _ => {}
    }

    match (condition.op, &condition.operand) {
        (ConditionOp::Equal, operand) => equals(value, operand),
        (ConditionOp::NotEqual, operand) => !equals(value, operand),
        (ConditionOp::Less, operand) => {
            numeric_cmp(value, &operand_value(operand)) == Some(Ordering::Less)
        }
        (ConditionOp::Greater, operand) => {
            numeric_cmp(value, &operand_value(operand)) == Some(Ordering::Greater)
        }
        (ConditionOp::Between, Operand::IntPair(low, high)) => {
            let above = numeric_cmp(value, &Value::Int(*low));
            let below = numeric_cmp(value, &Value::Int(*high));
            matches!(above, Some(Ordering::Greater | Ordering::Equal))
                && matches!(below, Some(Ordering::Less | Ordering::Equal))
        }
        (ConditionOp::In, Operand::IntList(values)) => {
            value.as_int().is_some_and(|v| values.contains(&v))
        }
        (ConditionOp::Contains, Operand::Text(needle)) => {
            value.as_text().is_some_and(|s| s.contains(needle.as_str()))
        }
        (ConditionOp::StartsWith, Operand::Text(prefix)) => {
            value.as_text().is_some_and(|s| s.starts_with(prefix.as_str()))
        }
        (ConditionOp::EndsWith, Operand::Text(suffix)) => {
            value.as_text().is_some_and(|s| s.ends_with(suffix.as_str()))
        }
        _ => false,
    }
}

fn equals(value: &Value, operand: &Operand) -> bool {
    match operand {
        Operand::Int(v) => value.as_int() == Some(*v),
        Operand::Text(s) => value.as_text() == Some(s.as_str()),
        _ => false,
    }
}

fn operand_value(operand: &Operand) -> Value {
    match operand {
        Operand::Int(v) => Value::Int(*v),
        Operand::Float(v) => Value::Float(*v),
        _ => Value::Null,
    }
}

/// Compare two records by the directive list; ties fall through to the next
/// directive and finally to ascending primary key.
pub(super) fn compare_records(
    model: &EntityModel,
    orders: &[OrderDirective],
    left: (u64, &Record),
    right: (u64, &Record),
) -> Ordering {
    for order in orders {
        let kind = model
            .property(order.property_id)
            .map_or(PropertyKind::Int, |p| p.kind);
        let ord = compare_values(
            left.1.get_by_id(order.property_id),
            right.1.get_by_id(order.property_id),
            kind,
            order.flags,
        );
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.0.cmp(&right.0)
}

fn compare_values(left: &Value, right: &Value, kind: PropertyKind, flags: OrderFlags) -> Ordering {
    let zero = match kind {
        PropertyKind::Float => Value::Float(0.0),
        _ => Value::Int(0),
    };
    let nulls_zero = flags.contains(OrderFlags::NULLS_ZERO) && kind.is_numeric();
    let left = if nulls_zero && left.is_null() { &zero } else { left };
    let right = if nulls_zero && right.is_null() { &zero } else { right };

    let nulls_last = flags.contains(OrderFlags::NULLS_LAST);
    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => {
            if nulls_last {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (false, true) => {
            if nulls_last {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (false, false) => {
            let ord = compare_present(left, right, flags);
            if flags.contains(OrderFlags::DESCENDING) {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

fn compare_present(left: &Value, right: &Value, flags: OrderFlags) -> Ordering {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => {
            if flags.contains(OrderFlags::CASE_SENSITIVE) {
                a.cmp(b)
            } else {
                a.bytes()
                    .map(|c| c.to_ascii_lowercase())
                    .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
            }
        }
        (Value::Int(a), Value::Int(b)) if flags.contains(OrderFlags::UNSIGNED) => {
            a.cast_unsigned().cmp(&b.cast_unsigned())
        }
        (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
        _ => numeric_cmp(left, right).unwrap_or(Ordering::Equal),
    }
}
