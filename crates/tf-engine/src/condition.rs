//! Condition evaluation.
//!
//! Evaluation is total and fails open: a condition that cannot be judged
//! (no target, unknown type or operator, unresolvable reference) holds.

use tf_core::{
    ConditionKind, ConditionOperator, GameState, LogicOperator, RuleCondition, StaticProject,
    Value,
};

/// Evaluate one condition against the current state.
pub fn evaluate(condition: &RuleCondition, state: &GameState, project: &StaticProject) -> bool {
    let Some(target) = condition.target() else {
        return true;
    };
    let expected = condition.value.as_ref();

    match &condition.kind {
        ConditionKind::Variable => {
            let actual = state.variable(target).cloned().unwrap_or_default();
            compare(&condition.operator, &actual, expected)
        }
        ConditionKind::Item => match condition.operator {
            ConditionOperator::Has => state.has_item(target),
            ConditionOperator::HasNot => !state.has_item(target),
            _ => true,
        },
        ConditionKind::Relationship => {
            let score = state
                .relationship(target)
                .or_else(|| project.character(target).map(|c| c.initial_relationship));
            match score {
                Some(score) => compare(&condition.operator, &Value::Number(score), expected),
                None => true,
            }
        }
        ConditionKind::Quest => {
            let status = state.quest_status(target);
            expected
                .and_then(Value::as_text)
                .is_some_and(|wanted| wanted == status.as_str())
        }
        ConditionKind::Scene => state.current_scene_id == target,
        ConditionKind::Unrecognized(_) => true,
    }
}

/// Combine a list of conditions. AND needs every condition; OR needs any.
/// An empty list holds under both.
pub fn evaluate_all(
    conditions: &[RuleCondition],
    logic: LogicOperator,
    state: &GameState,
    project: &StaticProject,
) -> bool {
    if conditions.is_empty() {
        return true;
    }
    match logic {
        LogicOperator::And => conditions.iter().all(|c| evaluate(c, state, project)),
        LogicOperator::Or => conditions.iter().any(|c| evaluate(c, state, project)),
    }
}

fn compare(operator: &ConditionOperator, actual: &Value, expected: Option<&Value>) -> bool {
    match operator {
        ConditionOperator::Eq => expected.is_some_and(|e| actual.loose_eq(e)),
        ConditionOperator::Gt => numeric(actual, expected, |a, b| a > b),
        ConditionOperator::Lt => numeric(actual, expected, |a, b| a < b),
        ConditionOperator::Gte => numeric(actual, expected, |a, b| a >= b),
        ConditionOperator::Lte => numeric(actual, expected, |a, b| a <= b),
        _ => true,
    }
}

/// Numeric comparison; a side that does not coerce to a number compares false.
fn numeric(actual: &Value, expected: Option<&Value>, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.as_number(), expected.and_then(Value::as_number)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}
