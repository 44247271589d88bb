//! Rule dispatch: configuration in, plan-check results out

use crate::advice::Advice;
use crate::advisor::{Context, ParsedTree};
use crate::error::AdvisorError;
use crate::payload::{decode_level, decode_payload};
use crate::plan_check::{project, CheckResult};
use crate::registry::Registry;
use crate::rule::{Engine, Rule};

/// Run one rule against a parsed batch and return its advice
///
/// A disabled rule yields no advice at all. Otherwise the result is never
/// empty: when the advisor finds nothing, a single OK advice stands in.
pub fn advise(
    registry: &Registry,
    engine: Engine,
    rule: &Rule,
    tree: &ParsedTree,
    statement: &str,
) -> Result<Vec<Advice>, AdvisorError> {
    if rule.is_disabled() {
        log::debug!("Skipping disabled rule {} for {}", rule.rule_type, engine);
        return Ok(Vec::new());
    }

    let level = decode_level(rule.level)?;

    let advisor = registry
        .get(engine, rule.rule_type)
        .ok_or(AdvisorError::UnregisteredRule {
            engine,
            rule_type: rule.rule_type,
        })?;

    let payload = decode_payload(rule.rule_type, &rule.payload)?;

    let ctx = Context {
        engine,
        rule_type: rule.rule_type,
        level,
        payload: &payload,
        tree,
        statement,
    };

    let mut advice = advisor.check(&ctx).map_err(|e| {
        if let AdvisorError::ShapeMismatch { .. } = e {
            log::error!("{}", e);
        }
        e
    })?;

    if advice.is_empty() {
        advice.push(Advice::ok());
    }

    log::debug!(
        "Rule {} on {} produced {} advice",
        rule.rule_type,
        engine,
        advice.len()
    );

    Ok(advice)
}

/// Run one rule and project its advice into plan-check results
pub fn dispatch(
    registry: &Registry,
    engine: Engine,
    rule: &Rule,
    tree: &ParsedTree,
    statement: &str,
) -> Result<Vec<CheckResult>, AdvisorError> {
    let advice = advise(registry, engine, rule, tree, statement)?;
    Ok(advice.iter().map(project).collect())
}
