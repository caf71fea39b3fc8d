//! Structural checks on plans.
//!
//! A well-formed plan starts and ends with an activity and never has two
//! elements of the same kind next to each other. Violations are reported,
//! never repaired.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{ElementKind, Plan, PlanElement};
use crate::routing::DiagnosticSink;

/// A way in which a plan breaks activity/leg alternation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralViolation {
    #[error("plan is empty")]
    Empty,

    #[error("plan starts with a leg")]
    FirstNotActivity,

    #[error("activity at index {index} follows another activity")]
    ActivityAfterActivity { index: usize },

    #[error("leg at index {index} follows another leg")]
    LegAfterLeg { index: usize },

    #[error("plan ends with a leg")]
    LastNotActivity,

    #[error("element at index {index} is neither an activity nor a leg")]
    UnrecognizedElement { index: usize },
}

/// Anything that can be classified as a plan element.
///
/// `None` means the element is of a kind validation does not know.
pub trait PlanItem {
    fn kind(&self) -> Option<ElementKind>;
}

impl PlanItem for PlanElement {
    fn kind(&self) -> Option<ElementKind> {
        Some(PlanElement::kind(self))
    }
}

/// Classifies raw JSON plan elements by their `kind` field.
impl PlanItem for Value {
    fn kind(&self) -> Option<ElementKind> {
        match self.get("kind")?.as_str()? {
            "activity" => Some(ElementKind::Activity),
            "leg" => Some(ElementKind::Leg),
            _ => None,
        }
    }
}

/// Checks that `items` alternate between activities and legs, starting and
/// ending with an activity.
///
/// # Errors
///
/// Returns the first violation found, scanning from the front.
///
/// # Examples
///
/// ```
/// use drt_routing::validation::{validate_items, StructuralViolation};
/// use serde_json::json;
///
/// let plan = vec![json!({"kind": "activity"}), json!({"kind": "leg"})];
/// assert_eq!(validate_items(&plan), Err(StructuralViolation::LastNotActivity));
/// ```
pub fn validate_items<T: PlanItem>(items: &[T]) -> Result<(), StructuralViolation> {
    if items.is_empty() {
        return Err(StructuralViolation::Empty);
    }

    let mut expect = ElementKind::Activity;
    for (index, item) in items.iter().enumerate() {
        let kind = item
            .kind()
            .ok_or(StructuralViolation::UnrecognizedElement { index })?;
        expect = match (expect, kind) {
            (ElementKind::Activity, ElementKind::Activity) => ElementKind::Leg,
            (ElementKind::Leg, ElementKind::Leg) => ElementKind::Activity,
            (ElementKind::Activity, ElementKind::Leg) if index == 0 => {
                return Err(StructuralViolation::FirstNotActivity);
            }
            (ElementKind::Activity, ElementKind::Leg) => {
                return Err(StructuralViolation::LegAfterLeg { index });
            }
            (ElementKind::Leg, ElementKind::Activity) => {
                return Err(StructuralViolation::ActivityAfterActivity { index });
            }
        };
    }

    // Still expecting an activity means the last element was a leg
    if expect == ElementKind::Activity {
        return Err(StructuralViolation::LastNotActivity);
    }
    Ok(())
}

/// Checks a plan's structure.
pub fn validate_plan(plan: &Plan) -> Result<(), StructuralViolation> {
    validate_items(plan.elements())
}

/// Runs structural checks and reports violations to a diagnostic sink.
#[derive(Clone)]
pub struct PlanChecker {
    sink: Arc<dyn DiagnosticSink>,
}

impl PlanChecker {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Checks `items`, reporting any violation under `description`.
    pub fn check<T: PlanItem>(
        &self,
        description: &str,
        items: &[T],
    ) -> Result<(), StructuralViolation> {
        validate_items(items).inspect_err(|violation| {
            self.sink.structural_violation(description, violation);
        })
    }
}

impl std::fmt::Debug for PlanChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanChecker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Activity, Leg, LinkId, Location};
    use crate::routing::{FallbackReason, TripRequest};
    use serde_json::json;
    use std::sync::Mutex;

    fn act() -> PlanElement {
        Activity::new("home", Location::on_link(LinkId::from("A"))).into()
    }

    fn leg() -> PlanElement {
        Leg::new("walk", LinkId::from("A"), LinkId::from("B"), 0.0, 1.0).into()
    }

    #[test]
    fn accepts_alternating_plan() {
        assert_eq!(validate_items(&[act()]), Ok(()));
        assert_eq!(validate_items(&[act(), leg(), act()]), Ok(()));
        assert_eq!(
            validate_items(&[act(), leg(), act(), leg(), act()]),
            Ok(())
        );
    }

    #[test]
    fn rejects_empty_plan() {
        let empty: [PlanElement; 0] = [];
        assert_eq!(validate_items(&empty), Err(StructuralViolation::Empty));
        assert_eq!(
            validate_plan(&Plan::default()),
            Err(StructuralViolation::Empty)
        );
    }

    #[test]
    fn rejects_leg_first() {
        assert_eq!(
            validate_items(&[leg(), act()]),
            Err(StructuralViolation::FirstNotActivity)
        );
    }

    #[test]
    fn rejects_consecutive_activities() {
        assert_eq!(
            validate_items(&[act(), act(), leg(), act()]),
            Err(StructuralViolation::ActivityAfterActivity { index: 1 })
        );
    }

    #[test]
    fn rejects_consecutive_legs() {
        assert_eq!(
            validate_items(&[act(), leg(), leg(), act()]),
            Err(StructuralViolation::LegAfterLeg { index: 2 })
        );
    }

    #[test]
    fn rejects_leg_last() {
        assert_eq!(
            validate_items(&[act(), leg()]),
            Err(StructuralViolation::LastNotActivity)
        );
    }

    #[test]
    fn rejects_unknown_json_kind() {
        let plan = vec![
            json!({"kind": "activity", "type": "home"}),
            json!({"kind": "teleport"}),
            json!({"kind": "activity", "type": "work"}),
        ];
        assert_eq!(
            validate_items(&plan),
            Err(StructuralViolation::UnrecognizedElement { index: 1 })
        );

        let missing = vec![json!({"type": "home"})];
        assert_eq!(
            validate_items(&missing),
            Err(StructuralViolation::UnrecognizedElement { index: 0 })
        );
    }

    #[test]
    fn json_matches_typed_elements() {
        let typed = vec![act(), leg(), act()];
        let raw: Vec<Value> = typed
            .iter()
            .map(|e| serde_json::to_value(e).unwrap())
            .collect();
        assert_eq!(validate_items(&raw), validate_items(&typed));
    }

    #[derive(Default)]
    struct Recorder {
        violations: Mutex<Vec<(String, StructuralViolation)>>,
    }

    impl DiagnosticSink for Recorder {
        fn fallback(&self, _request: &TripRequest, _reason: FallbackReason) {}

        fn structural_violation(&self, description: &str, violation: &StructuralViolation) {
            self.violations
                .lock()
                .unwrap()
                .push((description.to_string(), violation.clone()));
        }
    }

    #[test]
    fn checker_reports_to_sink() {
        let recorder = Arc::new(Recorder::default());
        let checker = PlanChecker::new(recorder.clone());

        assert_eq!(checker.check("p1 ok", &[act(), leg(), act()]), Ok(()));
        assert_eq!(
            checker.check("p2 broken", &[act(), leg()]),
            Err(StructuralViolation::LastNotActivity)
        );

        let violations = recorder.violations.lock().unwrap();
        assert_eq!(
            *violations,
            vec![(
                "p2 broken".to_string(),
                StructuralViolation::LastNotActivity
            )]
        );
    }
}
