//! Trip and plan types.
//!
//! A `Trip` is what a router returns: the legs and interaction activities
//! between two of the traveller's own activities. A `Plan` wraps a trip
//! between those bounding activities and is what structural validation
//! checks.

use serde::{Deserialize, Serialize};

use super::{Activity, Clock, Leg};

/// The kind of a plan element, as seen by structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Activity,
    Leg,
}

/// One step of a trip or plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlanElement {
    Activity(Activity),
    Leg(Leg),
}

impl PlanElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            PlanElement::Activity(_) => ElementKind::Activity,
            PlanElement::Leg(_) => ElementKind::Leg,
        }
    }

    /// Time the traveller spends on this element.
    pub fn duration(&self) -> f64 {
        match self {
            PlanElement::Activity(act) => act.maximum_duration().unwrap_or(0.0),
            PlanElement::Leg(leg) => leg.travel_time(),
        }
    }

    pub fn as_leg(&self) -> Option<&Leg> {
        match self {
            PlanElement::Leg(leg) => Some(leg),
            PlanElement::Activity(_) => None,
        }
    }

    pub fn as_leg_mut(&mut self) -> Option<&mut Leg> {
        match self {
            PlanElement::Leg(leg) => Some(leg),
            PlanElement::Activity(_) => None,
        }
    }

    pub fn as_activity(&self) -> Option<&Activity> {
        match self {
            PlanElement::Activity(act) => Some(act),
            PlanElement::Leg(_) => None,
        }
    }
}

impl From<Leg> for PlanElement {
    fn from(leg: Leg) -> Self {
        PlanElement::Leg(leg)
    }
}

impl From<Activity> for PlanElement {
    fn from(activity: Activity) -> Self {
        PlanElement::Activity(activity)
    }
}

/// The elements a router produced for one origin-destination movement.
///
/// A trip may begin and end with legs, and may consist of a single leg.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trip {
    elements: Vec<PlanElement>,
}

impl Trip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<PlanElement>) -> Self {
        Self { elements }
    }

    /// Appends one element.
    pub fn push(&mut self, element: impl Into<PlanElement>) {
        self.elements.push(element.into());
    }

    /// Appends all elements in order.
    pub fn extend(&mut self, elements: impl IntoIterator<Item = PlanElement>) {
        self.elements.extend(elements);
    }

    pub fn elements(&self) -> &[PlanElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        self.elements.iter().filter_map(PlanElement::as_leg)
    }

    /// Returns all activities in order.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.elements.iter().filter_map(PlanElement::as_activity)
    }

    /// Returns the legs that ride the service.
    pub fn ride_legs(&self) -> impl Iterator<Item = &Leg> {
        self.legs().filter(|leg| leg.is_ride())
    }

    /// Returns the mode of every leg, in order.
    pub fn modes(&self) -> Vec<&str> {
        self.legs().map(Leg::mode).collect()
    }

    /// Returns the clock reading at `start` and after each element.
    ///
    /// The result has `len() + 1` entries.
    pub fn timeline(&self, start: f64) -> Vec<f64> {
        let mut clock = Clock::starting_at(start);
        let mut times = Vec::with_capacity(self.elements.len() + 1);
        times.push(clock.now());
        for element in &self.elements {
            clock = clock.advance(element);
            times.push(clock.now());
        }
        times
    }

    /// Returns the time the trip ends when started at `start`.
    pub fn end_time(&self, start: f64) -> f64 {
        Clock::starting_at(start).advance_over(&self.elements).now()
    }

    /// Wraps this trip between the traveller's bounding activities.
    pub fn into_plan(self, origin: Activity, destination: Activity) -> Plan {
        let mut elements = Vec::with_capacity(self.elements.len() + 2);
        elements.push(PlanElement::Activity(origin));
        elements.extend(self.elements);
        elements.push(PlanElement::Activity(destination));
        Plan { elements }
    }
}

/// A full sequence of activities and legs, as checked by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    elements: Vec<PlanElement>,
}

impl Plan {
    /// Creates a plan from raw elements. No structure is enforced here.
    pub fn new(elements: Vec<PlanElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[PlanElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
