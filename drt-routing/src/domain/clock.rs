//! Running timestamp used while assembling a trip.

use super::PlanElement;

/// The time at which the traveller finishes the elements assembled so far.
///
/// A `Clock` is a plain value: each assembly step takes the current clock and
/// returns the advanced one. Legs advance it by their travel time, activities
/// by their maximum duration (zero when unset).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Clock(f64);

impl Clock {
    /// A clock reading `time` seconds since simulation midnight.
    pub fn starting_at(time: f64) -> Self {
        Self(time)
    }

    /// Returns the current reading.
    pub fn now(self) -> f64 {
        self.0
    }

    /// Advances past one plan element.
    #[must_use]
    pub fn advance(self, element: &PlanElement) -> Self {
        Self(self.0 + element.duration())
    }

    /// Advances past every element in order.
    #[must_use]
    pub fn advance_over(self, elements: &[PlanElement]) -> Self {
        elements.iter().fold(self, |clock, element| clock.advance(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Activity, Leg, LinkId, Location};

    fn walk(travel_time: f64) -> PlanElement {
        PlanElement::Leg(Leg::new(
            "walk",
            LinkId::from("A"),
            LinkId::from("B"),
            0.0,
            travel_time,
        ))
    }

    #[test]
    fn leg_advances_by_travel_time() {
        let clock = Clock::starting_at(100.0).advance(&walk(30.0));
        assert_eq!(clock.now(), 130.0);
    }

    #[test]
    fn activity_advances_by_maximum_duration() {
        let stage = PlanElement::Activity(Activity::stage(
            "drt interaction",
            Location::on_link(LinkId::from("A")),
        ));
        assert_eq!(Clock::starting_at(0.0).advance(&stage).now(), 1.0);

        let unbounded = PlanElement::Activity(Activity::new(
            "walk interaction",
            Location::on_link(LinkId::from("A")),
        ));
        assert_eq!(Clock::starting_at(0.0).advance(&unbounded).now(), 0.0);
    }

    #[test]
    fn advance_over_sums_elements() {
        let elements = vec![walk(10.0), walk(20.0)];
        assert_eq!(Clock::starting_at(5.0).advance_over(&elements).now(), 35.0);
        assert_eq!(Clock::starting_at(5.0).advance_over(&[]).now(), 5.0);
    }
}
