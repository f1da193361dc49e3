use tender_model::{CPUS, MEM, Offer, PORTS, ValueRange};

use super::{OfferTally, ResourcePlanner};

/// Default planner.
///
/// Scalars are summed across entries of the same name. For ports only the first range of the
/// first non-empty `ports` entry is used, narrowed to its first port: one task needs one port.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFitPlanner;

impl ResourcePlanner for FirstFitPlanner {
    fn name(&self) -> &'static str {
        "first-fit"
    }

    fn tally(&self, offer: &Offer) -> OfferTally {
        let mut tally = OfferTally::default();

        for resource in &offer.resources {
            match resource.name.as_str() {
                CPUS => tally.cpus += resource.as_scalar().unwrap_or_default(),
                MEM => tally.mem += resource.as_scalar().unwrap_or_default(),
                PORTS if tally.port.is_none() => {
                    tally.port = resource
                        .as_ranges()
                        .and_then(|ranges| ranges.first())
                        .map(|first| ValueRange::single(first.begin));
                }
                _ => {}
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use tender_model::{Resource, ResourceRequirement};

    use super::*;
    use crate::planner::{Decision, DeclineReason, Reservation};

    fn requirement() -> ResourceRequirement {
        ResourceRequirement::new(0.5, 128.0).unwrap()
    }

    fn offer(resources: Vec<Resource>) -> Offer {
        let mut offer = Offer::new("offer-1", "agent-1", "host-a");
        offer.resources = resources;
        offer
    }

    fn ports(begin: u64, end: u64) -> Resource {
        Resource::ranges(PORTS, vec![ValueRange::new(begin, end).unwrap()])
    }

    #[test]
    fn accepts_sufficient_offer_and_reserves_requirement() {
        let offer = offer(vec![
            Resource::scalar(CPUS, 1.0),
            Resource::scalar(MEM, 256.0),
            ports(31000, 31010),
        ]);

        let decision = FirstFitPlanner.evaluate(&offer, &requirement());
        assert_eq!(
            decision,
            Decision::Accept(Reservation {
                cpus: 0.5,
                mem: 128.0,
                port: ValueRange::single(31000),
            })
        );
    }

    #[test]
    fn declines_insufficient_cpu() {
        let offer = offer(vec![
            Resource::scalar(CPUS, 0.2),
            Resource::scalar(MEM, 256.0),
            ports(31000, 31010),
        ]);

        assert_eq!(
            FirstFitPlanner.evaluate(&offer, &requirement()),
            Decision::Decline(DeclineReason::InsufficientCpus)
        );
    }

    #[test]
    fn declines_insufficient_mem() {
        let offer = offer(vec![
            Resource::scalar(CPUS, 4.0),
            Resource::scalar(MEM, 64.0),
            ports(31000, 31010),
        ]);

        assert_eq!(
            FirstFitPlanner.evaluate(&offer, &requirement()),
            Decision::Decline(DeclineReason::InsufficientMem)
        );
    }

    #[test]
    fn declines_without_ports_entry() {
        let offer = offer(vec![Resource::scalar(CPUS, 4.0), Resource::scalar(MEM, 1024.0)]);

        let tally = FirstFitPlanner.tally(&offer);
        assert!(tally.port.is_none());
        assert_eq!(
            FirstFitPlanner.decide(&tally, &requirement()),
            Decision::Decline(DeclineReason::NoPorts)
        );
    }

    #[test]
    fn empty_offer_is_declined() {
        let tally = FirstFitPlanner.tally(&offer(vec![]));
        assert_eq!(tally, OfferTally::default());
        assert!(!matches!(FirstFitPlanner.decide(&tally, &requirement()), Decision::Accept(_)));
    }

    #[test]
    fn empty_port_range_list_counts_as_absent() {
        let offer = offer(vec![
            Resource::scalar(CPUS, 1.0),
            Resource::scalar(MEM, 256.0),
            Resource::ranges(PORTS, vec![]),
        ]);
        assert_eq!(
            FirstFitPlanner.evaluate(&offer, &requirement()),
            Decision::Decline(DeclineReason::NoPorts)
        );
    }

    #[test]
    fn scalars_are_summed_across_entries() {
        let offer = offer(vec![
            Resource::scalar(CPUS, 0.25),
            Resource::scalar(MEM, 100.0),
            Resource::scalar(CPUS, 0.25),
            Resource::scalar(MEM, 28.0),
            ports(4000, 4001),
        ]);

        let tally = FirstFitPlanner.tally(&offer);
        assert_eq!(tally.cpus, 0.5);
        assert_eq!(tally.mem, 128.0);
        assert!(matches!(FirstFitPlanner.decide(&tally, &requirement()), Decision::Accept(_)));
    }

    #[test]
    fn only_first_port_range_is_used() {
        let offer = offer(vec![
            Resource::ranges(
                PORTS,
                vec![ValueRange::new(5000, 5010).unwrap(), ValueRange::new(6000, 6010).unwrap()],
            ),
            ports(7000, 7010),
        ]);

        assert_eq!(FirstFitPlanner.tally(&offer).port, Some(ValueRange::single(5000)));
    }

    #[test]
    fn exact_boundary_is_accepted() {
        let offer = offer(vec![
            Resource::scalar(CPUS, 0.5),
            Resource::scalar(MEM, 128.0),
            ports(1, 1),
        ]);
        assert!(matches!(FirstFitPlanner.evaluate(&offer, &requirement()), Decision::Accept(_)));
    }

    #[test]
    fn mistyped_entries_are_ignored() {
        let offer = offer(vec![
            Resource::ranges(CPUS, vec![ValueRange::single(8)]),
            Resource::scalar(PORTS, 3.0),
            Resource::scalar(MEM, 512.0),
        ]);

        let tally = FirstFitPlanner.tally(&offer);
        assert_eq!(tally.cpus, 0.0);
        assert!(tally.port.is_none());
    }
}
