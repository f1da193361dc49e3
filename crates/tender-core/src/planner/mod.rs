//! Offer evaluation.
//!
//! A [`ResourcePlanner`] turns one offer into an [`OfferTally`] and decides whether the tally
//! covers a [`ResourceRequirement`]. The decision is a pure function of the offer and the
//! requirement; logging the tally is left to the caller.

mod first_fit;
pub use first_fit::FirstFitPlanner;

use std::fmt;

use tender_model::{CPUS, MEM, Offer, PORTS, Resource, ResourceRequirement, ValueRange};

/// Resources an offer carries, as seen by a planner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OfferTally {
    pub cpus: f64,
    pub mem: f64,
    /// Port range picked for the task, if the offer had any.
    pub port: Option<ValueRange>,
}

/// What a task reserves from an accepted offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reservation {
    pub cpus: f64,
    pub mem: f64,
    pub port: ValueRange,
}

impl Reservation {
    /// Resource entries to attach to the task descriptor.
    pub fn resources(&self) -> Vec<Resource> {
        vec![
            Resource::scalar(CPUS, self.cpus),
            Resource::scalar(MEM, self.mem),
            Resource::ranges(PORTS, vec![self.port]),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    InsufficientCpus,
    InsufficientMem,
    NoPorts,
}

impl DeclineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclineReason::InsufficientCpus => "insufficient_cpus",
            DeclineReason::InsufficientMem => "insufficient_mem",
            DeclineReason::NoPorts => "no_ports",
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Accept(Reservation),
    Decline(DeclineReason),
}

/// Strategy for picking the resources of one task out of an offer.
pub trait ResourcePlanner: Send + Sync {
    fn name(&self) -> &'static str;

    /// Aggregate the offer's resource entries.
    fn tally(&self, offer: &Offer) -> OfferTally;

    /// Accept iff every threshold is met (`>=`, no tolerance) and a port was found.
    ///
    /// The reservation is taken from the requirement, so surplus stays with the manager.
    fn decide(&self, tally: &OfferTally, requirement: &ResourceRequirement) -> Decision {
        if tally.cpus < requirement.cpus {
            return Decision::Decline(DeclineReason::InsufficientCpus);
        }
        if tally.mem < requirement.mem {
            return Decision::Decline(DeclineReason::InsufficientMem);
        }
        match tally.port {
            Some(port) => Decision::Accept(Reservation {
                cpus: requirement.cpus,
                mem: requirement.mem,
                port,
            }),
            None => Decision::Decline(DeclineReason::NoPorts),
        }
    }

    fn evaluate(&self, offer: &Offer, requirement: &ResourceRequirement) -> Decision {
        self.decide(&self.tally(offer), requirement)
    }
}
