//! # Standard References
//!
//! Citations for every rule the sizing engine applies. The diagram, the PDF
//! report and the engineering notes all cite through this enum so that a
//! clause number only lives in one place.

use serde::{Deserialize, Serialize};

/// Reference to an Australian/New Zealand standard clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardReference {
    /// AS/NZS 3000:2018 Clause 2.5.7.2 - 125% allowance for continuous loads
    ContinuousLoadFactor,
    /// AS/NZS 3000:2018 Clause 2.2 - maximum demand and diversity
    MaximumDemand,
    /// AS/NZS 3000:2018 Section 7.9 - electric vehicle charging installations
    EvChargingInstallations,
    /// AS/NZS 3000:2018 Clause 7.9.2 - RCD protection for EV outlets
    EvRcdProtection,
    /// AS/NZS 60898 - circuit breakers for household and similar installations
    MiniatureCircuitBreakers,
    /// AS/NZS 60947.2 - low-voltage switchgear, circuit breakers
    MouldedCaseCircuitBreakers,
    /// AS/NZS 3008.1.2:2017 - cable selection, current-carrying capacity
    CableCurrentCapacity,
    /// AS/NZS 5000.1 - PVC/XLPE insulated power cables
    PowerCables,
    /// AS/NZS 3439.1 - low-voltage switchgear assemblies
    SwitchgearAssemblies,
    /// AS/NZS 60076 - power transformers
    PowerTransformers,
}

impl StandardReference {
    /// Format the reference for display in reports and diagrams
    pub fn citation(&self) -> &'static str {
        match self {
            StandardReference::ContinuousLoadFactor => "AS/NZS 3000:2018 Clause 2.5.7.2",
            StandardReference::MaximumDemand => "AS/NZS 3000:2018 Clause 2.2",
            StandardReference::EvChargingInstallations => "AS/NZS 3000:2018 Section 7.9",
            StandardReference::EvRcdProtection => "AS/NZS 3000:2018 Clause 7.9.2",
            StandardReference::MiniatureCircuitBreakers => "AS/NZS 60898",
            StandardReference::MouldedCaseCircuitBreakers => "AS/NZS 60947.2",
            StandardReference::CableCurrentCapacity => "AS/NZS 3008.1.2:2017",
            StandardReference::PowerCables => "AS/NZS 5000.1",
            StandardReference::SwitchgearAssemblies => "AS/NZS 3439.1",
            StandardReference::PowerTransformers => "AS/NZS 60076",
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            StandardReference::ContinuousLoadFactor
            | StandardReference::MaximumDemand
            | StandardReference::EvChargingInstallations
            | StandardReference::EvRcdProtection => "AS/NZS 3000",
            StandardReference::MiniatureCircuitBreakers => "AS/NZS 60898",
            StandardReference::MouldedCaseCircuitBreakers => "AS/NZS 60947.2",
            StandardReference::CableCurrentCapacity => "AS/NZS 3008",
            StandardReference::PowerCables => "AS/NZS 5000.1",
            StandardReference::SwitchgearAssemblies => "AS/NZS 3439",
            StandardReference::PowerTransformers => "AS/NZS 60076",
        }
    }
}

impl std::fmt::Display for StandardReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.citation())
    }
}
