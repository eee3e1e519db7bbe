//! Command line selection of how malformed table cells are handled.
use clap::ValueEnum;
use opcode_timings::MalformedCellPolicy;

/// Clap arg enum for selecting the [`MalformedCellPolicy`].
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum PolicySelector {
    /// Emit `<invalid>` entries for cells without timings and keep going.
    #[default]
    Lenient,
    /// Fail on the first cell without valid timings.
    Strict,
}

impl From<PolicySelector> for MalformedCellPolicy {
    fn from(selector: PolicySelector) -> Self {
        match selector {
            PolicySelector::Lenient => MalformedCellPolicy::Lenient,
            PolicySelector::Strict => MalformedCellPolicy::Strict,
        }
    }
}
