use derive_builder::Builder;

use super::{Config, Paradigm, TieBreakPolicy};

/// Runtime configuration shared by the three compilers.
///
/// Every invocation of the kernel (§5) is parameterized by exactly one of
/// these: which paradigm the installed design targets, how path ties are
/// broken, and how often a cancellation token is polled between emitted
/// statements.
#[derive(Clone, Debug, Builder)]
#[builder(setter(into))]
pub struct KernelConfig {
    pub paradigm: Paradigm,

    #[builder(default)]
    pub tie_break: TieBreakPolicy,

    /// Number of emitted statements between cancellation checks.
    #[builder(default = "1")]
    pub cancellation_check_interval: usize,
}

impl Config for KernelConfig {}

impl KernelConfig {
    pub fn flat() -> Self {
        KernelConfig {
            paradigm: Paradigm::Flat,
            tie_break: TieBreakPolicy::default(),
            cancellation_check_interval: 1,
        }
    }

    pub fn json_nested() -> Self {
        KernelConfig {
            paradigm: Paradigm::JsonNested,
            tie_break: TieBreakPolicy::default(),
            cancellation_check_interval: 1,
        }
    }
}
