//! Static table from strategy hint to factory.

use extver_core::config::StrategySelection;
use extver_util::errors::{ExtverError, ExtverResult};

use crate::{file, script, sysprop, StrategyContext, StrategyOptions, VersionStrategy};

type Factory = fn(&mut StrategyOptions, &StrategyContext) -> ExtverResult<Box<dyn VersionStrategy>>;

const FACTORIES: &[(&str, Factory)] = &[
    (file::HINT, file::build),
    (script::HINT, script::build),
    (sysprop::HINT, sysprop::build),
];

/// Registered hints, in registration order.
pub fn hints() -> impl Iterator<Item = &'static str> {
    FACTORIES.iter().map(|(hint, _)| *hint)
}

/// Instantiate the strategy named by `selection.hint`.
pub fn create_strategy(
    selection: &StrategySelection,
    context: &StrategyContext,
) -> ExtverResult<Box<dyn VersionStrategy>> {
    let Some((_, factory)) = FACTORIES.iter().find(|(hint, _)| *hint == selection.hint) else {
        return Err(ExtverError::Configuration {
            message: format!(
                "unknown strategy '{}' (expected one of: {})",
                selection.hint,
                hints().collect::<Vec<_>>().join(", ")
            ),
        }
        .into());
    };

    let mut options = StrategyOptions::new(&selection.hint, selection.options.clone());
    let strategy = factory(&mut options, context)?;
    options.warn_unused();
    tracing::debug!("using version strategy '{}'", strategy.hint());
    Ok(strategy)
}
