//! Gated entry point: validate, refuse conflicting ranges, then run with the
//! host context saved and restored around the whole operation.

use log::{info, warn};

use crate::config::VibrationConfig;
use crate::context::{ContextGuard, HostContext};
use crate::error::VibrationError;
use crate::host::{Sampler, Writer};
use crate::interleave::{Interleaver, RunReport};
use crate::ranges::VibrationRanges;

/// Every check that must pass before anything is written. Performs no writes.
pub fn preflight<H>(config: &VibrationConfig, host: &H) -> Result<VibrationRanges, VibrationError>
where
    H: Sampler + ?Sized,
{
    let ranges = config.validate()?;
    if !host.has_entity(&config.entity) {
        return Err(VibrationError::UnknownEntity {
            entity: config.entity.clone(),
        });
    }
    ranges.check_conflicts()?;
    Ok(ranges)
}

/// Synthesize the vibration described by `config` on `host`.
///
/// Precondition failures leave the host untouched. A failure inside the copy
/// loop leaves already written frames in place; the ambient context is
/// restored either way.
pub fn create_keyframes<H>(host: &mut H, config: &VibrationConfig) -> Result<RunReport, VibrationError>
where
    H: Sampler + Writer + HostContext,
{
    info!("vibration run START for '{}'", config.entity);
    let ranges = preflight(config, &*host)?;

    let mut guard = ContextGuard::new(host, &config.entity);
    let prep = guard.prepare_for_keying(&config.entity)?;
    if prep.switched_to_pose_position {
        warn!(
            "'{}' was in rest position; switched to pose position so parts can move",
            config.entity
        );
    }

    let parts = config.part_selector();
    let mut report = Interleaver::new(&config.entity, &parts, config.channel_mask()).run(
        &mut *guard,
        ranges,
        config.stride,
        config.stay_on,
    )?;
    report.preparation = prep;

    info!(
        "vibration run END for '{}': {} frames written",
        config.entity,
        report.written.len()
    );
    Ok(report)
}
