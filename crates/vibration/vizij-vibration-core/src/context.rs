//! Ambient host state captured before a run and restored on every exit path.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::VibrationError;
use crate::frame::Frame;

/// Interaction mode of the host while the run executes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Object,
    Pose,
    Edit,
    Other(String),
}

/// Everything a run may disturb on the host, as it was before the run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedContext {
    /// Entity the context was captured for.
    pub entity: String,
    pub current_frame: Frame,
    pub mode: EditMode,
    pub auto_keying: bool,
    /// Entity that was active/selected before the run.
    #[serde(default)]
    pub active_entity: Option<String>,
    /// Visibility of the entity's part layers; empty for entities without parts.
    #[serde(default)]
    pub part_layers: Vec<bool>,
}

/// Notices produced while readying the host for keying.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyingPreparation {
    /// The rig was in rest position and has been switched to pose position.
    pub switched_to_pose_position: bool,
}

/// Snapshot / restore of ambient host state.
pub trait HostContext {
    /// Capture the ambient state a run on `entity` may disturb.
    fn save_context(&self, entity: &str) -> SavedContext;

    /// Enter the mode keying needs: select the entity, enable auto-keying,
    /// reveal every part layer, and leave rest position if necessary.
    fn prepare_for_keying(&mut self, entity: &str) -> Result<KeyingPreparation, VibrationError>;

    fn restore_context(&mut self, saved: &SavedContext);
}

/// Restores the saved context when dropped.
///
/// Derefs to the host so the run can keep using it while the guard is alive.
pub struct ContextGuard<'a, H: HostContext> {
    host: &'a mut H,
    saved: SavedContext,
}

impl<'a, H: HostContext> ContextGuard<'a, H> {
    pub fn new(host: &'a mut H, entity: &str) -> Self {
        let saved = host.save_context(entity);
        Self { host, saved }
    }

    pub fn saved(&self) -> &SavedContext {
        &self.saved
    }
}

impl<H: HostContext> Deref for ContextGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: HostContext> DerefMut for ContextGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: HostContext> Drop for ContextGuard<'_, H> {
    fn drop(&mut self) {
        log::debug!(
            "restoring host context (frame {}, mode {:?}, auto-keying {})",
            self.saved.current_frame,
            self.saved.mode,
            self.saved.auto_keying
        );
        self.host.restore_context(&self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        frame: Frame,
        auto_keying: bool,
        restored: u32,
    }

    impl HostContext for Probe {
        fn save_context(&self, entity: &str) -> SavedContext {
            SavedContext {
                entity: entity.to_string(),
                current_frame: self.frame,
                auto_keying: self.auto_keying,
                ..SavedContext::default()
            }
        }

        fn prepare_for_keying(&mut self, _entity: &str) -> Result<KeyingPreparation, VibrationError> {
            self.auto_keying = true;
            Ok(KeyingPreparation::default())
        }

        fn restore_context(&mut self, saved: &SavedContext) {
            self.frame = saved.current_frame;
            self.auto_keying = saved.auto_keying;
            self.restored += 1;
        }
    }

    fn failing_run(host: &mut Probe) -> Result<(), VibrationError> {
        let mut guard = ContextGuard::new(host, "Cube");
        guard.prepare_for_keying("Cube")?;
        guard.frame = 999;
        Err(VibrationError::host("mid-run failure"))
    }

    #[test]
    fn guard_restores_on_error_path() {
        let mut probe = Probe {
            frame: 12,
            ..Probe::default()
        };
        assert!(failing_run(&mut probe).is_err());
        assert_eq!(probe.frame, 12);
        assert!(!probe.auto_keying);
        assert_eq!(probe.restored, 1);
    }
}
