//! In-memory host: keyed transform curves, one timeline cursor, and the
//! ambient state a DCC would carry (mode, auto-keying, layers).
//!
//! Model:
//! - Each entity (and each of its parts) has a base transform and a set of
//!   per-property curves. A property with a curve is "animated".
//! - Moving the cursor re-evaluates every animated property into the live
//!   transform; writes override live values until the next cursor move.
//! - Curve evaluation: exact key, else hold the previous key (constant) or
//!   blend linearly toward the next key (linear / bezier). Outside the keyed
//!   span the nearest key holds.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::context::{EditMode, HostContext, KeyingPreparation, SavedContext};
use crate::error::VibrationError;
use crate::frame::Frame;
use crate::host::{Interpolation, Sampler, Writer};
use crate::transform::{Channels, PartSelector, PartTransform, Transform, TransformSample};

/// Animatable transform property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Location,
    RotationEuler,
    RotationQuaternion,
    Scale,
}

impl Property {
    pub const ALL: [Property; 4] = [
        Property::Location,
        Property::RotationEuler,
        Property::RotationQuaternion,
        Property::Scale,
    ];

    pub fn get(self, t: &Transform) -> Vec<f32> {
        match self {
            Property::Location => t.location.to_vec(),
            Property::RotationEuler => t.rotation_euler.to_vec(),
            Property::RotationQuaternion => t.rotation_quaternion.to_vec(),
            Property::Scale => t.scale.to_vec(),
        }
    }

    /// Copies as many components as both sides have.
    pub fn set(self, t: &mut Transform, value: &[f32]) {
        let dst: &mut [f32] = match self {
            Property::Location => &mut t.location,
            Property::RotationEuler => &mut t.rotation_euler,
            Property::RotationQuaternion => &mut t.rotation_quaternion,
            Property::Scale => &mut t.scale,
        };
        for (d, s) in dst.iter_mut().zip(value) {
            *d = *s;
        }
    }
}

/// One recorded key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub value: Vec<f32>,
    #[serde(default)]
    pub interpolation: Interpolation,
}

/// Keys of one property, ordered by frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    keys: BTreeMap<Frame, Key>,
}

impl Curve {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn key(&self, frame: Frame) -> Option<&Key> {
        self.keys.get(&frame)
    }

    pub fn keys(&self) -> impl Iterator<Item = (Frame, &Key)> {
        self.keys.iter().map(|(f, k)| (*f, k))
    }

    pub fn evaluate(&self, frame: Frame) -> Option<Vec<f32>> {
        let prev = self.keys.range(..=frame).next_back();
        let next = self.keys.range(frame.saturating_add(1)..).next();
        match (prev, next) {
            (None, None) => None,
            (Some((_, k)), None) | (None, Some((_, k))) => Some(k.value.clone()),
            (Some((f0, k0)), Some((f1, k1))) => {
                if *f0 == frame || k0.interpolation == Interpolation::Constant {
                    return Some(k0.value.clone());
                }
                let t = (frame - f0) as f32 / (f1 - f0) as f32;
                Some(
                    k0.value
                        .iter()
                        .zip(&k1.value)
                        .map(|(a, b)| a + (b - a) * t)
                        .collect(),
                )
            }
        }
    }

    /// Insert or replace the key at `frame`. A replaced key keeps its
    /// interpolation; a new key gets `default`.
    pub fn insert(&mut self, frame: Frame, value: Vec<f32>, default: Interpolation) {
        match self.keys.get_mut(&frame) {
            Some(key) => key.value = value,
            None => {
                self.keys.insert(
                    frame,
                    Key {
                        value,
                        interpolation: default,
                    },
                );
            }
        }
    }

    /// Change the key sitting exactly on `frame`, if any.
    pub fn set_interpolation(&mut self, frame: Frame, mode: Interpolation) -> bool {
        match self.keys.get_mut(&frame) {
            Some(key) => {
                key.interpolation = mode;
                true
            }
            None => false,
        }
    }
}

/// Base transform plus curves, with the evaluated/overridden live value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatedTransform {
    #[serde(default)]
    pub base: Transform,
    #[serde(default)]
    pub curves: BTreeMap<Property, Curve>,
    #[serde(skip)]
    live: Transform,
}

impl AnimatedTransform {
    pub fn new(base: Transform) -> Self {
        Self {
            base,
            curves: BTreeMap::new(),
            live: base,
        }
    }

    pub fn live(&self) -> &Transform {
        &self.live
    }

    pub fn is_animated(&self) -> bool {
        self.curves.values().any(|c| !c.is_empty())
    }

    pub fn curve(&self, property: Property) -> Option<&Curve> {
        self.curves.get(&property)
    }

    pub fn key(&mut self, property: Property, frame: Frame, value: &[f32]) {
        self.curves
            .entry(property)
            .or_default()
            .insert(frame, value.to_vec(), Interpolation::default());
    }

    fn evaluate(&mut self, frame: Frame) {
        let mut live = self.base;
        for (property, curve) in &self.curves {
            if let Some(value) = curve.evaluate(frame) {
                property.set(&mut live, &value);
            }
        }
        self.live = live;
    }

    fn key_available(&mut self, frame: Frame, default: Interpolation) -> usize {
        let live = self.live;
        let mut keyed = 0;
        for (property, curve) in self.curves.iter_mut() {
            curve.insert(frame, property.get(&live), default);
            keyed += 1;
        }
        keyed
    }

    fn set_interpolation(&mut self, frame: Frame, mode: Interpolation) -> usize {
        self.curves
            .values_mut()
            .map(|c| c.set_interpolation(frame, mode))
            .filter(|changed| *changed)
            .count()
    }
}

/// Named sub-part of an entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenePart {
    pub name: String,
    #[serde(default)]
    pub animation: AnimatedTransform,
}

/// One entity of the scene. Entities with parts behave like rigs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    #[serde(default)]
    pub animation: AnimatedTransform,
    #[serde(default)]
    pub parts: Vec<ScenePart>,
    /// Part layer visibility.
    #[serde(default)]
    pub layers: Vec<bool>,
    /// Rig displayed in rest position (parts cannot be posed).
    #[serde(default)]
    pub rest_position: bool,
}

impl SceneEntity {
    pub fn new(base: Transform) -> Self {
        Self {
            animation: AnimatedTransform::new(base),
            ..Self::default()
        }
    }

    pub fn with_part(mut self, name: impl Into<String>, base: Transform) -> Self {
        self.parts.push(ScenePart {
            name: name.into(),
            animation: AnimatedTransform::new(base),
        });
        self
    }

    pub fn part(&self, name: &str) -> Option<&ScenePart> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn part_mut(&mut self, name: &str) -> Option<&mut ScenePart> {
        self.parts.iter_mut().find(|p| p.name == name)
    }

    pub fn is_articulated(&self) -> bool {
        !self.parts.is_empty()
    }

    pub fn has_animation_data(&self) -> bool {
        self.animation.is_animated() || self.parts.iter().any(|p| p.animation.is_animated())
    }

    fn evaluate(&mut self, frame: Frame) {
        self.animation.evaluate(frame);
        for part in &mut self.parts {
            part.animation.evaluate(frame);
        }
    }
}

/// Host call recorded by [`MemoryScene`], in call order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum HostOp {
    SetFrame(Frame),
    Read {
        entity: String,
        frame: Frame,
    },
    Write {
        entity: String,
        part: Option<String>,
        frame: Frame,
    },
    KeyAvailable {
        entity: String,
        frame: Frame,
        keys: usize,
    },
    SetInterpolation {
        entity: String,
        frame: Frame,
        mode: Interpolation,
        keys: usize,
    },
}

/// Reference host kept entirely in memory. Serde round-trippable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryScene {
    pub current_frame: Frame,
    pub mode: EditMode,
    pub auto_keying: bool,
    pub active_entity: Option<String>,
    /// Interpolation given to newly inserted keys.
    pub default_interpolation: Interpolation,
    pub entities: HashMap<String, SceneEntity>,
    #[serde(skip)]
    ops: Vec<HostOp>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a scene and evaluate it at its current frame.
    pub fn from_json_str(json: &str) -> Result<Self, VibrationError> {
        let mut scene: MemoryScene = serde_json::from_str(json)?;
        scene.reevaluate();
        Ok(scene)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, VibrationError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn insert_entity(&mut self, name: impl Into<String>, mut entity: SceneEntity) {
        entity.evaluate(self.current_frame);
        self.entities.insert(name.into(), entity);
    }

    pub fn entity(&self, name: &str) -> Option<&SceneEntity> {
        self.entities.get(name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut SceneEntity> {
        self.entities.get_mut(name)
    }

    /// Recorded host calls since the last [`MemoryScene::clear_ops`].
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Key on the entity itself (`part == None`) or on one part.
    pub fn key(
        &mut self,
        entity: &str,
        part: Option<&str>,
        property: Property,
        frame: Frame,
        value: &[f32],
    ) -> Result<(), VibrationError> {
        self.target_mut(entity, part)?.key(property, frame, value);
        Ok(())
    }

    /// Evaluated value of one property at `frame`, without moving the cursor.
    pub fn value_at(
        &self,
        entity: &str,
        part: Option<&str>,
        property: Property,
        frame: Frame,
    ) -> Option<Vec<f32>> {
        let ent = self.entities.get(entity)?;
        let anim = match part {
            None => &ent.animation,
            Some(name) => &ent.part(name)?.animation,
        };
        match anim.curve(property).and_then(|c| c.evaluate(frame)) {
            Some(v) => Some(v),
            None => Some(property.get(&anim.base)),
        }
    }

    /// Recorded key at exactly `frame`, if any.
    pub fn key_at(
        &self,
        entity: &str,
        part: Option<&str>,
        property: Property,
        frame: Frame,
    ) -> Option<&Key> {
        let ent = self.entities.get(entity)?;
        let anim = match part {
            None => &ent.animation,
            Some(name) => &ent.part(name)?.animation,
        };
        anim.curve(property)?.key(frame)
    }

    fn reevaluate(&mut self) {
        let frame = self.current_frame;
        for entity in self.entities.values_mut() {
            entity.evaluate(frame);
        }
    }

    fn entity_ref(&self, entity: &str) -> Result<&SceneEntity, VibrationError> {
        self.entities
            .get(entity)
            .ok_or_else(|| VibrationError::UnknownEntity {
                entity: entity.to_string(),
            })
    }

    fn target_mut(
        &mut self,
        entity: &str,
        part: Option<&str>,
    ) -> Result<&mut AnimatedTransform, VibrationError> {
        let ent = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| VibrationError::UnknownEntity {
                entity: entity.to_string(),
            })?;
        match part {
            None => Ok(&mut ent.animation),
            Some(name) => ent
                .part_mut(name)
                .map(|p| &mut p.animation)
                .ok_or_else(|| VibrationError::UnknownPart {
                    entity: entity.to_string(),
                    part: name.to_string(),
                }),
        }
    }

    fn move_to(&mut self, frame: Frame) {
        if self.current_frame != frame {
            self.set_current_frame(frame);
        }
    }
}

impl Sampler for MemoryScene {
    fn has_entity(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    fn read_transform(
        &mut self,
        entity: &str,
        parts: &PartSelector,
        frame: Frame,
    ) -> Result<TransformSample, VibrationError> {
        self.entity_ref(entity)?;
        self.set_current_frame(frame);
        let ent = self.entity_ref(entity)?;

        let selected = if !ent.is_articulated() {
            Vec::new()
        } else {
            if let PartSelector::Named(name) = parts {
                if ent.part(name).is_none() {
                    return Err(VibrationError::UnknownPart {
                        entity: entity.to_string(),
                        part: name.clone(),
                    });
                }
            }
            ent.parts
                .iter()
                .filter(|p| parts.matches(&p.name))
                .map(|p| PartTransform {
                    name: p.name.clone(),
                    transform: *p.animation.live(),
                })
                .collect()
        };

        let sample = TransformSample {
            frame,
            entity: *ent.animation.live(),
            parts: selected,
        };
        self.ops.push(HostOp::Read {
            entity: entity.to_string(),
            frame,
        });
        Ok(sample)
    }
}

impl Writer for MemoryScene {
    fn current_frame(&self) -> Frame {
        self.current_frame
    }

    fn set_current_frame(&mut self, frame: Frame) {
        self.current_frame = frame;
        self.reevaluate();
        self.ops.push(HostOp::SetFrame(frame));
    }

    fn has_animation_data(&self, entity: &str) -> bool {
        self.entities
            .get(entity)
            .map(SceneEntity::has_animation_data)
            .unwrap_or(false)
    }

    fn write_transform(
        &mut self,
        entity: &str,
        part: Option<&str>,
        frame: Frame,
        transform: &Transform,
        channels: Channels,
    ) -> Result<(), VibrationError> {
        self.move_to(frame);
        self.target_mut(entity, part)?.live.apply(transform, channels);
        self.ops.push(HostOp::Write {
            entity: entity.to_string(),
            part: part.map(str::to_string),
            frame,
        });
        Ok(())
    }

    fn insert_available_keyframes(
        &mut self,
        entity: &str,
        frame: Frame,
    ) -> Result<usize, VibrationError> {
        self.move_to(frame);
        let default = self.default_interpolation;
        let ent = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| VibrationError::UnknownEntity {
                entity: entity.to_string(),
            })?;
        if !ent.has_animation_data() {
            return Err(VibrationError::NoAnimationData {
                entity: entity.to_string(),
            });
        }
        let mut keys = ent.animation.key_available(frame, default);
        for part in &mut ent.parts {
            keys += part.animation.key_available(frame, default);
        }
        self.ops.push(HostOp::KeyAvailable {
            entity: entity.to_string(),
            frame,
            keys,
        });
        Ok(keys)
    }

    fn set_interpolation(
        &mut self,
        entity: &str,
        frame: Frame,
        mode: Interpolation,
    ) -> Result<usize, VibrationError> {
        let ent = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| VibrationError::UnknownEntity {
                entity: entity.to_string(),
            })?;
        let mut keys = ent.animation.set_interpolation(frame, mode);
        for part in &mut ent.parts {
            keys += part.animation.set_interpolation(frame, mode);
        }
        self.ops.push(HostOp::SetInterpolation {
            entity: entity.to_string(),
            frame,
            mode,
            keys,
        });
        Ok(keys)
    }
}

impl HostContext for MemoryScene {
    fn save_context(&self, entity: &str) -> SavedContext {
        SavedContext {
            entity: entity.to_string(),
            current_frame: self.current_frame,
            mode: self.mode.clone(),
            auto_keying: self.auto_keying,
            active_entity: self.active_entity.clone(),
            part_layers: self
                .entities
                .get(entity)
                .map(|e| e.layers.clone())
                .unwrap_or_default(),
        }
    }

    fn prepare_for_keying(&mut self, entity: &str) -> Result<KeyingPreparation, VibrationError> {
        let ent = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| VibrationError::UnknownEntity {
                entity: entity.to_string(),
            })?;
        let mut prep = KeyingPreparation::default();
        if ent.is_articulated() {
            ent.layers.iter_mut().for_each(|l| *l = true);
            if ent.rest_position {
                ent.rest_position = false;
                prep.switched_to_pose_position = true;
            }
            self.mode = EditMode::Pose;
        } else {
            self.mode = EditMode::Object;
        }
        self.active_entity = Some(entity.to_string());
        self.auto_keying = true;
        Ok(prep)
    }

    fn restore_context(&mut self, saved: &SavedContext) {
        if let Some(ent) = self.entities.get_mut(&saved.entity) {
            if ent.layers.len() == saved.part_layers.len() {
                ent.layers.clone_from(&saved.part_layers);
            }
        }
        self.auto_keying = saved.auto_keying;
        self.active_entity.clone_from(&saved.active_entity);
        self.mode = saved.mode.clone();
        self.set_current_frame(saved.current_frame);
    }
}
