// Animation template registry
//
// Entities never own template definitions. They bind a fresh copy of a
// registered set into their own animation, initialized against their
// sprite, and drive it from there.

use crate::engine::sprite::SpriteState;
use std::collections::HashMap;

use super::clip::AnimationClip;
use super::set::AnimationSet;

#[derive(Debug, Default)]
pub struct AnimationCatalog {
    templates: HashMap<String, AnimationSet>,
}

impl AnimationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any with the same name
    pub fn register(&mut self, template: AnimationSet) {
        self.templates.insert(template.name.clone(), template);
    }

    pub fn get(&self, name: &str) -> Option<&AnimationSet> {
        self.templates.get(name)
    }

    /// Bind a fresh copy of a template into a target animation.
    ///
    /// Returns false without touching the target when the template is
    /// unknown. With `override_existing` the target is emptied first.
    /// A duration override only takes effect because the copy has not
    /// started running yet.
    pub fn bind(
        &self,
        target: &mut AnimationSet,
        sprite: &SpriteState,
        name: &str,
        override_existing: bool,
        duration: Option<f32>,
    ) -> bool {
        let Some(template) = self.templates.get(name) else {
            return false;
        };
        if override_existing {
            target.clear();
        }
        let mut copy = template.fresh();
        if let Some(duration) = duration {
            copy.set_duration(duration);
        }
        copy.initialize(sprite);
        target.add(AnimationClip::group(name, copy));
        true
    }
}
