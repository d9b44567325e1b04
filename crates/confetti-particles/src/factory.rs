//! Style → effect dispatch

use crate::effect::{EffectContext, ParticleEffect};
use crate::effects::{
    BubblesEffect, ConfettiEffect, FallingLeavesEffect, FireworksEffect, MeteorShowerEffect,
    SnowEffect, SparklerEffect,
};
use confetti_core::EffectStyle;

/// Build a fresh, not yet set up effect for the context's configured style
pub fn create_effect(ctx: EffectContext) -> Box<dyn ParticleEffect> {
    match ctx.config.style {
        EffectStyle::Confetti => Box::new(ConfettiEffect::new(ctx)),
        EffectStyle::FallingLeaves => Box::new(FallingLeavesEffect::new(ctx)),
        EffectStyle::Fireworks => Box::new(FireworksEffect::new(ctx)),
        EffectStyle::MeteorShower => Box::new(MeteorShowerEffect::new(ctx)),
        EffectStyle::Bubbles => Box::new(BubblesEffect::new(ctx)),
        EffectStyle::Snow => Box::new(SnowEffect::new(ctx)),
        EffectStyle::Sparkler => Box::new(SparklerEffect::new(ctx)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing;
    use crate::scene::{SceneGraph, SceneTree};
    use pretty_assertions::assert_eq;

    #[test]
    fn every_style_maps_to_its_effect() {
        let built: Vec<EffectStyle> = EffectStyle::ALL
            .iter()
            .map(|&style| create_effect(testing::context(testing::config(style))).style())
            .collect();
        assert_eq!(built, EffectStyle::ALL.to_vec());
    }

    #[test]
    fn setup_leaves_everything_invisible() {
        for &style in EffectStyle::ALL.iter() {
            let mut scene = SceneTree::new();
            let mut effect = create_effect(testing::context(testing::config(style)));
            effect.setup(&mut scene);
            assert_eq!(scene.visible_count(), 0, "{style}");
            effect.update(&mut scene, 10.0, 1.0 / 60.0);
            assert_eq!(scene.visible_count(), 0, "{style} moved on the priming tick");
            assert!(scene.child_count() <= 50 * 5, "{style}");
        }
    }
}
