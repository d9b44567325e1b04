//! Confetti Particles - frame-stepped 2D particle effects
//!
//! Every style is a [`ParticleEffect`]: it allocates its particles as scene-graph
//! nodes in `setup`, then mutates their position, rotation, scale and alpha once
//! per rendered frame in `update`. All effects share:
//! - one easing-shaped time dilation per frame ([`EffectClock`])
//! - the global fade over the last 0.5s of the run (alpha only ever decreases)
//! - a style-specific spawn window for staggered entry
//!
//! Scene nodes and glyph textures are host collaborators, reached through the
//! [`SceneGraph`] and [`TextureProvider`] traits.

pub mod curves;
pub mod effect;
pub mod effects;
pub mod emitter;
pub mod factory;
pub mod particle;
pub mod rand;
pub mod scene;
pub mod texture;

pub use confetti_core::Easing;
pub use effect::{EffectClock, EffectContext, FrameStep, ParticleEffect};
pub use factory::create_effect;
pub use scene::{Node, NodeId, SceneGraph, SceneTree, SpriteInstance};
pub use texture::{
    DrawableHandle, GlyphRasterizer, SequentialRasterizer, TextureCache, TextureProvider,
};
