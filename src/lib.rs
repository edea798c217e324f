#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

//! # Pulse
//!
//! ![MIT](https://img.shields.io/badge/license-MIT-blue.svg)
//!
//! ## What is Pulse?
//!
//! Pulse is an ambitious game engine in the **very** early stages of development. Today it
//! provides:
//! - A scene graph of nodes with typed components and per-component change events
//! - Visibility and transform hierarchies
//! - A windowed application loop with keyboard and mouse input
//! - TOML configuration and `env_logger` logging
//!
//! Planned features include:
//! - Render graphs for building custom rendering pipeline and effects
//! - Physically based rendering
//! - Image based lighting
//! - Custom material system
//! - Scripting engine
//! - Integrating with existing physics libraries
//! - UI
//! - Editor
//! - Asset management system
//! - Gamepad input
//!
//! ## Example
//!
//! ```
//! use pulse::LocalTransform;
//! use pulse::Scene;
//! use pulse::Visibility;
//! use pulse::WorldTransform;
//!
//! let mut scene = Scene::new();
//! let parent = scene.spawn();
//! let child = scene.spawn();
//! scene.set_parent(child, parent).unwrap();
//! scene.add(parent, LocalTransform::from_position(pulse::glam::Vec3::X));
//! scene.add(child, LocalTransform::from_position(pulse::glam::Vec3::Y));
//! scene.add(child, Visibility::Visible);
//!
//! pulse::systems::run(&scene);
//!
//! let world = scene.get::<WorldTransform>(child).unwrap();
//! assert_eq!(world.position(), pulse::glam::Vec3::new(1.0, 1.0, 0.0));
//! ```

pub use glam;

pub use crate::app::Application;
pub use crate::app::ApplicationState;
pub use crate::app::Event;
pub use crate::app::Frame;
pub use crate::components::ComputedVisibility;
pub use crate::components::LocalTransform;
pub use crate::components::Visibility;
pub use crate::components::WorldTransform;
pub use crate::config::AppConfig;
pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::input::Input;
pub use crate::input::KeyCode;
pub use crate::input::MouseButton;
pub use crate::scene::Component;
pub use crate::scene::ComponentEvent;
pub use crate::scene::HierarchyError;
pub use crate::scene::Node;
pub use crate::scene::Scene;
pub use crate::time::Time;

mod app;
mod components;
pub mod config;
mod error;
pub mod input;
pub mod logger;
mod scene;
pub mod systems;
mod time;
