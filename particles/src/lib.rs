//! Procedural animation engine for the particle gallery.
//!
//! This crate is compiled both natively (for the headless host and tests) and
//! to WebAssembly (for the browser preview). It owns the per-frame simulation
//! of every gallery animation: target point clouds are generated once, live
//! position/color buffers are blended toward them every frame, and the
//! renderer only ever reads the resulting buffers through [`render::FrameView`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`]: stores, active animation, frame tick |
//! | [`anim`] | The five animations and their registry |
//! | [`buffer`] | Fixed-capacity point buffers with an active count |
//! | [`shapes`] | Target shape generators (sphere, expanded, polygon, star) |
//! | [`svg`] | SVG document → normalized point cloud sampler |
//! | [`gesture`] | Finger counting, gesture classification and hand state |
//! | [`tracking`] | Hand detector capability states and event application |
//! | [`settings`] | Per-animation settings and the settings store |
//! | [`store`] | Generic publish/subscribe value store |
//! | [`memo`] | Change-detection guard for expensive side effects |
//! | [`color`] | Hex parsing, HSL conversion and palettes |
//! | [`sprite`] | CPU-rasterized point-sprite textures |
//! | [`mesh`] | Triangle meshes for the wave sphere |
//! | [`render`] | Read-only views handed to the renderer |
//! | [`consts`] | Shared numeric constants |
//! | `bindings` | `wasm-bindgen` exports (feature `wasm`) |

pub mod anim;
pub mod buffer;
pub mod color;
pub mod consts;
pub mod engine;
pub mod gesture;
pub mod memo;
pub mod mesh;
pub mod render;
pub mod settings;
pub mod shapes;
pub mod sprite;
pub mod store;
pub mod svg;
pub mod tracking;

#[cfg(feature = "wasm")]
pub mod bindings;
