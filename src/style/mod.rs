//! Style resolution: button render descriptors and the document-level CSS
//! variable set, both derived from a [`TokenStore`](crate::theme::TokenStore)
//! snapshot.

mod global;
mod icons;
mod resolver;
mod variables;

pub use global::{overlay, StyleOverlay, OFFSET_LAYER_CLASSES};
pub use icons::{Icon, IconRegistry};
pub use resolver::{
    font_name_for, BackgroundMode, RenderDescriptor, ResolvedColors, ResolvedFont, ResolvedIcon,
    StyleResolver,
};
pub use variables::{bundled_default_variables, compute_variables, default_variables, AppliedTheme};
