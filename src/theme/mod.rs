//! Design tokens for one site: keys, defaults, the in-memory store and its
//! persisted record form.

mod defaults;
mod record;
mod store;
mod tokens;

use thiserror::Error;

pub use defaults::{
    button_defaults, default_value, gradient_default, palette_default, text_role_default,
    ButtonDefaults, TextRoleDefaults, DEFAULT_ICON_NAME, DEFAULT_PRIMARY_FONT,
    DEFAULT_SECONDARY_FONT,
};
pub use record::ThemeRecord;
pub use store::{
    BoxButtonTokens, ButtonTokens, CommonButtonTokens, TextRoleTokens, TokenStore, Typography,
    VariantTokens,
};
pub use tokens::{
    ButtonProperty, ButtonRadius, ButtonSize, ButtonVariant, FontSource, GlobalButtonStyle,
    GradientSlot, IconPosition, PaletteColor, TextRole, TokenKey, TokenValue, TypographyProperty,
};

pub type ThemeResult<T> = std::result::Result<T, ThemeError>;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("{variant} buttons have no {property} setting")]
    UnsupportedProperty {
        variant: ButtonVariant,
        property: ButtonProperty,
    },
    #[error("{key} only accepts solid colors")]
    GradientNotAllowed { key: String },
    #[error("invalid {token}: {value:?}")]
    InvalidValue { token: &'static str, value: String },
    #[error("failed to parse theme record")]
    ParseRecord(#[from] serde_json::Error),
}

const GRADIENT_FUNCTIONS: [&str; 3] = ["linear-gradient", "radial-gradient", "conic-gradient"];

/// True when the value is a CSS gradient expression rather than a solid color.
pub fn is_gradient_expression(value: &str) -> bool {
    GRADIENT_FUNCTIONS
        .iter()
        .any(|function| value.contains(function))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_detection_matches_all_gradient_functions() {
        assert!(is_gradient_expression("linear-gradient(135deg,#000,#fff)"));
        assert!(is_gradient_expression("radial-gradient(circle, red, blue)"));
        assert!(is_gradient_expression("conic-gradient(from 0deg, red, blue)"));
        assert!(is_gradient_expression("repeating-linear-gradient(red, blue)"));
        assert!(!is_gradient_expression("#000000"));
        assert!(!is_gradient_expression("rgba(0, 0, 0, 0.5)"));
    }
}
