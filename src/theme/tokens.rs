use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::{is_gradient_expression, ThemeError};

macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ThemeError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ThemeError::InvalidValue {
                        token: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

token_enum! {
    /// Button variants addressable from the editor.
    ButtonVariant, "button variant" {
        Primary => "primary",
        Secondary => "secondary",
        Tertiary => "tertiary",
        TextLink => "text-link",
    }
}

impl ButtonVariant {
    /// Column prefix used by persisted records and CSS variables.
    ///
    /// `tertiary` is stored under the legacy `outline` prefix.
    pub const fn record_prefix(self) -> &'static str {
        match self {
            Self::Primary => "primary_button",
            Self::Secondary => "secondary_button",
            Self::Tertiary => "outline",
            Self::TextLink => "text_link",
        }
    }

    pub const fn is_text_link(self) -> bool {
        matches!(self, Self::TextLink)
    }

    /// Text links only carry text color, hover color and typography.
    pub const fn supports(self, property: ButtonProperty) -> bool {
        match self {
            Self::TextLink => matches!(
                property,
                ButtonProperty::Text
                    | ButtonProperty::Hover
                    | ButtonProperty::Font
                    | ButtonProperty::Weight
            ),
            Self::Primary | Self::Secondary | Self::Tertiary => true,
        }
    }

    pub fn properties(self) -> impl Iterator<Item = ButtonProperty> {
        ButtonProperty::ALL
            .iter()
            .copied()
            .filter(move |property| self.supports(*property))
    }
}

token_enum! {
    /// Logical button properties, independent of the variant's storage naming.
    ButtonProperty, "button property" {
        Background => "background",
        Hover => "hover",
        Text => "text",
        Border => "border",
        Shadow => "shadow",
        Radius => "radius",
        Size => "size",
        IconEnabled => "icon-enabled",
        IconPosition => "icon-position",
        IconName => "icon-name",
        Font => "font",
        Weight => "weight",
    }
}

impl ButtonProperty {
    pub const fn record_suffix(self) -> &'static str {
        match self {
            Self::Background => "background_color",
            Self::Hover => "hover_color",
            Self::Text => "text_color",
            Self::Border => "border_color",
            Self::Shadow => "shadow_color",
            Self::Radius => "radius",
            Self::Size => "size",
            Self::IconEnabled => "icon_enabled",
            Self::IconPosition => "icon_position",
            Self::IconName => "icon_name",
            Self::Font => "font",
            Self::Weight => "font_weight",
        }
    }

    /// Fields that must stay solid colors even when a gradient is on offer.
    pub const fn is_solid_only(self) -> bool {
        matches!(self, Self::Text | Self::Border | Self::Shadow)
    }
}

token_enum! {
    ButtonRadius, "button radius" {
        Squared => "squared",
        SlightlyRounded => "slightly-rounded",
        FullyRounded => "fully-rounded",
    }
}

impl ButtonRadius {
    pub const fn class(self) -> &'static str {
        match self {
            Self::Squared => "rounded-none",
            Self::SlightlyRounded => "rounded-md",
            Self::FullyRounded => "rounded-full",
        }
    }

    /// Pseudo-element counterpart used by two-layer renders.
    pub const fn before_class(self) -> &'static str {
        match self {
            Self::Squared => "before:rounded-none",
            Self::SlightlyRounded => "before:rounded-md",
            Self::FullyRounded => "before:rounded-full",
        }
    }

    pub const fn css_value(self) -> &'static str {
        match self {
            Self::Squared => "0px",
            Self::SlightlyRounded => "0.375rem",
            Self::FullyRounded => "9999px",
        }
    }
}

token_enum! {
    ButtonSize, "button size" {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
}

impl ButtonSize {
    pub const fn classes(self) -> &'static [&'static str] {
        match self {
            Self::Small => &["px-4", "py-2", "text-sm"],
            Self::Medium => &["px-6", "py-3", "text-base"],
            Self::Large => &["px-8", "py-4", "text-lg"],
        }
    }
}

token_enum! {
    IconPosition, "icon position" {
        Left => "left",
        Right => "right",
    }
}

impl IconPosition {
    pub const fn margin_class(self) -> &'static str {
        match self {
            Self::Left => "mr-2",
            Self::Right => "ml-2",
        }
    }
}

token_enum! {
    /// Which of the two site fonts a text element draws from.
    FontSource, "font source" {
        Primary => "primary",
        Secondary => "secondary",
    }
}

impl FontSource {
    /// Generic family used when the font is absent from the catalog.
    pub const fn generic_fallback(self) -> &'static str {
        match self {
            Self::Primary => "sans-serif",
            Self::Secondary => "serif",
        }
    }
}

token_enum! {
    /// Cross-cutting treatment applied to every resolved button.
    GlobalButtonStyle, "button style" {
        Default => "default",
        Floating => "floating",
        Brick => "brick",
        Modern => "modern",
        OffsetBackground => "offset-background",
        Compact => "compact",
    }
}

impl Default for GlobalButtonStyle {
    fn default() -> Self {
        Self::Default
    }
}

token_enum! {
    PaletteColor, "palette color" {
        Primary => "primary",
        Secondary => "secondary",
        Tertiary => "tertiary",
        Dark => "dark",
        Light => "light",
        White => "white",
        SoftShade1 => "soft-shade-1",
        SoftShade2 => "soft-shade-2",
        SoftShade3 => "soft-shade-3",
    }
}

token_enum! {
    GradientSlot, "gradient slot" {
        Gradient1 => "gradient-1",
        Gradient2 => "gradient-2",
    }
}

token_enum! {
    TextRole, "text role" {
        H1 => "h1",
        H2 => "h2",
        H3 => "h3",
        H4 => "h4",
        H5 => "h5",
        H6 => "h6",
        Paragraph => "paragraph",
    }
}

impl TextRole {
    pub const COUNT: usize = 7;

    pub const fn index(self) -> usize {
        self as usize
    }
}

token_enum! {
    TypographyProperty, "typography property" {
        FontSource => "font_source",
        Size => "size",
        Weight => "weight",
        LineHeight => "line_height",
    }
}

/// Address of a single editable token in a [`TokenStore`](super::TokenStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    Palette(PaletteColor),
    Gradient(GradientSlot),
    PrimaryFont,
    SecondaryFont,
    Typography(TextRole, TypographyProperty),
    Button(ButtonVariant, ButtonProperty),
    GlobalButtonStyle,
}

impl TokenKey {
    /// Every addressable key. Button keys only include properties the variant supports.
    pub fn all() -> Vec<TokenKey> {
        let mut keys = Vec::new();
        keys.extend(PaletteColor::ALL.iter().map(|color| Self::Palette(*color)));
        keys.extend(GradientSlot::ALL.iter().map(|slot| Self::Gradient(*slot)));
        keys.push(Self::PrimaryFont);
        keys.push(Self::SecondaryFont);
        for role in TextRole::ALL {
            keys.extend(
                TypographyProperty::ALL
                    .iter()
                    .map(|property| Self::Typography(*role, *property)),
            );
        }
        for variant in ButtonVariant::ALL {
            keys.extend(
                variant
                    .properties()
                    .map(|property| Self::Button(*variant, property)),
            );
        }
        keys.push(Self::GlobalButtonStyle);
        keys
    }

    /// Flat column name in a persisted theme record.
    pub fn record_key(&self) -> String {
        match self {
            Self::Palette(color) => format!("{}_color", color.as_str().replace('-', "_")),
            Self::Gradient(slot) => slot.as_str().replace('-', "_"),
            Self::PrimaryFont => "primary_font".to_string(),
            Self::SecondaryFont => "secondary_font".to_string(),
            Self::Typography(role, property) => format!("{}_{}", role, property),
            Self::Button(variant, property) => {
                format!("{}_{}", variant.record_prefix(), property.record_suffix())
            }
            Self::GlobalButtonStyle => "button_style".to_string(),
        }
    }

    pub fn css_variable(&self) -> String {
        format!("--{}", self.record_key().replace('_', "-"))
    }

    pub fn from_record_key(key: &str) -> Option<TokenKey> {
        Self::all()
            .into_iter()
            .find(|candidate| candidate.record_key() == key)
    }
}

/// A raw token value as it travels between editor, store and record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    Text(String),
    Flag(bool),
    Unset,
}

impl TokenValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) | Self::Unset => None,
        }
    }

    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn is_gradient(&self) -> bool {
        self.as_text().is_some_and(is_gradient_expression)
    }

    /// CSS-ready rendering of the value.
    pub fn to_css(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Flag(flag) => flag.to_string(),
            Self::Unset => String::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::Flag(flag) => serde_json::Value::Bool(*flag),
            Self::Unset => serde_json::Value::Null,
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Option<TokenValue> {
        match value {
            serde_json::Value::String(text) => Some(Self::Text(text.clone())),
            serde_json::Value::Bool(flag) => Some(Self::Flag(*flag)),
            serde_json::Value::Number(number) => Some(Self::Text(number.to_string())),
            serde_json::Value::Null => Some(Self::Unset),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for TokenValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tertiary_keys_use_outline_prefix() {
        let key = TokenKey::Button(ButtonVariant::Tertiary, ButtonProperty::Text);
        assert_eq!(key.record_key(), "outline_text_color");
        assert_eq!(key.css_variable(), "--outline-text-color");
        assert!(TokenKey::all()
            .iter()
            .all(|key| !key.record_key().starts_with("tertiary_button_")));
    }

    #[test]
    fn text_link_exposes_reduced_field_set() {
        let properties: Vec<_> = ButtonVariant::TextLink.properties().collect();
        assert_eq!(
            properties,
            vec![
                ButtonProperty::Hover,
                ButtonProperty::Text,
                ButtonProperty::Font,
                ButtonProperty::Weight
            ]
        );
        assert!(TokenKey::from_record_key("text_link_radius").is_none());
        assert_eq!(
            TokenKey::from_record_key("text_link_hover_color"),
            Some(TokenKey::Button(ButtonVariant::TextLink, ButtonProperty::Hover))
        );
    }

    #[test]
    fn record_keys_are_unique() {
        let keys = TokenKey::all();
        let mut names: Vec<String> = keys.iter().map(TokenKey::record_key).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), keys.len());
    }

    #[test]
    fn palette_and_typography_keys_are_snake_case() {
        assert_eq!(
            TokenKey::Palette(PaletteColor::SoftShade2).record_key(),
            "soft_shade_2_color"
        );
        assert_eq!(
            TokenKey::Typography(TextRole::H3, TypographyProperty::LineHeight).record_key(),
            "h3_line_height"
        );
        assert_eq!(TokenKey::Gradient(GradientSlot::Gradient1).record_key(), "gradient_1");
    }

    #[test]
    fn enum_parsing_rejects_unknown_values() {
        assert_eq!(
            "fully-rounded".parse::<ButtonRadius>().ok(),
            Some(ButtonRadius::FullyRounded)
        );
        let err = "pill".parse::<ButtonRadius>().unwrap_err();
        assert!(matches!(
            err,
            ThemeError::InvalidValue { token: "button radius", .. }
        ));
        assert_eq!(
            " offset-background ".parse::<GlobalButtonStyle>().ok(),
            Some(GlobalButtonStyle::OffsetBackground)
        );
    }

    #[test]
    fn token_values_convert_from_json() {
        assert_eq!(
            TokenValue::from_json(&serde_json::json!("#fff")),
            Some(TokenValue::Text("#fff".into()))
        );
        assert_eq!(
            TokenValue::from_json(&serde_json::json!(true)),
            Some(TokenValue::Flag(true))
        );
        assert_eq!(
            TokenValue::from_json(&serde_json::json!(700)),
            Some(TokenValue::Text("700".into()))
        );
        assert_eq!(TokenValue::from_json(&serde_json::json!([1])), None);
    }
}
